//! Headless front end for the wrapedit engine.
//!
//! Loads a document, replays editing commands against it, and prints the
//! resulting visual lines (or a JSON render frame).

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wrapedit_core::{
    commands_from_script, commands_from_text, CellMeasure, EditCommand, Editor, EditorConfig,
};

#[derive(Parser)]
#[command(name = "wrapedit", about = "Word-wrapping text editor", version)]
struct Cli {
    /// Window width in pixels (overrides WRAPEDIT_WINDOW_WIDTH)
    #[arg(long, global = true)]
    width: Option<i32>,

    /// Window height in pixels (overrides WRAPEDIT_WINDOW_HEIGHT)
    #[arg(long, global = true)]
    height: Option<i32>,

    /// Font size in points (overrides WRAPEDIT_FONT_SIZE)
    #[arg(long, global = true)]
    font_size: Option<u32>,

    /// Print the render frame as JSON instead of plain rows
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a file and print its visual lines
    Render { file: PathBuf },
    /// Apply editing commands to a file
    Edit {
        file: PathBuf,
        /// Command script, one command per line
        #[arg(long, conflicts_with = "keys", required_unless_present = "keys")]
        script: Option<PathBuf>,
        /// Text typed at the end of the document
        #[arg(long)]
        keys: Option<String>,
        /// Write the edited document back to FILE
        #[arg(long)]
        save: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn build_config(
    width: Option<i32>,
    height: Option<i32>,
    font_size: Option<u32>,
) -> anyhow::Result<EditorConfig> {
    let mut config = EditorConfig::from_env();
    if let Some(width) = width {
        config.window_width = width;
    }
    if let Some(height) = height {
        config.window_height = height;
    }
    if let Some(font_size) = font_size {
        config.font_size = font_size;
    }
    config.validate()?;
    Ok(config)
}

/// Open `path`, starting from an empty document when it does not exist yet.
fn open_editor(path: &Path, config: &EditorConfig) -> anyhow::Result<Editor> {
    let measure = Box::new(CellMeasure);
    if !path.exists() {
        tracing::info!(path = %path.display(), "file not found, starting empty");
        return Ok(Editor::new(config, measure)?);
    }
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Editor::load(config, measure, BufReader::new(file))
        .with_context(|| format!("failed to load {}", path.display()))
}

fn load_commands(script: Option<&Path>, keys: Option<&str>) -> anyhow::Result<Vec<EditCommand>> {
    match (script, keys) {
        (Some(path), _) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            commands_from_script(&raw)
                .with_context(|| format!("invalid script {}", path.display()))
        }
        (None, Some(keys)) => Ok(commands_from_text(keys)),
        (None, None) => anyhow::bail!("either --script or --keys is required"),
    }
}

fn format_output(editor: &Editor, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(&editor.frame()).context("frame encoding error");
    }
    Ok(editor.rows().join("\n"))
}

fn save_editor(editor: &Editor, path: &Path) -> anyhow::Result<usize> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    editor
        .save(BufWriter::new(file))
        .with_context(|| format!("failed to save {}", path.display()))
}

fn execute<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let Cli {
        width,
        height,
        font_size,
        json,
        command,
    } = cli;

    let config = || build_config(width, height, font_size);
    match command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, out);
        }
        Commands::Render { file } => {
            let editor = open_editor(&file, &config()?)?;
            writeln!(out, "{}", format_output(&editor, json)?)?;
        }
        Commands::Edit {
            file,
            script,
            keys,
            save,
        } => {
            let commands = load_commands(script.as_deref(), keys.as_deref())?;
            let mut editor = open_editor(&file, &config()?)?;
            let applied = editor.apply_all(commands)?;
            tracing::debug!(applied, "commands replayed");
            writeln!(out, "{}", format_output(&editor, json)?)?;
            if save {
                let chars = save_editor(&editor, &file)?;
                let message = format!("Saved {} characters to {}", chars, file.display());
                if json {
                    eprintln!("{}", message);
                } else {
                    writeln!(out, "{}", message)?;
                }
            }
        }
    }
    Ok(())
}

fn run_and_report<F, E>(runner: F) -> i32
where
    F: FnOnce() -> Result<(), E>,
    E: std::fmt::Display,
{
    match runner() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("wrapedit error: {:#}", err);
            1
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wrapedit=info,wrapedit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let exit_code = run_and_report(|| execute(Cli::parse(), &mut io::stdout().lock()));
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests;
