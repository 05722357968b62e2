//! Unit tests for the `wrapedit` CLI entrypoint module.

use super::{build_config, execute, format_output, load_commands, run_and_report};
use super::{Cli, Commands};
use clap::Parser;
use std::path::Path;
use wrapedit_core::{CellMeasure, EditCommand, Editor, EditorConfig};

fn run(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["wrapedit"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    execute(Cli::try_parse_from(argv)?, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8 output"))
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn parses_edit_with_global_flags() {
    let cli = Cli::parse_from([
        "wrapedit", "edit", "doc.txt", "--keys", "hi", "--save", "--width", "300",
    ]);
    assert_eq!(cli.width, Some(300));
    match cli.command {
        Commands::Edit {
            keys, save, script, ..
        } => {
            assert_eq!(keys.as_deref(), Some("hi"));
            assert!(save);
            assert!(script.is_none());
        }
        _ => panic!("expected edit"),
    }
}

#[test]
fn edit_requires_exactly_one_command_source() {
    assert!(Cli::try_parse_from(["wrapedit", "edit", "doc.txt"]).is_err());
    assert!(Cli::try_parse_from([
        "wrapedit", "edit", "doc.txt", "--script", "s.txt", "--keys", "x"
    ])
    .is_err());
}

#[test]
fn flags_override_config_and_are_validated() {
    let config = build_config(Some(300), Some(200), Some(16)).expect("config");
    assert_eq!(
        (config.window_width, config.window_height, config.font_size),
        (300, 200, 16)
    );
    assert!(build_config(Some(5), None, None).is_err());
}

#[test]
fn keys_become_insertions() {
    let commands = load_commands(None, Some("a\n")).expect("keys");
    assert_eq!(
        commands,
        vec![EditCommand::InsertChar('a'), EditCommand::InsertChar('\n')]
    );
}

#[test]
fn edit_with_save_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "ab\r\ncd").expect("write doc");

    let out = run(&["edit", path_str(&path), "--keys", "!", "--save"]).expect("edit");
    assert!(out.starts_with("ab\ncd!\n"), "unexpected output: {out}");
    assert!(out.contains("Saved 6 characters to"));
    assert_eq!(std::fs::read_to_string(&path).expect("read doc"), "ab\ncd!");
}

#[test]
fn script_edits_without_save_leave_file_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("doc.txt");
    let script = dir.path().join("edit.txt");
    std::fs::write(&path, "ab").expect("write doc");
    std::fs::write(&script, "# append\ntype x\nundo\ntype yz\nleft\nbackspace\n")
        .expect("write script");

    let out = run(&["edit", path_str(&path), "--script", path_str(&script)]).expect("edit");
    assert_eq!(out, "abz\n");
    assert_eq!(std::fs::read_to_string(&path).expect("read doc"), "ab");
}

#[test]
fn bad_script_reports_line_number() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("edit.txt");
    std::fs::write(&script, "left\nfly away\n").expect("write script");

    let err = run(&["edit", "unused.txt", "--script", path_str(&script)]).expect_err("bad script");
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");
}

#[test]
fn render_missing_file_starts_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("new.txt");
    assert_eq!(run(&["render", path_str(&path)]).expect("render"), "\n");
    assert!(!path.exists());
}

#[test]
fn render_json_emits_frame() {
    let editor = Editor::with_text(&EditorConfig::default(), Box::new(CellMeasure), "hi\nthere")
        .expect("editor");
    let json: serde_json::Value =
        serde_json::from_str(&format_output(&editor, true).expect("json")).expect("parse");
    assert_eq!(json["lineCount"], 2);
    assert_eq!(json["glyphs"].as_array().map(Vec::len), Some(8));
    assert_eq!(format_output(&editor, false).expect("rows"), "hi\nthere");
}

#[test]
fn completions_are_generated() {
    let out = run(&["completions", "bash"]).expect("completions");
    assert!(out.contains("wrapedit"));
}

#[test]
fn completions_ignore_invalid_geometry() {
    let out = run(&["--width=0", "completions", "zsh"]).expect("completions");
    assert!(out.contains("wrapedit"));
    assert!(run(&["--width=0", "render", "unused.txt"]).is_err());
}

#[test]
fn oversized_font_flag_is_rejected() {
    let err = run(&["--font-size", "4294967295", "render", "unused.txt"]).expect_err("font");
    assert!(format!("{err:#}").contains("font size"), "{err:#}");
}

#[test]
fn extreme_script_values_do_not_crash() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("doc.txt");
    let script = dir.path().join("edit.txt");
    std::fs::write(&path, "ab\ncd").expect("write doc");
    std::fs::write(
        &script,
        "scroll -2147483648\nfont 2147483647\nclick 2147483647 2147483647\nscroll 2147483647\n",
    )
    .expect("write script");

    let out = run(&["edit", path_str(&path), "--script", path_str(&script)]).expect("edit");
    assert_eq!(out, "a\nb\nc\nd\n");
}

#[test]
fn run_and_report_returns_zero_on_success() {
    assert_eq!(run_and_report(|| Ok::<(), &str>(())), 0);
}

#[test]
fn run_and_report_returns_non_zero_on_failure() {
    assert_eq!(run_and_report(|| Err::<(), &str>("boom")), 1);
}
