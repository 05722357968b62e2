//! Command vocabulary for the editor and the plain-text script reducer.

use crate::constants::FONT_SIZE_STEP;
use crate::error::EditorError;

/// Normalized commands consumed by [`crate::Editor::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditCommand {
    InsertChar(char),
    DeleteBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Undo,
    Redo,
    /// Change the font size by a signed delta.
    SetFontSize(i32),
    Resize { width: i32, height: i32 },
    /// Absolute scroll offset from an external scrollbar.
    Scroll(i32),
    /// Pointer press in window coordinates.
    Click { x: i32, y: i32 },
}

impl EditCommand {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertChar(_) => "insert_char",
            Self::DeleteBackward => "delete_backward",
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::SetFontSize(_) => "set_font_size",
            Self::Resize { .. } => "resize",
            Self::Scroll(_) => "scroll",
            Self::Click { .. } => "click",
        }
    }

    /// Returns true when the command changes document text.
    pub fn mutates_text(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_) | Self::DeleteBackward | Self::Undo | Self::Redo
        )
    }
}

/// One `InsertChar` per character of `text`.
pub fn commands_from_text(text: &str) -> Vec<EditCommand> {
    text.chars().map(EditCommand::InsertChar).collect()
}

fn invalid(line: usize, message: impl Into<String>) -> EditorError {
    EditorError::InvalidCommand {
        line,
        message: message.into(),
    }
}

fn parse_int(line: usize, raw: &str, what: &str) -> Result<i32, EditorError> {
    raw.parse()
        .map_err(|_| invalid(line, format!("{what} must be an integer, got '{raw}'")))
}

fn parse_repeat(line: usize, args: &[&str]) -> Result<usize, EditorError> {
    match args {
        [] => Ok(1),
        [count] => count
            .parse()
            .map_err(|_| invalid(line, format!("repeat count must be a number, got '{count}'"))),
        _ => Err(invalid(line, "expected at most one repeat count")),
    }
}

fn parse_pair(line: usize, args: &[&str], names: (&str, &str)) -> Result<(i32, i32), EditorError> {
    match args {
        [a, b] => Ok((parse_int(line, a, names.0)?, parse_int(line, b, names.1)?)),
        _ => Err(invalid(
            line,
            format!("expected <{}> <{}>", names.0, names.1),
        )),
    }
}

/// Parse a command script, one command per line.
///
/// Blank lines and lines starting with `#` are skipped. `type` keeps the rest
/// of its line verbatim after the single separating space, so
/// `type  a` types a space before `a`.
///
/// # Errors
/// Returns [`EditorError::InvalidCommand`] carrying the 1-based line number of
/// the first line that does not parse.
pub fn commands_from_script(script: &str) -> Result<Vec<EditCommand>, EditorError> {
    let mut out = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let body = raw.trim_start();
        if let Some(text) = body.strip_prefix("type ") {
            out.extend(commands_from_text(text));
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        let repeated = |command: EditCommand, out: &mut Vec<EditCommand>| {
            parse_repeat(line, &args).map(|count| out.extend(std::iter::repeat(command).take(count)))
        };
        match keyword {
            "type" => return Err(invalid(line, "type needs text")),
            "enter" => repeated(EditCommand::InsertChar('\n'), &mut out)?,
            "space" => repeated(EditCommand::InsertChar(' '), &mut out)?,
            "backspace" => repeated(EditCommand::DeleteBackward, &mut out)?,
            "left" => repeated(EditCommand::MoveLeft, &mut out)?,
            "right" => repeated(EditCommand::MoveRight, &mut out)?,
            "up" => repeated(EditCommand::MoveUp, &mut out)?,
            "down" => repeated(EditCommand::MoveDown, &mut out)?,
            "undo" => repeated(EditCommand::Undo, &mut out)?,
            "redo" => repeated(EditCommand::Redo, &mut out)?,
            "font+" => out.push(EditCommand::SetFontSize(FONT_SIZE_STEP)),
            "font-" => out.push(EditCommand::SetFontSize(-FONT_SIZE_STEP)),
            "font" => match args.as_slice() {
                [delta] => out.push(EditCommand::SetFontSize(parse_int(
                    line,
                    delta.trim_start_matches('+'),
                    "font delta",
                )?)),
                _ => return Err(invalid(line, "expected font <delta>")),
            },
            "resize" => {
                let (width, height) = parse_pair(line, &args, ("width", "height"))?;
                out.push(EditCommand::Resize { width, height });
            }
            "scroll" => match args.as_slice() {
                [offset] => out.push(EditCommand::Scroll(parse_int(line, offset, "offset")?)),
                _ => return Err(invalid(line, "expected scroll <offset>")),
            },
            "click" => {
                let (x, y) = parse_pair(line, &args, ("x", "y"))?;
                out.push(EditCommand::Click { x, y });
            }
            other => return Err(invalid(line, format!("unknown command '{other}'"))),
        }
    }
    Ok(out)
}
