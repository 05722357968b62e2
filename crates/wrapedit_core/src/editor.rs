//! Editing session: owns the document and routes commands through it.
//!
//! Every command follows the same pipeline: mutate the sequence (or move the
//! cursor), lay out again, derive the caret from the cursor, then scroll just
//! enough to keep the caret on screen.

use crate::config::EditorConfig;
use crate::constants::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::cursor::{self, CaretAffinity, Cursor};
use crate::error::EditorError;
use crate::history::{EditAction, EditKind, EditLog};
use crate::input::EditCommand;
use crate::layout::{Layout, LayoutContext, LayoutParams};
use crate::measure::{FontSpec, Measure};
use crate::persist;
use crate::render::RenderFrame;
use crate::sequence::{CharSequence, NodeId};
use crate::viewport::{CaretRect, Viewport};
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Result of a command that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Precondition not met (start or end of document, empty stack); nothing
    /// changed.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relayout {
    Full,
    FromRow(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Vertical {
    Up,
    Down,
}

/// A single-document editing session.
pub struct Editor {
    sequence: CharSequence,
    history: EditLog,
    layout: Layout,
    cursor: Cursor,
    viewport: Viewport,
    measure: Box<dyn Measure>,
    font: FontSpec,
    margin: i32,
    line_height: i32,
}

impl Editor {
    /// Empty document.
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: &EditorConfig, measure: Box<dyn Measure>) -> Result<Self, EditorError> {
        Self::with_sequence(config, measure, CharSequence::new())
    }

    /// Document pre-filled with `text`. The cursor starts at the end.
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidConfig`] when `config` fails validation.
    pub fn with_text(
        config: &EditorConfig,
        measure: Box<dyn Measure>,
        text: &str,
    ) -> Result<Self, EditorError> {
        Self::with_sequence(config, measure, CharSequence::from_text(text))
    }

    /// Document read from `reader`, with `"\r\n"` folded to `'\n'`.
    ///
    /// # Errors
    /// Returns [`EditorError::Io`] when reading fails, or
    /// [`EditorError::InvalidConfig`] when `config` fails validation.
    pub fn load<R: Read>(
        config: &EditorConfig,
        measure: Box<dyn Measure>,
        reader: R,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        Self::with_sequence(config, measure, persist::read_sequence(reader)?)
    }

    fn with_sequence(
        config: &EditorConfig,
        measure: Box<dyn Measure>,
        sequence: CharSequence,
    ) -> Result<Self, EditorError> {
        config.validate()?;
        let font = FontSpec::new(config.font_family.clone(), config.font_size);
        let line_height = measure.line_height(&font);
        let end = sequence.last();
        let mut editor = Self {
            sequence,
            history: EditLog::with_limit(config.undo_limit),
            layout: Layout::default(),
            cursor: Cursor::default(),
            viewport: Viewport::from_config(config),
            measure,
            font,
            margin: config.margin,
            line_height,
        };
        editor.cursor.place(end, CaretAffinity::Trailing);
        editor.refresh(Relayout::Full);
        Ok(editor)
    }

    /// Write the document to `writer`, returning the character count.
    ///
    /// # Errors
    /// Returns [`EditorError::Io`] when writing fails.
    pub fn save<W: Write>(&self, writer: W) -> Result<usize, EditorError> {
        persist::write_sequence(&self.sequence, writer)
    }

    /// Route one command.
    ///
    /// # Errors
    /// Returns [`EditorError::LayoutInconsistency`] when a vertical move
    /// targets a line missing from the line index. Nothing is mutated.
    pub fn apply(&mut self, command: EditCommand) -> Result<CommandOutcome, EditorError> {
        let outcome = match command {
            EditCommand::InsertChar(ch) => self.insert_char(ch),
            EditCommand::DeleteBackward => self.delete_backward(),
            EditCommand::MoveLeft => self.move_left(),
            EditCommand::MoveRight => self.move_right(),
            EditCommand::MoveUp => self.move_vertical(Vertical::Up)?,
            EditCommand::MoveDown => self.move_vertical(Vertical::Down)?,
            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),
            EditCommand::SetFontSize(delta) => self.set_font_size(delta),
            EditCommand::Resize { width, height } => self.resize(width, height),
            EditCommand::Scroll(offset) => self.scroll_to(offset),
            EditCommand::Click { x, y } => self.click(x, y),
        };
        match outcome {
            CommandOutcome::Applied if command.mutates_text() => debug!(
                command = command.name(),
                cursor = ?self.cursor.position(),
                chars = self.sequence.len(),
                undo = self.history.undo_len(),
                "text changed"
            ),
            CommandOutcome::Applied => debug!(
                command = command.name(),
                cursor = ?self.cursor.position(),
                line = self.current_line(),
                "command applied"
            ),
            CommandOutcome::Ignored => debug!(command = command.name(), "command ignored"),
        }
        Ok(outcome)
    }

    /// Apply commands in order, stopping at the first error.
    ///
    /// # Returns
    /// How many commands were applied (ignored ones are not counted).
    ///
    /// # Errors
    /// Propagates the first error from [`Editor::apply`].
    pub fn apply_all<I>(&mut self, commands: I) -> Result<usize, EditorError>
    where
        I: IntoIterator<Item = EditCommand>,
    {
        let mut applied = 0;
        for command in commands {
            if self.apply(command)? == CommandOutcome::Applied {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Insert after the cursor. A carriage return is stored as `'\n'`.
    pub fn insert_char(&mut self, ch: char) -> CommandOutcome {
        let ch = if ch == '\r' { '\n' } else { ch };
        let anchor = self.cursor.position();
        let plan = self.plan_around(anchor);
        let node = self.sequence.insert_after(anchor, ch);
        let action = EditAction::capture(&self.sequence, EditKind::Insert, node);
        self.history.record(&mut self.sequence, action);
        self.cursor.place(node, CaretAffinity::Trailing);
        self.refresh(plan);
        CommandOutcome::Applied
    }

    /// Remove the character at the cursor (the one left of the caret).
    pub fn delete_backward(&mut self) -> CommandOutcome {
        let target = self.cursor.position();
        let Some(parent) = self.sequence.prev(target) else {
            return CommandOutcome::Ignored;
        };
        let previous_line = self.current_line();
        let plan = self.plan_around(parent);
        let action = EditAction::capture(&self.sequence, EditKind::Delete, target);
        self.history.record(&mut self.sequence, action);
        self.sequence.remove(target);
        self.relayout(plan);

        // If the text after the new position now starts a row other than the
        // one being edited, keep the caret on the edited row.
        let params = self.params();
        let rewrapped = cursor::is_ambiguous(&self.sequence, parent, &params)
            && params.row_of(self.sequence.node(parent).y()) != previous_line;
        let affinity = if rewrapped {
            CaretAffinity::LineStart
        } else {
            CaretAffinity::Trailing
        };
        self.cursor.place(parent, affinity);
        self.sync_caret();
        self.snap_caret();
        CommandOutcome::Applied
    }

    pub fn move_left(&mut self) -> CommandOutcome {
        let Some(parent) = self.sequence.prev(self.cursor.position()) else {
            return CommandOutcome::Ignored;
        };
        let params = self.params();
        let crosses_row = params.row_of(self.sequence.node(parent).y()) != self.current_line();
        if crosses_row && self.cursor.caret().x != params.margin {
            self.cursor.place(parent, CaretAffinity::LineStart);
            self.refresh(Relayout::Full);
        } else {
            self.cursor.place(parent, CaretAffinity::Trailing);
            self.sync_caret();
            self.snap_caret();
        }
        CommandOutcome::Applied
    }

    pub fn move_right(&mut self) -> CommandOutcome {
        let Some(next) = self.sequence.next(self.cursor.position()) else {
            return CommandOutcome::Ignored;
        };
        self.cursor.place(next, CaretAffinity::Trailing);
        self.sync_caret();
        self.snap_caret();
        CommandOutcome::Applied
    }

    /// # Errors
    /// See [`Editor::apply`].
    pub fn move_up(&mut self) -> Result<CommandOutcome, EditorError> {
        self.move_vertical(Vertical::Up)
    }

    /// # Errors
    /// See [`Editor::apply`].
    pub fn move_down(&mut self) -> Result<CommandOutcome, EditorError> {
        self.move_vertical(Vertical::Down)
    }

    fn move_vertical(&mut self, direction: Vertical) -> Result<CommandOutcome, EditorError> {
        let params = self.params();
        let line = self.cursor.line(&params);
        let target = match direction {
            Vertical::Up if line == 0 => return Ok(CommandOutcome::Ignored),
            Vertical::Up => line - 1,
            Vertical::Down if line + 1 >= self.layout.line_count() => {
                return Ok(CommandOutcome::Ignored)
            }
            Vertical::Down => line + 1,
        };
        let (node, affinity) = cursor::vertical_target(
            &self.sequence,
            &self.layout,
            target,
            self.cursor.caret().x,
            &params,
        )
        .map_err(|err| {
            warn!(line = target, lines = self.layout.line_count(), "line index has no entry");
            err
        })?;
        self.cursor.place(node, affinity);
        self.sync_caret();
        self.snap_caret();
        Ok(CommandOutcome::Applied)
    }

    pub fn undo(&mut self) -> CommandOutcome {
        let Some(plan) = self
            .history
            .peek_undo()
            .map(|action| self.plan_around(action.parent))
        else {
            return CommandOutcome::Ignored;
        };
        match self.history.undo(&mut self.sequence) {
            Some(landing) => self.land(landing, plan),
            None => CommandOutcome::Ignored,
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        let Some(plan) = self
            .history
            .peek_redo()
            .map(|action| self.plan_around(action.parent))
        else {
            return CommandOutcome::Ignored;
        };
        match self.history.redo(&mut self.sequence) {
            Some(landing) => self.land(landing, plan),
            None => CommandOutcome::Ignored,
        }
    }

    fn land(&mut self, landing: NodeId, plan: Relayout) -> CommandOutcome {
        self.cursor.place(landing, CaretAffinity::Trailing);
        self.refresh(plan);
        CommandOutcome::Applied
    }

    /// Grow or shrink the font within `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
    pub fn set_font_size(&mut self, delta: i32) -> CommandOutcome {
        let size = (i64::from(self.font.size) + i64::from(delta))
            .clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u32;
        if size == self.font.size {
            return CommandOutcome::Ignored;
        }
        self.font.size = size;
        self.line_height = self.measure.line_height(&self.font);
        self.refresh(Relayout::Full);
        CommandOutcome::Applied
    }

    /// New window size. Rejected when no text column would remain.
    pub fn resize(&mut self, width: i32, height: i32) -> CommandOutcome {
        if width <= self.viewport.sidebar_width() || height <= 0 {
            return CommandOutcome::Ignored;
        }
        self.viewport.resize(width, height);
        self.refresh(Relayout::Full);
        CommandOutcome::Applied
    }

    /// Scroll to an absolute offset, clamped to `MAX_SCROLL_OFFSET` either
    /// way. The caret follows the content and may leave the window.
    pub fn scroll_to(&mut self, offset: i32) -> CommandOutcome {
        if self.viewport.set_scroll(offset) == self.viewport.scroll_offset() {
            return CommandOutcome::Ignored;
        }
        self.relayout(Relayout::Full);
        self.sync_caret();
        CommandOutcome::Applied
    }

    /// Move the cursor to the position under a pointer press.
    pub fn click(&mut self, x: i32, y: i32) -> CommandOutcome {
        let params = self.params();
        let (node, affinity) = cursor::hit_test(&self.sequence, &self.layout, x, y, &params);
        self.cursor.place(node, affinity);
        self.sync_caret();
        CommandOutcome::Applied
    }

    pub fn text(&self) -> String {
        self.sequence.text()
    }

    pub fn sequence(&self) -> &CharSequence {
        &self.sequence
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn history(&self) -> &EditLog {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn caret(&self) -> CaretRect {
        self.cursor.caret()
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn line_count(&self) -> usize {
        self.layout.line_count()
    }

    /// Visual line holding the caret.
    pub fn current_line(&self) -> usize {
        self.cursor.line(&self.params())
    }

    pub fn content_extent(&self) -> i32 {
        self.viewport
            .content_extent(self.layout.line_count(), self.line_height)
    }

    /// Text of every visual line, newlines omitted.
    pub fn rows(&self) -> Vec<String> {
        (0..self.layout.line_count())
            .map(|line| self.layout.row_text(&self.sequence, line))
            .collect()
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            glyphs: RenderFrame::glyphs_of(&self.sequence),
            caret: self.cursor.caret(),
            content_extent: self.content_extent(),
            scroll_offset: self.viewport.scroll_offset(),
            line_count: self.layout.line_count(),
        }
    }

    fn params(&self) -> LayoutParams {
        LayoutParams {
            margin: self.margin,
            max_content_width: self.viewport.max_content_width(),
            scroll_offset: self.viewport.scroll_offset(),
            line_height: self.line_height,
        }
    }

    /// Relayout covering an edit right after `node`: one row above the row
    /// holding `node`, so a word pulled back onto that row is re-placed too.
    fn plan_around(&self, node: NodeId) -> Relayout {
        let glyph = self.sequence.node(node);
        if !glyph.is_linked() {
            return Relayout::Full;
        }
        let row = self.params().row_of(glyph.y());
        Relayout::FromRow(row.saturating_sub(1))
    }

    fn relayout(&mut self, plan: Relayout) {
        let ctx = LayoutContext {
            params: self.params(),
            measure: &*self.measure,
            font: &self.font,
        };
        match plan {
            Relayout::Full => self.layout.full(&mut self.sequence, &ctx),
            Relayout::FromRow(row) => self.layout.relayout_from_row(&mut self.sequence, row, &ctx),
        };
    }

    fn sync_caret(&mut self) {
        let params = self.params();
        self.cursor.sync(&self.sequence, &params);
    }

    fn snap_caret(&mut self) {
        if self.viewport.ensure_caret_visible(self.cursor.caret()) {
            self.relayout(Relayout::Full);
            self.sync_caret();
        }
    }

    fn refresh(&mut self, plan: Relayout) {
        self.relayout(plan);
        self.sync_caret();
        self.snap_caret();
    }
}
