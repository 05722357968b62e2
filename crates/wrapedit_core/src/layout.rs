//! Line-wrapping layout over the character chain.
//!
//! A pass walks the chain once, assigning every node an `(x, y)` box and
//! recording which node starts each visual line. When a non-space glyph would
//! cross the right edge, the word it belongs to is moved to the next line and
//! the walk resumes from that word instead of the literal next node.

use crate::measure::{FontSpec, Measure};
use crate::sequence::{CharSequence, NodeId};
use tracing::trace;

/// Geometry shared by every node placed in one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    pub margin: i32,
    /// Window width minus any sidebar reservation.
    pub max_content_width: i32,
    /// Positive values scroll the document up by that many pixels.
    pub scroll_offset: i32,
    pub line_height: i32,
}

impl LayoutParams {
    /// Rightmost x a non-space glyph may reach.
    pub fn wrap_limit(&self) -> i32 {
        self.max_content_width - self.margin
    }

    /// Visual line for a window-relative `y`.
    pub fn row_of(&self, y: i32) -> usize {
        (y.saturating_add(self.scroll_offset).max(0) / self.line_height.max(1)) as usize
    }

    /// Window-relative `y` of the top of visual line `row`.
    pub fn row_top(&self, row: usize) -> i32 {
        i32::try_from(row)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.line_height)
            .saturating_sub(self.scroll_offset)
    }
}

/// Measurement inputs for a pass.
pub struct LayoutContext<'a> {
    pub params: LayoutParams,
    pub measure: &'a dyn Measure,
    pub font: &'a FontSpec,
}

/// Dense map from visual line number to the node that begins it.
///
/// Line 0 always starts at the sentinel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<NodeId>,
}

impl LineIndex {
    pub fn get(&self, line: usize) -> Option<NodeId> {
        self.starts.get(line).copied()
    }

    fn record(&mut self, line: usize, node: NodeId) {
        self.starts.truncate(line);
        self.starts.push(node);
    }

    fn truncate(&mut self, lines: usize) {
        self.starts.truncate(lines);
    }
}

/// Line-numbering state threaded through a pass.
///
/// `current_line` is the next line number awaiting a start node;
/// `num_lines` is how many lines the pass has discovered so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineCounter {
    pub current_line: usize,
    pub num_lines: usize,
}

impl LineCounter {
    /// State right after the sentinel has claimed line 0.
    pub fn fresh() -> Self {
        Self::seeded(1)
    }

    /// State for a pass resuming with lines `0..lines` already recorded.
    pub fn seeded(lines: usize) -> Self {
        Self {
            current_line: lines,
            num_lines: lines,
        }
    }

    fn advance(&mut self) {
        self.current_line += 1;
        self.num_lines += 1;
    }
}

/// Counters reported by a pass for tracing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub visited: usize,
    pub word_wraps: usize,
}

/// First node of the word that must move when `break_point`'s successor
/// overflows, or `None` when the run reaches the line start (the glyph then
/// breaks on its own).
fn word_beginning(seq: &CharSequence, break_point: NodeId, margin: i32) -> Option<NodeId> {
    let mut current = break_point;
    loop {
        let prev = seq.prev(current)?;
        let node = seq.node(current);
        if node.is_space() {
            return seq.next(current);
        }
        if node.is_newline() || node.x() == margin {
            return None;
        }
        current = prev;
    }
}

fn place(seq: &mut CharSequence, id: NodeId, ctx: &LayoutContext<'_>, x: i32, y: i32) {
    let metrics = ctx.measure.measure(seq.node(id).content(), ctx.font);
    let node = seq.node_mut(id);
    node.x = x;
    node.y = y;
    node.width = metrics.width;
    node.height = metrics.height;
}

/// Lay out the chain from `start` to the end.
///
/// Starting at the sentinel resets `index` and `counter`. Starting anywhere
/// else requires every node before `start` to hold positions from a previous
/// pass, and `index`/`counter` to be seeded for the lines before `start`'s
/// line.
pub fn layout_pass(
    seq: &mut CharSequence,
    start: NodeId,
    ctx: &LayoutContext<'_>,
    index: &mut LineIndex,
    counter: &mut LineCounter,
) -> LayoutStats {
    let params = ctx.params;
    let mut stats = LayoutStats::default();
    let mut cursor = Some(start);

    while let Some(id) = cursor {
        stats.visited += 1;
        let Some(parent) = seq.prev(id) else {
            let sentinel = seq.node_mut(id);
            sentinel.x = params.margin;
            sentinel.y = -params.scroll_offset;
            sentinel.width = 0;
            sentinel.height = params.line_height;
            index.truncate(0);
            index.record(0, id);
            *counter = LineCounter::fresh();
            cursor = seq.next(id);
            continue;
        };

        let node = seq.node(id);
        let ch = node.content();
        let width = ctx.measure.measure(ch, ctx.font).width;
        let parent_node = seq.node(parent);
        let mut y = parent_node.y();
        let mut x = params.margin;
        if ch == '\n' {
            y = y.saturating_add(params.line_height);
        } else {
            x = parent_node.right();
        }

        if ch != ' ' && x.saturating_add(width) > params.wrap_limit() {
            x = params.margin;
            y = y.saturating_add(params.line_height);
            if let Some(word) = word_beginning(seq, parent, params.margin) {
                stats.word_wraps += 1;
                index.record(counter.current_line, word);
                counter.advance();
                place(seq, word, ctx, x, y);
                cursor = seq.next(word);
                continue;
            }
        }

        place(seq, id, ctx, x, y);
        if x == params.margin {
            let line = params.row_of(y);
            if line == counter.current_line {
                index.record(line, id);
                counter.advance();
            }
        }
        cursor = seq.next(id);
    }

    trace!(
        visited = stats.visited,
        word_wraps = stats.word_wraps,
        lines = counter.num_lines,
        "layout pass"
    );
    stats
}

/// Result of the most recent layout: the line index and its counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    index: LineIndex,
    counter: LineCounter,
}

impl Layout {
    /// Lay out the whole document.
    pub fn full(&mut self, seq: &mut CharSequence, ctx: &LayoutContext<'_>) -> LayoutStats {
        layout_pass(
            seq,
            NodeId::SENTINEL,
            ctx,
            &mut self.index,
            &mut self.counter,
        )
    }

    /// Re-run the pass from the node that starts `row`, keeping lines before
    /// it. Falls back to a full pass when `row` is unknown.
    pub fn relayout_from_row(
        &mut self,
        seq: &mut CharSequence,
        row: usize,
        ctx: &LayoutContext<'_>,
    ) -> LayoutStats {
        let start = match self.index.get(row) {
            Some(start) if row > 0 && seq.node(start).is_linked() => start,
            _ => return self.full(seq, ctx),
        };
        self.index.truncate(row);
        self.counter = LineCounter::seeded(row);
        layout_pass(seq, start, ctx, &mut self.index, &mut self.counter)
    }

    pub fn line_count(&self) -> usize {
        self.counter.num_lines.max(1)
    }

    pub fn line_start(&self, line: usize) -> Option<NodeId> {
        self.index.get(line)
    }

    /// Text of visual line `line`, newline characters omitted.
    pub fn row_text(&self, seq: &CharSequence, line: usize) -> String {
        let Some(start) = self.index.get(line) else {
            return String::new();
        };
        let end = self.index.get(line + 1);
        let mut out = String::new();
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if Some(id) == end {
                break;
            }
            let node = seq.node(id);
            if !id.is_sentinel() && !node.is_newline() {
                out.push(node.content());
            }
            cursor = seq.next(id);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedMeasure;

    const MEASURE: FixedMeasure = FixedMeasure {
        width: 10,
        height: 20,
    };

    fn font() -> FontSpec {
        FontSpec::new("test", 12)
    }

    fn params(max_content_width: i32) -> LayoutParams {
        LayoutParams {
            margin: 5,
            max_content_width,
            scroll_offset: 0,
            line_height: 20,
        }
    }

    fn laid_out(text: &str, max_content_width: i32) -> (CharSequence, Layout) {
        let mut seq = CharSequence::from_text(text);
        let font = font();
        let ctx = LayoutContext {
            params: params(max_content_width),
            measure: &MEASURE,
            font: &font,
        };
        let mut layout = Layout::default();
        layout.full(&mut seq, &ctx);
        (seq, layout)
    }

    fn rows(seq: &CharSequence, layout: &Layout) -> Vec<String> {
        (0..layout.line_count())
            .map(|line| layout.row_text(seq, line))
            .collect()
    }

    fn positions(seq: &CharSequence) -> Vec<(char, i32, i32)> {
        seq.iter()
            .map(|(_, node)| (node.content(), node.x(), node.y()))
            .collect()
    }

    #[test]
    fn word_moves_to_next_line_when_it_overflows() {
        let (seq, layout) = laid_out("ab cd", 45);
        assert_eq!(rows(&seq, &layout), vec!["ab ", "cd"]);
        let c = layout.line_start(1).expect("line 1");
        assert_eq!(seq.node(c).content(), 'c');
        assert_eq!((seq.node(c).x(), seq.node(c).y()), (5, 20));
    }

    #[test]
    fn newline_node_starts_the_following_line() {
        let (seq, layout) = laid_out("ab\ncd", 500);
        assert_eq!(layout.line_count(), 2);
        let newline = layout.line_start(1).expect("line 1");
        assert!(seq.node(newline).is_newline());
        assert_eq!(positions(&seq)[3], ('c', 5, 20));
        assert_eq!(rows(&seq, &layout), vec!["ab", "cd"]);
    }

    #[test]
    fn unbroken_run_breaks_per_glyph() {
        let (seq, layout) = laid_out("abcdefg", 45);
        assert_eq!(rows(&seq, &layout), vec!["abc", "def", "g"]);
    }

    #[test]
    fn spaces_may_overflow_the_edge() {
        let (seq, layout) = laid_out("abc    d", 45);
        assert_eq!(layout.line_count(), 2);
        let overflow = positions(&seq)
            .into_iter()
            .filter(|(ch, x, _)| *ch == ' ' && x + 10 > 40)
            .count();
        assert!(overflow > 0);
        assert_eq!(rows(&seq, &layout)[1], "d");
    }

    #[test]
    fn scroll_offset_shifts_every_row() {
        let mut seq = CharSequence::from_text("ab\ncd");
        let font = font();
        let mut layout = Layout::default();
        let ctx = LayoutContext {
            params: LayoutParams {
                scroll_offset: 15,
                ..params(500)
            },
            measure: &MEASURE,
            font: &font,
        };
        layout.full(&mut seq, &ctx);
        assert_eq!(seq.node(NodeId::SENTINEL).y(), -15);
        assert_eq!(positions(&seq)[3], ('c', 5, 5));
        assert_eq!(layout.line_count(), 2);
    }

    #[test]
    fn second_pass_is_identical() {
        let (mut seq, mut layout) = laid_out("the quick brown fox\njumps over", 75);
        let before = (positions(&seq), layout.clone());
        let font = font();
        let ctx = LayoutContext {
            params: params(75),
            measure: &MEASURE,
            font: &font,
        };
        layout.full(&mut seq, &ctx);
        assert_eq!(before, (positions(&seq), layout));
    }

    #[test]
    fn relayout_from_row_matches_full_pass() {
        let text = "lorem ipsum dolor sit amet\nconsectetur adipiscing";
        let (mut seq, full) = laid_out(text, 85);
        let font = font();
        let ctx = LayoutContext {
            params: params(85),
            measure: &MEASURE,
            font: &font,
        };
        let expected = positions(&seq);
        for row in 0..full.line_count() {
            let mut partial = full.clone();
            partial.relayout_from_row(&mut seq, row, &ctx);
            assert_eq!(partial, full, "row {}", row);
            assert_eq!(positions(&seq), expected, "row {}", row);
        }
    }
}
