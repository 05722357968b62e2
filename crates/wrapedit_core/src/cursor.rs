//! Logical cursor, caret derivation, and line-aware navigation.

use crate::constants::CARET_WIDTH;
use crate::error::EditorError;
use crate::layout::{Layout, LayoutParams};
use crate::sequence::{CharSequence, NodeId};
use crate::viewport::CaretRect;

/// Which visual row the caret uses when a position sits on a wrap boundary.
///
/// A node that ends a wrapped row is both "after the last glyph of row n" and
/// "before the first glyph of row n + 1". `LineStart` picks the latter and is
/// only honoured while the position is still ambiguous.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaretAffinity {
    #[default]
    Trailing,
    LineStart,
}

/// Edit position plus the caret derived from it.
///
/// Inserts and deletes happen right after `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    position: NodeId,
    affinity: CaretAffinity,
    caret: CaretRect,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: NodeId::SENTINEL,
            affinity: CaretAffinity::Trailing,
            caret: CaretRect::default(),
        }
    }
}

impl Cursor {
    pub fn position(&self) -> NodeId {
        self.position
    }

    pub fn affinity(&self) -> CaretAffinity {
        self.affinity
    }

    pub fn caret(&self) -> CaretRect {
        self.caret
    }

    /// Move the logical position. The caret is stale until [`Cursor::sync`].
    pub fn place(&mut self, position: NodeId, affinity: CaretAffinity) {
        self.position = position;
        self.affinity = affinity;
    }

    /// Recompute the caret from the current layout.
    pub fn sync(&mut self, seq: &CharSequence, params: &LayoutParams) -> CaretRect {
        if self.affinity == CaretAffinity::LineStart && !is_ambiguous(seq, self.position, params) {
            self.affinity = CaretAffinity::Trailing;
        }
        self.caret = caret_for(seq, self.position, self.affinity, params);
        self.caret
    }

    /// Visual line the caret is on.
    pub fn line(&self, params: &LayoutParams) -> usize {
        params.row_of(self.caret.y)
    }
}

/// True when `node` ends a visual row that continues (without a newline) on
/// the next row.
pub fn is_ambiguous(seq: &CharSequence, node: NodeId, params: &LayoutParams) -> bool {
    let Some(next) = seq.next(node) else {
        return false;
    };
    let next = seq.node(next);
    !next.is_newline() && params.row_of(next.y()) != params.row_of(seq.node(node).y())
}

/// Caret box for a position under the current layout.
pub fn caret_for(
    seq: &CharSequence,
    node: NodeId,
    affinity: CaretAffinity,
    params: &LayoutParams,
) -> CaretRect {
    let glyph = seq.node(node);
    let (x, y) = match affinity {
        CaretAffinity::LineStart => {
            (params.margin, glyph.y().saturating_add(params.line_height))
        }
        CaretAffinity::Trailing => (glyph.right().min(params.wrap_limit()), glyph.y()),
    };
    CaretRect {
        x,
        y,
        width: CARET_WIDTH,
        height: params.line_height,
    }
}

/// Walk `line` from its start and return the node whose right edge is
/// closest to `target_x`, preferring the left node on ties. Running past the
/// line's last glyph lands on that glyph.
fn nearest_column(
    seq: &CharSequence,
    start: NodeId,
    line: usize,
    target_x: i32,
    params: &LayoutParams,
) -> NodeId {
    let mut trailer = start;
    let mut cursor = Some(start);
    while let Some(id) = cursor {
        let node = seq.node(id);
        if params.row_of(node.y()) != line {
            return trailer;
        }
        let front = node.right();
        if front > target_x {
            let back = seq.node(trailer).right();
            let distance = |edge: i32| (i64::from(edge) - i64::from(target_x)).abs();
            return if distance(front) < distance(back) {
                id
            } else {
                trailer
            };
        }
        trailer = id;
        cursor = seq.next(id);
    }
    trailer
}

/// Resolve the position for a vertical move onto `line`, keeping the caret
/// near `target_x`.
///
/// # Errors
/// Returns [`EditorError::LayoutInconsistency`] when `line` has no recorded
/// start node.
pub fn vertical_target(
    seq: &CharSequence,
    layout: &Layout,
    line: usize,
    target_x: i32,
    params: &LayoutParams,
) -> Result<(NodeId, CaretAffinity), EditorError> {
    let start = layout
        .line_start(line)
        .ok_or(EditorError::LayoutInconsistency { line })?;
    if target_x == params.margin {
        if seq.node(start).right() == params.margin {
            return Ok((start, CaretAffinity::Trailing));
        }
        let before = seq.prev(start).unwrap_or(start);
        return Ok((before, CaretAffinity::LineStart));
    }
    Ok((
        nearest_column(seq, start, line, target_x, params),
        CaretAffinity::Trailing,
    ))
}

/// Resolve a pointer position to a cursor position.
pub fn hit_test(
    seq: &CharSequence,
    layout: &Layout,
    x: i32,
    y: i32,
    params: &LayoutParams,
) -> (NodeId, CaretAffinity) {
    let line = params.row_of(y).min(layout.line_count() - 1);
    let Some(start) = layout.line_start(line) else {
        return (seq.last(), CaretAffinity::Trailing);
    };
    let first = seq.node(start);
    let in_left_half =
        i64::from(x) * 2 <= i64::from(params.margin) * 2 + i64::from(first.width());
    if !start.is_sentinel() && !first.is_newline() && in_left_half {
        let before = seq.prev(start).unwrap_or(start);
        return (before, CaretAffinity::LineStart);
    }
    (
        nearest_column(seq, start, line, x, params),
        CaretAffinity::Trailing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutContext;
    use crate::measure::{FixedMeasure, FontSpec};

    fn setup(text: &str, max_content_width: i32) -> (CharSequence, Layout, LayoutParams) {
        let mut seq = CharSequence::from_text(text);
        let font = FontSpec::new("test", 12);
        let params = LayoutParams {
            margin: 5,
            max_content_width,
            scroll_offset: 0,
            line_height: 20,
        };
        let measure = FixedMeasure::new(10, 20);
        let ctx = LayoutContext {
            params,
            measure: &measure,
            font: &font,
        };
        let mut layout = Layout::default();
        layout.full(&mut seq, &ctx);
        (seq, layout, params)
    }

    fn nth(seq: &CharSequence, n: usize) -> NodeId {
        seq.iter().nth(n).map(|(id, _)| id).expect("node")
    }

    #[test]
    fn trailing_caret_clamps_to_wrap_limit() {
        let (seq, _layout, params) = setup("abc    ", 45);
        let last = seq.last();
        let caret = caret_for(&seq, last, CaretAffinity::Trailing, &params);
        assert_eq!(caret.x, 40);
        assert_eq!(caret.height, 20);
    }

    #[test]
    fn line_start_affinity_falls_back_when_not_ambiguous() {
        let (seq, _layout, params) = setup("ab cd", 45);
        let mut cursor = Cursor::default();
        cursor.place(nth(&seq, 2), CaretAffinity::LineStart);
        assert_eq!(cursor.sync(&seq, &params), CaretRect { x: 5, y: 20, width: 1, height: 20 });

        cursor.place(nth(&seq, 1), CaretAffinity::LineStart);
        cursor.sync(&seq, &params);
        assert_eq!(cursor.affinity(), CaretAffinity::Trailing);
        assert_eq!((cursor.caret().x, cursor.caret().y), (25, 0));
    }

    #[test]
    fn vertical_target_picks_nearest_right_edge() {
        // Row 0: "abcd" right edges 15,25,35,45 ; row 1 after newline.
        let (seq, layout, params) = setup("abcd\nwxyz", 500);
        let (node, _) = vertical_target(&seq, &layout, 0, 24, &params).expect("line 0");
        assert_eq!(seq.node(node).content(), 'b');
        let (node, _) = vertical_target(&seq, &layout, 0, 30, &params).expect("line 0");
        assert_eq!(seq.node(node).content(), 'b', "ties go left");
        let (node, _) = vertical_target(&seq, &layout, 0, 300, &params).expect("line 0");
        assert_eq!(seq.node(node).content(), 'd', "past the end lands on last glyph");
    }

    #[test]
    fn vertical_target_at_margin_snaps_to_line_start() {
        let (seq, layout, params) = setup("ab cd\nef", 45);
        let (node, affinity) = vertical_target(&seq, &layout, 1, 5, &params).expect("line 1");
        assert_eq!(seq.node(node).content(), ' ');
        assert_eq!(affinity, CaretAffinity::LineStart);

        let (node, affinity) = vertical_target(&seq, &layout, 2, 5, &params).expect("line 2");
        assert!(seq.node(node).is_newline());
        assert_eq!(affinity, CaretAffinity::Trailing);
    }

    #[test]
    fn vertical_target_reports_missing_line() {
        let (seq, layout, params) = setup("ab", 500);
        assert!(matches!(
            vertical_target(&seq, &layout, 3, 20, &params),
            Err(EditorError::LayoutInconsistency { line: 3 })
        ));
    }

    #[test]
    fn hit_test_near_left_edge_lands_before_first_glyph() {
        let (seq, layout, params) = setup("ab cd", 45);
        let (node, affinity) = hit_test(&seq, &layout, 8, 25, &params);
        assert_eq!(seq.node(node).content(), ' ');
        assert_eq!(affinity, CaretAffinity::LineStart);

        let (node, affinity) = hit_test(&seq, &layout, 24, 25, &params);
        assert_eq!(seq.node(node).content(), 'd');
        assert_eq!(affinity, CaretAffinity::Trailing);

        let (node, _) = hit_test(&seq, &layout, 400, 900, &params);
        assert_eq!(seq.node(node).content(), 'd', "clicks below the text clamp to the last line");
    }

    #[test]
    fn hit_test_accepts_extreme_coordinates() {
        let (seq, layout, params) = setup("ab cd", 45);
        let (node, affinity) = hit_test(&seq, &layout, i32::MAX, i32::MAX, &params);
        assert_eq!(seq.node(node).content(), 'd');
        assert_eq!(affinity, CaretAffinity::Trailing);

        let (node, affinity) = hit_test(&seq, &layout, i32::MIN, i32::MIN, &params);
        assert!(node.is_sentinel());
        assert_eq!(affinity, CaretAffinity::Trailing);
    }
}
