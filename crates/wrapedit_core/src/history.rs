//! Undo/redo log of single-character edits.

use crate::constants::DEFAULT_UNDO_LIMIT;
use crate::sequence::{CharSequence, NodeId};
use std::collections::VecDeque;
use tracing::warn;

/// Direction of a recorded edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

impl EditKind {
    fn flipped(self) -> Self {
        match self {
            Self::Insert => Self::Delete,
            Self::Delete => Self::Insert,
        }
    }
}

/// One undoable unit.
///
/// `parent` is the node the edited node followed when the action was
/// recorded; undoing a delete splices the node back after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditAction {
    pub kind: EditKind,
    pub node: NodeId,
    pub parent: NodeId,
}

impl EditAction {
    /// Capture an action for `node`, reading its current predecessor.
    pub fn capture(seq: &CharSequence, kind: EditKind, node: NodeId) -> Self {
        Self {
            kind,
            node,
            parent: seq.prev(node).unwrap_or(NodeId::SENTINEL),
        }
    }

    /// Reverse the action's effect on `seq`.
    ///
    /// Returns `false` when the chain is not in the state the action expects.
    fn invert(&self, seq: &mut CharSequence) -> bool {
        match self.kind {
            EditKind::Insert => seq.remove(self.node).is_some(),
            EditKind::Delete => seq.insert_chain_after(self.parent, self.node),
        }
    }

    /// Cursor position after the action has been applied in its current
    /// direction: the node itself when linked, its old predecessor otherwise.
    fn landing(&self, seq: &CharSequence) -> NodeId {
        match self.kind {
            EditKind::Insert => self.node,
            EditKind::Delete => seq.prev(self.node).unwrap_or(NodeId::SENTINEL),
        }
    }
}

/// Bounded undo stack plus redo stack.
///
/// Every action pins its node in the sequence; an action leaving the log
/// (eviction, redo clearing) releases that pin, which is where a detached
/// node is finally destroyed.
#[derive(Debug)]
pub struct EditLog {
    undo: VecDeque<EditAction>,
    redo: Vec<EditAction>,
    max_entries: usize,
}

impl Default for EditLog {
    fn default() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }
}

impl EditLog {
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Action the next [`EditLog::undo`] would replay.
    pub fn peek_undo(&self) -> Option<&EditAction> {
        self.undo.back()
    }

    /// Action the next [`EditLog::redo`] would replay.
    pub fn peek_redo(&self) -> Option<&EditAction> {
        self.redo.last()
    }

    /// Record a fresh edit: clears redo, pushes, evicts beyond the cap.
    pub fn record(&mut self, seq: &mut CharSequence, action: EditAction) {
        for dropped in self.redo.drain(..) {
            seq.unpin(dropped.node);
        }
        seq.pin(action.node);
        self.undo.push_back(action);
        while self.undo.len() > self.max_entries {
            if let Some(evicted) = self.undo.pop_front() {
                seq.unpin(evicted.node);
            }
        }
    }

    /// Undo the most recent edit. Returns the new cursor node.
    pub fn undo(&mut self, seq: &mut CharSequence) -> Option<NodeId> {
        let (action, landing) = Self::replay(self.undo.pop_back()?, seq);
        self.redo.push(action);
        Some(landing)
    }

    /// Re-apply the most recently undone edit. Returns the new cursor node.
    pub fn redo(&mut self, seq: &mut CharSequence) -> Option<NodeId> {
        let (action, landing) = Self::replay(self.redo.pop()?, seq);
        self.undo.push_back(action);
        Some(landing)
    }

    fn replay(mut action: EditAction, seq: &mut CharSequence) -> (EditAction, NodeId) {
        if !action.invert(seq) {
            warn!(
                node = ?action.node,
                kind = ?action.kind,
                "edit log entry no longer matches the document"
            );
        }
        action.kind = action.kind.flipped();
        let landing = action.landing(seq);
        (action, landing)
    }
}
