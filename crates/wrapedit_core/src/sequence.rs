//! Doubly linked character chain backing the document.
//!
//! Nodes live in an index arena. `prev` points toward the document start and
//! `next` toward the document end. A sentinel node at [`NodeId::SENTINEL`]
//! stands for the position before the first character and is never removed.

use serde::Serialize;

/// Stable handle to a node in a [`CharSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The start-of-document sentinel.
    pub const SENTINEL: NodeId = NodeId(0);

    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

/// One character plus the geometry assigned to it by the last layout pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharNode {
    content: char,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    linked: bool,
    /// Pending edit actions referencing this node.
    pins: u32,
    recycled: bool,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl CharNode {
    fn new(content: char) -> Self {
        Self {
            content,
            prev: None,
            next: None,
            linked: false,
            pins: 0,
            recycled: false,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }

    /// Character stored in the node. The sentinel reports `'\0'`.
    pub fn content(&self) -> char {
        self.content
    }

    pub fn is_newline(&self) -> bool {
        self.content == '\n'
    }

    pub fn is_space(&self) -> bool {
        self.content == ' '
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Right edge of the glyph box.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

/// The authoritative document model.
#[derive(Clone, Debug)]
pub struct CharSequence {
    nodes: Vec<CharNode>,
    free: Vec<NodeId>,
    len: usize,
}

impl Default for CharSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl CharSequence {
    /// Create an empty document holding only the sentinel.
    pub fn new() -> Self {
        let mut sentinel = CharNode::new('\0');
        sentinel.linked = true;
        Self {
            nodes: vec![sentinel],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Build a document by appending `text` in order.
    pub fn from_text(text: &str) -> Self {
        let mut seq = Self::new();
        let mut last = NodeId::SENTINEL;
        for ch in text.chars() {
            last = seq.insert_after(last, ch);
        }
        seq
    }

    /// Number of real (non-sentinel) linked characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arena slots currently holding a node, linked or detached.
    pub fn allocated(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn node(&self, id: NodeId) -> &CharNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut CharNode {
        &mut self.nodes[id.0]
    }

    /// Neighbour toward the document start.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    /// Neighbour toward the document end.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    /// Last node in document order (the sentinel when empty).
    pub fn last(&self) -> NodeId {
        let mut current = NodeId::SENTINEL;
        while let Some(next) = self.next(current) {
            current = next;
        }
        current
    }

    /// Iterate real characters in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            seq: self,
            next: self.next(NodeId::SENTINEL),
        }
    }

    /// Document text in order.
    pub fn text(&self) -> String {
        self.iter().map(|(_, node)| node.content).collect()
    }

    fn alloc(&mut self, content: char) -> NodeId {
        let node = CharNode::new(content);
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            self.nodes.push(node);
            NodeId(self.nodes.len() - 1)
        }
    }

    fn splice_after(&mut self, anchor: NodeId, id: NodeId) {
        let after = self.nodes[anchor.0].next;
        if let Some(after) = after {
            self.nodes[after.0].prev = Some(id);
        }
        let node = &mut self.nodes[id.0];
        node.prev = Some(anchor);
        node.next = after;
        node.linked = true;
        self.nodes[anchor.0].next = Some(id);
        self.len += 1;
    }

    /// Insert `ch` immediately after `anchor` and return the new node.
    pub fn insert_after(&mut self, anchor: NodeId, ch: char) -> NodeId {
        let id = self.alloc(ch);
        self.splice_after(anchor, id);
        id
    }

    /// Re-link a detached node immediately after `anchor`.
    ///
    /// Returns `false` (and changes nothing) if `node` is already linked, is
    /// the sentinel, or `anchor` is itself detached.
    pub fn insert_chain_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        if node.is_sentinel() || self.nodes[node.0].linked || !self.nodes[anchor.0].linked {
            return false;
        }
        self.splice_after(anchor, node);
        true
    }

    /// Unlink `id`, reconnecting its neighbours.
    ///
    /// The detached node keeps its own `prev`/`next` handles so it can be
    /// spliced back later. Returns `None` for the sentinel or an already
    /// detached node.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeId> {
        if id.is_sentinel() || !self.nodes[id.0].linked {
            return None;
        }
        let (prev, next) = (self.nodes[id.0].prev, self.nodes[id.0].next);
        if let Some(next) = next {
            self.nodes[next.0].prev = prev;
        }
        if let Some(prev) = prev {
            self.nodes[prev.0].next = next;
        }
        self.nodes[id.0].linked = false;
        self.len -= 1;
        Some(id)
    }

    /// Unlink the real node right before `id`, pulling `id` one step toward
    /// the start. No-op when that predecessor is the sentinel.
    pub fn promote_boundary(&mut self, id: NodeId) -> Option<NodeId> {
        let prev = self.prev(id)?;
        if prev.is_sentinel() {
            return None;
        }
        self.remove(prev)
    }

    /// Record that a pending edit action holds `id`.
    pub(crate) fn pin(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.pins = node.pins.saturating_add(1);
    }

    /// Drop one edit-action reference; recycles the slot once nothing holds
    /// a detached node.
    pub(crate) fn unpin(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.pins = node.pins.saturating_sub(1);
        self.discard(id);
    }

    /// Recycle a detached node that no edit action references.
    pub fn discard(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if id.is_sentinel() || node.linked || node.pins > 0 || node.recycled {
            return false;
        }
        node.recycled = true;
        self.free.push(id);
        true
    }
}

/// Document-order iterator over real characters.
pub struct Iter<'a> {
    seq: &'a CharSequence,
    next: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a CharNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.seq.node(id);
        self.next = node.next;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_after_keeps_document_order() {
        let mut seq = CharSequence::new();
        let a = seq.insert_after(NodeId::SENTINEL, 'a');
        let c = seq.insert_after(a, 'c');
        seq.insert_after(a, 'b');
        assert_eq!(seq.text(), "abc");
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.last(), c);
        assert_eq!(seq.prev(a), Some(NodeId::SENTINEL));
    }

    #[test]
    fn remove_retains_links_for_resplice() {
        let mut seq = CharSequence::from_text("abc");
        let b = seq.next(seq.next(NodeId::SENTINEL).expect("a")).expect("b");
        let a = seq.prev(b).expect("a");
        assert_eq!(seq.remove(b), Some(b));
        assert_eq!(seq.text(), "ac");
        assert_eq!(seq.prev(b), Some(a));
        assert!(!seq.node(b).is_linked());

        assert!(seq.insert_chain_after(a, b));
        assert_eq!(seq.text(), "abc");
        assert!(!seq.insert_chain_after(a, b), "linked node must not splice twice");
    }

    #[test]
    fn sentinel_is_never_removed() {
        let mut seq = CharSequence::from_text("x");
        assert_eq!(seq.remove(NodeId::SENTINEL), None);
        let x = seq.last();
        assert_eq!(seq.promote_boundary(x), None);
        assert_eq!(seq.text(), "x");
    }

    #[test]
    fn promote_boundary_drops_predecessor() {
        let mut seq = CharSequence::from_text("a\r\n");
        let newline = seq.last();
        let removed = seq.promote_boundary(newline).expect("carriage return");
        assert_eq!(seq.node(removed).content(), '\r');
        assert_eq!(seq.text(), "a\n");
        assert!(seq.discard(removed));
        assert_eq!(seq.allocated(), 3);
    }

    #[test]
    fn pinned_detached_nodes_survive_until_unpinned() {
        let mut seq = CharSequence::from_text("ab");
        let b = seq.last();
        seq.pin(b);
        seq.remove(b);
        assert!(!seq.discard(b));
        seq.unpin(b);
        assert_eq!(seq.allocated(), 2);

        let reused = seq.insert_after(NodeId::SENTINEL, 'z');
        assert_eq!(reused, b, "freed slot is recycled");
        assert_eq!(seq.text(), "za");
    }
}
