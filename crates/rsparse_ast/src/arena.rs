//! Index-based storage for nodes and node lists.
//!
//! Handles stay valid for the life of the arena. Incremental parsing moves
//! the previous file's arena into the new parse and appends to it, so nodes
//! reused from the old tree keep their handles.

use crate::node::{ListId, Node, NodeData, NodeId, NodeListData, NodePayload};
use crate::syntax_kind::SyntaxKind;
use rsparse_core::text::TextRange;
use std::ops::{Index, IndexMut};

/// A position in the arena that allocations can be rolled back to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ArenaMark {
    nodes: usize,
    lists: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    lists: Vec<NodeListData>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presize for a source text of `text_len` bytes.
    pub fn with_capacity_for_text(text_len: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(text_len / 4 + 16),
            lists: Vec::with_capacity(text_len / 16 + 4),
        }
    }

    #[inline]
    pub fn alloc(&mut self, data: NodeData, payload: NodePayload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { data, payload });
        id
    }

    #[inline]
    pub fn alloc_list(&mut self, list: NodeListData) -> ListId {
        let id = ListId(self.lists.len() as u32);
        self.lists.push(list);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].data.kind
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.nodes[id.index()].data.range
    }

    #[inline]
    pub fn list(&self, id: ListId) -> &NodeListData {
        &self.lists[id.index()]
    }

    #[inline]
    pub fn list_mut(&mut self, id: ListId) -> &mut NodeListData {
        &mut self.lists[id.index()]
    }

    /// The nodes of an optional list, or an empty slice.
    #[inline]
    pub fn list_nodes(&self, id: Option<ListId>) -> &[NodeId] {
        match id {
            Some(id) => &self.lists[id.index()].nodes,
            None => &[],
        }
    }

    pub fn mark(&self) -> ArenaMark {
        ArenaMark {
            nodes: self.nodes.len(),
            lists: self.lists.len(),
        }
    }

    /// Drop every node and list allocated since `mark`.
    pub fn truncate(&mut self, mark: ArenaMark) {
        debug_assert!(mark.nodes <= self.nodes.len() && mark.lists <= self.lists.len());
        self.nodes.truncate(mark.nodes);
        self.lists.truncate(mark.lists);
    }

    /// Number of nodes allocated, reachable or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn list_count(&self) -> usize {
        self.lists.len()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id)
    }
}

impl Index<ListId> for NodeArena {
    type Output = NodeListData;

    #[inline]
    fn index(&self, id: ListId) -> &NodeListData {
        self.list(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(arena: &mut NodeArena, kind: SyntaxKind, pos: u32, end: u32) -> NodeId {
        arena.alloc(NodeData::new(kind, pos, end), NodePayload::Token)
    }

    #[test]
    fn test_alloc_and_lookup() {
        let mut arena = NodeArena::new();
        let a = token(&mut arena, SyntaxKind::ThisKeyword, 0, 4);
        let b = token(&mut arena, SyntaxKind::NullKeyword, 5, 9);
        let list = arena.alloc_list(NodeListData::new(vec![a, b], 0, 9));

        assert_eq!(arena.kind(a), SyntaxKind::ThisKeyword);
        assert_eq!(arena.range(b), TextRange::new(5, 9));
        assert_eq!(arena[list].nodes, vec![a, b]);
        assert_eq!(arena.list_nodes(None), &[] as &[NodeId]);
    }

    #[test]
    fn test_mark_and_truncate() {
        let mut arena = NodeArena::new();
        let kept = token(&mut arena, SyntaxKind::ThisKeyword, 0, 4);
        let mark = arena.mark();
        token(&mut arena, SyntaxKind::NullKeyword, 5, 9);
        arena.alloc_list(NodeListData::new(vec![], 9, 9));
        arena.truncate(mark);

        assert_eq!(arena.len(), 1);
        assert_eq!(arena.list_count(), 0);
        assert_eq!(arena.kind(kept), SyntaxKind::ThisKeyword);
    }
}
