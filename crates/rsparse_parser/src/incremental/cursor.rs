//! Navigation over the previous tree for node reuse.

use rsparse_ast::{for_each_child, ListId, NodeArena, NodeId};
use tracing::trace;

/// Lookup counters, for tuning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorStats {
    /// Calls to [`SyntaxCursor::current_node`] at a new position.
    pub lookups: u32,
    /// Lookups answered by stepping to the next sibling.
    pub sibling_steps: u32,
    /// Lookups that found a node starting at the position.
    pub hits: u32,
}

/// Where the search for a list element went next.
enum Step {
    Descend(NodeId),
    Found(ListId, usize, NodeId),
}

/// Finds the list element of the previous tree that starts at a given
/// position.
///
/// The cursor remembers the list it last answered from, so the common case
/// of asking for the element right after the one just reused costs one
/// comparison.
#[derive(Debug)]
pub struct SyntaxCursor {
    root: NodeId,
    current_list: Option<ListId>,
    index: usize,
    current: Option<NodeId>,
    last_queried: Option<u32>,
    stats: CursorStats,
}

impl SyntaxCursor {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            current_list: None,
            index: 0,
            current: None,
            last_queried: None,
            stats: CursorStats::default(),
        }
    }

    pub fn stats(&self) -> CursorStats {
        self.stats
    }

    /// The outermost list element of the previous tree starting exactly at
    /// `pos`.
    pub fn current_node(&mut self, arena: &NodeArena, pos: u32) -> Option<NodeId> {
        if self.last_queried != Some(pos) {
            self.stats.lookups += 1;
            if let (Some(current), Some(list)) = (self.current, self.current_list) {
                let nodes = &arena.list(list).nodes;
                if arena.data(current).end() == pos && self.index + 1 < nodes.len() {
                    self.index += 1;
                    self.current = Some(nodes[self.index]);
                    self.stats.sibling_steps += 1;
                }
            }
            if self.current.map_or(true, |node| arena.data(node).pos() != pos) {
                self.find_highest_list_element_starting_at(arena, pos);
            }
            if self.current.is_some() {
                self.stats.hits += 1;
            }
            trace!(pos, node = ?self.current, "syntax cursor");
        }
        self.last_queried = Some(pos);
        self.current
    }

    fn find_highest_list_element_starting_at(&mut self, arena: &NodeArena, pos: u32) {
        self.current_list = None;
        self.current = None;
        self.index = 0;

        let mut node = self.root;
        loop {
            let step = for_each_child(
                arena,
                node,
                |child| {
                    let range = arena.range(child);
                    (range.pos <= pos && pos < range.end).then_some(Step::Descend(child))
                },
                |list| {
                    let data = arena.list(list);
                    if pos < data.range.pos || pos >= data.range.end {
                        return None;
                    }
                    data.nodes.iter().enumerate().find_map(|(index, &child)| {
                        let range = arena.range(child);
                        if range.pos == pos {
                            Some(Step::Found(list, index, child))
                        } else if range.pos < pos && pos < range.end {
                            Some(Step::Descend(child))
                        } else {
                            None
                        }
                    })
                },
            );
            match step {
                Some(Step::Descend(child)) => node = child,
                Some(Step::Found(list, index, child)) => {
                    self.current_list = Some(list);
                    self.index = index;
                    self.current = Some(child);
                    return;
                }
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsparse_ast::{NodeData, NodeListData, NodePayload, SyntaxKind};

    /// `a; b; { c; }` as a root with three statements, the last a block.
    fn tree() -> (NodeArena, NodeId, Vec<NodeId>) {
        let mut arena = NodeArena::new();
        let statement = |arena: &mut NodeArena, pos: u32, end: u32| {
            arena.alloc(NodeData::new(SyntaxKind::EmptyStatement, pos, end), NodePayload::Token)
        };
        let a = statement(&mut arena, 0, 2);
        let b = statement(&mut arena, 2, 5);
        let c = statement(&mut arena, 8, 11);
        let inner = arena.alloc_list(NodeListData::new(vec![c], 7, 11));
        let block = arena.alloc(
            NodeData::new(SyntaxKind::Block, 5, 13),
            NodePayload::Block {
                statements: inner,
                multi_line: false,
            },
        );
        let statements = arena.alloc_list(NodeListData::new(vec![a, b, block], 0, 13));
        let eof = arena.alloc(NodeData::new(SyntaxKind::EndOfFileToken, 13, 13), NodePayload::Token);
        let root = arena.alloc(
            NodeData::new(SyntaxKind::SourceFile, 0, 13),
            NodePayload::SourceFile {
                statements,
                end_of_file_token: eof,
            },
        );
        (arena, root, vec![a, b, block, c])
    }

    #[test]
    fn test_finds_top_level_and_nested_elements() {
        let (arena, root, nodes) = tree();
        let mut cursor = SyntaxCursor::new(root);
        assert_eq!(cursor.current_node(&arena, 0), Some(nodes[0]));
        assert_eq!(cursor.current_node(&arena, 5), Some(nodes[2]));
        assert_eq!(cursor.current_node(&arena, 8), Some(nodes[3]));
        assert_eq!(cursor.current_node(&arena, 3), None);
    }

    #[test]
    fn test_steps_to_next_sibling() {
        let (arena, root, nodes) = tree();
        let mut cursor = SyntaxCursor::new(root);
        assert_eq!(cursor.current_node(&arena, 0), Some(nodes[0]));
        assert_eq!(cursor.current_node(&arena, 2), Some(nodes[1]));
        assert_eq!(cursor.current_node(&arena, 2), Some(nodes[1]));
        let stats = cursor.stats();
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.sibling_steps, 1);
        assert_eq!(stats.hits, 2);
    }
}
