//! Structural text dump of a tree.
//!
//! The dump records kinds, ranges, flags, token text and scalar payload
//! fields. It never mentions handles, so two trees built in different arenas
//! dump identically when they have the same shape.

use crate::arena::NodeArena;
use crate::node::{ListId, NodeId, NodePayload};
use crate::visitor::{children, Child};
use rsparse_core::intern::StringInterner;
use std::fmt::Write;

/// Output settings for [`TreeDumper`].
#[derive(Debug, Clone, Copy)]
pub struct DumpOptions {
    pub ranges: bool,
    pub flags: bool,
    /// One node per line, indented by depth.
    pub pretty: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            ranges: true,
            flags: true,
            pretty: false,
        }
    }
}

pub struct TreeDumper<'a> {
    arena: &'a NodeArena,
    interner: &'a StringInterner,
    options: DumpOptions,
    out: String,
}

impl<'a> TreeDumper<'a> {
    pub fn new(arena: &'a NodeArena, interner: &'a StringInterner, options: DumpOptions) -> Self {
        Self {
            arena,
            interner,
            options,
            out: String::new(),
        }
    }

    pub fn dump(mut self, root: NodeId) -> String {
        self.node(root, 0);
        self.out
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str("  ");
            }
        } else {
            self.out.push(' ');
        }
    }

    fn node(&mut self, id: NodeId, depth: usize) {
        let node = self.arena.get(id);
        let data = &node.data;
        let _ = write!(self.out, "({:?}", data.kind);
        if self.options.ranges {
            let _ = write!(self.out, " {}..{}", data.range.pos, data.range.end);
        }
        if self.options.flags && !data.flags.is_empty() {
            let _ = write!(self.out, " {:?}", data.flags);
        }
        self.scalars(&node.payload);

        if let Some(js_doc) = data.js_doc {
            self.newline(depth + 1);
            self.out.push_str("@jsdoc");
            self.list(js_doc, depth + 1);
        }
        for child in children(self.arena, id) {
            self.newline(depth + 1);
            match child {
                Child::Node(child) => self.node(child, depth + 1),
                Child::List(list) => self.list(list, depth + 1),
            }
        }
        self.out.push(')');
    }

    fn list(&mut self, id: ListId, depth: usize) {
        let list = self.arena.list(id);
        self.out.push('[');
        if self.options.ranges {
            let _ = write!(self.out, "{}..{}", list.range.pos, list.range.end);
        }
        if list.has_trailing_comma {
            self.out.push_str(" trailing-comma");
        }
        if list.is_missing_list {
            self.out.push_str(" missing");
        }
        for &child in &list.nodes {
            self.newline(depth + 1);
            self.node(child, depth + 1);
        }
        self.out.push(']');
    }

    fn scalars(&mut self, payload: &NodePayload) {
        use NodePayload::*;
        match payload {
            Identifier { text, .. } | Literal { text, .. } => {
                let _ = write!(self.out, " {:?}", self.interner.resolve(*text));
            }
            JSDocLink { text, .. } => {
                let _ = write!(self.out, " text={:?}", self.interner.resolve(*text));
            }
            Unary { operator, .. } | TypeOperator { operator, .. } => {
                let _ = write!(self.out, " op={:?}", operator);
            }
            MetaProperty { keyword_token, .. } => {
                let _ = write!(self.out, " keyword={:?}", keyword_token);
            }
            HeritageClause { token, .. } | ImportAttributes { token, .. } => {
                let _ = write!(self.out, " token={:?}", token);
            }
            WrappedType { postfix: true, .. } => self.out.push_str(" postfix"),
            ImportEquals {
                is_type_only: true, ..
            }
            | ImportClause {
                is_type_only: true, ..
            }
            | ImportOrExportSpecifier {
                is_type_only: true, ..
            }
            | ExportDeclaration {
                is_type_only: true, ..
            } => self.out.push_str(" type-only"),
            ExportAssignment {
                is_export_equals: true,
                ..
            } => self.out.push_str(" export="),
            ImportType {
                is_type_of: true, ..
            } => self.out.push_str(" typeof"),
            JSDocPropertyLikeTag {
                is_name_first,
                is_bracketed,
                ..
            } => {
                if *is_name_first {
                    self.out.push_str(" name-first");
                }
                if *is_bracketed {
                    self.out.push_str(" bracketed");
                }
            }
            JSDocTypeLiteral {
                is_array_type: true,
                ..
            } => self.out.push_str(" array"),
            _ => {}
        }
    }
}

/// Single-line dump with ranges and flags.
pub fn dump_tree(arena: &NodeArena, interner: &StringInterner, root: NodeId) -> String {
    TreeDumper::new(arena, interner, DumpOptions::default()).dump(root)
}

/// Indented dump with ranges and flags.
pub fn dump_tree_pretty(arena: &NodeArena, interner: &StringInterner, root: NodeId) -> String {
    TreeDumper::new(
        arena,
        interner,
        DumpOptions {
            pretty: true,
            ..DumpOptions::default()
        },
    )
    .dump(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, NodeListData};
    use crate::syntax_kind::SyntaxKind;
    use crate::types::TokenFlags;

    fn literal(arena: &mut NodeArena, interner: &StringInterner, text: &str, pos: u32) -> NodeId {
        arena.alloc(
            NodeData::new(SyntaxKind::NumericLiteral, pos, pos + text.len() as u32),
            NodePayload::Literal {
                text: interner.intern(text),
                token_flags: TokenFlags::NONE,
            },
        )
    }

    #[test]
    fn test_dump_is_handle_independent() {
        let interner = StringInterner::new();
        let build = |arena: &mut NodeArena| {
            let one = literal(arena, &interner, "1", 1);
            let two = literal(arena, &interner, "2", 4);
            let list = arena.alloc_list(NodeListData::new(vec![one, two], 1, 5));
            arena.alloc(
                NodeData::new(SyntaxKind::ArrayLiteralExpression, 0, 6),
                NodePayload::ArrayLiteral {
                    elements: list,
                    multi_line: false,
                },
            )
        };

        let mut first = NodeArena::new();
        let a = build(&mut first);
        let mut second = NodeArena::new();
        literal(&mut second, &interner, "junk", 0);
        let b = build(&mut second);

        assert_ne!(a, b);
        assert_eq!(dump_tree(&first, &interner, a), dump_tree(&second, &interner, b));
        assert_eq!(
            dump_tree(&first, &interner, a),
            "(ArrayLiteralExpression 0..6 [1..5 (NumericLiteral 1..2 \"1\") (NumericLiteral 4..5 \"2\")])"
        );
    }

    #[test]
    fn test_pretty_dump_indents() {
        let interner = StringInterner::new();
        let mut arena = NodeArena::new();
        let one = literal(&mut arena, &interner, "1", 0);
        let expr = arena.alloc(
            NodeData::new(SyntaxKind::ParenthesizedExpression, 0, 3),
            NodePayload::ExpressionWrapper { expression: one },
        );
        let text = dump_tree_pretty(&arena, &interner, expr);
        assert_eq!(text, "(ParenthesizedExpression 0..3\n  (NumericLiteral 0..1 \"1\"))");
    }
}
