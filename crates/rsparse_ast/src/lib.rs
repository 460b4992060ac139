//! rsparse_ast: Syntax tree definitions.
//!
//! Defines SyntaxKind, the node and flag types, the node arena, child
//! enumeration and the `SourceFile` result type.

pub mod arena;
pub mod dump;
pub mod node;
pub mod source_file;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

pub use arena::{ArenaMark, NodeArena};
pub use node::{ListId, Node, NodeData, NodeId, NodeListData, NodePayload};
pub use source_file::{IncrementalStats, Pragma, PragmaKind, SourceFile};
pub use syntax_kind::SyntaxKind;
pub use types::*;
pub use visitor::{children, for_each_child, for_each_child_node, walk_preorder, Child};
