//! The result of parsing one file.

use crate::arena::NodeArena;
use crate::node::{NodeId, NodePayload};
use crate::syntax_kind::SyntaxKind;
use crate::types::{JSDocParsingMode, LanguageVariant, LanguageVersion, ScriptKind};
use rsparse_core::intern::StringInterner;
use rsparse_core::text::{LineMap, TextRange};
use rsparse_diagnostics::Diagnostic;

/// Where a pragma was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PragmaKind {
    /// `/// <name attr="value" />`
    TripleSlashXml,
    /// `// @name value`
    SingleLine,
    /// `/* @name value */`
    MultiLine,
}

/// A comment directive found at the top of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    pub kind: PragmaKind,
    /// Lowercased directive name, e.g. `reference` or `jsx`.
    pub name: String,
    /// Named arguments: `attr="value"` pairs for XML pragmas, whitespace
    /// separated words for line pragmas.
    pub arguments: Vec<(String, String)>,
    pub range: TextRange,
}

impl Pragma {
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Reuse counters for one incremental parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IncrementalStats {
    /// List elements taken over from the previous tree.
    pub reused_nodes: usize,
    /// List elements parsed from text.
    pub reparsed_elements: usize,
}

impl IncrementalStats {
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused_nodes + self.reparsed_elements;
        if total == 0 {
            0.0
        } else {
            self.reused_nodes as f64 / total as f64 * 100.0
        }
    }
}

/// A parsed file: its text, its tree and everything the parser reported.
///
/// The tree is stored in `arena` with `root` as the `SourceFile` node. An
/// incremental update takes the whole value by move; the old file does not
/// exist after the update.
#[derive(Debug)]
pub struct SourceFile {
    pub file_name: String,
    pub text: String,
    pub arena: NodeArena,
    pub root: NodeId,
    pub interner: StringInterner,
    pub parse_diagnostics: Vec<Diagnostic>,
    pub js_doc_diagnostics: Vec<Diagnostic>,
    pub language_version: LanguageVersion,
    pub language_variant: LanguageVariant,
    pub script_kind: ScriptKind,
    pub jsdoc_parsing_mode: JSDocParsingMode,
    pub set_external_module_indicator: bool,
    pub is_declaration_file: bool,
    /// The first import/export statement, or the first `import.meta`.
    pub external_module_indicator: Option<NodeId>,
    pub pragmas: Vec<Pragma>,
    /// Nodes reachable from `root`.
    pub node_count: usize,
    pub identifier_count: usize,
    pub has_been_incrementally_parsed: bool,
    pub incremental_stats: Option<IncrementalStats>,
}

impl SourceFile {
    /// Top-level statements in source order.
    pub fn statements(&self) -> &[NodeId] {
        match &self.arena.get(self.root).payload {
            NodePayload::SourceFile { statements, .. } => &self.arena.list(*statements).nodes,
            _ => &[],
        }
    }

    pub fn end_of_file_token(&self) -> Option<NodeId> {
        match &self.arena.get(self.root).payload {
            NodePayload::SourceFile {
                end_of_file_token, ..
            } => Some(*end_of_file_token),
            _ => None,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.parse_diagnostics
    }

    pub fn is_external_module(&self) -> bool {
        self.external_module_indicator.is_some()
    }

    /// Source text covered by `node`, leading trivia excluded.
    pub fn node_text(&self, node: NodeId) -> &str {
        let range = self.arena.range(node);
        let start = skip_trivia(&self.text, range.pos as usize).min(range.end as usize);
        &self.text[start..range.end as usize]
    }

    /// Text of an identifier or literal node.
    pub fn identifier_text(&self, node: NodeId) -> Option<&str> {
        match &self.arena.get(node).payload {
            NodePayload::Identifier { text, .. } | NodePayload::Literal { text, .. } => {
                Some(self.interner.resolve(*text))
            }
            _ => None,
        }
    }

    /// Documentation comments attached to `node`.
    pub fn js_doc(&self, node: NodeId) -> &[NodeId] {
        self.arena.list_nodes(self.arena.data(node).js_doc)
    }

    pub fn kind(&self, node: NodeId) -> SyntaxKind {
        self.arena.kind(node)
    }

    pub fn line_map(&self) -> LineMap {
        LineMap::new(&self.text)
    }
}

/// Skip whitespace and comments starting at `pos`.
pub fn skip_trivia(text: &str, mut pos: usize) -> usize {
    let bytes = text.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => pos += 1,
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                while pos < bytes.len() && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                match text[pos..].find("*/") {
                    Some(offset) => pos += offset + 2,
                    None => return bytes.len(),
                }
            }
            _ => {
                let Some(ch) = text[pos..].chars().next() else {
                    break;
                };
                if ch.is_whitespace() || ch == '\u{feff}' {
                    pos += ch.len_utf8();
                } else {
                    break;
                }
            }
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_trivia() {
        assert_eq!(skip_trivia("  x", 0), 2);
        assert_eq!(skip_trivia("// c\n  y", 0), 7);
        assert_eq!(skip_trivia("/* a */ z", 0), 8);
        assert_eq!(skip_trivia("/* open", 0), 7);
        assert_eq!(skip_trivia("\u{a0}w", 0), 2);
    }

    #[test]
    fn test_reuse_rate() {
        let stats = IncrementalStats {
            reused_nodes: 3,
            reparsed_elements: 1,
        };
        assert!((stats.reuse_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(IncrementalStats::default().reuse_rate(), 0.0);
    }

    #[test]
    fn test_pragma_argument() {
        let pragma = Pragma {
            kind: PragmaKind::TripleSlashXml,
            name: "reference".into(),
            arguments: vec![("path".into(), "a.d.ts".into())],
            range: TextRange::new(0, 30),
        };
        assert_eq!(pragma.argument("path"), Some("a.d.ts"));
        assert_eq!(pragma.argument("types"), None);
    }
}
