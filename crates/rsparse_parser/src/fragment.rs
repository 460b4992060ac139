//! Parsing a single construct outside of a file.

use crate::options::ParseOptions;
use crate::parser::Parser;
use rsparse_ast::{NodeArena, NodeId, SyntaxKind};
use rsparse_core::StringInterner;
use rsparse_diagnostics::Diagnostic;

/// A tree for one construct, with the arena and interner it lives in.
#[derive(Debug)]
pub struct ParsedFragment {
    pub arena: NodeArena,
    pub interner: StringInterner,
    pub node: NodeId,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFragment {
    pub fn kind(&self) -> SyntaxKind {
        self.arena.kind(self.node)
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn into_fragment(self, node: NodeId) -> ParsedFragment {
        let mut diagnostics = self.diagnostics.into_diagnostics();
        diagnostics.extend(self.js_doc_diagnostics);
        ParsedFragment {
            arena: self.arena,
            interner: self.interner,
            node,
            diagnostics,
        }
    }

    /// `a.b.c` as an entity name. `None` unless the whole text is one
    /// well-formed name.
    pub fn parse_isolated_entity_name(text: &'a str, options: ParseOptions) -> Option<ParsedFragment> {
        let mut parser = Parser::new("", text, options);
        parser.next_token();
        let entity = parser.parse_entity_name(true, None);
        let complete = parser.current_token() == SyntaxKind::EndOfFileToken && parser.diagnostics.is_empty();
        complete.then(|| parser.into_fragment(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str) -> Option<ParsedFragment> {
        Parser::parse_isolated_entity_name(text, ParseOptions::default())
    }

    #[test]
    fn test_qualified_name() {
        let fragment = entity("a.b.c").expect("valid name");
        assert_eq!(fragment.kind(), SyntaxKind::QualifiedName);
        assert!(!fragment.has_errors());
    }

    #[test]
    fn test_reserved_words_allowed() {
        let fragment = entity("default").expect("keywords are names here");
        assert_eq!(fragment.kind(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_rejects_trailing_text_and_errors() {
        assert!(entity("a b").is_none());
        assert!(entity("a.").is_none());
        assert!(entity("").is_none());
    }
}
