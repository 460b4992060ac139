//! Speculative parsing: try a production and keep or discard its effects.

use crate::parser::Parser;
use rsparse_ast::{ArenaMark, IncrementalStats, NodeFlags, SyntaxKind};
use rsparse_scanner::ScannerState;

/// How the effects of a speculative parse are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpeculationKind {
    /// Keep everything on success, rewind on `None`.
    TryParse,
    /// Always rewind.
    Lookahead,
    /// Rewind the token position only. Nodes and diagnostics are kept.
    Reparse,
}

/// Everything needed to put the parser back where it was.
pub(crate) struct Checkpoint {
    scanner: ScannerState,
    token: SyntaxKind,
    diagnostics_len: usize,
    js_doc_diagnostics_len: usize,
    parse_error_before_next_finished_node: bool,
    context_flags: NodeFlags,
    source_flags: NodeFlags,
    arena: ArenaMark,
    nesting_error_reported: bool,
    stats: IncrementalStats,
}

impl<'a> Parser<'a> {
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            scanner: self.scanner.save_state(),
            token: self.current_token,
            diagnostics_len: self.diagnostics.len(),
            js_doc_diagnostics_len: self.js_doc_diagnostics.len(),
            parse_error_before_next_finished_node: self.parse_error_before_next_finished_node,
            context_flags: self.context_flags,
            source_flags: self.source_flags,
            arena: self.arena.mark(),
            nesting_error_reported: self.nesting_error_reported,
            stats: self.stats,
        }
    }

    /// Rewind the token stream. Nodes and diagnostics stay unless
    /// `discard` is set.
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint, discard: bool) {
        self.scanner.restore_state(checkpoint.scanner);
        self.current_token = checkpoint.token;
        self.context_flags = checkpoint.context_flags;
        if !discard {
            return;
        }
        self.truncate_diagnostics(checkpoint.diagnostics_len);
        self.js_doc_diagnostics.truncate(checkpoint.js_doc_diagnostics_len);
        self.parse_error_before_next_finished_node = checkpoint.parse_error_before_next_finished_node;
        self.source_flags = checkpoint.source_flags;
        self.arena.truncate(checkpoint.arena);
        self.nesting_error_reported = checkpoint.nesting_error_reported;
        self.stats = checkpoint.stats;
    }

    fn speculation_helper<T>(&mut self, kind: SpeculationKind, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        let saved_context = self.context_flags;
        let result = f(self);
        debug_assert_eq!(
            saved_context, self.context_flags,
            "speculative parse left the context flags changed"
        );
        match kind {
            SpeculationKind::TryParse if result.is_some() => {}
            SpeculationKind::Reparse => self.rewind(checkpoint, false),
            SpeculationKind::TryParse | SpeculationKind::Lookahead => self.rewind(checkpoint, true),
        }
        result
    }

    /// Run `f` and keep its effects only when it returns `Some`.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.speculation_helper(SpeculationKind::TryParse, f)
    }

    /// Run `f` and rewind. Any nodes it built are freed, so it must not
    /// return node handles.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut f = Some(f);
        let result = self.speculation_helper(SpeculationKind::Lookahead, |p| f.take().map(|f| f(p)));
        match result {
            Some(value) => value,
            None => unreachable!("lookahead callback always produces a value"),
        }
    }

    /// Run `f` and rewind the token position, keeping its nodes and
    /// diagnostics.
    pub(crate) fn reparse<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut f = Some(f);
        let result = self.speculation_helper(SpeculationKind::Reparse, |p| f.take().map(|f| f(p)));
        match result {
            Some(value) => value,
            None => unreachable!("reparse callback always produces a value"),
        }
    }

    /// Advance and report whether the next token satisfies `f`.
    pub(crate) fn next_token_is(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            f(p)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::Parser;
    use rsparse_ast::SyntaxKind;
    use rsparse_diagnostics::messages;

    fn parser(text: &str) -> Parser<'_> {
        let mut parser = Parser::new("test.ts", text, ParseOptions::default());
        parser.next_token();
        parser
    }

    #[test]
    fn test_look_ahead_rewinds_everything() {
        let mut p = parser("a b c");
        let nodes = p.arena.len();
        let seen = p.look_ahead(|p| {
            p.parse_identifier(None);
            p.parse_error_at_current_token(&messages::UNEXPECTED_TOKEN, &[]);
            p.current_token()
        });
        assert_eq!(seen, SyntaxKind::Identifier);
        assert_eq!(p.arena.len(), nodes);
        assert!(p.diagnostics.is_empty());
        assert!(!p.parse_error_before_next_finished_node);
        assert_eq!(p.token_start(), 0);
        assert!(p.parse_error_at_position(2, 1, &messages::UNEXPECTED_TOKEN, &[]));
    }

    #[test]
    fn test_try_parse_keeps_success() {
        let mut p = parser("a b");
        let id = p.try_parse(|p| Some(p.parse_identifier(None)));
        assert!(id.is_some());
        assert_eq!(p.token_start(), 2);

        let none: Option<()> = p.try_parse(|p| {
            p.next_token();
            None
        });
        assert!(none.is_none());
        assert_eq!(p.token_start(), 2);
    }

    #[test]
    fn test_reparse_keeps_nodes() {
        let mut p = parser("a b");
        let before = p.arena.len();
        p.reparse(|p| {
            p.parse_identifier(None);
        });
        assert_eq!(p.arena.len(), before + 1);
        assert_eq!(p.token_start(), 0);
    }
}
