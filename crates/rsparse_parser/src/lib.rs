//! rsparse_parser: Error-tolerant recursive descent parser for TypeScript
//! and JavaScript.
//!
//! Turns source text into an arena-allocated syntax tree plus diagnostics.
//! Parsing never fails: malformed input yields missing nodes and
//! diagnostics. Edits can be applied incrementally with
//! [`update_source_file`], which reuses the subtrees an edit left intact.

mod fragment;
mod grammar;
mod incremental;
mod jsdoc;
mod list;
mod options;
mod parser;
mod pragmas;
mod precedence;
mod speculation;
mod stack;
mod utilities;

pub use fragment::ParsedFragment;
pub use incremental::{update_source_file, CursorStats, SyntaxCursor, MAX_ARENA_GROWTH};
pub use options::{is_declaration_file_name, ParseOptions};
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use rsparse_ast::{for_each_child, SourceFile};

/// Parse `text` as the file `file_name`.
///
/// Positions are `u32` byte offsets, so `text` must be shorter than 4 GiB.
/// Callers reading untrusted files check the length first and report
/// [`rsparse_core::Error::TextTooLarge`].
pub fn parse_source_file(file_name: &str, text: &str, options: ParseOptions) -> SourceFile {
    Parser::new(file_name, text, options).parse_source_file()
}

/// Parse `text` as a dotted name such as `a.b.c`. Keywords are accepted as
/// name parts. `None` unless the whole text is one name without errors.
pub fn parse_isolated_entity_name(text: &str, options: ParseOptions) -> Option<ParsedFragment> {
    Parser::parse_isolated_entity_name(text, options)
}

/// Parse the `{type}` expression at `[start, start + length)` of `text`.
pub fn parse_jsdoc_type_expression_for_tests(text: &str, start: usize, length: usize) -> Option<ParsedFragment> {
    Parser::parse_jsdoc_type_expression_for_tests(text, start, length)
}

/// Parse the `/** ... */` comment at `[start, start + length)` of `text`.
pub fn parse_jsdoc_comment(text: &str, start: usize, length: usize) -> Option<ParsedFragment> {
    Parser::parse_isolated_jsdoc_comment(text, start, length)
}

/// Whether the file has an import, an export or `import.meta`.
pub fn is_external_module(file: &SourceFile) -> bool {
    file.is_external_module()
}
