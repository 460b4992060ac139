//! rsparse_scanner: Tokenizer for TypeScript and JavaScript source text.
//!
//! Produces tokens on demand for the parser, including the context-dependent
//! rescans (regular expressions, templates, `>` sequences), JSX children and
//! attribute values, and the token stream of documentation comments.

pub mod char_codes;
mod scanner;
pub mod trivia;

pub use scanner::{ScanError, Scanner, ScannerState};
pub use trivia::{get_leading_comment_ranges, get_shebang, get_trailing_comment_ranges, CommentRange};
