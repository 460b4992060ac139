//! rsparse_core: Core utilities shared by the rsparse crates.
//!
//! Provides byte-offset text ranges, edit descriptions, string interning and
//! the library error type.

pub mod error;
pub mod intern;
pub mod text;

pub use error::{Error, Result};
pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextChangeRange, TextPos, TextRange, TextSpan};
