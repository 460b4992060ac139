//! Errors for misuse of the library API.
//!
//! Malformed source text never produces an `Error`; it produces diagnostics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("change range {start}..{end} lies outside the previous text (length {text_len})")]
    InvalidChangeRange { start: u32, end: u32, text_len: u32 },

    #[error("new text length {actual} does not match the edit (expected {expected})")]
    TextLengthMismatch { expected: u32, actual: u32 },

    #[error("source text of {0} bytes exceeds the 4 GiB position limit")]
    TextTooLarge(usize),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
