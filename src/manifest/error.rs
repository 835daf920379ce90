//! Errors raised by the record tokenizer.
//!
//! Two classes exist:
//!
//! - **Fatal**: [`ParseError::RowTooLarge`] stops the session. Every later
//!   call on the same parser returns [`ParseError::Aborted`].
//! - **Recoverable**: [`ParseError::RowLengthMismatch`] is delivered as an
//!   [`Event::Error`](super::Event::Error) and the session keeps going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// A single record grew past `max_row_bytes` before its terminator.
    #[error("row {line} exceeds the maximum size of {max} bytes")]
    RowTooLarge { line: usize, max: usize },

    /// Strict mode: field count does not match the header count.
    #[error("row {line} has {got} fields but {expected} headers are defined")]
    RowLengthMismatch {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// The session already failed; no further input is accepted.
    #[error("parse session aborted by an earlier error")]
    Aborted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Whether the error ends the parse session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ParseError::RowLengthMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
