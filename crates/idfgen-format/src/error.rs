//! Error types for IDF document operations.

use thiserror::Error;

/// Errors that can occur while parsing or editing an IDF document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Parser error: unexpected token or malformed structure.
    #[error("Parser error at line {line}: {message}")]
    Parser {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// Input ended inside an object.
    #[error("Object '{keyword}' starting at line {line} is not terminated by ';'")]
    Unterminated {
        /// Keyword of the open object.
        keyword: String,
        /// Line where the object starts (1-indexed).
        line: usize,
    },

    /// A replacement value would change the document structure.
    #[error("Invalid field value {value:?}: {reason}")]
    InvalidValue {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An object or field index does not exist in the document.
    #[error("No such {what}: index {index}")]
    OutOfRange {
        /// What was being addressed ("object" or "field").
        what: &'static str,
        /// The offending index.
        index: usize,
    },
}

impl FormatError {
    /// Create a parser error.
    pub fn parser(line: usize, message: impl Into<String>) -> Self {
        Self::Parser {
            line,
            message: message.into(),
        }
    }

    /// Create an unterminated-object error.
    pub fn unterminated(keyword: impl Into<String>, line: usize) -> Self {
        Self::Unterminated {
            keyword: keyword.into(),
            line,
        }
    }
}

/// Result type for IDF document operations.
pub type Result<T> = std::result::Result<T, FormatError>;
