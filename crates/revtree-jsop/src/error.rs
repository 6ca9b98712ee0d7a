use thiserror::Error;

/// Errors raised while reading a protocol blob.
///
/// Lexical problems (an unterminated string, a bad escape) and grammar
/// mismatches (a missing `:` or `}`) are both parse errors: either way the
/// blob does not have the shape the reader was told to expect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsopError {
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
}

impl JsopError {
    /// Create a parse error at a byte offset.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Byte offset into the blob where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            Self::Parse { position, .. } => *position,
        }
    }
}

/// Result alias for reader operations.
pub type JsopResult<T> = Result<T, JsopError>;
