use thiserror::Error;

/// A program-text error with the location of the offending token.
///
/// `token` is the 0-based position in the comma-separated list (which is
/// also the memory address the value would have occupied). `col` is the
/// 1-based byte column of the token's first character on the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{col}: token {token}: {message}")]
pub struct ParseError {
    pub message: String,
    pub token: usize,
    pub col: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: usize, col: usize) -> Self {
        ParseError {
            message: message.into(),
            token,
            col,
        }
    }
}
