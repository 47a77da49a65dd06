//! Error type for strict parsing.

use thiserror::Error;

/// The first parse error met by [`HTMLParser::run_strict`](crate::HTMLParser::run_strict).
///
/// Ordinary parsing never fails; this only exists for callers that want to
/// reject non-conforming documents outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at token {token_index}: {message}")]
pub struct ParseError {
    /// Description of the error.
    pub message: String,
    /// Index of the token being processed when the error was found.
    pub token_index: usize,
}
