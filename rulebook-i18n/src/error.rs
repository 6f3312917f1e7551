//! Error types for catalog operations

use thiserror::Error;

/// Errors raised while building or loading a message catalog.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Invalid locale tag
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Message file has an unusable shape
    #[error("Failed to parse message file: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
