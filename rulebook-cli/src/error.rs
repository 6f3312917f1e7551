//! Error types for the rulebook CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error reading the document or the rules file
    Io(std::io::Error),

    /// Message catalog could not be configured
    Locale(rulebook_i18n::I18nError),

    /// The document is not a JSON object
    MalformedInput(String),

    /// Invalid argument
    InvalidArgument(String),

    /// Output could not be encoded
    Output(serde_json::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Locale(e) => write!(f, "Locale error: {}", e),
            CliError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Output(e) => write!(f, "Output error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<rulebook_i18n::I18nError> for CliError {
    fn from(e: rulebook_i18n::I18nError) -> Self {
        CliError::Locale(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
