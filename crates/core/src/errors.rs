//! Core error types for the Pinsight engine.
//!
//! Only malformed user input (allocation descriptions, account edits) and
//! collaborator failures surface as errors. Missing exchange rates and
//! unallocated tickers are regular, recoverable states and never reach here.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Position source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Validation errors for user input.
///
/// The `Display` output is shown inline next to the field being edited, so
/// the messages are kept short.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A single asset class was given more than 100%.
    #[error("'{0}' exceeds 100%")]
    ClassExceeds(String),

    /// The explicit percentages add up to more than 100%.
    #[error("Exceeds 100%")]
    TotalExceeds,

    /// The percentages (after auto-filling) do not add up to 100%.
    #[error("Does not add up to 100%")]
    IncompleteTotal,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns the validation error if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Repository(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Repository(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
