//! Error types for mbox contact extraction

use thiserror::Error;

/// Main error type for contact extraction runs
#[derive(Error, Debug)]
pub enum ContactsError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON reading or writing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration (bad input path, wrong extension, output is a directory)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading the mailbox
    #[error("Mbox error: {0}")]
    Mbox(String),

    /// Logger could not be installed
    #[error("Logging error: {0}")]
    Logging(#[from] log::SetLoggerError),

    /// Email that cannot be turned into a sort key
    #[error(transparent)]
    Validation(#[from] InvalidEmail),
}

/// An email that defeats sort-key derivation. Always aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEmail {
    #[error("Invalid email: no @ in the email: '{0}'")]
    MissingAt(String),

    #[error("Invalid email: more than 1 @ in the email and unable to extract a single address: '{0}'")]
    AmbiguousAt(String),

    #[error("Invalid email: no domain found (nothing after @): '{0}'")]
    MissingDomain(String),
}

/// Result type alias for contact extraction operations
pub type Result<T> = std::result::Result<T, ContactsError>;
