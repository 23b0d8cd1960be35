//! Error types for corefer.

use thiserror::Error;

/// Result type for corefer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for corefer operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input document is malformed (empty, or a mention span is out of
    /// bounds). The whole document is rejected; nothing is partially resolved.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A required resource (dictionary file, scorer weights) is missing or
    /// unreadable. Raised at system construction, never per document.
    #[error("Resource error: {0}")]
    Resource(String),

    /// The sieve pipeline configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An injected pair scorer failed. Aborts the current document only;
    /// no partial chains are emitted for it.
    #[error("Scoring failed: {0}")]
    Scoring(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Error::InvalidDocument(msg.into())
    }

    /// Create a resource error.
    pub fn resource(msg: impl Into<String>) -> Self {
        Error::Resource(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a scoring error.
    pub fn scoring(msg: impl Into<String>) -> Self {
        Error::Scoring(msg.into())
    }
}
