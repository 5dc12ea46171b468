//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM backend could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] billbook_llm::LlmError),

    /// Session error (busy, not found, validation)
    #[error(transparent)]
    Book(#[from] billbook_store::BookError),

    /// Store error (selection, export)
    #[error(transparent)]
    Store(#[from] billbook_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record matches the given id or prefix
    #[error("No {kind} matches '{id}'")]
    UnknownId {
        /// "invoice" or "provider"
        kind: &'static str,
        /// What the user typed
        id: String,
    },
}
