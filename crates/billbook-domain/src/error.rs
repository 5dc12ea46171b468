//! Errors raised by domain-level checks

use thiserror::Error;

/// Why a selected file was refused before reaching ingestion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// MIME type is not PDF, PNG or JPEG
    #[error("Unsupported file type: {0} (expected PDF, PNG or JPEG)")]
    UnsupportedType(String),

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured maximum in bytes
        max: usize,
    },

    /// File has no content
    #[error("File is empty")]
    Empty,

    /// File could not be read from disk
    #[error("Could not read file: {0}")]
    Unreadable(String),
}

/// A field-level rejection of a user edit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error for `field`
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Malformed data URI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid data URI: {0}")]
pub struct DataUriError(pub String);
