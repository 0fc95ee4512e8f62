//! ScamShield error types.
//!
//! Every fallible stage below the orchestrator returns a typed error from
//! this taxonomy instead of panicking or escaping as an unhandled fault.
//! The orchestrator is the only place these are converted into the
//! fail-closed verdict; `InputTooLarge` is the one variant that surfaces
//! to the caller as a rejection rather than a verdict.

use thiserror::Error;

/// ScamShield scanning errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Input exceeds its size cap. Rejected before the pipeline runs.
    #[error("Payload too large: {size} exceeds cap of {limit}")]
    InputTooLarge {
        /// Observed input size.
        size: usize,
        /// Configured cap.
        limit: usize,
    },

    /// Image failed to decode, re-encode, or satisfy structural checks.
    #[error("Sanitization failed: {0}")]
    Sanitization(String),

    /// Network error, timeout, or malformed response from the external
    /// analysis engine.
    #[error("External analysis failed: {0}")]
    Analysis(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Any other unhandled condition.
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scanning operations
pub type Result<T> = std::result::Result<T, ScanError>;

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts land here too; the adapter treats them like any other
        // engine failure.
        ScanError::Analysis(err.to_string())
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::Sanitization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ScanError {
    fn from(err: tokio::task::JoinError) -> Self {
        ScanError::Internal(format!("worker task failed: {err}"))
    }
}
