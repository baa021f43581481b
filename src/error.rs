//! Error types for the Papo Social onboarding service

use thiserror::Error;

/// Result type alias for Papo Social operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the onboarding service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Input failed validation (missing transcript, bad phone, non-numeric XP)
    #[error("validation error: {0}")]
    Validation(String),

    /// Speech recognition or synthesis error
    #[error("speech error: {0}")]
    Speech(String),

    /// Preference storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Remote endpoint answered with a non-retryable status
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Retries exhausted against a failing endpoint
    #[error("endpoint unavailable after {attempts} attempts: {last_error}")]
    Unavailable {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        last_error: String,
    },

    /// Request aborted by the caller
    #[error("request cancelled")]
    Cancelled,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
