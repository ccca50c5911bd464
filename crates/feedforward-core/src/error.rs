//! Error types for feedforward-core

use thiserror::Error;

/// Result type alias using feedforward-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while working with the feedback service
#[derive(Error, Debug)]
pub enum Error {
    /// Request never reached the server, or the reply never made it back
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a failure status
    #[error("Server error: {message} (HTTP {status})")]
    Server { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Caller-side input rejected before any request was made
    #[error("Invalid input: {0}")]
    Validation(String),
}
