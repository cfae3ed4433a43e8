// src/error.rs

use thiserror::Error;

/// The primary error type for the `aruna-auth` library.
///
/// Token acquisition and configuration surface these to the caller. Bearer
/// token validation never does; its failures are reported as
/// [`InvalidReason`](crate::validator::InvalidReason) instead.
#[derive(Debug, Error)]
pub enum ArunaAuthError {
    /// A required configuration field or call argument is missing or empty.
    #[error("A required configuration field is missing: {0}")]
    MissingConfiguration(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, TLS, timeout) on an outbound call.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status code.
    #[error("Token endpoint returned status {status}: {body}")]
    TokenEndpointStatus { status: u16, body: String },

    /// A response body could not be decoded into the expected shape.
    #[error("Malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The request deadline carried by the context elapsed before completion.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The global tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
