use reqwest::StatusCode;
use std::io;

/// Custom error type for docker_push_relay operations
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0} environment variable is required")]
    MissingEnv(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification rejected: {status} - {body}")]
    NotificationRejected { status: StatusCode, body: String },
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::InvalidPayload(e.to_string())
    }
}

/// Helper type for Results that use RelayError
pub type Result<T> = std::result::Result<T, RelayError>;
