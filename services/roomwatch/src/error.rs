//! Error types for the roomwatch service

/// Errors that can occur while watching reservation pages
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("State error: {0}")]
    State(String),
}

/// Result type alias for roomwatch operations
pub type Result<T> = std::result::Result<T, WatchError>;
