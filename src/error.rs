use thiserror::Error;

/// Main error type for the playlist generator
#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid item id: {0}")]
    InvalidItemId(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("User is not allowed to download content")]
    Forbidden,

    #[error("Library server error: {0}")]
    Upstream(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PlaylistError>;
