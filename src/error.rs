use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the bookmark store or settings files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in the bookmark store or settings blob.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The bookmark host rejected an operation.
    #[error("{0}")]
    Host(String),

    /// A node id that does not exist in the bookmark store.
    #[error("Can't find bookmark for id: {0}")]
    NotFound(String),

    /// Best-effort network request failed.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}
