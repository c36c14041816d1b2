use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the saved-property store and the marketplace client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("login required")]
    AuthenticationRequired,
    #[error("saved property not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("marketplace responded with {status}: {message}")]
    Remote { status: StatusCode, message: String },
    #[error("request task failed: {0}")]
    Task(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    /// Whether the server rejected the call because the session is missing.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            StoreError::AuthenticationRequired => true,
            StoreError::Remote { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
