use thiserror::Error;

/// Application-level error type shared by every flow in the client.
///
/// The first three variants are recoverable at the step that raised them;
/// `DataIntegrity` is fatal for the page that hit it (the caller redirects
/// to the entry page instead of retrying).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Verification required: {0}")]
    Unverified(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Required data missing: {0}")]
    DataIntegrity(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures the user can fix inline and retry immediately.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::MissingField(_)
                | AppError::Validation(_)
                | AppError::Unverified(_)
                | AppError::Network(_)
                | AppError::Server(_)
        )
    }
}
