// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] crate::port::StoreError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Message suitable for showing to the user.
    ///
    /// Remote-reported store failures pass through verbatim; transport and
    /// parse failures collapse to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(e) => e.to_string(),
            AppError::Validation(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Store(e) => e.user_message(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
