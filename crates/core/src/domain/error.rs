// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid application status: {0}")]
    InvalidStatus(String),

    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
