// Central Error Type for the Application

use crate::domain::{DomainError, TransitionError};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(TransitionError),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Conditional update kept losing against concurrent writers
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Store/transport failures that may succeed when retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Transport(_) | AppError::Conflict(_)
        )
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} {}", entity, id))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStateTransition(e) => AppError::InvalidTransition(e),
            DomainError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::InvalidTransition(err)
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate (map_sqlx_error)
