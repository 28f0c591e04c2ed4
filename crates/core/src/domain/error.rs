// Domain Error Types

use crate::domain::transition::RejectionReason;
use thiserror::Error;

/// A state machine refused `from -> to` for one entity type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {entity} status transition: {from} -> {to} ({reason})")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
    pub reason: RejectionReason,
}

impl TransitionError {
    pub fn new(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
        reason: RejectionReason,
    ) -> Self {
        Self {
            entity,
            from: from.to_string(),
            to: to.to_string(),
            reason,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    InvalidStateTransition(#[from] TransitionError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
