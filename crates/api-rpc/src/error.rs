//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use hireflow_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use tracing::error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const TRANSPORT_ERROR: i32 = 5002;
    /// Lost a conditional write race; the same call may succeed when retried
    pub const RETRYABLE_CONFLICT: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::InvalidTransition(e) => {
            let data = serde_json::json!({
                "entity": e.entity,
                "from": e.from,
                "to": e.to,
                "reason": e.reason.to_string(),
            });
            ErrorObjectOwned::owned(code::CONFLICT, e.to_string(), Some(data))
        }
        AppError::DuplicateEntity(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Conflict(msg) => {
            ErrorObjectOwned::owned(code::RETRYABLE_CONFLICT, msg, None::<()>)
        }
        AppError::Database(msg) => {
            error!(error = %msg, "RPC call failed on the store");
            ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>)
        }
        AppError::Transport(msg) => {
            error!(error = %msg, "RPC call failed on the transport");
            ErrorObjectOwned::owned(code::TRANSPORT_ERROR, msg, None::<()>)
        }
        AppError::Config(msg) | AppError::Internal(msg) => {
            error!(error = %msg, "RPC call failed internally");
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireflow_core::domain::{RejectionReason, TransitionError};

    #[test]
    fn test_deterministic_errors_are_4xxx() {
        assert_eq!(
            to_rpc_error(AppError::Validation("bad".into())).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::not_found("job", "job-1")).code(),
            code::NOT_FOUND
        );
        assert_eq!(
            to_rpc_error(AppError::DuplicateEntity("dup".into())).code(),
            code::CONFLICT
        );
    }

    #[test]
    fn test_invalid_transition_carries_details() {
        let err = TransitionError::new(
            "job",
            "closed",
            "live",
            RejectionReason::TerminalState,
        );
        let obj = to_rpc_error(AppError::InvalidTransition(err));
        assert_eq!(obj.code(), code::CONFLICT);

        let data: serde_json::Value =
            serde_json::from_str(obj.data().unwrap().get()).unwrap();
        assert_eq!(data["entity"], "job");
        assert_eq!(data["from"], "closed");
        assert_eq!(data["to"], "live");
    }

    #[test]
    fn test_transient_errors_are_5xxx() {
        assert_eq!(to_rpc_error(AppError::Database("x".into())).code(), code::DB_ERROR);
        assert_eq!(
            to_rpc_error(AppError::Transport("x".into())).code(),
            code::TRANSPORT_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Internal("x".into())).code(),
            code::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_lost_race_is_distinct_from_rejected_transition() {
        let lost = to_rpc_error(AppError::Conflict("job job-1 kept changing".into()));
        assert_eq!(lost.code(), code::RETRYABLE_CONFLICT);
        assert_ne!(lost.code(), code::CONFLICT);
        assert!(lost.code() >= 5000);
    }
}
