//! Status transition primitives shared by the Job, JobApplication and Interview machines.
//!
//! Every entity status enum implements [`StatusMachine`] by listing the edges of its
//! transition table in `permits`. [`StatusMachine::evaluate`] turns that table into a
//! total answer for any `(from, to)` pair:
//!
//! | from          | to == from | edge in table | otherwise            |
//! |---------------|------------|---------------|----------------------|
//! | terminal      | rejected   | rejected      | rejected (terminal)  |
//! | non-terminal  | `NoOp`     | `Apply`       | rejected (illegal)   |

use crate::domain::error::{DomainError, TransitionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Answer for a legal transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Status changes and must be persisted
    Apply,
    /// Requested status is the current one (redelivered command); nothing to persist or emit
    NoOp,
}

/// Reason code attached to a refused transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    IllegalTransition,
    TerminalState,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::IllegalTransition => "illegal-transition",
            RejectionReason::TerminalState => "terminal-state",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a free-text reason may accompany a transition into a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonRule {
    Required,
    Optional,
    Forbidden,
}

impl ReasonRule {
    /// Check a supplied reason against the rule for `target`
    pub fn check(self, target: impl fmt::Display, reason: Option<&str>) -> Result<(), DomainError> {
        let supplied = reason.map(str::trim).filter(|r| !r.is_empty());
        match (self, supplied) {
            (ReasonRule::Required, None) => Err(DomainError::ValidationError(format!(
                "a reason is required when moving to '{}'",
                target
            ))),
            (ReasonRule::Forbidden, Some(_)) => Err(DomainError::ValidationError(format!(
                "a reason is not accepted when moving to '{}'",
                target
            ))),
            _ => Ok(()),
        }
    }
}

/// Transition table of one entity type
pub trait StatusMachine: Copy + Eq + fmt::Display {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Terminal statuses reject every request, including self-transitions
    fn is_terminal(self) -> bool;

    /// True when `self -> to` is an edge of the table (self-loops are handled by `evaluate`)
    fn permits(self, to: Self) -> bool;

    /// Reason rule for transitions into `self`
    fn reason_rule(self) -> ReasonRule {
        ReasonRule::Forbidden
    }

    fn evaluate(self, to: Self) -> Result<Transition, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::new(
                Self::ENTITY,
                self,
                to,
                RejectionReason::TerminalState,
            ));
        }
        if self == to {
            return Ok(Transition::NoOp);
        }
        if self.permits(to) {
            Ok(Transition::Apply)
        } else {
            Err(TransitionError::new(
                Self::ENTITY,
                self,
                to,
                RejectionReason::IllegalTransition,
            ))
        }
    }
}
