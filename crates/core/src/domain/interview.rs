// Interview Domain Model

use crate::domain::application::ApplicationId;
use crate::domain::error::{DomainError, Result};
use crate::domain::job::{JobId, UserId};
use crate::domain::transition::{StatusMachine, Transition};
use crate::domain::validation::optional_text;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type InterviewId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Online,
    Offline,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Online => "online",
            InterviewType::Offline => "offline",
        }
    }
}

impl FromStr for InterviewType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "online" => Ok(InterviewType::Online),
            "offline" => Ok(InterviewType::Offline),
            other => Err(DomainError::ValidationError(format!(
                "unknown interview type: {}",
                other
            ))),
        }
    }
}

/// Interview status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewStatus {
    Scheduled,
    Accepted,
    Rejected,
    Canceled,
    Expired,
    Completed,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 6] = [
        InterviewStatus::Scheduled,
        InterviewStatus::Accepted,
        InterviewStatus::Rejected,
        InterviewStatus::Canceled,
        InterviewStatus::Expired,
        InterviewStatus::Completed,
    ];

    pub const NON_TERMINAL: [InterviewStatus; 2] =
        [InterviewStatus::Scheduled, InterviewStatus::Accepted];

    /// Statuses that free the slot for a new interview with the same tuple
    pub const RELEASED: [InterviewStatus; 2] =
        [InterviewStatus::Canceled, InterviewStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Accepted => "accepted",
            InterviewStatus::Rejected => "rejected",
            InterviewStatus::Canceled => "canceled",
            InterviewStatus::Expired => "expired",
            InterviewStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        InterviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown interview status: {}", s)))
    }
}

impl StatusMachine for InterviewStatus {
    const ENTITY: &'static str = "interview";

    fn is_terminal(self) -> bool {
        !matches!(self, InterviewStatus::Scheduled | InterviewStatus::Accepted)
    }

    fn permits(self, to: Self) -> bool {
        use InterviewStatus::*;
        matches!(
            (self, to),
            (Scheduled, Accepted)
                | (Scheduled, Rejected)
                | (Scheduled, Canceled)
                | (Scheduled, Expired)
                | (Accepted, Completed)
                | (Accepted, Canceled)
        )
    }
}

/// Interview Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub job_id: JobId,
    pub application_id: ApplicationId,
    pub applicant_id: UserId,
    pub interviewer_id: UserId,
    pub scheduled_time: i64, // epoch ms
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Slot requested by the company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub interviewer_id: UserId,
    pub scheduled_time: i64,
    pub interview_type: InterviewType,
    pub description: Option<String>,
}

impl Interview {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        job_id: impl Into<String>,
        application_id: impl Into<String>,
        applicant_id: impl Into<String>,
        slot: InterviewSlot,
    ) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            application_id: application_id.into(),
            applicant_id: applicant_id.into(),
            interviewer_id: slot.interviewer_id,
            scheduled_time: slot.scheduled_time,
            interview_type: slot.interview_type,
            status: InterviewStatus::Scheduled,
            description: optional_text(slot.description),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn transition_to(&mut self, to: InterviewStatus, now_millis: i64) -> Result<Transition> {
        let transition = self.status.evaluate(to)?;
        if transition == Transition::Apply {
            self.status = to;
            self.updated_at = now_millis;
        }
        Ok(transition)
    }
}
