// JobApplication Domain Model

use crate::domain::error::{DomainError, Result, TransitionError};
use crate::domain::job::{CompanyProfileId, JobId, UserId};
use crate::domain::transition::{ReasonRule, RejectionReason, StatusMachine, Transition};
use crate::domain::validation::{optional_text, require_text};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type ApplicationId = String;

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Failed,
    InReview,
    Shortlisted,
    Interview,
    Offered,
    Hired,
    Declined,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Applied,
        ApplicationStatus::Failed,
        ApplicationStatus::InReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Declined,
        ApplicationStatus::Withdrawn,
    ];

    /// Statuses a job closure forces into `declined`
    pub const NON_TERMINAL: [ApplicationStatus; 7] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Applied,
        ApplicationStatus::Failed,
        ApplicationStatus::InReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Failed => "failed",
            ApplicationStatus::InReview => "in-review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Declined => "declined",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// `applied..offered`: the review pipeline
    pub fn in_pipeline(self) -> bool {
        use ApplicationStatus::*;
        matches!(self, Applied | InReview | Shortlisted | Interview | Offered)
    }

    /// Reviewer comments are only taken while the application is in the pipeline
    pub fn accepts_comment(self) -> bool {
        self.in_pipeline()
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::ValidationError(format!("unknown application status: {}", s))
            })
    }
}

impl StatusMachine for ApplicationStatus {
    const ENTITY: &'static str = "application";

    fn is_terminal(self) -> bool {
        use ApplicationStatus::*;
        matches!(self, Hired | Declined | Withdrawn)
    }

    fn permits(self, to: Self) -> bool {
        use ApplicationStatus::*;
        match (self, to) {
            (Pending, Applied) | (Pending, Failed) | (Failed, Pending) => true,
            (Applied, InReview)
            | (InReview, Shortlisted)
            | (Shortlisted, Interview)
            | (Interview, Offered)
            | (Offered, Hired) => true,
            (from, Declined) => from.in_pipeline(),
            (from, Withdrawn) => !from.is_terminal(),
            _ => false,
        }
    }

    fn reason_rule(self) -> ReasonRule {
        match self {
            ApplicationStatus::Failed | ApplicationStatus::Withdrawn => ReasonRule::Optional,
            ApplicationStatus::Declined => ReasonRule::Required,
            _ => ReasonRule::Forbidden,
        }
    }
}

/// Applicant contact fields captured at apply time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ContactDetails {
    pub fn normalized(self) -> Result<Self> {
        let full_name = require_text("full_name", &self.full_name)?;
        let email = require_text("email", &self.email)?.to_lowercase();
        if !email.contains('@') {
            return Err(DomainError::ValidationError(format!(
                "invalid email address: {}",
                email
            )));
        }
        Ok(Self {
            full_name,
            email,
            phone: optional_text(self.phone),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerComment {
    pub text: String,
    pub commented_at: i64,
}

/// JobApplication Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub job_id: JobId,
    pub company_profile_id: CompanyProfileId,
    /// Job title at apply time
    pub job_role: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub resume: String,
    pub cover_letter: Option<String>,
    pub offer_letter: Option<String>,
    pub status: ApplicationStatus,
    pub failed_reason: Option<String>,
    pub declined_reason: Option<String>,
    pub comment: Option<ReviewerComment>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields supplied by the applicant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub resume: String,
    pub cover_letter: Option<String>,
}

impl JobApplication {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        user_id: impl Into<String>,
        job_id: impl Into<String>,
        company_profile_id: impl Into<String>,
        job_role: impl Into<String>,
        submission: ApplicationSubmission,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            job_id: job_id.into(),
            company_profile_id: company_profile_id.into(),
            job_role: job_role.into(),
            contact: submission.contact.normalized()?,
            resume: require_text("resume", &submission.resume)?,
            cover_letter: optional_text(submission.cover_letter),
            offer_letter: None,
            status: ApplicationStatus::Pending,
            failed_reason: None,
            declined_reason: None,
            comment: None,
            created_at,
            updated_at: created_at,
        })
    }

    /// Apply a status change if the transition table and reason rules allow it
    pub fn transition_to(
        &mut self,
        to: ApplicationStatus,
        reason: Option<String>,
        now_millis: i64,
    ) -> Result<Transition> {
        let transition = self.status.evaluate(to)?;
        if transition == Transition::NoOp {
            return Ok(transition);
        }
        to.reason_rule().check(to, reason.as_deref())?;

        let reason = optional_text(reason);
        match to {
            ApplicationStatus::Failed => self.failed_reason = reason,
            ApplicationStatus::Declined => self.declined_reason = reason,
            ApplicationStatus::Pending => self.failed_reason = None,
            _ => {}
        }
        self.status = to;
        self.updated_at = now_millis;
        Ok(transition)
    }

    /// Reset a failed application to `pending` (only legal from `failed`)
    pub fn retry(&mut self, now_millis: i64) -> Result<()> {
        if self.status != ApplicationStatus::Failed {
            let reason = if self.status.is_terminal() {
                RejectionReason::TerminalState
            } else {
                RejectionReason::IllegalTransition
            };
            return Err(TransitionError::new(
                ApplicationStatus::ENTITY,
                self.status,
                ApplicationStatus::Pending,
                reason,
            )
            .into());
        }
        self.transition_to(ApplicationStatus::Pending, None, now_millis)?;
        Ok(())
    }

    /// Record a reviewer comment; status is unchanged
    pub fn add_comment(&mut self, text: &str, now_millis: i64) -> Result<()> {
        if !self.status.accepts_comment() {
            return Err(DomainError::ValidationError(format!(
                "comments are not accepted while the application is {}",
                self.status
            )));
        }
        self.comment = Some(ReviewerComment {
            text: require_text("comment", text)?,
            commented_at: now_millis,
        });
        self.updated_at = now_millis;
        Ok(())
    }
}
