// Job Domain Model

use crate::domain::error::{DomainError, Result, TransitionError};
use crate::domain::transition::{ReasonRule, RejectionReason, StatusMachine, Transition};
use crate::domain::validation::{optional_text, require_text, validate_id};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Job ID (UUID v4)
pub type JobId = String;

/// Platform user identity (owner, applicant, interviewer)
pub type UserId = String;

/// Company profile identity
pub type CompanyProfileId = String;

/// Job posting status
///
/// `pending -> live | failed`, `live -> closed`, `failed -> pending` (retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Pending,
    Live,
    Failed,
    Closed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Live,
        JobStatus::Failed,
        JobStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Live => "live",
            JobStatus::Failed => "failed",
            JobStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown job status: {}", s)))
    }
}

impl StatusMachine for JobStatus {
    const ENTITY: &'static str = "job";

    fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Closed)
    }

    fn permits(self, to: Self) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Pending, Live) | (Pending, Failed) | (Live, Closed) | (Failed, Pending)
        )
    }

    fn reason_rule(self) -> ReasonRule {
        match self {
            JobStatus::Failed => ReasonRule::Optional,
            _ => ReasonRule::Forbidden,
        }
    }
}

/// Ordered salary range (`min <= max`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
}

impl SalaryRange {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min < 0 || min > max {
            return Err(DomainError::ValidationError(format!(
                "invalid salary range: {}..{}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }
}

/// Editable details of a posting (everything except identity, ownership and status)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub employment_types: BTreeSet<String>,
    pub salary_range: Option<SalaryRange>,
    pub categories: Vec<String>,
    pub skills: Vec<String>,
    pub description: String,
    pub responsibilities: Option<String>,
    pub who_you_are: Option<String>,
    pub nice_to_haves: Option<String>,
}

impl JobDetails {
    /// Validate and normalize details supplied by a caller
    pub fn normalized(self) -> Result<Self> {
        let title = normalize_title(&require_text("title", &self.title)?);
        let description = require_text("description", &self.description)?;

        let employment_types: BTreeSet<String> = self
            .employment_types
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if employment_types.is_empty() {
            return Err(DomainError::ValidationError(
                "at least one employment type is required".to_string(),
            ));
        }

        for category in &self.categories {
            validate_id("category", category)?;
        }
        for skill in &self.skills {
            validate_id("skill", skill)?;
        }
        if let Some(range) = self.salary_range {
            SalaryRange::new(range.min, range.max)?;
        }

        Ok(Self {
            title,
            employment_types,
            salary_range: self.salary_range,
            categories: self.categories,
            skills: self.skills,
            description,
            responsibilities: optional_text(self.responsibilities),
            who_you_are: optional_text(self.who_you_are),
            nice_to_haves: optional_text(self.nice_to_haves),
        })
    }
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub user_id: UserId,
    pub company_profile_id: CompanyProfileId,
    #[serde(flatten)]
    pub details: JobDetails,
    pub status: JobStatus,
    pub failed_reason: Option<String>,
    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Job {
    /// Create a new posting in `pending`
    ///
    /// `id` and `created_at` are injected (IdProvider / TimeProvider), never generated here.
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        user_id: impl Into<String>,
        company_profile_id: impl Into<String>,
        details: JobDetails,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            company_profile_id: company_profile_id.into(),
            details,
            status: JobStatus::Pending,
            failed_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Apply a status change if the transition table allows it
    ///
    /// Returns `Transition::NoOp` (and leaves the record untouched) for a redelivered
    /// request matching the current status.
    pub fn transition_to(
        &mut self,
        to: JobStatus,
        reason: Option<String>,
        now_millis: i64,
    ) -> Result<Transition> {
        let transition = self.status.evaluate(to)?;
        if transition == Transition::NoOp {
            return Ok(transition);
        }
        to.reason_rule().check(to, reason.as_deref())?;

        self.status = to;
        self.failed_reason = match to {
            JobStatus::Failed => optional_text(reason),
            _ => None,
        };
        self.updated_at = now_millis;
        Ok(transition)
    }

    /// Reset a failed posting to `pending` so it re-enters validation
    ///
    /// Only legal from `failed`; a pending posting is *not* a no-op here because a retry
    /// re-emits the validation request.
    pub fn retry(&mut self, now_millis: i64) -> Result<()> {
        if self.status != JobStatus::Failed {
            let reason = if self.status.is_terminal() {
                RejectionReason::TerminalState
            } else {
                RejectionReason::IllegalTransition
            };
            return Err(TransitionError::new(
                JobStatus::ENTITY,
                self.status,
                JobStatus::Pending,
                reason,
            )
            .into());
        }
        self.transition_to(JobStatus::Pending, None, now_millis)?;
        Ok(())
    }

    /// Replace editable details; closed postings are frozen
    pub fn update_details(&mut self, details: JobDetails, now_millis: i64) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::ValidationError(format!(
                "job {} is {} and can no longer be edited",
                self.id, self.status
            )));
        }
        self.details = details.normalized()?;
        self.updated_at = now_millis;
        Ok(())
    }
}

/// Title-case a posting title ("senior rust ENGINEER" -> "Senior Rust Engineer")
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> JobDetails {
        JobDetails {
            title: "backend engineer".to_string(),
            employment_types: ["Full-Time".to_string()].into_iter().collect(),
            salary_range: Some(SalaryRange { min: 50, max: 90 }),
            categories: vec!["cat-1".to_string()],
            skills: vec!["rust".to_string()],
            description: "Build services".to_string(),
            responsibilities: None,
            who_you_are: Some("  ".to_string()),
            nice_to_haves: None,
        }
    }

    #[test]
    fn test_job_transition_table() {
        use JobStatus::*;
        assert_eq!(Pending.evaluate(Live), Ok(Transition::Apply));
        assert_eq!(Pending.evaluate(Failed), Ok(Transition::Apply));
        assert_eq!(Live.evaluate(Closed), Ok(Transition::Apply));
        assert_eq!(Failed.evaluate(Pending), Ok(Transition::Apply));

        let err = Pending.evaluate(Closed).unwrap_err();
        assert_eq!(err.reason, RejectionReason::IllegalTransition);
        let err = Failed.evaluate(Closed).unwrap_err();
        assert_eq!(err.reason, RejectionReason::IllegalTransition);
        let err = Live.evaluate(Failed).unwrap_err();
        assert_eq!(err.reason, RejectionReason::IllegalTransition);
    }

    #[test]
    fn test_job_self_transitions() {
        for status in [JobStatus::Pending, JobStatus::Live, JobStatus::Failed] {
            assert_eq!(status.evaluate(status), Ok(Transition::NoOp));
        }
        let err = JobStatus::Closed.evaluate(JobStatus::Closed).unwrap_err();
        assert_eq!(err.reason, RejectionReason::TerminalState);
    }

    #[test]
    fn test_job_status_round_trip_strings() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("archived".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_failed_reason_kept_and_cleared_on_retry() {
        let mut job = Job::new("job-1", 1000, "user-1", "company-1", details());
        job.transition_to(JobStatus::Failed, Some("spam".into()), 2000)
            .unwrap();
        assert_eq!(job.failed_reason.as_deref(), Some("spam"));

        job.retry(3000).unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.failed_reason, None);
        assert_eq!(job.updated_at, 3000);
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut job = Job::new("job-1", 1000, "user-1", "company-1", details());
        assert!(matches!(
            job.retry(2000),
            Err(DomainError::InvalidStateTransition(_))
        ));

        job.transition_to(JobStatus::Live, None, 2000).unwrap();
        job.transition_to(JobStatus::Closed, None, 3000).unwrap();
        match job.retry(4000) {
            Err(DomainError::InvalidStateTransition(e)) => {
                assert_eq!(e.reason, RejectionReason::TerminalState)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_reason_forbidden_for_live() {
        let mut job = Job::new("job-1", 1000, "user-1", "company-1", details());
        let err = job
            .transition_to(JobStatus::Live, Some("looks fine".into()), 2000)
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[test]
    fn test_details_normalized() {
        let normalized = details().normalized().unwrap();
        assert_eq!(normalized.title, "Backend Engineer");
        assert!(normalized.employment_types.contains("full-time"));
        assert_eq!(normalized.who_you_are, None);

        let mut bad = details();
        bad.salary_range = Some(SalaryRange { min: 100, max: 10 });
        assert!(bad.normalized().is_err());
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("senior rust ENGINEER"), "Senior Rust Engineer");
        assert_eq!(normalize_title("  qa   lead "), "Qa Lead");
    }
}
