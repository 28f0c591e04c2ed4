//! RPC Request Types
//!
//! Method parameters. Results are the domain entities themselves (or `CascadeResult` for calls that
//! trigger cascades), serialized as-is.

use hireflow_core::domain::{
    ApplicationOutcome, ApplicationStatus, CatalogKind, InterviewStatus, JobDetails, JobStatus,
    ValidationOutcome,
};
use hireflow_core::port::{ApplicationFilter, CatalogFilter, InterviewFilter, JobFilter};
use serde::Deserialize;

/// job.get.v1, job.retry.v1, job.close.v1
#[derive(Debug, Deserialize)]
pub struct JobIdParams {
    pub job_id: String,
}

/// job.update.v1
#[derive(Debug, Deserialize)]
pub struct UpdateJobParams {
    pub job_id: String,
    #[serde(flatten)]
    pub details: JobDetails,
}

/// job.mark_validation_outcome.v1
#[derive(Debug, Deserialize)]
pub struct ValidationOutcomeParams {
    pub job_id: String,
    pub outcome: ValidationOutcome,
    #[serde(default)]
    pub reason: Option<String>,
}

/// job.list.v1
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListJobsParams {
    pub user_id: Option<String>,
    pub company_profile_id: Option<String>,
    pub statuses: Option<Vec<JobStatus>>,
}

impl From<ListJobsParams> for JobFilter {
    fn from(p: ListJobsParams) -> Self {
        JobFilter {
            user_id: p.user_id,
            company_profile_id: p.company_profile_id,
            statuses: p.statuses,
        }
    }
}

/// application.get.v1 and the other single-application calls without arguments
#[derive(Debug, Deserialize)]
pub struct ApplicationIdParams {
    pub application_id: String,
}

/// application.withdraw.v1, application.decline_offer.v1
#[derive(Debug, Deserialize)]
pub struct ApplicationReasonParams {
    pub application_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// application.mark_outcome.v1
#[derive(Debug, Deserialize)]
pub struct ApplicationOutcomeParams {
    pub application_id: String,
    pub outcome: ApplicationOutcome,
    #[serde(default)]
    pub reason: Option<String>,
}

/// application.change_status.v1
#[derive(Debug, Deserialize)]
pub struct ChangeStatusParams {
    pub application_id: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

/// application.comment.v1
#[derive(Debug, Deserialize)]
pub struct CommentParams {
    pub application_id: String,
    pub comment: String,
}

/// application.offer.v1
#[derive(Debug, Deserialize)]
pub struct OfferParams {
    pub application_id: String,
    pub offer_letter: String,
}

/// application.list.v1
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListApplicationsParams {
    pub user_id: Option<String>,
    pub job_id: Option<String>,
    pub company_profile_id: Option<String>,
    pub statuses: Option<Vec<ApplicationStatus>>,
}

impl From<ListApplicationsParams> for ApplicationFilter {
    fn from(p: ListApplicationsParams) -> Self {
        ApplicationFilter {
            user_id: p.user_id,
            job_id: p.job_id,
            company_profile_id: p.company_profile_id,
            statuses: p.statuses,
        }
    }
}

/// interview.get.v1, interview.accept.v1, interview.reject.v1, interview.cancel.v1,
/// interview.complete.v1
#[derive(Debug, Deserialize)]
pub struct InterviewIdParams {
    pub interview_id: String,
}

/// interview.list.v1
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListInterviewsParams {
    pub job_id: Option<String>,
    pub application_id: Option<String>,
    pub applicant_id: Option<String>,
    pub interviewer_id: Option<String>,
    pub statuses: Option<Vec<InterviewStatus>>,
    pub include_canceled: bool,
}

impl ListInterviewsParams {
    pub fn into_filter(self) -> (InterviewFilter, bool) {
        let filter = InterviewFilter {
            job_id: self.job_id,
            application_id: self.application_id,
            applicant_id: self.applicant_id,
            interviewer_id: self.interviewer_id,
            statuses: self.statuses,
            scheduled_before: None,
        };
        (filter, self.include_canceled)
    }
}

/// category.get_by_name.v1, skill.get_by_name.v1
#[derive(Debug, Deserialize)]
pub struct CatalogNameParams {
    pub name: String,
}

/// category.list.v1, skill.list.v1
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListCatalogParams {
    /// Case-insensitive name substring
    pub query: Option<String>,
    pub is_active: Option<bool>,
}

impl ListCatalogParams {
    pub fn into_filter(self, kind: CatalogKind) -> CatalogFilter {
        CatalogFilter {
            kind,
            name_contains: self.query.filter(|q| !q.trim().is_empty()),
            is_active: self.is_active,
        }
    }
}
