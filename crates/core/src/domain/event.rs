//! Event contracts exchanged with peer services.
//!
//! Inbound messages are decoded from JSON into the typed structs below and mapped to exactly one
//! orchestrator call. Outbound payloads are built from committed entity snapshots; every outbound
//! event is keyed by the id of the entity it describes so a consumer sees one entity's events in
//! emission order.

use crate::domain::application::JobApplication;
use crate::domain::interview::{Interview, InterviewType};
use crate::domain::job::Job;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topics this service consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundTopic {
    JobValidationOutcome,
    JobPostAccepted,
    JobPostRejected,
    JobApplicationOutcome,
    JobApplicationAccepted,
    JobApplicationRejected,
}

impl InboundTopic {
    pub const ALL: [InboundTopic; 6] = [
        InboundTopic::JobValidationOutcome,
        InboundTopic::JobPostAccepted,
        InboundTopic::JobPostRejected,
        InboundTopic::JobApplicationOutcome,
        InboundTopic::JobApplicationAccepted,
        InboundTopic::JobApplicationRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InboundTopic::JobValidationOutcome => "job-validation-outcome",
            InboundTopic::JobPostAccepted => "job-post-accepted",
            InboundTopic::JobPostRejected => "job-post-rejected",
            InboundTopic::JobApplicationOutcome => "job-application-outcome",
            InboundTopic::JobApplicationAccepted => "job-application-accepted",
            InboundTopic::JobApplicationRejected => "job-application-rejected",
        }
    }

    pub fn parse(topic: &str) -> Option<Self> {
        InboundTopic::ALL.into_iter().find(|t| t.as_str() == topic)
    }
}

/// Topics this service publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundTopic {
    JobValidationRequest,
    JobApplied,
    JobApplicationViewed,
    ResumeCommented,
    InterviewScheduled,
    InterviewAccepted,
    InterviewRejected,
    JobOffered,
    JobOfferAccepted,
    JobOfferRejected,
}

impl OutboundTopic {
    pub const ALL: [OutboundTopic; 10] = [
        OutboundTopic::JobValidationRequest,
        OutboundTopic::JobApplied,
        OutboundTopic::JobApplicationViewed,
        OutboundTopic::ResumeCommented,
        OutboundTopic::InterviewScheduled,
        OutboundTopic::InterviewAccepted,
        OutboundTopic::InterviewRejected,
        OutboundTopic::JobOffered,
        OutboundTopic::JobOfferAccepted,
        OutboundTopic::JobOfferRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutboundTopic::JobValidationRequest => "job-validation-request",
            OutboundTopic::JobApplied => "job-applied",
            OutboundTopic::JobApplicationViewed => "job-application-viewed",
            OutboundTopic::ResumeCommented => "resume-commented",
            OutboundTopic::InterviewScheduled => "interview-scheduled",
            OutboundTopic::InterviewAccepted => "interview-accepted",
            OutboundTopic::InterviewRejected => "interview-rejected",
            OutboundTopic::JobOffered => "job-offered",
            OutboundTopic::JobOfferAccepted => "job-offer-accepted",
            OutboundTopic::JobOfferRejected => "job-offer-rejected",
        }
    }

    pub fn parse(topic: &str) -> Option<Self> {
        OutboundTopic::ALL.into_iter().find(|t| t.as_str() == topic)
    }
}

impl std::fmt::Display for InboundTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for OutboundTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationOutcome {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationOutcome {
    Accepted,
    Rejected,
}

/// `job-validation-outcome` / `job-post-accepted` / `job-post-rejected`
///
/// `outcome` is implied by the topic for the accepted/rejected variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobValidationOutcomeMessage {
    pub job_id: String,
    #[serde(default)]
    pub outcome: Option<ValidationOutcome>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `job-application-outcome` / `job-application-accepted` / `job-application-rejected`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationOutcomeMessage {
    pub job_application_id: String,
    #[serde(default)]
    pub outcome: Option<ApplicationOutcome>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobValidationRequest {
    pub job_id: String,
    pub user_id: String,
    pub company_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAppliedMessage {
    pub job_application_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationViewedMessage {
    pub job_application_id: String,
    pub user_id: String,
    pub company_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeCommentedMessage {
    pub job_application_id: String,
    pub user_id: String,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

/// `interview-scheduled` / `interview-accepted` / `interview-rejected`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewMessage {
    pub id: String,
    pub applicant_id: String,
    pub job: String,
    pub application: String,
    pub interviewer_id: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub timestamp: DateTime<Utc>,
}

/// `job-offered` / `job-offer-accepted` / `job-offer-rejected`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMessage {
    pub job_application_id: String,
    #[serde(rename = "applicantId")]
    pub applicant_id: String,
    pub job_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One outbound notification, built after a committed transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    JobValidationRequested(JobValidationRequest),
    JobApplied(JobAppliedMessage),
    ApplicationViewed(ApplicationViewedMessage),
    ResumeCommented(ResumeCommentedMessage),
    Interview(OutboundTopic, InterviewMessage),
    Offer(OutboundTopic, OfferMessage),
}

fn to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

impl OutboundEvent {
    pub fn validation_request(job: &Job) -> Self {
        OutboundEvent::JobValidationRequested(JobValidationRequest {
            job_id: job.id.clone(),
            user_id: job.user_id.clone(),
            company_id: job.company_profile_id.clone(),
            title: job.details.title.clone(),
        })
    }

    pub fn applied(application: &JobApplication) -> Self {
        OutboundEvent::JobApplied(JobAppliedMessage {
            job_application_id: application.id.clone(),
            user_id: application.user_id.clone(),
        })
    }

    pub fn viewed(application: &JobApplication) -> Self {
        OutboundEvent::ApplicationViewed(ApplicationViewedMessage {
            job_application_id: application.id.clone(),
            user_id: application.user_id.clone(),
            company_id: application.company_profile_id.clone(),
        })
    }

    pub fn resume_commented(application: &JobApplication) -> Option<Self> {
        let comment = application.comment.as_ref()?;
        Some(OutboundEvent::ResumeCommented(ResumeCommentedMessage {
            job_application_id: application.id.clone(),
            user_id: application.user_id.clone(),
            comment: comment.text.clone(),
            timestamp: to_datetime(comment.commented_at),
        }))
    }

    pub fn interview(topic: OutboundTopic, interview: &Interview, now_millis: i64) -> Self {
        OutboundEvent::Interview(
            topic,
            InterviewMessage {
                id: interview.id.clone(),
                applicant_id: interview.applicant_id.clone(),
                job: interview.job_id.clone(),
                application: interview.application_id.clone(),
                interviewer_id: interview.interviewer_id.clone(),
                scheduled_time: to_datetime(interview.scheduled_time),
                interview_type: interview.interview_type,
                timestamp: to_datetime(now_millis),
            },
        )
    }

    pub fn offer(topic: OutboundTopic, application: &JobApplication, now_millis: i64) -> Self {
        OutboundEvent::Offer(
            topic,
            OfferMessage {
                job_application_id: application.id.clone(),
                applicant_id: application.user_id.clone(),
                job_id: application.job_id.clone(),
                timestamp: to_datetime(now_millis),
            },
        )
    }

    pub fn topic(&self) -> OutboundTopic {
        match self {
            OutboundEvent::JobValidationRequested(_) => OutboundTopic::JobValidationRequest,
            OutboundEvent::JobApplied(_) => OutboundTopic::JobApplied,
            OutboundEvent::ApplicationViewed(_) => OutboundTopic::JobApplicationViewed,
            OutboundEvent::ResumeCommented(_) => OutboundTopic::ResumeCommented,
            OutboundEvent::Interview(topic, _) | OutboundEvent::Offer(topic, _) => *topic,
        }
    }

    /// Partition/ordering key: id of the entity the event describes
    pub fn key(&self) -> &str {
        match self {
            OutboundEvent::JobValidationRequested(m) => &m.job_id,
            OutboundEvent::JobApplied(m) => &m.job_application_id,
            OutboundEvent::ApplicationViewed(m) => &m.job_application_id,
            OutboundEvent::ResumeCommented(m) => &m.job_application_id,
            OutboundEvent::Interview(_, m) => &m.id,
            OutboundEvent::Offer(_, m) => &m.job_application_id,
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            OutboundEvent::JobValidationRequested(m) => serde_json::to_vec(m),
            OutboundEvent::JobApplied(m) => serde_json::to_vec(m),
            OutboundEvent::ApplicationViewed(m) => serde_json::to_vec(m),
            OutboundEvent::ResumeCommented(m) => serde_json::to_vec(m),
            OutboundEvent::Interview(_, m) => serde_json::to_vec(m),
            OutboundEvent::Offer(_, m) => serde_json::to_vec(m),
        }
    }
}
