//! Cross-entity consequences of job closure and offers.
//!
//! Every cascade step is a bulk conditional update restricted to records that are still
//! non-terminal, so running a cascade again after a partial failure (or a crash) only touches
//! what is left. A failing step does not stop the following ones; the caller receives a
//! [`CascadeOutcome::Failed`] carrying the counts that did commit.

use crate::application::constants::JOB_CLOSED_REASON;
use crate::domain::{ApplicationStatus, InterviewStatus};
use crate::error::{AppError, Result};
use crate::port::{
    ApplicationFilter, ApplicationStore, InterviewFilter, InterviewStore, StatusUpdate,
    TimeProvider,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Records modified by one cascade run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub applications_declined: u64,
    pub interviews_canceled: u64,
}

/// Result of the follow-up work attached to a primary transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CascadeOutcome {
    Completed(CascadeReport),
    /// The primary transition committed; some follow-up updates did not
    Failed { report: CascadeReport, error: String },
}

impl CascadeOutcome {
    pub fn report(&self) -> CascadeReport {
        match self {
            CascadeOutcome::Completed(report) | CascadeOutcome::Failed { report, .. } => *report,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CascadeOutcome::Completed(_))
    }
}

/// Committed primary entity plus its cascade outcome (partial success is not an error)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult<T> {
    pub entity: T,
    pub cascade: CascadeOutcome,
}

pub struct CascadeCoordinator {
    applications: Arc<dyn ApplicationStore>,
    interviews: Arc<dyn InterviewStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CascadeCoordinator {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        interviews: Arc<dyn InterviewStore>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            applications,
            interviews,
            time_provider,
        }
    }

    /// Job -> closed: decline open applications, cancel open interviews
    pub async fn on_job_closed(&self, job_id: &str) -> CascadeOutcome {
        let mut report = CascadeReport::default();
        let mut failure: Option<AppError> = None;

        match self.decline_applications_of_job(job_id).await {
            Ok(n) => report.applications_declined = n,
            Err(e) => failure = Some(e),
        }
        match self.cancel_interviews_of_job(job_id).await {
            Ok(n) => report.interviews_canceled = n,
            Err(e) => failure = failure.or(Some(e)),
        }

        self.finish("job-closed", job_id, report, failure)
    }

    /// Application -> offered: the interview process of the job ends
    pub async fn on_offer_issued(&self, job_id: &str) -> CascadeOutcome {
        let mut report = CascadeReport::default();
        let failure = match self.cancel_interviews_of_job(job_id).await {
            Ok(n) => {
                report.interviews_canceled = n;
                None
            }
            Err(e) => Some(e),
        };
        self.finish("offer-issued", job_id, report, failure)
    }

    /// Bulk `non-terminal -> declined` for every application of the job
    pub async fn decline_applications_of_job(&self, job_id: &str) -> Result<u64> {
        let filter =
            ApplicationFilter::for_job(job_id).with_statuses(ApplicationStatus::NON_TERMINAL);
        let update = StatusUpdate::new(ApplicationStatus::Declined, self.time_provider.now_millis())
            .with_reason(JOB_CLOSED_REASON);
        self.applications.update_many(&filter, &update).await
    }

    /// Bulk `scheduled|accepted -> canceled` for every interview of the job
    pub async fn cancel_interviews_of_job(&self, job_id: &str) -> Result<u64> {
        let filter = InterviewFilter::for_job(job_id).with_statuses(InterviewStatus::NON_TERMINAL);
        let update = StatusUpdate::new(InterviewStatus::Canceled, self.time_provider.now_millis());
        self.interviews.update_many(&filter, &update).await
    }

    fn finish(
        &self,
        cascade: &str,
        job_id: &str,
        report: CascadeReport,
        failure: Option<AppError>,
    ) -> CascadeOutcome {
        match failure {
            None => {
                info!(
                    cascade,
                    job_id = %job_id,
                    applications_declined = report.applications_declined,
                    interviews_canceled = report.interviews_canceled,
                    "Cascade completed"
                );
                CascadeOutcome::Completed(report)
            }
            Some(e) => {
                error!(
                    cascade,
                    job_id = %job_id,
                    applications_declined = report.applications_declined,
                    interviews_canceled = report.interviews_canceled,
                    error = %e,
                    "Cascade partially failed"
                );
                CascadeOutcome::Failed {
                    report,
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ApplicationSubmission, ContactDetails, Interview, InterviewSlot, InterviewType,
        JobApplication,
    };
    use crate::port::application_store::mocks::InMemoryApplicationStore;
    use crate::port::interview_store::mocks::InMemoryInterviewStore;
    use crate::port::time_provider::mocks::ManualClock;

    fn application(id: &str, user: &str, job: &str, status: ApplicationStatus) -> JobApplication {
        let mut app = JobApplication::new(
            id,
            0,
            user,
            job,
            "company-1",
            "Engineer",
            ApplicationSubmission {
                contact: ContactDetails {
                    full_name: "Name".into(),
                    email: "a@b.c".into(),
                    phone: None,
                },
                resume: "resume".into(),
                cover_letter: None,
            },
        )
        .unwrap();
        app.status = status;
        app
    }

    fn interview(id: &str, job: &str, status: InterviewStatus) -> Interview {
        let mut interview = Interview::new(
            id,
            0,
            job,
            "app",
            "user",
            InterviewSlot {
                interviewer_id: "hr".into(),
                scheduled_time: 1000,
                interview_type: InterviewType::Online,
                description: None,
            },
        );
        interview.status = status;
        interview
    }

    fn setup() -> (
        Arc<InMemoryApplicationStore>,
        Arc<InMemoryInterviewStore>,
        CascadeCoordinator,
    ) {
        let apps = Arc::new(InMemoryApplicationStore::new());
        let interviews = Arc::new(InMemoryInterviewStore::new());
        let coordinator = CascadeCoordinator::new(
            apps.clone(),
            interviews.clone(),
            Arc::new(ManualClock::new(5000)),
        );
        (apps, interviews, coordinator)
    }

    #[tokio::test]
    async fn test_job_closed_cascade_counts_and_rerun() {
        let (apps, interviews, coordinator) = setup();
        apps.put(application("a1", "u1", "job-1", ApplicationStatus::Applied));
        apps.put(application("a2", "u2", "job-1", ApplicationStatus::Interview));
        apps.put(application("a3", "u3", "job-1", ApplicationStatus::Withdrawn));
        apps.put(application("a4", "u4", "job-2", ApplicationStatus::Applied));
        interviews.put(interview("i1", "job-1", InterviewStatus::Scheduled));
        interviews.put(interview("i2", "job-1", InterviewStatus::Accepted));
        interviews.put(interview("i3", "job-1", InterviewStatus::Completed));

        let outcome = coordinator.on_job_closed("job-1").await;
        assert_eq!(
            outcome,
            CascadeOutcome::Completed(CascadeReport {
                applications_declined: 2,
                interviews_canceled: 2,
            })
        );

        let a1 = apps.find_by_id("a1").await.unwrap().unwrap();
        assert_eq!(a1.status, ApplicationStatus::Declined);
        assert_eq!(a1.declined_reason.as_deref(), Some(JOB_CLOSED_REASON));
        let a4 = apps.find_by_id("a4").await.unwrap().unwrap();
        assert_eq!(a4.status, ApplicationStatus::Applied);

        let rerun = coordinator.on_job_closed("job-1").await;
        assert_eq!(rerun.report(), CascadeReport::default());
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_steps() {
        let (apps, interviews, coordinator) = setup();
        apps.put(application("a1", "u1", "job-1", ApplicationStatus::Applied));
        interviews.put(interview("i1", "job-1", InterviewStatus::Scheduled));
        apps.set_fail_bulk(true);

        let outcome = coordinator.on_job_closed("job-1").await;
        assert!(!outcome.is_complete());
        assert_eq!(outcome.report().interviews_canceled, 1);
        assert_eq!(outcome.report().applications_declined, 0);

        apps.set_fail_bulk(false);
        let retry = coordinator.on_job_closed("job-1").await;
        assert_eq!(
            retry,
            CascadeOutcome::Completed(CascadeReport {
                applications_declined: 1,
                interviews_canceled: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_offer_cascade_cancels_only_interviews() {
        let (apps, interviews, coordinator) = setup();
        apps.put(application("a1", "u1", "job-1", ApplicationStatus::Interview));
        interviews.put(interview("i1", "job-1", InterviewStatus::Scheduled));
        interviews.put(interview("i2", "job-2", InterviewStatus::Scheduled));

        let outcome = coordinator.on_offer_issued("job-1").await;
        assert_eq!(outcome.report().interviews_canceled, 1);
        assert_eq!(
            apps.find_by_id("a1").await.unwrap().unwrap().status,
            ApplicationStatus::Interview
        );
        assert_eq!(
            interviews.find_by_id("i2").await.unwrap().unwrap().status,
            InterviewStatus::Scheduled
        );
    }
}
