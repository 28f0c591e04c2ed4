// JobApplication lifecycle use cases

use crate::application::cascade::{CascadeCoordinator, CascadeResult};
use crate::application::constants::{CONDITIONAL_UPDATE_ATTEMPTS, OFFER_DECLINED_REASON};
use crate::application::gateway::OutboundEvents;
use crate::domain::validation::{require_text, validate_id};
use crate::domain::{
    ApplicationOutcome, ApplicationStatus, ApplicationSubmission, DomainError, JobApplication,
    JobStatus, OutboundEvent, OutboundTopic, RejectionReason, StatusMachine, Transition,
    TransitionError,
};
use crate::error::{AppError, Result};
use crate::port::{ApplicationFilter, ApplicationStore, IdProvider, JobStore, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Column set a conditional application write owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplicationWrite {
    Status,
    Comment,
}

/// Apply-for-job request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub user_id: String,
    pub job_id: String,
    #[serde(flatten)]
    pub submission: ApplicationSubmission,
}

/// Statuses a company may set directly through `change_status`
pub const COMPANY_TARGETS: [ApplicationStatus; 4] = [
    ApplicationStatus::InReview,
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Interview,
    ApplicationStatus::Declined,
];

pub struct JobApplicationService {
    applications: Arc<dyn ApplicationStore>,
    jobs: Arc<dyn JobStore>,
    cascade: Arc<CascadeCoordinator>,
    events: Arc<OutboundEvents>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        jobs: Arc<dyn JobStore>,
        cascade: Arc<CascadeCoordinator>,
        events: Arc<OutboundEvents>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            applications,
            jobs,
            cascade,
            events,
            id_provider,
            time_provider,
        }
    }

    /// Submit an application (`pending`) to a live job
    pub async fn apply(&self, req: ApplyRequest) -> Result<JobApplication> {
        validate_id("user", &req.user_id)?;
        validate_id("job", &req.job_id)?;

        let job = self
            .jobs
            .find_by_id(&req.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("job", &req.job_id))?;
        if job.status != JobStatus::Live {
            return Err(AppError::Validation(format!(
                "job {} is not accepting applications",
                job.id
            )));
        }

        let application = JobApplication::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            req.user_id,
            job.id,
            job.company_profile_id,
            job.details.title,
            req.submission,
        )?;
        self.applications.insert(&application).await?;
        info!(
            application_id = %application.id,
            job_id = %application.job_id,
            user_id = %application.user_id,
            "Application submitted"
        );

        self.events.emit(OutboundEvent::applied(&application)).await;
        Ok(application)
    }

    /// Apply the payment/profile check result (`pending -> applied | failed`)
    pub async fn mark_application_outcome(
        &self,
        application_id: &str,
        outcome: ApplicationOutcome,
        reason: Option<String>,
    ) -> Result<JobApplication> {
        let (target, reason) = match outcome {
            ApplicationOutcome::Accepted => (ApplicationStatus::Applied, None),
            ApplicationOutcome::Rejected => (ApplicationStatus::Failed, reason),
        };
        let (application, transition) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.transition_to(target, reason.clone(), now)
            })
            .await?;
        if transition == Transition::Apply {
            info!(
                application_id = %application.id,
                status = %application.status,
                "Application outcome applied"
            );
        }
        Ok(application)
    }

    /// Company-driven pipeline move (`in-review`, `shortlisted`, `interview`, `declined`)
    pub async fn change_status(
        &self,
        application_id: &str,
        target: ApplicationStatus,
        reason: Option<String>,
    ) -> Result<JobApplication> {
        if !COMPANY_TARGETS.contains(&target) {
            return Err(AppError::Validation(format!(
                "status '{}' cannot be set directly",
                target
            )));
        }
        let (application, transition) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.transition_to(target, reason.clone(), now)
            })
            .await?;
        if transition == Transition::Apply {
            info!(
                application_id = %application.id,
                status = %application.status,
                "Application status changed"
            );
        }
        Ok(application)
    }

    /// Company read of an application; the first read of an `applied` one moves it to
    /// `in-review` and notifies the applicant once
    pub async fn view_application(&self, application_id: &str) -> Result<JobApplication> {
        let (application, transition) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                if app.status == ApplicationStatus::Applied {
                    app.transition_to(ApplicationStatus::InReview, None, now)
                } else {
                    Ok(Transition::NoOp)
                }
            })
            .await?;
        if transition == Transition::Apply {
            info!(application_id = %application.id, "Application viewed");
            self.events.emit(OutboundEvent::viewed(&application)).await;
        }
        Ok(application)
    }

    /// Store a reviewer comment (status unchanged)
    pub async fn add_comment(&self, application_id: &str, text: &str) -> Result<JobApplication> {
        let text = require_text("comment", text)?;
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Comment, |app, now| {
                app.add_comment(&text, now).map(|_| Transition::Apply)
            })
            .await?;
        info!(application_id = %application.id, "Reviewer comment added");

        if let Some(event) = OutboundEvent::resume_commented(&application) {
            self.events.emit(event).await;
        }
        Ok(application)
    }

    /// `failed -> pending`, re-emitting job-applied
    pub async fn retry_application(&self, application_id: &str) -> Result<JobApplication> {
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.retry(now).map(|_| Transition::Apply)
            })
            .await?;
        info!(application_id = %application.id, "Application resubmitted");

        self.events.emit(OutboundEvent::applied(&application)).await;
        Ok(application)
    }

    /// Applicant-initiated `non-terminal -> withdrawn`
    pub async fn withdraw_application(
        &self,
        application_id: &str,
        reason: Option<String>,
    ) -> Result<JobApplication> {
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.transition_to(ApplicationStatus::Withdrawn, reason.clone(), now)
            })
            .await?;
        info!(application_id = %application.id, "Application withdrawn");
        Ok(application)
    }

    /// `interview -> offered` with the offer-letter reference, then end the job's interviews
    ///
    /// A redelivered offer (already `offered`) re-runs the interview cascade, which only touches
    /// interviews still open, but emits nothing.
    pub async fn offer_job(
        &self,
        application_id: &str,
        offer_letter: &str,
    ) -> Result<CascadeResult<JobApplication>> {
        let offer_letter = require_text("offer_letter", offer_letter)?;
        let (application, transition) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                let transition = app.transition_to(ApplicationStatus::Offered, None, now)?;
                if transition == Transition::Apply {
                    app.offer_letter = Some(offer_letter.clone());
                }
                Ok(transition)
            })
            .await?;

        if transition == Transition::Apply {
            info!(application_id = %application.id, job_id = %application.job_id, "Offer issued");
            self.events
                .emit(OutboundEvent::offer(
                    OutboundTopic::JobOffered,
                    &application,
                    self.time_provider.now_millis(),
                ))
                .await;
        }

        let cascade = self.cascade.on_offer_issued(&application.job_id).await;
        Ok(CascadeResult {
            entity: application,
            cascade,
        })
    }

    /// Applicant accepts the offer (`offered -> hired`)
    pub async fn accept_offer(&self, application_id: &str) -> Result<JobApplication> {
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.transition_to(ApplicationStatus::Hired, None, now)
            })
            .await?;
        info!(application_id = %application.id, "Offer accepted");

        self.events
            .emit(OutboundEvent::offer(
                OutboundTopic::JobOfferAccepted,
                &application,
                self.time_provider.now_millis(),
            ))
            .await;
        Ok(application)
    }

    /// Applicant declines the offer (`offered -> declined`)
    pub async fn decline_offer(
        &self,
        application_id: &str,
        reason: Option<String>,
    ) -> Result<JobApplication> {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| OFFER_DECLINED_REASON.to_string());
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                if app.status != ApplicationStatus::Offered {
                    let rejection = if app.status.is_terminal() {
                        RejectionReason::TerminalState
                    } else {
                        RejectionReason::IllegalTransition
                    };
                    return Err(TransitionError::new(
                        ApplicationStatus::ENTITY,
                        app.status,
                        ApplicationStatus::Declined,
                        rejection,
                    )
                    .into());
                }
                app.transition_to(ApplicationStatus::Declined, Some(reason.clone()), now)
            })
            .await?;
        info!(application_id = %application.id, "Offer declined");

        self.events
            .emit(OutboundEvent::offer(
                OutboundTopic::JobOfferRejected,
                &application,
                self.time_provider.now_millis(),
            ))
            .await;
        Ok(application)
    }

    /// `shortlisted -> interview` when an interview is booked (no-op if already there)
    pub(crate) async fn move_to_interview(&self, application_id: &str) -> Result<JobApplication> {
        let (application, _) = self
            .transition_with(application_id, ApplicationWrite::Status, |app, now| {
                app.transition_to(ApplicationStatus::Interview, None, now)
            })
            .await?;
        Ok(application)
    }

    pub async fn get_application(&self, application_id: &str) -> Result<JobApplication> {
        validate_id("application", application_id)?;
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::not_found("application", application_id))
    }

    pub async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<JobApplication>> {
        self.applications.find_by_filter(filter).await
    }

    /// Read, mutate, conditionally write the columns of `write`
    async fn transition_with<F>(
        &self,
        application_id: &str,
        write: ApplicationWrite,
        mutate: F,
    ) -> Result<(JobApplication, Transition)>
    where
        F: Fn(&mut JobApplication, i64) -> std::result::Result<Transition, DomainError>,
    {
        for attempt in 1..=CONDITIONAL_UPDATE_ATTEMPTS {
            let mut application = self.get_application(application_id).await?;
            let expected = application.status;

            let transition = mutate(&mut application, self.time_provider.now_millis())?;
            if transition == Transition::NoOp {
                debug!(application_id = %application_id, status = %expected, "Application transition is a no-op");
                return Ok((application, transition));
            }
            let written = match write {
                ApplicationWrite::Status => {
                    self.applications
                        .update_status_if(&application, expected)
                        .await?
                }
                ApplicationWrite::Comment => {
                    self.applications
                        .update_comment_if(&application, expected)
                        .await?
                }
            };
            if written {
                return Ok((application, transition));
            }
            debug!(application_id = %application_id, attempt, "Application changed concurrently, re-reading");
        }
        Err(AppError::Conflict(format!(
            "application {} kept changing",
            application_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::TestHarness;
    use crate::port::application_store::mocks::InMemoryApplicationStore;
    use crate::port::StatusUpdate;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Application store whose next read, once armed, waits until released
    struct PausingStore {
        inner: Arc<InMemoryApplicationStore>,
        gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
    }

    impl PausingStore {
        /// Returns (read happened, release)
        fn arm(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (read_tx, read_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            *self.gate.lock().unwrap() = Some((read_tx, release_rx));
            (read_rx, release_tx)
        }
    }

    #[async_trait]
    impl ApplicationStore for PausingStore {
        async fn insert(&self, application: &JobApplication) -> Result<()> {
            self.inner.insert(application).await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<JobApplication>> {
            let found = self.inner.find_by_id(id).await?;
            let gate = self.gate.lock().unwrap().take();
            if let Some((read, release)) = gate {
                let _ = read.send(());
                let _ = release.await;
            }
            Ok(found)
        }

        async fn find_by_filter(&self, filter: &ApplicationFilter) -> Result<Vec<JobApplication>> {
            self.inner.find_by_filter(filter).await
        }

        async fn update_status_if(
            &self,
            application: &JobApplication,
            expected: ApplicationStatus,
        ) -> Result<bool> {
            self.inner.update_status_if(application, expected).await
        }

        async fn update_comment_if(
            &self,
            application: &JobApplication,
            expected: ApplicationStatus,
        ) -> Result<bool> {
            self.inner.update_comment_if(application, expected).await
        }

        async fn update_many(
            &self,
            filter: &ApplicationFilter,
            update: &StatusUpdate<ApplicationStatus>,
        ) -> Result<u64> {
            self.inner.update_many(filter, update).await
        }
    }

    #[tokio::test]
    async fn test_comment_survives_status_change_that_read_before_it() {
        let mut pausing = None;
        let h = TestHarness::with_application_port(|inner| {
            let store = Arc::new(PausingStore {
                inner,
                gate: Mutex::new(None),
            });
            pausing = Some(Arc::clone(&store));
            store as Arc<dyn ApplicationStore>
        });
        let pausing = pausing.unwrap();
        let app = h.applied_application("user-1").await;

        // The review reads the applied record, then stalls before writing
        let (read, release) = pausing.arm();
        let apps = Arc::clone(&h.orchestrator.applications);
        let id = app.id.clone();
        let review = tokio::spawn(async move {
            apps.change_status(&id, ApplicationStatus::InReview, None)
                .await
        });
        read.await.unwrap();

        let commented = h
            .orchestrator
            .applications
            .add_comment(&app.id, "strong resume")
            .await
            .unwrap();
        assert!(commented.comment.is_some());

        release.send(()).unwrap();
        let reviewed = review.await.unwrap().unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::InReview);

        let stored = h.application_store.find_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::InReview);
        assert_eq!(stored.comment.unwrap().text, "strong resume");
    }

    #[tokio::test]
    async fn test_apply_requires_live_job() {
        let h = TestHarness::new();
        let job = h.create_job().await;
        let err = h
            .orchestrator
            .applications
            .apply(TestHarness::apply_request("user-1", &job.id))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not accepting applications"));

        assert!(matches!(
            h.orchestrator
                .applications
                .apply(TestHarness::apply_request("user-1", "missing-job"))
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_snapshots_job_and_emits() {
        let h = TestHarness::new();
        let job = h.live_job().await;
        let app = h.apply(&job.id, "user-1").await;

        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.job_role, job.details.title);
        assert_eq!(app.company_profile_id, job.company_profile_id);

        let applied = h.publisher.on_topic("job-applied");
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].key, app.id);
        assert_eq!(applied[0].json()["user_id"], "user-1");
    }

    #[tokio::test]
    async fn test_duplicate_application_until_withdrawn() {
        let h = TestHarness::new();
        let job = h.live_job().await;
        let first = h.apply(&job.id, "user-1").await;
        let apps = &h.orchestrator.applications;

        assert!(matches!(
            apps.apply(TestHarness::apply_request("user-1", &job.id)).await,
            Err(AppError::DuplicateEntity(_))
        ));

        apps.withdraw_application(&first.id, None).await.unwrap();
        let second = apps
            .apply(TestHarness::apply_request("user-1", &job.id))
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_withdrawn_rejects_stale_outcome() {
        let h = TestHarness::new();
        let job = h.live_job().await;
        let app = h.apply(&job.id, "user-1").await;
        let apps = &h.orchestrator.applications;
        apps.withdraw_application(&app.id, Some("found another job".into()))
            .await
            .unwrap();

        match apps
            .mark_application_outcome(&app.id, ApplicationOutcome::Accepted, None)
            .await
        {
            Err(AppError::InvalidTransition(e)) => {
                assert_eq!(e.reason, RejectionReason::TerminalState)
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(apps.withdraw_application(&app.id, None).await.is_err());
    }

    #[tokio::test]
    async fn test_change_status_restricted_targets() {
        let h = TestHarness::new();
        let app = h.applied_application("user-1").await;
        let apps = &h.orchestrator.applications;

        assert!(matches!(
            apps.change_status(&app.id, ApplicationStatus::Hired, None)
                .await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            apps.change_status(&app.id, ApplicationStatus::Shortlisted, None)
                .await,
            Err(AppError::InvalidTransition(_))
        ));
        assert!(matches!(
            apps.change_status(&app.id, ApplicationStatus::Declined, None)
                .await,
            Err(AppError::Validation(_))
        ));

        let reviewed = apps
            .change_status(&app.id, ApplicationStatus::InReview, None)
            .await
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::InReview);
    }

    #[tokio::test]
    async fn test_view_moves_to_review_once() {
        let h = TestHarness::new();
        let app = h.applied_application("user-1").await;
        let apps = &h.orchestrator.applications;

        let viewed = apps.view_application(&app.id).await.unwrap();
        assert_eq!(viewed.status, ApplicationStatus::InReview);
        apps.view_application(&app.id).await.unwrap();

        let events = h.publisher.on_topic("job-application-viewed");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].json()["company_id"], app.company_profile_id.as_str());
    }

    #[tokio::test]
    async fn test_add_comment_emits() {
        let h = TestHarness::new();
        let app = h.applied_application("user-1").await;
        let commented = h
            .orchestrator
            .applications
            .add_comment(&app.id, "strong systems background")
            .await
            .unwrap();
        assert_eq!(commented.status, ApplicationStatus::Applied);

        let events = h.publisher.on_topic("resume-commented");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].json()["comment"], "strong systems background");
    }

    #[tokio::test]
    async fn test_retry_application_reemits_applied() {
        let h = TestHarness::new();
        let job = h.live_job().await;
        let app = h.apply(&job.id, "user-1").await;
        let apps = &h.orchestrator.applications;
        apps.mark_application_outcome(&app.id, ApplicationOutcome::Rejected, Some("card".into()))
            .await
            .unwrap();

        let retried = apps.retry_application(&app.id).await.unwrap();
        assert_eq!(retried.status, ApplicationStatus::Pending);
        assert_eq!(retried.failed_reason, None);
        assert_eq!(h.publisher.on_topic("job-applied").len(), 2);
    }

    #[tokio::test]
    async fn test_offer_accept_flow() {
        let h = TestHarness::new();
        let app = h.interviewing_application("user-1").await;
        let apps = &h.orchestrator.applications;

        let offered = apps.offer_job(&app.id, "offers/letter.pdf").await.unwrap();
        assert_eq!(offered.entity.status, ApplicationStatus::Offered);
        assert_eq!(offered.entity.offer_letter.as_deref(), Some("offers/letter.pdf"));
        assert_eq!(offered.cascade.report().interviews_canceled, 1);

        let hired = apps.accept_offer(&app.id).await.unwrap();
        assert_eq!(hired.status, ApplicationStatus::Hired);

        let offers = h.publisher.on_topic("job-offered");
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].json()["applicantId"], "user-1");
        assert_eq!(h.publisher.on_topic("job-offer-accepted").len(), 1);
    }

    #[tokio::test]
    async fn test_redelivered_offer_emits_once() {
        let h = TestHarness::new();
        let app = h.interviewing_application("user-1").await;
        let apps = &h.orchestrator.applications;

        apps.offer_job(&app.id, "letter").await.unwrap();
        let again = apps.offer_job(&app.id, "letter").await.unwrap();
        assert_eq!(again.cascade.report().interviews_canceled, 0);
        assert_eq!(h.publisher.on_topic("job-offered").len(), 1);
    }

    #[tokio::test]
    async fn test_decline_offer_default_reason() {
        let h = TestHarness::new();
        let app = h.interviewing_application("user-1").await;
        let apps = &h.orchestrator.applications;

        assert!(matches!(
            apps.decline_offer(&app.id, None).await,
            Err(AppError::InvalidTransition(_))
        ));

        apps.offer_job(&app.id, "letter").await.unwrap();
        let declined = apps.decline_offer(&app.id, None).await.unwrap();
        assert_eq!(declined.status, ApplicationStatus::Declined);
        assert_eq!(declined.declined_reason.as_deref(), Some(OFFER_DECLINED_REASON));
        assert_eq!(h.publisher.on_topic("job-offer-rejected").len(), 1);
    }

    #[tokio::test]
    async fn test_list_applications_by_job_and_status() {
        let h = TestHarness::new();
        let job = h.live_job().await;
        let first = h.apply(&job.id, "user-1").await;
        h.apply(&job.id, "user-2").await;
        let apps = &h.orchestrator.applications;
        apps.withdraw_application(&first.id, None).await.unwrap();

        let all = apps
            .list_applications(&ApplicationFilter::for_job(&job.id))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let open = apps
            .list_applications(
                &ApplicationFilter::for_job(&job.id).with_statuses([ApplicationStatus::Pending]),
            )
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].user_id, "user-2");
    }
}
