// Shared fixtures for application-layer unit tests

use crate::application::interview_service::ScheduleInterviewRequest;
use crate::application::job_application_service::ApplyRequest;
use crate::application::job_service::CreateJobRequest;
use crate::application::orchestrator::{Orchestrator, Ports};
use crate::domain::{
    ApplicationOutcome, ApplicationStatus, ApplicationSubmission, CatalogEntry, CatalogKind,
    ContactDetails, Interview, InterviewSlot, InterviewType, Job, JobApplication, JobDetails,
    SalaryRange, ValidationOutcome,
};
use crate::error::Result;
use crate::port::application_store::mocks::InMemoryApplicationStore;
use crate::port::catalog_store::mocks::InMemoryCatalogStore;
use crate::port::event_transport::mocks::RecordingPublisher;
use crate::port::id_provider::mocks::SequentialIdProvider;
use crate::port::interview_store::mocks::InMemoryInterviewStore;
use crate::port::job_store::mocks::InMemoryJobStore;
use crate::port::time_provider::mocks::ManualClock;
use crate::port::{ApplicationStore, TimeProvider};
use std::sync::Arc;

pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Catalog entries every harness starts with; ids match `job_request`
pub const SEEDED_CATALOG: [(CatalogKind, &str, &str); 3] = [
    (CatalogKind::Category, "engineering", "engineering"),
    (CatalogKind::Skill, "rust", "rust"),
    (CatalogKind::Skill, "sql", "sql"),
];

pub struct TestHarness {
    pub orchestrator: Orchestrator,
    pub publisher: Arc<RecordingPublisher>,
    pub clock: Arc<ManualClock>,
    pub job_store: Arc<InMemoryJobStore>,
    pub application_store: Arc<InMemoryApplicationStore>,
    pub interview_store: Arc<InMemoryInterviewStore>,
    pub catalog_store: Arc<InMemoryCatalogStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_application_port(|store| store as Arc<dyn ApplicationStore>)
    }

    /// Same wiring, with the services reaching the application store through `wrap`
    pub fn with_application_port<F>(wrap: F) -> Self
    where
        F: FnOnce(Arc<InMemoryApplicationStore>) -> Arc<dyn ApplicationStore>,
    {
        let publisher = Arc::new(RecordingPublisher::new());
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let job_store = Arc::new(InMemoryJobStore::new());
        let application_store = Arc::new(InMemoryApplicationStore::new());
        let interview_store = Arc::new(InMemoryInterviewStore::new());
        let catalog_store = Arc::new(InMemoryCatalogStore::new());
        for (kind, id, name) in SEEDED_CATALOG {
            catalog_store.put(CatalogEntry::new(id, START_MILLIS, kind, name, true).unwrap());
        }

        let orchestrator = Orchestrator::new(Ports {
            jobs: job_store.clone(),
            applications: wrap(application_store.clone()),
            interviews: interview_store.clone(),
            catalog: catalog_store.clone(),
            publisher: publisher.clone(),
            id_provider: Arc::new(SequentialIdProvider::new("id")),
            time_provider: clock.clone(),
        });

        Self {
            orchestrator,
            publisher,
            clock,
            job_store,
            application_store,
            interview_store,
            catalog_store,
        }
    }

    pub fn job_request() -> CreateJobRequest {
        CreateJobRequest {
            user_id: "owner-1".to_string(),
            company_profile_id: "company-1".to_string(),
            details: JobDetails {
                title: "backend engineer".to_string(),
                employment_types: ["full-time".to_string()].into_iter().collect(),
                salary_range: Some(SalaryRange { min: 100, max: 150 }),
                categories: vec!["engineering".to_string()],
                skills: vec!["rust".to_string(), "sql".to_string()],
                description: "Own the hiring platform backend".to_string(),
                responsibilities: None,
                who_you_are: None,
                nice_to_haves: None,
            },
        }
    }

    pub fn apply_request(user_id: &str, job_id: &str) -> ApplyRequest {
        ApplyRequest {
            user_id: user_id.to_string(),
            job_id: job_id.to_string(),
            submission: ApplicationSubmission {
                contact: ContactDetails {
                    full_name: "Grace Hopper".to_string(),
                    email: "grace@example.com".to_string(),
                    phone: None,
                },
                resume: "resumes/grace.pdf".to_string(),
                cover_letter: None,
            },
        }
    }

    pub fn in_one_hour(&self) -> i64 {
        self.clock.now_millis() + 3_600_000
    }

    pub async fn create_job(&self) -> Job {
        self.orchestrator
            .jobs
            .create_job(Self::job_request())
            .await
            .unwrap()
    }

    pub async fn live_job(&self) -> Job {
        let job = self.create_job().await;
        self.orchestrator
            .jobs
            .mark_validation_outcome(&job.id, ValidationOutcome::Success, None)
            .await
            .unwrap()
    }

    pub async fn apply(&self, job_id: &str, user_id: &str) -> JobApplication {
        self.orchestrator
            .applications
            .apply(Self::apply_request(user_id, job_id))
            .await
            .unwrap()
    }

    /// Application in `applied` on a fresh live job
    pub async fn applied_application(&self, user_id: &str) -> JobApplication {
        let job = self.live_job().await;
        let app = self.apply(&job.id, user_id).await;
        self.orchestrator
            .applications
            .mark_application_outcome(&app.id, ApplicationOutcome::Accepted, None)
            .await
            .unwrap()
    }

    pub async fn shortlisted_application(&self, user_id: &str) -> JobApplication {
        let app = self.applied_application(user_id).await;
        let apps = &self.orchestrator.applications;
        apps.change_status(&app.id, ApplicationStatus::InReview, None)
            .await
            .unwrap();
        apps.change_status(&app.id, ApplicationStatus::Shortlisted, None)
            .await
            .unwrap()
    }

    /// Application in `interview` with one scheduled interview
    pub async fn interviewing_application(&self, user_id: &str) -> JobApplication {
        let app = self.shortlisted_application(user_id).await;
        self.schedule(&app.id, "hr-1", self.in_one_hour())
            .await
            .unwrap();
        self.orchestrator
            .applications
            .get_application(&app.id)
            .await
            .unwrap()
    }

    pub async fn schedule(
        &self,
        application_id: &str,
        interviewer_id: &str,
        scheduled_time: i64,
    ) -> Result<Interview> {
        self.orchestrator
            .interviews
            .schedule_interview(ScheduleInterviewRequest {
                application_id: application_id.to_string(),
                slot: InterviewSlot {
                    interviewer_id: interviewer_id.to_string(),
                    scheduled_time,
                    interview_type: InterviewType::Online,
                    description: None,
                },
            })
            .await
    }
}
