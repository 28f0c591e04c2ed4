//! Shared end-to-end environment: SQLite stores + in-process bus + manual clock

#![allow(dead_code)]

use async_trait::async_trait;
use hireflow_core::application::{
    ApplyRequest, CreateJobRequest, Orchestrator, Ports, ScheduleInterviewRequest,
};
use hireflow_core::domain::{
    ApplicationSubmission, CatalogEntry, CatalogKind, ContactDetails, InboundTopic, Interview, InterviewSlot, InterviewType,
    JobDetails, OutboundTopic,
};
use hireflow_core::port::id_provider::UuidProvider;
use hireflow_core::port::time_provider::mocks::ManualClock;
use hireflow_core::port::{
    CatalogStore, EventPublisher, EventTransport, InboundMessage, MessageHandler, Subscription,
    TimeProvider,
};
use hireflow_core::Result;
use hireflow_infra_bus::InProcessBus;
use hireflow_infra_sqlite::{
    create_pool, run_migrations, SqliteApplicationStore, SqliteCatalogStore, SqliteInterviewStore,
    SqliteJobStore,
};
use std::sync::{Arc, Mutex};

pub const START: i64 = 1_700_000_000_000;
pub const HOUR: i64 = 3_600_000;

/// Re-evaluate `$check` (may contain `.await`) until it holds; bus delivery is asynchronous
macro_rules! eventually {
    ($what:expr, $check:expr) => {{
        let mut satisfied = false;
        for _ in 0..200 {
            if $check {
                satisfied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(satisfied, "timed out waiting for {}", $what);
    }};
}

/// Subscribed to every outbound topic; records what peers would receive
#[derive(Default)]
pub struct OutboundCollector {
    messages: Mutex<Vec<InboundMessage>>,
}

#[async_trait]
impl MessageHandler for OutboundCollector {
    async fn handle(&self, message: InboundMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

impl OutboundCollector {
    pub fn on_topic(&self, topic: OutboundTopic) -> Vec<serde_json::Value> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.topic == topic.as_str())
            .map(|m| serde_json::from_slice(&m.payload).unwrap())
            .collect()
    }

    pub fn count(&self, topic: OutboundTopic) -> usize {
        self.on_topic(topic).len()
    }
}

pub struct TestEnv {
    pub orchestrator: Orchestrator,
    pub bus: Arc<InProcessBus>,
    pub clock: Arc<ManualClock>,
    pub outbound: Arc<OutboundCollector>,
}

impl TestEnv {
    pub async fn start() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        // Entries referenced by `job_request`
        let catalog = SqliteCatalogStore::new(pool.clone());
        for (kind, id) in [(CatalogKind::Category, "engineering"), (CatalogKind::Skill, "rust")] {
            let entry = CatalogEntry::new(id, START, kind, id, true).unwrap();
            catalog.insert(&entry).await.unwrap();
        }

        let bus = Arc::new(InProcessBus::new(4));
        let clock = Arc::new(ManualClock::new(START));
        let publisher: Arc<dyn EventPublisher> = bus.clone();
        let orchestrator = Orchestrator::new(Ports {
            jobs: Arc::new(SqliteJobStore::new(pool.clone())),
            applications: Arc::new(SqliteApplicationStore::new(pool.clone())),
            interviews: Arc::new(SqliteInterviewStore::new(pool)),
            catalog: Arc::new(catalog),
            publisher,
            id_provider: Arc::new(UuidProvider),
            time_provider: clock.clone(),
        });

        let outbound = Arc::new(OutboundCollector::default());
        let collector: Arc<dyn MessageHandler> = outbound.clone();
        let mut subscriptions = orchestrator.gateway.subscriptions();
        subscriptions.extend(
            OutboundTopic::ALL
                .iter()
                .map(|topic| Subscription::new(topic.as_str(), Arc::clone(&collector))),
        );
        bus.subscribe(subscriptions).await.unwrap();
        bus.connect().await.unwrap();

        Self {
            orchestrator,
            bus,
            clock,
            outbound,
        }
    }

    /// Publish an inbound peer message onto the bus
    pub async fn deliver(&self, topic: InboundTopic, key: &str, payload: serde_json::Value) {
        self.bus
            .publish(topic.as_str(), key, serde_json::to_vec(&payload).unwrap())
            .await
            .unwrap();
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    pub async fn shutdown(&self) {
        self.bus.disconnect().await.unwrap();
    }
}

pub fn job_request(owner: &str) -> CreateJobRequest {
    CreateJobRequest {
        user_id: owner.to_string(),
        company_profile_id: "company-1".to_string(),
        details: JobDetails {
            title: "platform engineer".to_string(),
            employment_types: ["full-time".to_string()].into_iter().collect(),
            salary_range: None,
            categories: vec!["engineering".to_string()],
            skills: vec!["rust".to_string()],
            description: "Keep the hiring pipeline running".to_string(),
            responsibilities: None,
            who_you_are: None,
            nice_to_haves: None,
        },
    }
}

pub fn apply_request(user: &str, job_id: &str) -> ApplyRequest {
    ApplyRequest {
        user_id: user.to_string(),
        job_id: job_id.to_string(),
        submission: ApplicationSubmission {
            contact: ContactDetails {
                full_name: "Katherine Johnson".to_string(),
                email: format!("{}@example.com", user),
                phone: None,
            },
            resume: format!("resumes/{}.pdf", user),
            cover_letter: None,
        },
    }
}

pub fn interview_request(application_id: &str, interviewer: &str, at: i64) -> ScheduleInterviewRequest {
    ScheduleInterviewRequest {
        application_id: application_id.to_string(),
        slot: InterviewSlot {
            interviewer_id: interviewer.to_string(),
            scheduled_time: at,
            interview_type: InterviewType::Offline,
            description: Some("Onsite, building 2".to_string()),
        },
    }
}

/// Live job -> applied -> in-review -> shortlisted -> interview scheduled
pub async fn scheduled_interview(env: &TestEnv, job_id: &str, user: &str) -> Interview {
    use hireflow_core::domain::{ApplicationOutcome, ApplicationStatus};

    let apps = &env.orchestrator.applications;
    let app = apps.apply(apply_request(user, job_id)).await.unwrap();
    apps.mark_application_outcome(&app.id, ApplicationOutcome::Accepted, None)
        .await
        .unwrap();
    apps.change_status(&app.id, ApplicationStatus::InReview, None)
        .await
        .unwrap();
    apps.change_status(&app.id, ApplicationStatus::Shortlisted, None)
        .await
        .unwrap();
    env.orchestrator
        .interviews
        .schedule_interview(interview_request(&app.id, "hr-1", env.now() + HOUR))
        .await
        .unwrap()
}
