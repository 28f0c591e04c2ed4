// Lifecycle Orchestrator - explicit wiring of services around a set of ports

use crate::application::cascade::CascadeCoordinator;
use crate::application::catalog_service::CatalogService;
use crate::application::expiry::{ExpiryConfig, ExpiryScheduler};
use crate::application::gateway::{EventGateway, OutboundEvents};
use crate::application::interview_service::InterviewService;
use crate::application::job_application_service::JobApplicationService;
use crate::application::job_service::JobService;
use crate::application::shutdown::ShutdownToken;
use crate::port::{
    ApplicationStore, CatalogStore, EventPublisher, IdProvider, InterviewStore, JobStore,
    TimeProvider,
};
use std::sync::Arc;

/// Adapters the core runs against (built once by the composition root)
#[derive(Clone)]
pub struct Ports {
    pub jobs: Arc<dyn JobStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub interviews: Arc<dyn InterviewStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub publisher: Arc<dyn EventPublisher>,
    pub id_provider: Arc<dyn IdProvider>,
    pub time_provider: Arc<dyn TimeProvider>,
}

/// Every use-case service, wired with explicit constructor dependencies
pub struct Orchestrator {
    pub jobs: Arc<JobService>,
    pub applications: Arc<JobApplicationService>,
    pub interviews: Arc<InterviewService>,
    pub catalog: Arc<CatalogService>,
    pub cascade: Arc<CascadeCoordinator>,
    pub gateway: Arc<EventGateway>,
    ports: Ports,
}

impl Orchestrator {
    pub fn new(ports: Ports) -> Self {
        let events = Arc::new(OutboundEvents::new(Arc::clone(&ports.publisher)));
        let cascade = Arc::new(CascadeCoordinator::new(
            Arc::clone(&ports.applications),
            Arc::clone(&ports.interviews),
            Arc::clone(&ports.time_provider),
        ));

        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&ports.catalog),
            Arc::clone(&ports.id_provider),
            Arc::clone(&ports.time_provider),
        ));

        let jobs = Arc::new(JobService::new(
            Arc::clone(&ports.jobs),
            Arc::clone(&catalog),
            Arc::clone(&cascade),
            Arc::clone(&events),
            Arc::clone(&ports.id_provider),
            Arc::clone(&ports.time_provider),
        ));
        let applications = Arc::new(JobApplicationService::new(
            Arc::clone(&ports.applications),
            Arc::clone(&ports.jobs),
            Arc::clone(&cascade),
            Arc::clone(&events),
            Arc::clone(&ports.id_provider),
            Arc::clone(&ports.time_provider),
        ));
        let interviews = Arc::new(InterviewService::new(
            Arc::clone(&ports.interviews),
            Arc::clone(&applications),
            Arc::clone(&events),
            Arc::clone(&ports.id_provider),
            Arc::clone(&ports.time_provider),
        ));
        let gateway = Arc::new(EventGateway::new(
            Arc::clone(&jobs),
            Arc::clone(&applications),
        ));

        Self {
            jobs,
            applications,
            interviews,
            catalog,
            cascade,
            gateway,
            ports,
        }
    }

    /// Expiry scheduler over the same interview store
    pub fn expiry_scheduler(&self, config: ExpiryConfig, shutdown: ShutdownToken) -> ExpiryScheduler {
        ExpiryScheduler::new(
            Arc::clone(&self.ports.interviews),
            Arc::clone(&self.ports.time_provider),
            config,
            shutdown,
        )
    }
}
