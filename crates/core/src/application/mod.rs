// Application Layer - Use Cases and Business Logic

pub mod cascade;
pub mod catalog_service;
pub mod constants;
pub mod expiry;
pub mod gateway;
pub mod interview_service;
pub mod job_application_service;
pub mod job_service;
pub mod orchestrator;
pub mod shutdown;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use cascade::{CascadeCoordinator, CascadeOutcome, CascadeReport, CascadeResult};
pub use catalog_service::{CatalogService, CreateCatalogEntryRequest, UpdateCatalogEntryRequest};
pub use expiry::{ExpiryConfig, ExpiryScheduler};
pub use gateway::{EventGateway, OutboundEvents};
pub use interview_service::{InterviewService, ScheduleInterviewRequest};
pub use job_application_service::{ApplyRequest, JobApplicationService};
pub use job_service::{CreateJobRequest, JobService};
pub use orchestrator::{Orchestrator, Ports};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
