// Port Layer - Interfaces for external dependencies

pub mod application_store;
pub mod catalog_store;
pub mod event_transport;
pub mod id_provider; // For deterministic testing
pub mod interview_store;
pub mod job_store;
pub mod status_update;
pub mod time_provider;

// Re-exports
pub use application_store::{ApplicationFilter, ApplicationStore};
pub use catalog_store::{CatalogFilter, CatalogStore};
pub use event_transport::{
    EventPublisher, EventTransport, InboundMessage, MessageHandler, Subscription,
};
pub use id_provider::IdProvider;
pub use interview_store::{InterviewFilter, InterviewStore};
pub use job_store::{JobFilter, JobStore};
pub use status_update::StatusUpdate;
pub use time_provider::TimeProvider;
