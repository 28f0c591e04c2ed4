// Domain Layer - Pure business logic and entities

pub mod application;
pub mod catalog;
pub mod error;
pub mod event;
pub mod interview;
pub mod job;
pub mod transition;
pub mod validation;

// Re-exports
pub use application::{
    ApplicationId, ApplicationStatus, ApplicationSubmission, ContactDetails, JobApplication,
    ReviewerComment,
};
pub use catalog::{CatalogEntry, CatalogKind};
pub use error::{DomainError, TransitionError};
pub use event::{
    ApplicationOutcome, ApplicationOutcomeMessage, InboundTopic, JobValidationOutcomeMessage,
    OutboundEvent, OutboundTopic, ValidationOutcome,
};
pub use interview::{Interview, InterviewId, InterviewSlot, InterviewStatus, InterviewType};
pub use job::{CompanyProfileId, Job, JobDetails, JobId, JobStatus, SalaryRange, UserId};
pub use transition::{ReasonRule, RejectionReason, StatusMachine, Transition};
