// Inbound half of the event gateway: peer-service messages -> orchestrator calls

use crate::application::job_application_service::JobApplicationService;
use crate::application::job_service::JobService;
use crate::domain::{
    ApplicationOutcome, ApplicationOutcomeMessage, InboundTopic, JobValidationOutcomeMessage,
    ValidationOutcome,
};
use crate::error::{AppError, Result};
use crate::port::{InboundMessage, MessageHandler, Subscription};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Stateless translator from inbound topics to orchestrator operations
pub struct EventGateway {
    jobs: Arc<JobService>,
    applications: Arc<JobApplicationService>,
}

impl EventGateway {
    pub fn new(jobs: Arc<JobService>, applications: Arc<JobApplicationService>) -> Self {
        Self { jobs, applications }
    }

    /// One subscription per inbound topic, registered together
    pub fn subscriptions(self: &Arc<Self>) -> Vec<Subscription> {
        InboundTopic::ALL
            .into_iter()
            .map(|topic| {
                Subscription::new(
                    topic.as_str(),
                    Arc::new(TopicHandler {
                        topic,
                        gateway: Arc::clone(self),
                    }),
                )
            })
            .collect()
    }

    /// Decode one message and run the matching orchestrator call
    pub async fn dispatch(&self, topic: InboundTopic, payload: &[u8]) -> Result<()> {
        match topic {
            InboundTopic::JobValidationOutcome
            | InboundTopic::JobPostAccepted
            | InboundTopic::JobPostRejected => {
                let msg: JobValidationOutcomeMessage = serde_json::from_slice(payload)?;
                let outcome = match topic {
                    InboundTopic::JobPostAccepted => ValidationOutcome::Success,
                    InboundTopic::JobPostRejected => ValidationOutcome::Failed,
                    _ => msg.outcome.ok_or_else(|| {
                        AppError::Validation(format!("{} without outcome", topic))
                    })?,
                };
                self.jobs
                    .mark_validation_outcome(&msg.job_id, outcome, msg.reason)
                    .await?;
            }
            InboundTopic::JobApplicationOutcome
            | InboundTopic::JobApplicationAccepted
            | InboundTopic::JobApplicationRejected => {
                let msg: ApplicationOutcomeMessage = serde_json::from_slice(payload)?;
                let outcome = match topic {
                    InboundTopic::JobApplicationAccepted => ApplicationOutcome::Accepted,
                    InboundTopic::JobApplicationRejected => ApplicationOutcome::Rejected,
                    _ => msg.outcome.ok_or_else(|| {
                        AppError::Validation(format!("{} without outcome", topic))
                    })?,
                };
                self.applications
                    .mark_application_outcome(&msg.job_application_id, outcome, msg.reason)
                    .await?;
            }
        }
        Ok(())
    }

    /// Per-message error boundary: failures are logged, never propagated to the transport
    pub async fn handle_message(&self, topic: InboundTopic, message: &InboundMessage) {
        match self.dispatch(topic, &message.payload).await {
            Ok(()) => {
                debug!(topic = %topic, key = ?message.key, "Inbound event handled");
            }
            Err(e) if e.is_transient() => {
                error!(topic = %topic, key = ?message.key, error = %e, "Inbound event failed");
            }
            Err(e) => {
                warn!(topic = %topic, key = ?message.key, error = %e, "Inbound event rejected");
            }
        }
    }
}

/// Transport-facing handler bound to one topic
struct TopicHandler {
    topic: InboundTopic,
    gateway: Arc<EventGateway>,
}

#[async_trait]
impl MessageHandler for TopicHandler {
    async fn handle(&self, message: InboundMessage) -> Result<()> {
        self.gateway.handle_message(self.topic, &message).await;
        Ok(())
    }
}
