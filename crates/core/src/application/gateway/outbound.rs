// Outbound half of the event gateway: committed transitions -> keyed publishes

use crate::domain::OutboundEvent;
use crate::port::EventPublisher;
use std::sync::Arc;
use tracing::{debug, warn};

/// Publishes outbound events; failures are logged and swallowed
pub struct OutboundEvents {
    publisher: Arc<dyn EventPublisher>,
}

impl OutboundEvents {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Publish one event keyed by its entity id
    ///
    /// Returns `false` when the event could not be serialized or published. Callers never fail
    /// their own operation on that.
    pub async fn emit(&self, event: OutboundEvent) -> bool {
        let topic = event.topic();
        let payload = match event.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(topic = %topic, key = %event.key(), error = %e, "Failed to encode outbound event");
                return false;
            }
        };

        match self.publisher.publish(topic.as_str(), event.key(), payload).await {
            Ok(()) => {
                debug!(topic = %topic, key = %event.key(), "Published outbound event");
                true
            }
            Err(e) => {
                warn!(
                    topic = %topic,
                    key = %event.key(),
                    error = %e,
                    "Failed to publish outbound event"
                );
                false
            }
        }
    }
}
