// Event Transport Port
// Keyed publish/subscribe with at-least-once delivery and per-key ordering

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Message delivered to a subscription handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub key: Option<String>,
    pub payload: Vec<u8>,
}

/// Handles messages of one subscribed topic
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: InboundMessage) -> Result<()>;
}

/// Topic/handler pair registered with the transport
#[derive(Clone)]
pub struct Subscription {
    pub topic: String,
    pub handler: Arc<dyn MessageHandler>,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            topic: topic.into(),
            handler,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

/// Publishing half of the transport
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` to `topic`; `key` selects the ordering partition
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()>;
}

/// Full transport: connection lifecycle plus subscriptions
#[async_trait]
pub trait EventTransport: EventPublisher {
    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    /// Register several topic/handler pairs together
    async fn subscribe(&self, subscriptions: Vec<Subscription>) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PublishedMessage {
        pub topic: String,
        pub key: String,
        pub payload: Vec<u8>,
    }

    impl PublishedMessage {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.payload).unwrap_or(serde_json::Value::Null)
        }
    }

    /// Records every publish; can be switched to fail
    #[derive(Default)]
    pub struct RecordingPublisher {
        published: Mutex<Vec<PublishedMessage>>,
        fail: AtomicBool,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn published(&self) -> Vec<PublishedMessage> {
            self.published.lock().unwrap().clone()
        }

        pub fn on_topic(&self, topic: &str) -> Vec<PublishedMessage> {
            self.published()
                .into_iter()
                .filter(|m| m.topic == topic)
                .collect()
        }

        pub fn clear(&self) {
            self.published.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Transport(format!("publish to {} failed", topic)));
            }
            self.published.lock().unwrap().push(PublishedMessage {
                topic: topic.to_string(),
                key: key.to_string(),
                payload,
            });
            Ok(())
        }
    }
}
