// In-process EventTransport
// Single-node deployments and tests: publish hands the message straight to the partition workers.

use crate::partition::PartitionedDispatcher;
use async_trait::async_trait;
use hireflow_core::error::{AppError, Result};
use hireflow_core::port::{
    EventPublisher, EventTransport, InboundMessage, MessageHandler, Subscription,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub struct InProcessBus {
    partitions: usize,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn MessageHandler>>>>,
    dispatcher: RwLock<Option<PartitionedDispatcher>>,
}

impl InProcessBus {
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions,
            handlers: RwLock::new(HashMap::new()),
            dispatcher: RwLock::new(None),
        }
    }
}

#[async_trait]
impl EventPublisher for InProcessBus {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()> {
        let dispatcher = self.dispatcher.read().await;
        let dispatcher = dispatcher
            .as_ref()
            .ok_or_else(|| AppError::Transport("in-process bus is not connected".to_string()))?;

        let handlers = self
            .handlers
            .read()
            .await
            .get(topic)
            .cloned()
            .unwrap_or_default();
        if handlers.is_empty() {
            debug!(topic, key, "No subscribers, message dropped");
            return Ok(());
        }

        for handler in handlers {
            let message = InboundMessage {
                topic: topic.to_string(),
                key: Some(key.to_string()),
                payload: payload.clone(),
            };
            dispatcher.dispatch(handler, message).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventTransport for InProcessBus {
    async fn connect(&self) -> Result<()> {
        let mut dispatcher = self.dispatcher.write().await;
        if dispatcher.is_none() {
            *dispatcher = Some(PartitionedDispatcher::start(self.partitions));
            info!(partitions = self.partitions, "In-process bus connected");
        }
        Ok(())
    }

    /// Drains queued messages before returning
    async fn disconnect(&self) -> Result<()> {
        let dispatcher = self.dispatcher.write().await.take();
        if let Some(dispatcher) = dispatcher {
            dispatcher.shutdown().await;
            info!("In-process bus disconnected");
        }
        Ok(())
    }

    async fn subscribe(&self, subscriptions: Vec<Subscription>) -> Result<()> {
        let mut handlers = self.handlers.write().await;
        for subscription in subscriptions {
            debug!(topic = %subscription.topic, "Subscribed");
            handlers
                .entry(subscription.topic)
                .or_default()
                .push(subscription.handler);
        }
        Ok(())
    }
}
