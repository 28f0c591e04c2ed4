// NATS EventTransport
// Topics map 1:1 onto subjects; the partition key travels in a message header. Subscriptions use a
// queue group so several daemon instances share the inbound load.

use crate::partition::PartitionedDispatcher;
use async_nats::HeaderMap;
use async_trait::async_trait;
use futures::StreamExt;
use hireflow_core::error::{AppError, Result};
use hireflow_core::port::{EventPublisher, EventTransport, InboundMessage, Subscription};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Header carrying the partition/ordering key
pub const KEY_HEADER: &str = "Hireflow-Key";

#[derive(Debug, Clone)]
pub struct NatsConfig {
    pub url: String,
    pub queue_group: String,
    pub partitions: usize,
}

pub struct NatsBus {
    config: NatsConfig,
    client: RwLock<Option<async_nats::Client>>,
    dispatcher: RwLock<Option<Arc<PartitionedDispatcher>>>,
    readers: Mutex<Vec<JoinHandle<()>>>,
}

impl NatsBus {
    pub fn new(config: NatsConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            dispatcher: RwLock::new(None),
            readers: Mutex::new(Vec::new()),
        }
    }

    async fn client(&self) -> Result<async_nats::Client> {
        self.client
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Transport("NATS bus is not connected".to_string()))
    }
}

/// Partition key from the message headers, if the publisher set one
pub(crate) fn key_from_headers(headers: Option<&HeaderMap>) -> Option<String> {
    headers
        .and_then(|h| h.get(KEY_HEADER))
        .map(|value| value.as_str().to_string())
}

#[async_trait]
impl EventPublisher for NatsBus {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> Result<()> {
        let client = self.client().await?;
        let mut headers = HeaderMap::new();
        headers.insert(KEY_HEADER, key);

        client
            .publish_with_headers(topic.to_string(), headers, payload.into())
            .await
            .map_err(|e| AppError::Transport(format!("publish to {} failed: {}", topic, e)))?;
        Ok(())
    }
}

#[async_trait]
impl EventTransport for NatsBus {
    async fn connect(&self) -> Result<()> {
        let mut client = self.client.write().await;
        if client.is_some() {
            return Ok(());
        }

        let connected = async_nats::connect(self.config.url.as_str())
            .await
            .map_err(|e| {
                AppError::Transport(format!("connect to {} failed: {}", self.config.url, e))
            })?;
        *client = Some(connected);
        *self.dispatcher.write().await =
            Some(Arc::new(PartitionedDispatcher::start(self.config.partitions)));

        info!(url = %self.config.url, queue_group = %self.config.queue_group, "NATS bus connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        for reader in std::mem::take(&mut *self.readers.lock().await) {
            reader.abort();
        }
        let dispatcher = self.dispatcher.write().await.take();
        if let Some(dispatcher) = dispatcher {
            dispatcher.shutdown().await;
        }

        let client = self.client.write().await.take();
        if let Some(client) = client {
            if let Err(e) = client.flush().await {
                warn!(error = %e, "NATS flush on disconnect failed");
            }
            info!("NATS bus disconnected");
        }
        Ok(())
    }

    async fn subscribe(&self, subscriptions: Vec<Subscription>) -> Result<()> {
        let client = self.client().await?;
        let dispatcher = self
            .dispatcher
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Transport("NATS bus is not connected".to_string()))?;

        let mut readers = self.readers.lock().await;
        for subscription in subscriptions {
            let mut subscriber = client
                .queue_subscribe(subscription.topic.clone(), self.config.queue_group.clone())
                .await
                .map_err(|e| {
                    AppError::Transport(format!(
                        "subscribe to {} failed: {}",
                        subscription.topic, e
                    ))
                })?;
            debug!(topic = %subscription.topic, "Subscribed");

            let dispatcher = Arc::clone(&dispatcher);
            readers.push(tokio::spawn(async move {
                while let Some(message) = subscriber.next().await {
                    let inbound = InboundMessage {
                        topic: message.subject.to_string(),
                        key: key_from_headers(message.headers.as_ref()),
                        payload: message.payload.to_vec(),
                    };
                    if let Err(e) = dispatcher
                        .dispatch(Arc::clone(&subscription.handler), inbound)
                        .await
                    {
                        warn!(topic = %subscription.topic, error = %e, "Dropping inbound message");
                    }
                }
                debug!(topic = %subscription.topic, "Subscription closed");
            }));
        }
        Ok(())
    }
}
