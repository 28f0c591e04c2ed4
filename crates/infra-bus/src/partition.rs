// Keyed partition workers
// Messages with the same key land on the same worker and are handled one at a time, in arrival order.

use hireflow_core::error::{AppError, Result};
use hireflow_core::port::{InboundMessage, MessageHandler};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default number of partition workers
pub const DEFAULT_PARTITIONS: usize = 8;

struct Envelope {
    handler: Arc<dyn MessageHandler>,
    message: InboundMessage,
}

/// Fixed partition for `key` out of `partitions`
pub fn partition_for(key: &str, partitions: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % partitions.max(1) as u64) as usize
}

/// Pool of sequential workers, one unbounded queue each
///
/// Queues are unbounded so a handler that publishes back onto the bus can never block on its own
/// partition.
pub struct PartitionedDispatcher {
    senders: RwLock<Vec<mpsc::UnboundedSender<Envelope>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl PartitionedDispatcher {
    pub fn start(partitions: usize) -> Self {
        let partitions = partitions.max(1);
        let mut senders = Vec::with_capacity(partitions);
        let mut workers = Vec::with_capacity(partitions);

        for partition in 0..partitions {
            let (tx, rx) = mpsc::unbounded_channel();
            senders.push(tx);
            workers.push(tokio::spawn(run_worker(partition, rx)));
        }
        debug!(partitions, "Partition workers started");

        Self {
            senders: RwLock::new(senders),
            workers: Mutex::new(workers),
        }
    }

    /// Queue `message` for `handler` on the partition owning its key
    ///
    /// Keyless messages are partitioned by topic.
    pub async fn dispatch(
        &self,
        handler: Arc<dyn MessageHandler>,
        message: InboundMessage,
    ) -> Result<()> {
        let senders = self.senders.read().await;
        if senders.is_empty() {
            return Err(AppError::Transport("dispatcher is shut down".to_string()));
        }
        let key = message.key.as_deref().unwrap_or(&message.topic);
        let partition = partition_for(key, senders.len());
        senders[partition]
            .send(Envelope { handler, message })
            .map_err(|_| AppError::Transport(format!("partition {} is closed", partition)))
    }

    /// Close the queues and wait until every queued message has been handled
    pub async fn shutdown(&self) {
        self.senders.write().await.clear();
        let workers = std::mem::take(&mut *self.workers.lock().await);
        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "Partition worker terminated abnormally");
            }
        }
        debug!("Partition workers stopped");
    }
}

async fn run_worker(partition: usize, mut rx: mpsc::UnboundedReceiver<Envelope>) {
    while let Some(Envelope { handler, message }) = rx.recv().await {
        if let Err(e) = handler.handle(message.clone()).await {
            warn!(
                partition,
                topic = %message.topic,
                key = ?message.key,
                error = %e,
                "Message handler failed"
            );
        }
    }
}
