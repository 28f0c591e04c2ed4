// Expiry Scheduler
// Periodic bulk expiry of interviews nobody answered

use crate::application::constants::{DEFAULT_EXPIRY_GRACE, DEFAULT_EXPIRY_INTERVAL};
use crate::application::shutdown::ShutdownToken;
use crate::domain::InterviewStatus;
use crate::error::Result;
use crate::port::{InterviewFilter, InterviewStore, StatusUpdate, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Sweep cadence and staleness rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryConfig {
    pub interval: Duration,
    pub grace_period: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_EXPIRY_INTERVAL,
            grace_period: DEFAULT_EXPIRY_GRACE,
        }
    }
}

/// Expires `scheduled` interviews whose time passed more than the grace period ago
///
/// One task, one timer: a sweep runs to completion before the next tick is taken and missed
/// ticks are skipped, so sweeps never overlap.
pub struct ExpiryScheduler {
    interviews: Arc<dyn InterviewStore>,
    time_provider: Arc<dyn TimeProvider>,
    config: ExpiryConfig,
    shutdown: ShutdownToken,
}

impl ExpiryScheduler {
    pub fn new(
        interviews: Arc<dyn InterviewStore>,
        time_provider: Arc<dyn TimeProvider>,
        config: ExpiryConfig,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            interviews,
            time_provider,
            config,
            shutdown,
        }
    }

    /// Spawn the sweep loop
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Sweep loop (returns on shutdown)
    pub async fn run(self) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            grace_secs = self.config.grace_period.as_secs(),
            "Expiry scheduler started"
        );

        let mut tick = interval(self.config.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown = self.shutdown.clone();

        loop {
            if shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        error!(error = %e, "Interview expiry sweep failed, retrying next tick");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Expiry scheduler stopped");
    }

    /// One bulk conditional update; returns the number of interviews expired
    pub async fn sweep_once(&self) -> Result<u64> {
        let grace_millis = i64::try_from(self.config.grace_period.as_millis()).unwrap_or(i64::MAX);
        let threshold = self.time_provider.now_millis().saturating_sub(grace_millis);

        let expired = self
            .interviews
            .update_many(
                &InterviewFilter::overdue(threshold),
                &StatusUpdate::new(InterviewStatus::Expired, self.time_provider.now_millis()),
            )
            .await?;

        if expired > 0 {
            info!(expired, threshold, "Expired overdue interviews");
        }
        Ok(expired)
    }
}
