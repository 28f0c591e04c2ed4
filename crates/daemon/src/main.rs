//! Hireflow - Main Entry Point
//! Composition root: stores, transport, orchestrator, expiry scheduler and JSON-RPC server.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use config::{Settings, TransportKind};
use hireflow_api_rpc::{RpcServer, RpcServerConfig};
use hireflow_core::application::{shutdown_channel, Orchestrator, Ports};
use hireflow_core::port::id_provider::UuidProvider;
use hireflow_core::port::time_provider::SystemTimeProvider;
use hireflow_core::port::{EventPublisher, EventTransport};
use hireflow_infra_bus::{InProcessBus, NatsBus, NatsConfig};
use hireflow_infra_sqlite::{
    create_pool, run_migrations, SqliteApplicationStore, SqliteCatalogStore, SqliteInterviewStore,
    SqliteJobStore,
};
use telemetry::TelemetryStatus;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Same transport object behind both port views
fn build_transport(settings: &Settings) -> (Arc<dyn EventTransport>, Arc<dyn EventPublisher>) {
    match settings.transport {
        TransportKind::InProcess => {
            let bus = Arc::new(InProcessBus::new(settings.bus_partitions));
            let publisher: Arc<dyn EventPublisher> = bus.clone();
            let transport: Arc<dyn EventTransport> = bus;
            (transport, publisher)
        }
        TransportKind::Nats => {
            let bus = Arc::new(NatsBus::new(NatsConfig {
                url: settings.nats_url.clone(),
                queue_group: settings.nats_queue_group.clone(),
                partitions: settings.bus_partitions,
            }));
            let publisher: Arc<dyn EventPublisher> = bus.clone();
            let transport: Arc<dyn EventTransport> = bus;
            (transport, publisher)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load().context("Invalid configuration")?;

    // 2. Initialize logging
    let telemetry_status = telemetry::init_tracing(settings.log_format)?;
    info!("Hireflow v{} starting...", VERSION);
    match telemetry_status {
        TelemetryStatus::NotConfigured => {}
        TelemetryStatus::Exporting { endpoint } => {
            info!(endpoint = %endpoint, "OpenTelemetry export enabled")
        }
        TelemetryStatus::FeatureDisabled => {
            warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled")
        }
    }

    // 3. Initialize database
    let (database_url, database_dir) = settings.resolved_database();
    if let Some(dir) = database_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create database directory {}", dir.display()))?;
    }
    info!(database_url = %database_url, "Initializing database...");
    let pool = create_pool(&database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let (transport, publisher) = build_transport(&settings);
    let orchestrator = Orchestrator::new(Ports {
        jobs: Arc::new(SqliteJobStore::new(pool.clone())),
        applications: Arc::new(SqliteApplicationStore::new(pool.clone())),
        interviews: Arc::new(SqliteInterviewStore::new(pool.clone())),
        catalog: Arc::new(SqliteCatalogStore::new(pool.clone())),
        publisher,
        id_provider: Arc::new(UuidProvider),
        time_provider: Arc::new(SystemTimeProvider),
    });

    // 5. Connect the transport and register the inbound topics together
    transport.connect().await.context("Transport connect failed")?;
    transport
        .subscribe(orchestrator.gateway.subscriptions())
        .await
        .context("Subscribing inbound topics failed")?;
    info!(transport = ?settings.transport, "Event gateway subscribed");

    // 6. Start the expiry scheduler
    let (shutdown_tx, shutdown_token) = shutdown_channel();
    let expiry_handle = orchestrator
        .expiry_scheduler(settings.expiry(), shutdown_token)
        .start();

    // 7. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: settings.rpc_host.clone(),
        port: settings.rpc_port,
    };
    let (rpc_addr, rpc_handle) = RpcServer::new(rpc_config, &orchestrator)
        .start()
        .await
        .context("RPC server start failed")?;

    info!(rpc_addr = %rpc_addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 9. Graceful shutdown: stop intake first, then background work, then the transport
    if let Err(e) = rpc_handle.stop() {
        warn!(error = %e, "RPC server already stopped");
    }
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, expiry_handle)
        .await
        .is_err()
    {
        warn!("Expiry scheduler did not stop in time");
    }
    if let Err(e) = transport.disconnect().await {
        error!(error = %e, "Transport disconnect failed");
    }
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");
    Ok(())
}
