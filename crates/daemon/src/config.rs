//! Daemon settings
//!
//! Built-in defaults overridden by `HIREFLOW_*` environment variables
//! (e.g. `HIREFLOW_DATABASE_URL`, `HIREFLOW_TRANSPORT=nats`, `HIREFLOW_EXPIRY_GRACE_SECS=300`).

use config::{Config, Environment};
use hireflow_core::application::ExpiryConfig;
use hireflow_core::error::{AppError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "HIREFLOW";
const DEFAULT_DATABASE_URL: &str = "~/.hireflow/hireflow.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;
const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";
const DEFAULT_QUEUE_GROUP: &str = "hireflow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    InProcess,
    Nats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub transport: TransportKind,
    pub nats_url: String,
    pub nats_queue_group: String,
    pub bus_partitions: usize,
    pub expiry_interval_secs: u64,
    pub expiry_grace_secs: u64,
    pub log_format: LogFormat,
}

impl Settings {
    /// Defaults + process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_from(env: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)
            .and_then(|b| b.set_default("rpc_host", DEFAULT_RPC_HOST))
            .and_then(|b| b.set_default("rpc_port", DEFAULT_RPC_PORT as i64))
            .and_then(|b| b.set_default("transport", "in-process"))
            .and_then(|b| b.set_default("nats_url", DEFAULT_NATS_URL))
            .and_then(|b| b.set_default("nats_queue_group", DEFAULT_QUEUE_GROUP))
            .and_then(|b| {
                b.set_default("bus_partitions", hireflow_infra_bus::DEFAULT_PARTITIONS as i64)
            })
            .and_then(|b| {
                b.set_default(
                    "expiry_interval_secs",
                    ExpiryConfig::default().interval.as_secs() as i64,
                )
            })
            .and_then(|b| {
                b.set_default(
                    "expiry_grace_secs",
                    ExpiryConfig::default().grace_period.as_secs() as i64,
                )
            })
            .and_then(|b| b.set_default("log_format", "pretty"))
            .map_err(|e| AppError::Config(e.to_string()))?
            .add_source(env.try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.bus_partitions == 0 {
            return Err(AppError::Config("bus_partitions must be at least 1".into()));
        }
        if self.expiry_interval_secs == 0 {
            return Err(AppError::Config(
                "expiry_interval_secs must be at least 1".into(),
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("database_url must not be empty".into()));
        }
        Ok(())
    }

    pub fn expiry(&self) -> ExpiryConfig {
        ExpiryConfig {
            interval: Duration::from_secs(self.expiry_interval_secs),
            grace_period: Duration::from_secs(self.expiry_grace_secs),
        }
    }

    /// Database URL with `~` expanded, plus the directory that must exist for a file database
    pub fn resolved_database(&self) -> (String, Option<PathBuf>) {
        let url = self.database_url.trim();
        if url.contains(":memory:") {
            return (url.to_string(), None);
        }
        let (scheme, path) = match url.strip_prefix("sqlite://") {
            Some(rest) => ("sqlite://", rest),
            None => ("", url.strip_prefix("sqlite:").unwrap_or(url)),
        };
        let path = shellexpand::tilde(path).into_owned();
        let parent = PathBuf::from(&path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf());
        (format!("{}{}", scheme, path), parent)
    }
}
