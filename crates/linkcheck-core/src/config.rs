//! Checker configuration.
//!
//! Defaults are the reference sizing (3 workers, queue of 100, 100ms pacing,
//! 15s probe timeout). `from_env` lets deployments override them.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_WORKERS: usize = 3;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_DATA_FILE: &str = "tasks_data.json";

pub const ENV_WORKERS: &str = "LINKCHECK_WORKERS";
pub const ENV_QUEUE_CAPACITY: &str = "LINKCHECK_QUEUE_CAPACITY";
pub const ENV_PACING_MS: &str = "LINKCHECK_PACING_MS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "LINKCHECK_PROBE_TIMEOUT_SECS";
pub const ENV_DATA_FILE: &str = "LINKCHECK_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Work queue capacity; submissions block once it is full.
    pub queue_capacity: usize,
    /// Pause between two links of the same batch.
    pub pacing: Duration,
    /// Timeout for one HEAD probe.
    pub probe_timeout: Duration,
    /// Backing file of the status store.
    pub data_file: PathBuf,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pacing: DEFAULT_PACING,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl CheckerConfig {
    /// Defaults overridden by `LINKCHECK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workers) = parse_var::<usize>(&lookup, ENV_WORKERS)? {
            config.workers = workers;
        }
        if let Some(capacity) = parse_var::<usize>(&lookup, ENV_QUEUE_CAPACITY)? {
            config.queue_capacity = capacity;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_PACING_MS)? {
            config.pacing = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_PROBE_TIMEOUT_SECS)? {
            config.probe_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(ENV_DATA_FILE).filter(|p| !p.trim().is_empty()) {
            config.data_file = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Worker count and queue capacity must be at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_WORKERS,
                value: self.workers.to_string(),
                reason: "at least one worker is required".into(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_QUEUE_CAPACITY,
                value: self.queue_capacity.to_string(),
                reason: "queue capacity must be positive".into(),
            });
        }
        Ok(())
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}
