//! Agent configuration
//!
//! Defaults, optionally overlaid by a TOML file named in `PODFACTS_CONFIG`,
//! then by individual environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reconciler::{Backoff, ReconcilerSettings, RestartPolicy};

/// Path of an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "PODFACTS_CONFIG";
/// Fact provider URL
pub const FACTS_URL_ENV: &str = "CAT_FACTS_URL";
/// Kubeconfig location
pub const KUBECONFIG_ENV: &str = "KUBE_CONFIGS";
/// Number of annotation workers
pub const WORKERS_ENV: &str = "PODFACTS_WORKERS";
/// Work queue capacity
pub const QUEUE_CAPACITY_ENV: &str = "PODFACTS_QUEUE_CAPACITY";
/// Seconds between resync sweeps
pub const RESYNC_ENV: &str = "PODFACTS_RESYNC_SECS";
/// Annotation marker key
pub const ANNOTATION_KEY_ENV: &str = "PODFACTS_ANNOTATION_KEY";
/// Fact fetch timeout in seconds
pub const FETCH_TIMEOUT_ENV: &str = "PODFACTS_FETCH_TIMEOUT_SECS";
/// Liveness listener address
pub const LIVENESS_ADDR_ENV: &str = "PODFACTS_LIVENESS_ADDR";

/// Complete agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// URL of the fact corpus
    pub facts_url: String,
    /// Kubeconfig path; a leading `~` is expanded
    pub kubeconfig: String,
    /// Number of annotation workers
    pub workers: usize,
    /// Capacity of the work queue
    pub queue_capacity: usize,
    /// Seconds between resync sweeps
    pub resync_interval_secs: u64,
    /// Annotation key whose presence means "already enriched"
    pub annotation_key: String,
    /// Timeout for the fact fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Address of the liveness listener
    pub liveness_addr: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            facts_url: "http://cat-fact.herokuapp.com/facts".to_string(),
            kubeconfig: "~/.kube/config".to_string(),
            workers: 3,
            queue_capacity: 10,
            resync_interval_secs: 10,
            annotation_key: "cat-fact".to_string(),
            fetch_timeout_secs: 5,
            liveness_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AgentConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        Self::from_lookup(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load from an optional file and an environment lookup
    pub fn from_lookup<F>(file: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(FACTS_URL_ENV) {
            self.facts_url = value;
        }
        if let Some(value) = lookup(KUBECONFIG_ENV) {
            self.kubeconfig = value;
        }
        if let Some(value) = lookup(ANNOTATION_KEY_ENV) {
            self.annotation_key = value;
        }
        if let Some(value) = lookup(LIVENESS_ADDR_ENV) {
            self.liveness_addr = value;
        }
        if let Some(value) = lookup(WORKERS_ENV) {
            self.workers = parse_value(WORKERS_ENV, &value)?;
        }
        if let Some(value) = lookup(QUEUE_CAPACITY_ENV) {
            self.queue_capacity = parse_value(QUEUE_CAPACITY_ENV, &value)?;
        }
        if let Some(value) = lookup(RESYNC_ENV) {
            self.resync_interval_secs = parse_value(RESYNC_ENV, &value)?;
        }
        if let Some(value) = lookup(FETCH_TIMEOUT_ENV) {
            self.fetch_timeout_secs = parse_value(FETCH_TIMEOUT_ENV, &value)?;
        }
        Ok(())
    }

    /// Reject configurations the agent cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1".to_string()));
        }
        if self.resync_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "resync_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.annotation_key.trim().is_empty() {
            return Err(ConfigError::Invalid("annotation_key must not be empty".to_string()));
        }
        if self.facts_url.trim().is_empty() {
            return Err(ConfigError::Invalid("facts_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Kubeconfig path with `~` expanded
    #[must_use]
    pub fn kubeconfig_path(&self) -> PathBuf {
        expand_home(&self.kubeconfig)
    }

    /// Period of the resync sweep
    #[must_use]
    pub const fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }

    /// Timeout for the fact fetch
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Settings for the reconciler built from this config
    #[must_use]
    pub fn reconciler_settings(&self) -> ReconcilerSettings {
        ReconcilerSettings {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            resync_interval: self.resync_interval(),
            restart_policy: RestartPolicy::default(),
            reconnect_backoff: Backoff::default(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Expand a leading `~` to the home directory
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_default();
    if path == "~" {
        home()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home().join(rest)
    } else {
        PathBuf::from(path)
    }
}
