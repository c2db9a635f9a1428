//! Error types
//!
//! Startup failures propagate to the binary and terminate the process. Steady-state
//! failures (`StoreError` during a single annotation attempt) only end that work item.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading facts from the provider
#[derive(Debug, Error)]
pub enum FactError {
    /// Transport-level failure (connection refused, DNS, TLS)
    #[error("request to fact provider failed: {0}")]
    Http(String),

    /// The provider did not answer in time
    #[error("fact provider timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a non-2xx status
    #[error("fact provider returned HTTP {0}")]
    Status(u16),

    /// The payload could not be decoded into facts
    #[error("malformed fact payload: {0}")]
    Malformed(String),
}

/// Errors returned by a resource store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The resource does not exist (anymore)
    #[error("not found: {0}")]
    NotFound(String),

    /// The write raced another modification of the same resource
    #[error("conflict: {0}")]
    Conflict(String),

    /// A payload from the store did not have the expected shape
    #[error("malformed object: {0}")]
    Malformed(String),

    /// Any other API or transport failure
    #[error("api error: {0}")]
    Api(String),

    /// Cluster credentials could not be loaded or used
    #[error("credentials error: {0}")]
    Credentials(String),
}

impl StoreError {
    /// Whether the error reports an update conflict
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `AgentConfig`
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name
        key: String,
        /// Raw value that failed to parse
        value: String,
    },

    /// The resulting configuration is unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The work queue has no consumers left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("work queue is closed")]
pub struct QueueClosed;

/// Top-level agent errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// A resource store call failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The watch subscription could not be established
    #[error("failed to subscribe to pod events: {0}")]
    Subscribe(#[source] StoreError),

    /// The work queue closed underneath a producer
    #[error(transparent)]
    QueueClosed(#[from] QueueClosed),

    /// The liveness listener could not be started
    #[error("liveness listener: {0}")]
    Liveness(String),

    /// A worker kept panicking beyond its restart budget
    #[error("annotation worker {worker} failed {restarts} times within the restart window")]
    WorkerFailing {
        /// Worker slot id
        worker: usize,
        /// Restarts counted inside the window
        restarts: u32,
    },

    /// A background task could not be joined
    #[error("background task failed: {0}")]
    Task(String),
}
