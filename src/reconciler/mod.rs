//! Reconciliation core
//!
//! Two producers (the pod watcher and the resync sweeper) feed one bounded queue.
//! A supervised pool of workers drains it and is the only component that writes.
//!
//! - [`queue`] - Bounded MPMC work queue
//! - [`worker`] - Recheck, copy, annotate, replace
//! - [`pool`] - Worker supervision and restart policy
//! - [`watcher`] - Event-driven producer
//! - [`sweeper`] - Periodic full-list producer

mod backoff;
mod context;
pub mod pool;
pub mod queue;
pub mod sweeper;
pub mod watcher;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use tokio::task::{JoinHandle, JoinSet};

pub use backoff::Backoff;
pub use context::ReconcileContext;
pub use pool::{RestartPolicy, WorkerPool};
pub use queue::{WorkReceiver, WorkSender};
pub use sweeper::{ResyncSweeper, SweepReport};
pub use watcher::{EventDisposition, ResourceWatcher, Subscription};
pub use worker::{AnnotationOutcome, Worker};

use crate::error::AgentError;
use crate::shutdown::Shutdown;

/// Tunables of the reconciliation core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerSettings {
    /// Number of annotation workers
    pub workers: usize,
    /// Capacity of the work queue
    pub queue_capacity: usize,
    /// Period of the resync sweep
    pub resync_interval: Duration,
    /// Restart budget per worker slot
    pub restart_policy: RestartPolicy,
    /// Backoff between watch re-subscriptions
    pub reconnect_backoff: Backoff,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            workers: 3,
            queue_capacity: 10,
            resync_interval: Duration::from_secs(10),
            restart_policy: RestartPolicy::default(),
            reconnect_backoff: Backoff::default(),
        }
    }
}

/// Wires the watcher, the sweeper and the worker pool around one queue
#[derive(Debug)]
pub struct Reconciler {
    ctx: Arc<ReconcileContext>,
    settings: ReconcilerSettings,
}

impl Reconciler {
    /// Create a reconciler over `ctx`
    #[must_use]
    pub fn new(ctx: ReconcileContext, settings: ReconcilerSettings) -> Self {
        Self {
            ctx: Arc::new(ctx),
            settings,
        }
    }

    /// Start every component
    ///
    /// Workers start first. A failed watch subscription is returned as an error
    /// and nothing is left running.
    pub async fn start(self, shutdown: Shutdown) -> Result<ReconcilerHandle, AgentError> {
        let (queue, receiver) = queue::bounded(self.settings.queue_capacity);

        let pool = WorkerPool::new(self.settings.workers)
            .with_restart_policy(self.settings.restart_policy);
        let workers = tokio::spawn(pool.run(Arc::clone(&self.ctx), receiver, shutdown.clone()));

        let subscription = ResourceWatcher::new(Arc::clone(&self.ctx), queue.clone())
            .with_reconnect_backoff(self.settings.reconnect_backoff)
            .subscribe()
            .await;
        let subscription = match subscription {
            Ok(subscription) => subscription,
            Err(err) => {
                workers.abort();
                return Err(err);
            },
        };
        let mut producers = JoinSet::new();
        producers.spawn(subscription.run(shutdown.clone()));

        let sweeper = ResyncSweeper::new(self.ctx, queue, self.settings.resync_interval);
        producers.spawn(sweeper.run(shutdown));

        info!(
            "Reconciler running: {} workers, queue capacity {}, resync every {:?}",
            self.settings.workers, self.settings.queue_capacity, self.settings.resync_interval
        );
        Ok(ReconcilerHandle { workers, producers })
    }
}

/// Handles of the running components
#[derive(Debug)]
pub struct ReconcilerHandle {
    workers: JoinHandle<Result<(), AgentError>>,
    producers: JoinSet<()>,
}

impl ReconcilerHandle {
    /// Wait for every component to stop
    ///
    /// Returns early when the worker pool fails or a producer (watcher or sweeper)
    /// dies; everything still running is aborted then.
    pub async fn wait(self) -> Result<(), AgentError> {
        let Self {
            mut workers,
            mut producers,
        } = self;
        loop {
            tokio::select! {
                pool = &mut workers => {
                    let pool = pool.map_err(|e| AgentError::Task(e.to_string())).and_then(|r| r);
                    if pool.is_err() {
                        producers.abort_all();
                        return pool;
                    }
                    while let Some(joined) = producers.join_next().await {
                        joined.map_err(|e| AgentError::Task(e.to_string()))?;
                    }
                    return Ok(());
                },
                Some(joined) = producers.join_next() => {
                    if let Err(err) = joined {
                        error!("Producer task died: {err}; stopping reconciler");
                        workers.abort();
                        producers.abort_all();
                        return Err(AgentError::Task(err.to_string()));
                    }
                },
            }
        }
    }
}
