//! Supervised worker pool
//!
//! Each worker slot runs its worker in a task of its own. A panicking worker is
//! restarted after a backoff; a slot that exceeds its restart budget within the
//! window stops the pool with `AgentError::WorkerFailing`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::task::{JoinHandle, JoinSet};

use super::backoff::Backoff;
use super::context::ReconcileContext;
use super::queue::WorkReceiver;
use super::worker::Worker;
use crate::error::AgentError;
use crate::shutdown::Shutdown;

/// Restart budget for a worker slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Restarts tolerated inside `window`
    pub max_restarts: u32,
    /// Sliding window for counting restarts
    pub window: Duration,
    /// Delay before each restart
    pub backoff: Backoff,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_restarts: 5,
            window: Duration::from_secs(60),
            backoff: Backoff::new(Duration::from_millis(100), Duration::from_secs(5)),
        }
    }
}

/// Restarts seen inside the sliding window
#[derive(Debug)]
struct RestartTracker {
    window: Duration,
    history: VecDeque<Instant>,
}

impl RestartTracker {
    const fn new(window: Duration) -> Self {
        Self {
            window,
            history: VecDeque::new(),
        }
    }

    /// Record a restart at `now`; returns the count inside the window
    fn record(&mut self, now: Instant) -> u32 {
        self.history.push_back(now);
        while self
            .history
            .front()
            .is_some_and(|at| now.saturating_duration_since(*at) > self.window)
        {
            self.history.pop_front();
        }
        u32::try_from(self.history.len()).unwrap_or(u32::MAX)
    }
}

/// Aborts the wrapped task when dropped
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A fixed number of supervised annotation workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
    policy: RestartPolicy,
}

impl WorkerPool {
    /// Pool of `size` workers with the default restart policy
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            policy: RestartPolicy::default(),
        }
    }

    /// Replace the restart policy
    #[must_use]
    pub const fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every worker until the queue closes or shutdown is requested
    ///
    /// Returns early with an error when a worker slot exhausts its restart budget.
    pub async fn run(
        self,
        ctx: Arc<ReconcileContext>,
        queue: WorkReceiver,
        shutdown: Shutdown,
    ) -> Result<(), AgentError> {
        info!("Starting {} annotation workers", self.size);
        let mut slots = JoinSet::new();
        for id in 0..self.size {
            slots.spawn(supervise(
                id,
                Arc::clone(&ctx),
                queue.clone(),
                shutdown.clone(),
                self.policy,
            ));
        }

        while let Some(joined) = slots.join_next().await {
            match joined {
                Ok(Ok(())) => {},
                Ok(Err(err)) => {
                    error!("{err}; stopping annotation workers");
                    slots.abort_all();
                    return Err(err);
                },
                Err(err) => {
                    slots.abort_all();
                    return Err(AgentError::Task(err.to_string()));
                },
            }
        }
        Ok(())
    }
}

async fn supervise(
    id: usize,
    ctx: Arc<ReconcileContext>,
    queue: WorkReceiver,
    shutdown: Shutdown,
    policy: RestartPolicy,
) -> Result<(), AgentError> {
    let mut tracker = RestartTracker::new(policy.window);
    loop {
        let worker = Worker::new(id, Arc::clone(&ctx));
        let mut task = AbortOnDrop(tokio::spawn(worker.run(queue.clone(), shutdown.clone())));

        match (&mut task.0).await {
            Ok(()) => return Ok(()),
            Err(err) if err.is_panic() => {
                let restarts = tracker.record(Instant::now());
                if restarts > policy.max_restarts {
                    return Err(AgentError::WorkerFailing {
                        worker: id,
                        restarts,
                    });
                }
                let delay = policy.backoff.delay_for_attempt(restarts);
                warn!(
                    "Annotation worker {id} panicked; restarting in {delay:?} \
                     ({restarts} restarts in the last {:?})",
                    policy.window
                );
                tokio::time::sleep(delay).await;
            },
            Err(err) => {
                debug!("Annotation worker {id} cancelled: {err}");
                return Ok(());
            },
        }
    }
}
