//! Resync sweeper
//!
//! On a fixed period, lists every pod and queues each eligible one. Safe to run
//! alongside the watcher: duplicates are dropped by the workers' recheck.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use super::context::ReconcileContext;
use super::queue::WorkSender;
use crate::error::AgentError;
use crate::shutdown::Shutdown;

/// Counts from one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pods returned by the list call
    pub listed: usize,
    /// Pods queued for annotation
    pub enqueued: usize,
}

/// Periodic full-list resync
#[derive(Debug, Clone)]
pub struct ResyncSweeper {
    ctx: Arc<ReconcileContext>,
    queue: WorkSender,
    period: Duration,
}

impl ResyncSweeper {
    /// Create a sweeper running every `period`
    #[must_use]
    pub const fn new(ctx: Arc<ReconcileContext>, queue: WorkSender, period: Duration) -> Self {
        Self { ctx, queue, period }
    }

    /// List every pod and queue the eligible ones
    pub async fn sweep_once(&self) -> Result<SweepReport, AgentError> {
        let pods = self.ctx.store().list().await?;
        let mut report = SweepReport {
            listed: pods.len(),
            enqueued: 0,
        };
        for pod in pods {
            if self.ctx.offer(pod, &self.queue).await?.is_eligible() {
                report.enqueued += 1;
            }
        }
        Ok(report)
    }

    /// Sweep every period until shutdown or until the queue closes
    ///
    /// The first sweep happens one period after start. A failed list is retried next period.
    pub async fn run(self, mut shutdown: Shutdown) {
        loop {
            tokio::select! {
                () = shutdown.wait() => break,
                () = tokio::time::sleep(self.period) => {},
            }
            info!("----- Resync -----");
            match self.sweep_once().await {
                Ok(report) => info!(
                    "Resync listed {} pods, queued {}",
                    report.listed, report.enqueued
                ),
                Err(AgentError::QueueClosed(_)) => {
                    warn!("Work queue closed; stopping resync");
                    break;
                },
                Err(err) => warn!("Resync failed: {err}"),
            }
        }
        info!("Resync sweeper stopped");
    }
}
