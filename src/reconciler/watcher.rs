//! Pod watcher
//!
//! Subscribes to pod events across all namespaces and queues every added or
//! modified pod that passes the eligibility check. Other event kinds and
//! undecodable payloads are logged and skipped.
//!
//! A failed initial subscription is fatal. When an established stream ends
//! (the API server closes watches routinely) the watcher re-subscribes with
//! capped exponential backoff; the resync sweep covers anything missed meanwhile.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};

use super::backoff::Backoff;
use super::context::ReconcileContext;
use super::queue::WorkSender;
use crate::core::models::ResourceEvent;
use crate::core::ports::EventStream;
use crate::core::services::Eligibility;
use crate::error::{AgentError, QueueClosed};
use crate::shutdown::Shutdown;

/// What the watcher did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The pod was queued
    Enqueued,
    /// The pod failed the eligibility check
    Ineligible(Eligibility),
    /// The event kind is not acted upon
    Ignored,
}

/// Forwards eligible pods from the change stream to the work queue
#[derive(Debug, Clone)]
pub struct ResourceWatcher {
    ctx: Arc<ReconcileContext>,
    queue: WorkSender,
    reconnect: Backoff,
}

impl ResourceWatcher {
    /// Create a watcher feeding `queue`
    #[must_use]
    pub fn new(ctx: Arc<ReconcileContext>, queue: WorkSender) -> Self {
        Self {
            ctx,
            queue,
            reconnect: Backoff::default(),
        }
    }

    /// Replace the re-subscription backoff
    #[must_use]
    pub const fn with_reconnect_backoff(mut self, backoff: Backoff) -> Self {
        self.reconnect = backoff;
        self
    }

    /// Establish the subscription
    pub async fn subscribe(self) -> Result<Subscription, AgentError> {
        let stream = self.ctx.store().watch().await.map_err(AgentError::Subscribe)?;
        info!("Watching pods in all namespaces");
        Ok(Subscription {
            watcher: self,
            stream,
        })
    }

    /// Act on one event
    pub async fn handle_event(&self, event: ResourceEvent) -> Result<EventDisposition, QueueClosed> {
        let kind = event.kind();
        match event {
            ResourceEvent::Added(pod) | ResourceEvent::Modified(pod) => {
                debug!("Type: {kind}");
                let verdict = self.ctx.offer(pod, &self.queue).await?;
                Ok(if verdict.is_eligible() {
                    EventDisposition::Enqueued
                } else {
                    EventDisposition::Ineligible(verdict)
                })
            },
            ResourceEvent::Error(message) => {
                warn!("Type: {kind}: {message}");
                Ok(EventDisposition::Ignored)
            },
            ResourceEvent::Deleted(_) | ResourceEvent::Bookmark { .. } => {
                debug!("Type: {kind}");
                Ok(EventDisposition::Ignored)
            },
        }
    }

    /// Re-establish the stream after it ended; `None` once shutdown is requested
    async fn resubscribe(&self, shutdown: &mut Shutdown, attempts: &mut u32) -> Option<EventStream> {
        loop {
            *attempts = attempts.saturating_add(1);
            let delay = self.reconnect.delay_for_attempt(*attempts);
            warn!("Pod watch stream ended; re-subscribing in {delay:?}");
            tokio::select! {
                () = shutdown.wait() => return None,
                () = tokio::time::sleep(delay) => {},
            }
            match self.ctx.store().watch().await {
                Ok(stream) => {
                    info!("Re-established pod watch");
                    return Some(stream);
                },
                Err(err) => warn!("Failed to re-establish pod watch: {err}"),
            }
        }
    }
}

/// An established watch, ready to run
pub struct Subscription {
    watcher: ResourceWatcher,
    stream: EventStream,
}

impl Subscription {
    /// Process events until shutdown or until the queue closes
    pub async fn run(mut self, mut shutdown: Shutdown) {
        let mut reconnects = 0_u32;
        loop {
            let next = tokio::select! {
                () = shutdown.wait() => break,
                next = self.stream.next() => next,
            };
            match next {
                Some(Ok(event)) => {
                    reconnects = 0;
                    if self.watcher.handle_event(event).await.is_err() {
                        warn!("Work queue closed; stopping pod watcher");
                        break;
                    }
                },
                Some(Err(err)) => warn!("Skipping unreadable watch event: {err}"),
                None => match self.watcher.resubscribe(&mut shutdown, &mut reconnects).await {
                    Some(stream) => self.stream = stream,
                    None => break,
                },
            }
        }
        info!("Pod watcher stopped");
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("watcher", &self.watcher).finish_non_exhaustive()
    }
}
