//! Annotation worker
//!
//! The only code path that writes to the cluster. For each work item:
//! recheck the marker on fresh state, copy, set the marker, replace.
//! Failures end the item; the next resync sweep picks the pod up again.

use std::sync::Arc;

use log::{error, info, warn};

use super::context::ReconcileContext;
use super::queue::WorkReceiver;
use crate::core::models::WorkItem;
use crate::core::services::{annotate, has_marker};
use crate::error::StoreError;
use crate::shutdown::Shutdown;

/// Result of one annotation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationOutcome {
    /// The marker was written with this value
    Annotated {
        /// Value written
        value: String,
    },
    /// The marker was already present; nothing written
    AlreadyAnnotated,
    /// The pod no longer exists
    Gone,
    /// The fact corpus is empty; nothing written
    NoFact,
    /// Fresh state could not be read
    ReadFailed(StoreError),
    /// The write was rejected
    UpdateFailed(StoreError),
}

impl AnnotationOutcome {
    /// Whether this attempt wrote the marker
    #[must_use]
    pub const fn is_annotated(&self) -> bool {
        matches!(self, Self::Annotated { .. })
    }
}

/// One consumer of the work queue
#[derive(Debug, Clone)]
pub struct Worker {
    id: usize,
    ctx: Arc<ReconcileContext>,
}

impl Worker {
    /// Create worker number `id`
    #[must_use]
    pub const fn new(id: usize, ctx: Arc<ReconcileContext>) -> Self {
        Self { id, ctx }
    }

    /// Drain the queue until it closes or shutdown is requested
    pub async fn run(self, queue: WorkReceiver, mut shutdown: Shutdown) {
        info!("Annotation worker {} started", self.id);
        loop {
            let item = tokio::select! {
                () = shutdown.wait() => break,
                item = queue.next() => match item {
                    Some(item) => item,
                    None => break,
                },
            };
            self.process(&item).await;
        }
        info!("Annotation worker {} stopped", self.id);
    }

    /// Attempt to annotate one pod
    pub async fn process(&self, item: &WorkItem) -> AnnotationOutcome {
        let key = item.key();
        let marker = self.ctx.annotation_key();

        if has_marker(item.resource(), marker) {
            info!("Pod {key} already has a {marker} annotation");
            return AnnotationOutcome::AlreadyAnnotated;
        }

        let current = match self.ctx.store().get(&key.namespace, &key.name).await {
            Ok(pod) => pod,
            Err(StoreError::NotFound(_)) => {
                info!("Pod {key} no longer exists, skipping");
                return AnnotationOutcome::Gone;
            },
            Err(err) => {
                warn!("Worker {}: unable to read pod {key}: {err}", self.id);
                return AnnotationOutcome::ReadFailed(err);
            },
        };

        if has_marker(&current, marker) {
            info!("Pod {key} already has a {marker} annotation");
            return AnnotationOutcome::AlreadyAnnotated;
        }

        let Some(fact) = self.ctx.facts().next() else {
            warn!("Worker {}: no facts loaded, leaving {key} unannotated", self.id);
            return AnnotationOutcome::NoFact;
        };
        let value = fact.text.clone();
        let updated = annotate(&current, marker, &value);

        match self.ctx.store().update(&key.namespace, &updated).await {
            Ok(_) => {
                info!("Worker {}: set {marker} on {key} to {value:?}", self.id);
                AnnotationOutcome::Annotated { value }
            },
            Err(err) if err.is_conflict() => {
                warn!("Worker {}: pod {key} changed while annotating, leaving it to resync", self.id);
                AnnotationOutcome::UpdateFailed(err)
            },
            Err(err) => {
                error!("Worker {}: unable to update pod {key}: {err}", self.id);
                AnnotationOutcome::UpdateFailed(err)
            },
        }
    }
}
