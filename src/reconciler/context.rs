//! Shared reconciliation context
//!
//! Created once at startup and handed to every component.

use std::fmt;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Pod;
use log::{debug, info};

use super::queue::WorkSender;
use crate::core::models::{ResourceKey, WorkItem, pod_phase};
use crate::core::ports::ResourceStore;
use crate::core::services::{Eligibility, check_eligibility};
use crate::error::QueueClosed;
use crate::facts::FactSource;

/// What every component needs: the store, the facts and the marker key
#[derive(Clone)]
pub struct ReconcileContext {
    store: Arc<dyn ResourceStore>,
    facts: Arc<FactSource>,
    annotation_key: String,
}

impl ReconcileContext {
    /// Create a context
    pub fn new(
        store: Arc<dyn ResourceStore>,
        facts: Arc<FactSource>,
        annotation_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            facts,
            annotation_key: annotation_key.into(),
        }
    }

    /// The resource store
    #[must_use]
    pub fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }

    /// The fact source
    #[must_use]
    pub fn facts(&self) -> &FactSource {
        &self.facts
    }

    /// The annotation marker key
    #[must_use]
    pub fn annotation_key(&self) -> &str {
        &self.annotation_key
    }

    /// Queue the pod if it passes the eligibility check
    ///
    /// Waits while the queue is full.
    pub async fn offer(&self, pod: Pod, queue: &WorkSender) -> Result<Eligibility, QueueClosed> {
        let verdict = check_eligibility(&pod, &self.annotation_key);
        match verdict {
            Eligibility::Eligible => {
                info!(
                    "Queueing {} for annotation (phase {})",
                    ResourceKey::of(&pod),
                    pod_phase(&pod).unwrap_or("unknown")
                );
                queue.submit(WorkItem::new(pod)).await?;
            },
            Eligibility::NotRunning => {},
            Eligibility::AlreadyAnnotated => {
                debug!("{} already carries {}", ResourceKey::of(&pod), self.annotation_key);
            },
        }
        Ok(verdict)
    }
}

impl fmt::Debug for ReconcileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcileContext")
            .field("facts", &self.facts)
            .field("annotation_key", &self.annotation_key)
            .finish_non_exhaustive()
    }
}
