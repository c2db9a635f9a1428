//! Work item model

use std::sync::Arc;

use k8s_openapi::api::core::v1::Pod;

use super::ResourceKey;

/// A queued reference to a pod awaiting an annotation attempt
///
/// The pod is shared, never mutated: workers build a new object before writing.
#[derive(Debug, Clone)]
pub struct WorkItem {
    key: ResourceKey,
    resource: Arc<Pod>,
}

impl WorkItem {
    /// Wrap an observed pod
    #[must_use]
    pub fn new(pod: Pod) -> Self {
        Self::shared(Arc::new(pod))
    }

    /// Wrap an already shared pod
    #[must_use]
    pub fn shared(resource: Arc<Pod>) -> Self {
        Self {
            key: ResourceKey::of(&resource),
            resource,
        }
    }

    /// Identity of the referenced pod
    #[must_use]
    pub const fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// The pod as it was observed by the producer
    #[must_use]
    pub fn resource(&self) -> &Pod {
        &self.resource
    }
}
