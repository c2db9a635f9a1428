//! Resource store port
//!
//! Defines the interface for listing, watching and updating pods.

use async_trait::async_trait;
use futures::stream::BoxStream;
use k8s_openapi::api::core::v1::Pod;

use crate::core::models::ResourceEvent;
use crate::error::StoreError;

/// Live change stream; `Err` items are payloads that could not be decoded
pub type EventStream = BoxStream<'static, Result<ResourceEvent, StoreError>>;

/// Access to the pods of every namespace
///
/// The store owns the pods. Callers never keep private copies for decisions;
/// they read fresh state right before writing.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List every pod in every namespace
    async fn list(&self) -> Result<Vec<Pod>, StoreError>;

    /// Subscribe to pod change events across all namespaces
    async fn watch(&self) -> Result<EventStream, StoreError>;

    /// Read the current state of one pod
    async fn get(&self, namespace: &str, name: &str) -> Result<Pod, StoreError>;

    /// Replace a pod, keyed by namespace and the pod's name
    ///
    /// Full-object replace: a concurrent external change between read and write may be lost.
    async fn update(&self, namespace: &str, pod: &Pod) -> Result<Pod, StoreError>;
}
