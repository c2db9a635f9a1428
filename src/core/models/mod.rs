//! Core domain models
//!
//! Pods themselves are the `k8s-openapi` type; these models describe what flows
//! between the producers and the annotation workers.

mod event;
mod fact;
mod resource;
mod work_item;

pub use event::{EventKind, ResourceEvent};
pub use fact::Fact;
pub use resource::{RUNNING_PHASE, ResourceKey, annotations, pod_phase};
pub use work_item::WorkItem;
