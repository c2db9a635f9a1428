//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the reconciliation core
//! and external systems (the cluster API, the fact provider).
//!
//! Implementations live in the `adapters` module.

mod fact_provider;
mod resource_store;

pub use fact_provider::FactProvider;
pub use resource_store::{EventStream, ResourceStore};
