//! podfacts - annotate running pods with a fact, exactly once
//!
//! This library provides the reconciliation core of the podfacts agent: a pod watcher and a
//! periodic resync sweep feeding a bounded queue, drained by a supervised pool of annotation
//! workers that perform the only writes to the cluster.

// Deny all clippy warnings in this crate
#![deny(clippy::all, clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod facts;
pub mod reconciler;
pub mod server;
pub mod shutdown;
