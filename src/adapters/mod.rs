//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `http/` - Fact corpus fetched over HTTP with `reqwest`
//! - `cluster/` - Pods listed, watched and replaced through `kube`

pub mod cluster;
pub mod http;

pub use cluster::{KubeResourceStore, install_crypto_provider};
pub use http::HttpFactProvider;
