//! HTTP server adapters
//!
//! Currently supported:
//! - `tiny_http` - Liveness listener for external health probes

pub mod tiny_http;

pub use self::tiny_http::{LivenessHandle, LivenessServer, route};
