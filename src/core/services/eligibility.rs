//! Eligibility check shared by the watcher and the resync sweep
//!
//! Advisory only: it runs on whatever copy of the pod the producer holds, which may be
//! stale by the time a worker picks the item up. Workers recheck before writing.

use k8s_openapi::api::core::v1::Pod;

use super::annotate::has_marker;
use crate::core::models::{RUNNING_PHASE, pod_phase};

/// Verdict of the eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Running and not yet annotated
    Eligible,
    /// Phase is anything but `Running` (or unknown)
    NotRunning,
    /// The annotation marker is already present
    AlreadyAnnotated,
}

impl Eligibility {
    /// Whether the pod should be queued
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Check a pod against the phase and marker rules
///
/// Phase is checked first, so a pending pod never reports `AlreadyAnnotated`.
#[must_use]
pub fn check_eligibility(pod: &Pod, marker: &str) -> Eligibility {
    if pod_phase(pod) != Some(RUNNING_PHASE) {
        Eligibility::NotRunning
    } else if has_marker(pod, marker) {
        Eligibility::AlreadyAnnotated
    } else {
        Eligibility::Eligible
    }
}

/// Shorthand for `check_eligibility(..).is_eligible()`
#[must_use]
pub fn is_eligible(pod: &Pod, marker: &str) -> bool {
    check_eligibility(pod, marker).is_eligible()
}
