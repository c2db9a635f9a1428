//! Tests for the eligibility check as seen by the producers

use podfacts::core::services::{Eligibility, check_eligibility, is_eligible};

use crate::common::fixtures::{MARKER, annotated, pod, running};

#[test]
fn test_running_unannotated_pod_is_eligible() {
    assert!(is_eligible(&running("default", "web"), MARKER));
}

#[test]
fn test_pending_pod_is_not_eligible() {
    assert_eq!(
        check_eligibility(&pod("default", "web", "Pending"), MARKER),
        Eligibility::NotRunning
    );
}

#[test]
fn test_annotated_pod_is_not_eligible() {
    assert_eq!(
        check_eligibility(&annotated("default", "web", "Cats purr"), MARKER),
        Eligibility::AlreadyAnnotated
    );
}

#[test]
fn test_marker_key_is_configurable() {
    let pod = annotated("default", "web", "Cats purr");
    assert!(is_eligible(&pod, "example.com/other-fact"));
}
