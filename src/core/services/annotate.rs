//! Annotation marker helpers

use k8s_openapi::api::core::v1::Pod;

use crate::core::models::annotations;

/// Whether the pod carries the marker key (any value, including empty)
#[must_use]
pub fn has_marker(pod: &Pod, marker: &str) -> bool {
    annotations(pod).is_some_and(|map| map.contains_key(marker))
}

/// Value of the marker, if present
#[must_use]
pub fn marker_value<'a>(pod: &'a Pod, marker: &str) -> Option<&'a str> {
    annotations(pod).and_then(|map| map.get(marker)).map(String::as_str)
}

/// Build a new pod with the marker set to `value`
///
/// The input is left untouched so that other holders of the same pod never
/// observe a half-applied change.
#[must_use]
pub fn annotate(pod: &Pod, marker: &str, value: &str) -> Pod {
    let mut copy = pod.clone();
    copy.metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(marker.to_string(), value.to_string());
    copy
}
