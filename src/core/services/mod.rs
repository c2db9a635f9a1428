//! Business logic services
//!
//! Pure decisions that operate on pods and facts. These services have no I/O
//! dependencies - they operate on data passed in and return results.
//!
//! - [`eligibility`] - Decide whether a pod should be queued
//! - [`annotate`] - Marker lookup and copy-before-mutate
//! - [`selection`] - Bounded random index selection

pub mod annotate;
pub mod eligibility;
pub mod selection;

pub use annotate::{annotate, has_marker, marker_value};
pub use eligibility::{Eligibility, check_eligibility, is_eligible};
pub use selection::pick_index;
