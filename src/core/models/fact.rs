//! Fact model
//!
//! A fact is the value written into the annotation marker.

use serde::{Deserialize, Serialize};

/// An immutable `(category, text)` pair served by the fact provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Category of the fact (the provider calls it `type`)
    #[serde(rename = "type", default)]
    pub category: String,
    /// Text written into the annotation
    pub text: String,
}

impl Fact {
    /// Create a new fact
    #[must_use]
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }
}
