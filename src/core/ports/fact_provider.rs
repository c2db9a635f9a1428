//! Fact provider port

use async_trait::async_trait;

use crate::core::models::Fact;
use crate::error::FactError;

/// Source of the fact corpus, fetched once at startup
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Fetch and decode every fact served at `location`
    async fn fetch(&self, location: &str) -> Result<Vec<Fact>, FactError>;
}
