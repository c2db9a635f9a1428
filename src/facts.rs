//! Fact source
//!
//! Holds the fact corpus loaded once at startup and hands out one fact per call.
//! A single generator lives for the whole process instead of being reseeded per call.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::models::Fact;
use crate::core::ports::FactProvider;
use crate::core::services::pick_index;
use crate::error::FactError;

/// In-memory fact corpus with uniform random selection
pub struct FactSource {
    facts: Vec<Fact>,
    rng: Mutex<StdRng>,
}

impl FactSource {
    /// Fetch the corpus from `provider` at `location`
    ///
    /// Failure here is fatal to startup.
    pub async fn initialize(
        provider: &dyn FactProvider,
        location: &str,
    ) -> Result<Self, FactError> {
        let facts = provider.fetch(location).await?;
        if facts.is_empty() {
            warn!("Fact provider at {location} returned no facts; pods will not be annotated");
        } else {
            info!("Loaded {} facts from {location}", facts.len());
        }
        Ok(Self::from_facts(facts))
    }

    /// Build a source over an existing corpus, seeded from the OS
    #[must_use]
    pub fn from_facts(facts: Vec<Fact>) -> Self {
        Self::with_rng(facts, StdRng::from_entropy())
    }

    /// Build a source with an explicit generator (deterministic in tests)
    #[must_use]
    pub const fn with_rng(facts: Vec<Fact>, rng: StdRng) -> Self {
        Self {
            facts,
            rng: Mutex::new(rng),
        }
    }

    /// One fact chosen uniformly at random, or `None` for an empty corpus
    pub fn next(&self) -> Option<&Fact> {
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            pick_index(self.facts.len(), &mut *rng)?
        };
        self.facts.get(index)
    }

    /// Number of loaded facts
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the corpus is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// All loaded facts, in provider order
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }
}

impl fmt::Debug for FactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactSource").field("facts", &self.facts.len()).finish_non_exhaustive()
    }
}
