//! HTTP fact provider
//!
//! Fetches the fact corpus with a single GET. Both a bare JSON array of
//! `{type, text}` objects and the `{"all": [...]}` envelope are accepted.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;

use crate::core::models::Fact;
use crate::core::ports::FactProvider;
use crate::error::FactError;

/// Fact provider backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpFactProvider {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFactProvider {
    /// Create a provider whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FactError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FactError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, err: &reqwest::Error) -> FactError {
        if err.is_timeout() {
            FactError::Timeout(self.timeout)
        } else {
            FactError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl FactProvider for HttpFactProvider {
    async fn fetch(&self, location: &str) -> Result<Vec<Fact>, FactError> {
        debug!("GET {location}");
        let response = self
            .client
            .get(location)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FactError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        decode_facts(&body)
    }
}

/// Accepted payload shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum FactPayload {
    List(Vec<Fact>),
    Envelope { all: Vec<Fact> },
}

/// Decode a fact payload
pub fn decode_facts(body: &[u8]) -> Result<Vec<Fact>, FactError> {
    match serde_json::from_slice::<FactPayload>(body) {
        Ok(FactPayload::List(facts) | FactPayload::Envelope { all: facts }) => Ok(facts),
        Err(e) => Err(FactError::Malformed(e.to_string())),
    }
}
