//! podfacts - annotate running pods with a fact, exactly once
//!
//! Configuration comes from the environment (see `podfacts::config`); log
//! verbosity follows `RUST_LOG` and defaults to `info`.

// Deny all clippy warnings in this crate
#![deny(clippy::all, clippy::pedantic, clippy::nursery, unsafe_code)]

use podfacts::config::AgentConfig;

/// Main entry point for the podfacts agent
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AgentConfig::load()?;
    podfacts::app::run(config).await
}
