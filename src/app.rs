//! Agent bootstrap
//!
//! Startup order: facts, cluster connection, reconciler, liveness listener.
//! Any failure before the reconciler is running aborts startup.

use std::pin::pin;
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use crate::adapters::{HttpFactProvider, KubeResourceStore, install_crypto_provider};
use crate::config::AgentConfig;
use crate::facts::FactSource;
use crate::reconciler::{ReconcileContext, Reconciler};
use crate::server::LivenessServer;
use crate::shutdown;

/// Run the agent until ctrl-c or a fatal error
pub async fn run(config: AgentConfig) -> anyhow::Result<()> {
    install_crypto_provider().context("failed to set up TLS")?;
    let provider = HttpFactProvider::new(config.fetch_timeout())?;
    let facts = FactSource::initialize(&provider, &config.facts_url)
        .await
        .with_context(|| format!("failed to load facts from {}", config.facts_url))?;

    let kubeconfig = config.kubeconfig_path();
    let store = KubeResourceStore::connect(&kubeconfig)
        .await
        .context("failed to connect to the Kubernetes cluster")?;

    let ctx = ReconcileContext::new(Arc::new(store), Arc::new(facts), config.annotation_key.clone());
    let (trigger, shutdown) = shutdown::channel();
    let handle = Reconciler::new(ctx, config.reconciler_settings()).start(shutdown).await?;

    let liveness = LivenessServer::bind(&config.liveness_addr)?.spawn();
    info!("podfacts v{} running", crate::VERSION);

    let mut running = pin!(handle.wait());
    let result = tokio::select! {
        result = &mut running => result,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received ctrl-c, shutting down"),
                Err(e) => warn!("Unable to listen for ctrl-c ({e}), shutting down"),
            }
            trigger.trigger();
            running.await
        },
    };

    liveness.stop();
    result.map_err(Into::into)
}
