//! Kubernetes resource store
//!
//! Implements the `ResourceStore` port over the pods of every namespace using `kube`.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams, PostParams, WatchEvent, WatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use log::{debug, info};
use rustls::crypto::CryptoProvider;

use crate::core::models::ResourceEvent;
use crate::core::ports::{EventStream, ResourceStore};
use crate::error::StoreError;

/// Resource version that starts a watch from any recent state
const WATCH_FROM_ANY: &str = "0";

/// Pod store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeResourceStore {
    client: Client,
}

impl KubeResourceStore {
    /// Connect using the kubeconfig file at `kubeconfig`
    ///
    /// Failure is fatal to startup.
    pub async fn connect(kubeconfig: &Path) -> Result<Self, StoreError> {
        install_crypto_provider()?;
        let loaded = Kubeconfig::read_from(kubeconfig).map_err(|e| {
            StoreError::Credentials(format!("failed to read {}: {e}", kubeconfig.display()))
        })?;
        let config = Config::from_custom_kubeconfig(loaded, &KubeConfigOptions::default())
            .await
            .map_err(|e| StoreError::Credentials(e.to_string()))?;
        info!("Using cluster {}", config.cluster_url);
        let client = Client::try_from(config).map_err(|e| StoreError::Credentials(e.to_string()))?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn all(&self) -> Api<Pod> {
        Api::all(self.client.clone())
    }

    fn namespaced(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl fmt::Debug for KubeResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeResourceStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ResourceStore for KubeResourceStore {
    async fn list(&self) -> Result<Vec<Pod>, StoreError> {
        let pods = self.all().list(&ListParams::default()).await.map_err(map_error)?;
        Ok(pods.items)
    }

    async fn watch(&self) -> Result<EventStream, StoreError> {
        let stream = self
            .all()
            .watch(&WatchParams::default(), WATCH_FROM_ANY)
            .await
            .map_err(map_error)?;
        Ok(stream.map(|item| item.map(convert_event).map_err(map_error)).boxed())
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Pod, StoreError> {
        self.namespaced(namespace).get(name).await.map_err(map_error)
    }

    async fn update(&self, namespace: &str, pod: &Pod) -> Result<Pod, StoreError> {
        let name = pod
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| StoreError::Malformed("pod has no name".to_string()))?;
        debug!("Replacing pod {namespace}/{name}");
        self.namespaced(namespace)
            .replace(name, &PostParams::default(), pod)
            .await
            .map_err(map_error)
    }
}

/// Install the process-wide TLS crypto provider unless one is already set
///
/// Both `ring` and `aws-lc-rs` end up enabled on rustls through kube and reqwest,
/// so rustls cannot pick one on its own.
pub fn install_crypto_provider() -> Result<(), StoreError> {
    if CryptoProvider::get_default().is_some() {
        return Ok(());
    }
    match rustls::crypto::aws_lc_rs::default_provider().install_default() {
        Ok(()) => {
            debug!("Installed aws-lc-rs as the TLS crypto provider");
            Ok(())
        },
        Err(_) if CryptoProvider::get_default().is_some() => Ok(()),
        Err(_) => Err(StoreError::Credentials("unable to install a TLS crypto provider".to_string())),
    }
}

fn convert_event(event: WatchEvent<Pod>) -> ResourceEvent {
    match event {
        WatchEvent::Added(pod) => ResourceEvent::Added(pod),
        WatchEvent::Modified(pod) => ResourceEvent::Modified(pod),
        WatchEvent::Deleted(pod) => ResourceEvent::Deleted(pod),
        WatchEvent::Bookmark(bookmark) => ResourceEvent::Bookmark {
            resource_version: bookmark.metadata.resource_version,
        },
        WatchEvent::Error(err) => ResourceEvent::Error(format!("{} ({})", err.message, err.code)),
    }
}

fn map_error(err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(resp.message),
        kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(resp.message),
        kube::Error::SerdeError(e) => StoreError::Malformed(e.to_string()),
        other => StoreError::Api(other.to_string()),
    }
}
