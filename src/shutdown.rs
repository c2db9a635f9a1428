//! Shutdown signalling
//!
//! One trigger, many observers. Every long-running loop checks its `Shutdown`
//! at the point where it would otherwise suspend.

use tokio::sync::watch;

/// Create a connected trigger/observer pair
#[must_use]
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Fires the shutdown signal
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Signal every observer; idempotent
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes the shutdown signal
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// An observer that is never signalled
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until shutdown is requested
    ///
    /// Pends forever once the trigger is gone without having fired.
    pub async fn wait(&mut self) {
        let orphaned = self.rx.wait_for(|stopped| *stopped).await.is_err();
        if orphaned {
            std::future::pending::<()>().await;
        }
    }
}
