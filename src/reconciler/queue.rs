//! Bounded multi-producer, multi-consumer work queue
//!
//! A tokio bounded channel whose receiver is shared between workers. Each item
//! is delivered to exactly one worker. Producers wait while the queue is full.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::core::models::WorkItem;
use crate::error::QueueClosed;

/// Create a queue holding at most `capacity` items (minimum 1)
#[must_use]
pub fn bounded(capacity: usize) -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        WorkSender { tx },
        WorkReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer half, cloned for every producer
#[derive(Debug, Clone)]
pub struct WorkSender {
    tx: mpsc::Sender<WorkItem>,
}

impl WorkSender {
    /// Enqueue an item, waiting for space when the queue is full
    pub async fn submit(&self, item: WorkItem) -> Result<(), QueueClosed> {
        self.tx.send(item).await.map_err(|_| QueueClosed)
    }

    /// Free slots right now
    #[must_use]
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer half, cloned for every worker
#[derive(Debug, Clone)]
pub struct WorkReceiver {
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
}

impl WorkReceiver {
    /// Next item, or `None` once every producer is gone and the queue is drained
    pub async fn next(&self) -> Option<WorkItem> {
        self.rx.lock().await.recv().await
    }
}
