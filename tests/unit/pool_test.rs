//! Tests for the supervised worker pool

use std::sync::Arc;
use std::time::Duration;

use podfacts::core::models::WorkItem;
use podfacts::error::AgentError;
use podfacts::reconciler::{Backoff, RestartPolicy, WorkerPool, queue};
use podfacts::shutdown::{self, Shutdown};

use crate::common::fixtures::{MARKER, context, running};
use crate::common::mocks::MockResourceStore;

fn fast_policy(max_restarts: u32) -> RestartPolicy {
    RestartPolicy {
        max_restarts,
        window: Duration::from_secs(60),
        backoff: Backoff::new(Duration::from_millis(1), Duration::from_millis(5)),
    }
}

#[tokio::test]
async fn test_duplicate_items_produce_one_write() {
    let store = Arc::new(MockResourceStore::with_pods(vec![running("shop", "web-0")]));
    let (tx, rx) = queue::bounded(8);
    for _ in 0..6 {
        tx.submit(WorkItem::new(running("shop", "web-0"))).await.unwrap();
    }
    drop(tx);

    let result = WorkerPool::new(3)
        .run(context(&store, &["A", "B", "C"]), rx, Shutdown::never())
        .await;

    assert!(result.is_ok());
    assert_eq!(store.update_count(), 1);
    assert!(store.marker("shop", "web-0", MARKER).is_some());
}

#[tokio::test]
async fn test_many_pods_are_each_annotated_once() {
    let names: Vec<String> = (0..20).map(|i| format!("web-{i}")).collect();
    let store = Arc::new(MockResourceStore::with_pods(
        names.iter().map(|name| running("shop", name)).collect(),
    ));
    let (tx, rx) = queue::bounded(4);
    let pool = tokio::spawn(WorkerPool::new(3).run(context(&store, &["A"]), rx, Shutdown::never()));

    for name in &names {
        tx.submit(WorkItem::new(running("shop", name))).await.unwrap();
        tx.submit(WorkItem::new(running("shop", name))).await.unwrap();
    }
    drop(tx);

    pool.await.unwrap().unwrap();
    assert_eq!(store.update_count(), names.len());
    for name in &names {
        assert_eq!(store.marker("shop", name, MARKER).as_deref(), Some("A"));
    }
}

#[tokio::test]
async fn test_panicking_worker_is_restarted() {
    let store = Arc::new(MockResourceStore::with_pods(vec![
        running("shop", "poison"),
        running("shop", "web-0"),
    ]));
    store.panic_on_get("poison");
    let (tx, rx) = queue::bounded(4);
    tx.submit(WorkItem::new(running("shop", "poison"))).await.unwrap();
    tx.submit(WorkItem::new(running("shop", "web-0"))).await.unwrap();
    drop(tx);

    let result = WorkerPool::new(1)
        .with_restart_policy(fast_policy(3))
        .run(context(&store, &["A"]), rx, Shutdown::never())
        .await;

    assert!(result.is_ok());
    assert_eq!(store.marker("shop", "web-0", MARKER).as_deref(), Some("A"));
    assert_eq!(store.marker("shop", "poison", MARKER), None);
}

#[tokio::test]
async fn test_sustained_panics_fail_the_pool() {
    let store = Arc::new(MockResourceStore::with_pods(vec![running("shop", "poison")]));
    store.panic_on_get("poison");
    let (tx, rx) = queue::bounded(8);
    for _ in 0..5 {
        tx.submit(WorkItem::new(running("shop", "poison"))).await.unwrap();
    }

    let result = WorkerPool::new(1)
        .with_restart_policy(fast_policy(2))
        .run(context(&store, &["A"]), rx, Shutdown::never())
        .await;

    assert!(matches!(
        result,
        Err(AgentError::WorkerFailing {
            worker: 0,
            restarts: 3
        })
    ));
    drop(tx);
}

#[tokio::test]
async fn test_shutdown_stops_idle_workers() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, rx) = queue::bounded(4);
    let (trigger, shutdown) = shutdown::channel();
    let pool = tokio::spawn(WorkerPool::new(3).run(context(&store, &["A"]), rx, shutdown));

    trigger.trigger();

    let result = tokio::time::timeout(Duration::from_secs(2), pool).await.unwrap().unwrap();
    assert!(result.is_ok());
    drop(tx);
}
