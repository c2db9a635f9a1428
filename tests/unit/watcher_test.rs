//! Tests for the pod watcher

use std::sync::Arc;
use std::time::Duration;

use podfacts::core::models::ResourceEvent;
use podfacts::core::services::Eligibility;
use podfacts::error::{AgentError, StoreError};
use podfacts::reconciler::{Backoff, EventDisposition, ResourceWatcher, queue};
use podfacts::shutdown::{self, Shutdown};

use crate::common::fixtures::{annotated, context, pod, running};
use crate::common::mocks::MockResourceStore;

fn quick() -> Backoff {
    Backoff::new(Duration::from_millis(5), Duration::from_millis(20))
}

#[tokio::test]
async fn test_added_running_pod_is_enqueued() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, rx) = queue::bounded(4);
    let watcher = ResourceWatcher::new(context(&store, &["A"]), tx);

    let disposition = watcher.handle_event(ResourceEvent::Added(running("shop", "web-0"))).await;

    assert_eq!(disposition.unwrap(), EventDisposition::Enqueued);
    assert_eq!(rx.next().await.unwrap().key().to_string(), "shop/web-0");
}

#[tokio::test]
async fn test_modified_running_pod_is_enqueued() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, _rx) = queue::bounded(4);
    let watcher = ResourceWatcher::new(context(&store, &["A"]), tx);

    let disposition = watcher.handle_event(ResourceEvent::Modified(running("shop", "web-0"))).await;
    assert_eq!(disposition.unwrap(), EventDisposition::Enqueued);
}

#[tokio::test]
async fn test_pending_pod_is_not_enqueued() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, _rx) = queue::bounded(4);
    let watcher = ResourceWatcher::new(context(&store, &["A"]), tx.clone());

    let disposition =
        watcher.handle_event(ResourceEvent::Added(pod("shop", "web-0", "Pending"))).await;

    assert_eq!(disposition.unwrap(), EventDisposition::Ineligible(Eligibility::NotRunning));
    assert_eq!(tx.available(), 4);
}

#[tokio::test]
async fn test_annotated_pod_is_not_enqueued() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, _rx) = queue::bounded(4);
    let watcher = ResourceWatcher::new(context(&store, &["A"]), tx.clone());

    let disposition =
        watcher.handle_event(ResourceEvent::Modified(annotated("shop", "web-0", "x"))).await;

    assert_eq!(disposition.unwrap(), EventDisposition::Ineligible(Eligibility::AlreadyAnnotated));
    assert_eq!(tx.available(), 4);
}

#[tokio::test]
async fn test_other_event_kinds_are_ignored() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, _rx) = queue::bounded(4);
    let watcher = ResourceWatcher::new(context(&store, &["A"]), tx.clone());

    let events = [
        ResourceEvent::Deleted(running("shop", "web-0")),
        ResourceEvent::Bookmark {
            resource_version: "1234".to_string(),
        },
        ResourceEvent::Error("too old resource version".to_string()),
    ];
    for event in events {
        assert_eq!(watcher.handle_event(event).await.unwrap(), EventDisposition::Ignored);
    }
    assert_eq!(tx.available(), 4);
}

#[tokio::test]
async fn test_failed_subscription_is_fatal() {
    let store = Arc::new(MockResourceStore::new());
    store.refuse_watch();
    let (tx, _rx) = queue::bounded(4);

    let result = ResourceWatcher::new(context(&store, &["A"]), tx).subscribe().await;

    assert!(matches!(result, Err(AgentError::Subscribe(StoreError::Credentials(_)))));
}

#[tokio::test]
async fn test_malformed_events_do_not_stop_the_stream() {
    let store = Arc::new(MockResourceStore::new());
    let feed = store.event_feed();
    let (tx, rx) = queue::bounded(4);
    let subscription = ResourceWatcher::new(context(&store, &["A"]), tx).subscribe().await.unwrap();
    let (trigger, shutdown) = shutdown::channel();
    let running_watch = tokio::spawn(subscription.run(shutdown));

    feed.unbounded_send(Err(StoreError::Malformed("expected Pod, got Node".to_string())))
        .unwrap();
    feed.unbounded_send(Ok(ResourceEvent::Added(running("shop", "web-0")))).unwrap();

    let item = tokio::time::timeout(Duration::from_secs(2), rx.next()).await.unwrap().unwrap();
    assert_eq!(item.key().to_string(), "shop/web-0");

    trigger.trigger();
    tokio::time::timeout(Duration::from_secs(2), running_watch).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_dropped_stream_is_re_established() {
    let store = Arc::new(MockResourceStore::new());
    let first = store.event_feed();
    let second = store.event_feed();
    let (tx, rx) = queue::bounded(4);
    let subscription = ResourceWatcher::new(context(&store, &["A"]), tx)
        .with_reconnect_backoff(quick())
        .subscribe()
        .await
        .unwrap();
    let running_watch = tokio::spawn(subscription.run(Shutdown::never()));

    first.unbounded_send(Ok(ResourceEvent::Added(running("shop", "before")))).unwrap();
    let item = tokio::time::timeout(Duration::from_secs(2), rx.next()).await.unwrap().unwrap();
    assert_eq!(item.key().name, "before");

    drop(first);
    second.unbounded_send(Ok(ResourceEvent::Added(running("shop", "after")))).unwrap();
    let item = tokio::time::timeout(Duration::from_secs(2), rx.next()).await.unwrap().unwrap();
    assert_eq!(item.key().name, "after");
    assert_eq!(store.watch_count(), 2);

    running_watch.abort();
}

#[tokio::test]
async fn test_watcher_stops_when_queue_closes() {
    let store = Arc::new(MockResourceStore::new());
    let feed = store.event_feed();
    let (tx, rx) = queue::bounded(4);
    let subscription = ResourceWatcher::new(context(&store, &["A"]), tx).subscribe().await.unwrap();
    let running_watch = tokio::spawn(subscription.run(Shutdown::never()));

    drop(rx);
    feed.unbounded_send(Ok(ResourceEvent::Added(running("shop", "web-0")))).unwrap();

    tokio::time::timeout(Duration::from_secs(2), running_watch).await.unwrap().unwrap();
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn test_running_subscription_can_move_between_threads() {
    let store = Arc::new(MockResourceStore::new());
    let (tx, _rx) = queue::bounded(4);
    let subscription = ResourceWatcher::new(context(&store, &["A"]), tx).subscribe().await.unwrap();

    let running_watch = subscription.run(Shutdown::never());

    assert_send(&running_watch);
}
