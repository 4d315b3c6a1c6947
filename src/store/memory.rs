//! In-process store with live subscriptions.
//!
//! Holds the whole database as one JSON tree in a `watch` channel. Every
//! write publishes the new tree and each subscriber re-reads its location.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::watch;

use super::push_id::PushIdGenerator;
use super::{Snapshot, SnapshotStream, TaskStore, tree};
use crate::{Error, Result};

/// Shared flags used to simulate store failures.
#[derive(Debug, Default)]
struct Faults {
    reject_writes: AtomicBool,
    break_subscriptions: AtomicBool,
}

/// A store kept entirely in memory.
pub struct MemoryStore {
    root: watch::Sender<Value>,
    faults: std::sync::Arc<Faults>,
    ids: PushIdGenerator,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_data(Value::Null)
    }

    /// Create a store pre-loaded with a database tree.
    pub fn with_data(data: Value) -> Self {
        let (root, _) = watch::channel(data);
        Self {
            root,
            faults: std::sync::Arc::default(),
            ids: PushIdGenerator::new(),
        }
    }

    /// Make every following write fail.
    pub fn reject_writes(&self, reject: bool) {
        self.faults.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Fail all open subscriptions with an error.
    pub fn break_subscriptions(&self) {
        self.faults.break_subscriptions.store(true, Ordering::SeqCst);
        // Wake subscribers so they observe the fault.
        self.root.send_modify(|_| {});
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.root.receiver_count()
    }

    /// Current value at a path.
    pub fn value_at(&self, path: &str) -> Value {
        tree::value_at(&self.root.borrow(), path)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

impl TaskStore for MemoryStore {
    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<SnapshotStream>> {
        let receiver = self.root.subscribe();
        let faults = std::sync::Arc::clone(&self.faults);
        let path = path.to_string();

        Box::pin(async move {
            let stream = futures::stream::unfold(
                (receiver, faults, path, true, false),
                |(mut receiver, faults, path, first, failed)| async move {
                    if failed {
                        return None;
                    }
                    if !first && receiver.changed().await.is_err() {
                        return None;
                    }
                    if faults.break_subscriptions.load(Ordering::SeqCst) {
                        let err = Error::Subscription("memory store subscription broken".into());
                        return Some((Err(err), (receiver, faults, path, false, true)));
                    }
                    let value = {
                        let root = receiver.borrow_and_update();
                        tree::value_at(&root, &path).cloned().unwrap_or(Value::Null)
                    };
                    Some((
                        Ok(Snapshot::new(value)),
                        (receiver, faults, path, false, false),
                    ))
                },
            );
            Ok(stream.boxed())
        })
    }

    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Value>> {
        let value = self.value_at(path);
        Box::pin(async move { Ok(value) })
    }

    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if self.faults.reject_writes.load(Ordering::SeqCst) {
                return Err(Error::Write(format!("memory store rejected write to {}", path)));
            }
            self.root
                .send_modify(|root| tree::apply_put(root, path, value));
            Ok(())
        })
    }

    fn push_id(&self) -> String {
        self.ids.next_id()
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribe_yields_current_value_first() {
        let store = MemoryStore::with_data(json!({ "agenda": { "-N1": { "Título": "Post" } } }));
        let mut stream = store.subscribe("agenda").await.unwrap();
        let snapshot = stream.next().await.unwrap().unwrap();
        assert_eq!(snapshot.value()["-N1"]["Título"], "Post");
    }

    #[tokio::test]
    async fn test_writes_reach_subscribers() {
        let store = MemoryStore::new();
        let mut stream = store.subscribe("agenda").await.unwrap();
        assert!(stream.next().await.unwrap().unwrap().is_empty());

        store
            .set("agenda/-N1", json!({ "Título": "Reel" }))
            .await
            .unwrap();
        let snapshot = stream.next().await.unwrap().unwrap();
        assert_eq!(snapshot.value()["-N1"]["Título"], "Reel");
    }

    #[tokio::test]
    async fn test_rejected_write() {
        let store = MemoryStore::new();
        store.reject_writes(true);
        let err = store.set("agenda/x", json!(1)).await.unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert_eq!(store.value_at("agenda/x"), Value::Null);
    }

    #[tokio::test]
    async fn test_broken_subscription_ends_after_error() {
        let store = MemoryStore::new();
        let mut stream = store.subscribe("agenda").await.unwrap();
        let _ = stream.next().await;
        store.break_subscriptions();
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_get_reads_path() {
        let store = MemoryStore::with_data(json!({ "agenda": { "-N1": { "Título": "Post" } } }));
        let value = store.get("agenda/-N1").await.unwrap();
        assert_eq!(value["Título"], "Post");
    }
}
