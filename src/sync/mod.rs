//! Remote store adapter.
//!
//! Keeps one live subscription to the task collection and turns every
//! snapshot into a full, normalized task list. Also performs the create and
//! update writes; the store echoes those back through the subscription, so
//! local state is never patched optimistically.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{Task, TaskFields, creation_timestamp, normalize_snapshot};
use crate::store::{TaskStore, child_path};
use crate::{Error, Result};

/// Default collection holding task records.
pub const DEFAULT_COLLECTION: &str = "agenda";

/// What the subscription reports to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The complete, normalized task list. Replaces whatever came before.
    Snapshot(Vec<Task>),
    /// The subscription failed and has stopped. Carries log detail only.
    Failed(String),
}

/// A live subscription. Dropping it stops delivery.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<SyncEvent>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Wait for the next event. `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<SyncEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Adapter between the board and the remote store.
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn TaskStore>,
    collection: String,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn TaskStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn location(&self) -> String {
        format!("{}/{}", self.store.location(), self.collection)
    }

    /// Start listening to the collection. Must be called inside a tokio runtime.
    pub fn subscribe(&self) -> Subscription {
        let (tx, events) = mpsc::unbounded_channel();
        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();

        let handle = tokio::spawn(async move {
            let mut snapshots = match store.subscribe(&collection).await {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!(collection = %collection, error = %e, "Failed to open subscription");
                    let _ = tx.send(SyncEvent::Failed(e.to_string()));
                    return;
                }
            };

            while let Some(item) = snapshots.next().await {
                match item {
                    Ok(snapshot) => {
                        let tasks = normalize_snapshot(snapshot.value());
                        tracing::debug!(count = tasks.len(), "Snapshot received");
                        if tx.send(SyncEvent::Snapshot(tasks)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(collection = %collection, error = %e, "Subscription failed");
                        let _ = tx.send(SyncEvent::Failed(e.to_string()));
                        break;
                    }
                }
            }
            tracing::info!(collection = %collection, "Subscription closed");
        });

        Subscription { events, handle }
    }

    /// Read the whole collection once.
    pub async fn fetch(&self) -> Result<Vec<Task>> {
        let value = self.store.get(&self.collection).await?;
        Ok(normalize_snapshot(&value))
    }

    /// Read a single task by id.
    pub async fn fetch_task(&self, id: &str) -> Result<Task> {
        let value = self.store.get(&child_path(&self.collection, id)).await?;
        Task::from_remote(id, &value).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Create a task under a freshly generated id and return that id.
    pub async fn create(&self, fields: &TaskFields) -> Result<String> {
        let id = self.store.push_id();
        let record = fields.to_record(creation_timestamp(Utc::now()));
        let path = child_path(&self.collection, &id);

        match self.store.set(&path, serde_json::to_value(&record)?).await {
            Ok(()) => {
                tracing::info!(id = %id, title = %fields.title, "Task created");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to create task");
                Err(e)
            }
        }
    }

    /// Overwrite an existing task, keeping its original creation timestamp.
    pub async fn update(
        &self,
        id: &str,
        fields: &TaskFields,
        created_at: Option<&str>,
    ) -> Result<()> {
        let created_at = match created_at {
            Some(ts) => ts.to_string(),
            None => {
                tracing::warn!(id = %id, "Task has no creation timestamp; writing it empty");
                String::new()
            }
        };
        let record = fields.to_record(created_at);
        let path = child_path(&self.collection, id);

        match self.store.set(&path, serde_json::to_value(&record)?).await {
            Ok(()) => {
                tracing::info!(id = %id, "Task updated");
                Ok(())
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to update task");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fields(title: &str) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            description: "Detalhes".to_string(),
            platform: "Instagram".to_string(),
            responsible: "Tiago".to_string(),
            status: TaskStatus::Pending,
            due_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            progress: 0,
            objective: "Engajamento".to_string(),
        }
    }

    fn adapter_with(store: Arc<MemoryStore>) -> StoreAdapter {
        StoreAdapter::new(store, DEFAULT_COLLECTION)
    }

    #[tokio::test]
    async fn test_create_writes_full_record() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter_with(Arc::clone(&store));

        let id = adapter.create(&fields("Campanha X")).await.unwrap();
        let record = store.value_at(&format!("agenda/{}", id));
        assert_eq!(record["Título"], "Campanha X");
        assert_eq!(record["Status"], "Pendente");
        assert_eq!(record["Data de Entrega"], "2025-06-01T03:00:00.000Z");
        assert_eq!(record["Progresso (%)"], 0);
        assert_eq!(record["objetivo"], "Engajamento");
        assert!(record["Data de Criação"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_update_preserves_creation_timestamp() {
        let store = Arc::new(MemoryStore::with_data(json!({
            "agenda": { "-N1": { "Título": "Antigo", "Data de Criação": "2024-01-02T10:00:00.000Z" } }
        })));
        let adapter = adapter_with(Arc::clone(&store));

        let task = adapter.fetch_task("-N1").await.unwrap();
        let mut edited = TaskFields::from_task(&task);
        edited.title = "Novo".to_string();
        edited.status = TaskStatus::Completed;
        adapter
            .update(&task.id, &edited, task.created_at.as_deref())
            .await
            .unwrap();

        let record = store.value_at("agenda/-N1");
        assert_eq!(record["Título"], "Novo");
        assert_eq!(record["Status"], "Concluído");
        assert_eq!(record["Data de Criação"], "2024-01-02T10:00:00.000Z");
    }

    #[tokio::test]
    async fn test_write_failure_is_returned() {
        let store = Arc::new(MemoryStore::new());
        store.reject_writes(true);
        let adapter = adapter_with(Arc::clone(&store));
        assert!(adapter.create(&fields("x")).await.is_err());
        assert_eq!(store.value_at("agenda"), serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_fetch_task_not_found() {
        let adapter = adapter_with(Arc::new(MemoryStore::new()));
        let err = adapter.fetch_task("-missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_subscription_replaces_list_on_each_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter_with(Arc::clone(&store));
        let mut subscription = adapter.subscribe();

        assert_eq!(subscription.next().await, Some(SyncEvent::Snapshot(vec![])));

        adapter.create(&fields("Um")).await.unwrap();
        match subscription.next().await {
            Some(SyncEvent::Snapshot(tasks)) => {
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].title, "Um");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        adapter.create(&fields("Dois")).await.unwrap();
        match subscription.next().await {
            Some(SyncEvent::Snapshot(tasks)) => {
                let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
                assert_eq!(titles, vec!["Um", "Dois"]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dropping_subscription_stops_listener() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter_with(Arc::clone(&store));
        let mut subscription = adapter.subscribe();
        let _ = subscription.next().await;
        assert_eq!(store.subscriber_count(), 1);

        drop(subscription);
        for _ in 0..100 {
            if store.subscriber_count() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(store.subscriber_count(), 0);

        // Writes after the drop reach nobody.
        adapter.create(&fields("Depois")).await.unwrap();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscription_failure_is_reported_once() {
        let store = Arc::new(MemoryStore::new());
        let adapter = adapter_with(Arc::clone(&store));
        let mut subscription = adapter.subscribe();
        let _ = subscription.next().await;

        store.break_subscriptions();
        assert!(matches!(subscription.next().await, Some(SyncEvent::Failed(_))));
        assert_eq!(subscription.next().await, None);
    }
}
