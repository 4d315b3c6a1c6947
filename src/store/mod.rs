//! Remote store backends.
//!
//! The task collection lives in a hosted realtime database. This module
//! defines the [`TaskStore`] seam the rest of the crate talks to, and its
//! implementations:
//! - [`FirebaseStore`] - REST + server-sent-events client (default)
//! - [`MemoryStore`] - in-process store with the same live semantics

mod firebase;
mod memory;
pub mod push_id;
pub mod sse;
pub mod tree;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::Result;

/// A full point-in-time copy of a subscribed location.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Value);

impl Snapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// True when the location holds nothing.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.iter().all(Value::is_null),
            _ => false,
        }
    }
}

/// Stream of snapshots delivered by a live subscription.
///
/// An `Err` item is terminal: the stream ends after yielding it.
pub type SnapshotStream = BoxStream<'static, Result<Snapshot>>;

/// Trait for stores that hold the task collection.
///
/// Paths are slash-separated locations such as `agenda` or `agenda/-Nx1`.
pub trait TaskStore: Send + Sync {
    /// Open a live subscription. The first item is the current value;
    /// every later item follows a change.
    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<SnapshotStream>>;

    /// Read the current value once.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Value>>;

    /// Overwrite the value at a path.
    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<()>>;

    /// Generate a fresh child key (the store's push id).
    fn push_id(&self) -> String;

    /// Human-readable location of the store (for display purposes).
    fn location(&self) -> String;
}

/// Join a collection and a child key into a store path.
pub fn child_path(collection: &str, key: &str) -> String {
    format!("{}/{}", collection.trim_end_matches('/'), key)
}
