//! Realtime database client over the REST API.
//!
//! Reads and writes use plain `GET`/`PUT` on `{database_url}/{path}.json`.
//! Live subscriptions use the same URL with `Accept: text/event-stream`;
//! the server then streams `put` and `patch` events that are applied to a
//! local mirror of the subscribed location.

use std::collections::VecDeque;

use futures::StreamExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::push_id::PushIdGenerator;
use super::sse::{SseEvent, SseParser};
use super::{Snapshot, SnapshotStream, TaskStore, tree};
use crate::{Error, Result};

/// Payload of `put` and `patch` stream events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ChangePayload {
    path: String,
    #[serde(default)]
    data: Value,
}

/// A decoded streaming event.
#[derive(Debug, Clone, PartialEq)]
enum StreamEvent {
    Put(ChangePayload),
    Patch(ChangePayload),
    KeepAlive,
    /// The server cancelled the subscription (e.g. rules now deny access).
    Cancel(String),
    AuthRevoked,
    Unknown(String),
}

impl StreamEvent {
    fn decode(event: &SseEvent) -> Result<Self> {
        let kind = event.event_type.as_deref().unwrap_or("");
        Ok(match kind {
            "put" => StreamEvent::Put(serde_json::from_str(&event.data)?),
            "patch" => StreamEvent::Patch(serde_json::from_str(&event.data)?),
            "keep-alive" => StreamEvent::KeepAlive,
            "cancel" => StreamEvent::Cancel(event.data.clone()),
            "auth_revoked" => StreamEvent::AuthRevoked,
            other => StreamEvent::Unknown(other.to_string()),
        })
    }
}

/// Mirror of the subscribed location, updated event by event.
#[derive(Debug, Default)]
struct StreamMirror {
    tree: Value,
}

impl StreamMirror {
    /// Apply one event. Returns the new snapshot when the data changed.
    fn apply(&mut self, event: StreamEvent) -> Result<Option<Snapshot>> {
        match event {
            StreamEvent::Put(change) => {
                tree::apply_put(&mut self.tree, &change.path, change.data);
                Ok(Some(Snapshot::new(self.tree.clone())))
            }
            StreamEvent::Patch(change) => {
                tree::apply_patch(&mut self.tree, &change.path, change.data);
                Ok(Some(Snapshot::new(self.tree.clone())))
            }
            StreamEvent::KeepAlive => Ok(None),
            StreamEvent::Cancel(reason) => Err(Error::Subscription(format!(
                "subscription cancelled by server: {}",
                reason
            ))),
            StreamEvent::AuthRevoked => Err(Error::Subscription(
                "subscription credentials revoked".to_string(),
            )),
            StreamEvent::Unknown(kind) => {
                tracing::debug!(event = %kind, "Ignoring unknown stream event");
                Ok(None)
            }
        }
    }
}

/// State threaded through the snapshot stream.
struct StreamState<S> {
    bytes: S,
    parser: SseParser,
    mirror: StreamMirror,
    pending: VecDeque<Result<Snapshot>>,
    finished: bool,
}

impl<S> StreamState<S> {
    /// Feed decoded events into the mirror, queueing snapshots.
    /// Stops at the first error.
    fn absorb(&mut self, events: Vec<SseEvent>) {
        for sse in events {
            let applied = StreamEvent::decode(&sse).and_then(|event| self.mirror.apply(event));
            match applied {
                Ok(Some(snapshot)) => self.pending.push_back(Ok(snapshot)),
                Ok(None) => {}
                Err(e) => {
                    self.pending.push_back(Err(e));
                    self.finished = true;
                    return;
                }
            }
        }
    }
}

/// REST client for a hosted realtime database.
pub struct FirebaseStore {
    client: reqwest::Client,
    database_url: String,
    project_id: Option<String>,
    ids: PushIdGenerator,
}

impl FirebaseStore {
    /// Create a client for the database at `database_url`.
    pub fn new(database_url: &str, project_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            database_url: database_url.trim_end_matches('/').to_string(),
            project_id,
            ids: PushIdGenerator::new(),
        }
    }

    /// REST URL for a store path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path.trim_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read body".to_string());
        Err(Error::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn open_stream(&self, path: &str) -> Result<SnapshotStream> {
        let url = self.url(path);
        tracing::info!(url = %url, "Opening live subscription");

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/event-stream")
            .send()
            .await?;
        let response = Self::check(response).await?;

        let state = StreamState {
            bytes: Box::pin(response.bytes_stream()),
            parser: SseParser::new(),
            mirror: StreamMirror::default(),
            pending: VecDeque::new(),
            finished: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.pending.pop_front() {
                    return Some((item, state));
                }
                if state.finished {
                    return None;
                }

                match state.bytes.next().await {
                    Some(Ok(chunk)) => {
                        let events = state.parser.push(&chunk);
                        state.absorb(events);
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Subscription stream read failed");
                        state.finished = true;
                        state.pending.push_back(Err(Error::Request(e)));
                    }
                    None => {
                        let trailing: Vec<SseEvent> = state.parser.flush().into_iter().collect();
                        state.absorb(trailing);
                        if !state.finished {
                            state.finished = true;
                            state.pending.push_back(Err(Error::Subscription(
                                "stream closed by server".to_string(),
                            )));
                        }
                    }
                }
            }
        });

        Ok(stream.boxed())
    }

    async fn read(&self, path: &str) -> Result<Value> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        let response = self.client.put(self.url(path)).json(&value).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl TaskStore for FirebaseStore {
    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<SnapshotStream>> {
        Box::pin(self.open_stream(path))
    }

    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.read(path))
    }

    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.write(path, value))
    }

    fn push_id(&self) -> String {
        self.ids.next_id()
    }

    fn location(&self) -> String {
        match &self.project_id {
            Some(project) => format!("{} ({})", self.database_url, project),
            None => self.database_url.clone(),
        }
    }
}
