//! Store trait and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::event::{Event, EventStream, EventType};
use crate::resource::Resource;

/// Generation stamped on every newly created resource.
const INITIAL_GENERATION: u64 = 0;

/// Thread-safe access to resources keyed by kind then name.
///
/// Records handed out by `get`, `list` and `watch` are independent copies;
/// mutating them does not touch stored state. `create` and `update` write
/// the committed metadata (generation, and owner when wrapped) back into
/// the caller's record, so resubmitting an unchanged record is a no-op.
#[async_trait]
pub trait Store: Send + Sync {
    /// Retrieve a resource by kind and name.
    async fn get(&self, kind: &str, name: &str) -> Result<Resource>;

    /// All resources of a kind. An unknown kind yields an empty list.
    async fn list(&self, kind: &str) -> Result<Vec<Resource>>;

    /// Add a new resource.
    async fn create(&self, resource: &mut Resource) -> Result<()>;

    /// Modify an existing resource. Structurally identical updates are
    /// silent no-ops.
    async fn update(&self, resource: &mut Resource) -> Result<()>;

    /// Remove a resource. Blocked while finalizers are pending.
    async fn delete(&self, kind: &str, name: &str) -> Result<()>;

    /// Subscribe to changes for a kind. The stream sees only events
    /// committed after registration and closes when `cancel` fires.
    async fn watch(&self, kind: &str, cancel: CancellationToken) -> Result<EventStream>;
}

/// Configuration for [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Buffered events per watcher before delivery blocks the writer.
    pub watch_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            watch_capacity: 100,
        }
    }
}

impl MemoryStoreConfig {
    /// Set the per-watcher buffer capacity.
    pub fn with_watch_capacity(mut self, capacity: usize) -> Self {
        self.watch_capacity = capacity;
        self
    }
}

struct Watcher {
    id: u64,
    sender: mpsc::Sender<Event>,
}

/// In-memory store state.
///
/// The data map and the watcher table live under one lock so event
/// delivery order always matches commit order per kind.
struct MemoryState {
    /// kind -> name -> resource
    data: HashMap<String, HashMap<String, Resource>>,
    watchers: HashMap<String, Vec<Watcher>>,
    next_watcher_id: u64,
}

/// In-memory [`Store`] implementation.
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    /// Create a new empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryStoreConfig::default())
    }

    /// Create a new empty store with the given configuration.
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                data: HashMap::new(),
                watchers: HashMap::new(),
                next_watcher_id: 0,
            })),
            config,
        }
    }

    /// Create a new empty store wrapped in an Arc.
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Deliver an event to every watcher of the resource's kind.
    ///
    /// Runs while the exclusive lock is held: a full watcher buffer blocks
    /// the writer, so subscribers must drain their streams concurrently.
    async fn notify(state: &mut MemoryState, event_type: EventType, resource: Resource) {
        let Some(watchers) = state.watchers.get_mut(resource.kind()) else {
            return;
        };

        let mut closed = Vec::new();
        for watcher in watchers.iter() {
            let event = Event {
                event_type,
                resource: resource.clone(),
            };
            if watcher.sender.send(event).await.is_err() {
                closed.push(watcher.id);
            }
        }
        if !closed.is_empty() {
            watchers.retain(|w| !closed.contains(&w.id));
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the structural preconditions shared by create and update.
fn validate(resource: &Resource) -> Result<()> {
    if resource.metadata.name.is_empty() {
        return Err(Error::validation("resource name is required"));
    }
    if resource.metadata.kind.is_empty() {
        return Err(Error::validation("resource kind is required"));
    }
    let tag = resource.spec.kind();
    if tag != resource.metadata.kind {
        return Err(Error::validation(format!(
            "spec variant {} does not match kind {}",
            tag, resource.metadata.kind
        )));
    }
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, kind: &str, name: &str) -> Result<Resource> {
        let state = self.state.read().await;

        let Some(resources) = state.data.get(kind) else {
            debug!(kind = %kind, "Kind not found for get");
            return Err(Error::not_found(kind, name));
        };
        match resources.get(name) {
            Some(resource) => Ok(resource.clone()),
            None => {
                debug!(kind = %kind, name = %name, "Resource not found for get");
                Err(Error::not_found(kind, name))
            }
        }
    }

    async fn list(&self, kind: &str) -> Result<Vec<Resource>> {
        let state = self.state.read().await;

        match state.data.get(kind) {
            Some(resources) => Ok(resources.values().cloned().collect()),
            None => {
                debug!(kind = %kind, "Kind not found for list");
                Ok(Vec::new())
            }
        }
    }

    async fn create(&self, resource: &mut Resource) -> Result<()> {
        validate(resource)?;

        let mut state = self.state.write().await;
        let kind = resource.metadata.kind.clone();
        let name = resource.metadata.name.clone();

        let entries = state.data.entry(kind.clone()).or_default();
        if entries.contains_key(&name) {
            error!(kind = %kind, name = %name, "Resource already exists");
            return Err(Error::already_exists(kind, name));
        }

        resource.metadata.generation = INITIAL_GENERATION;
        entries.insert(name.clone(), resource.clone());

        info!(kind = %kind, name = %name, "Resource created");
        debug!(kind = %kind, name = %name, resource = ?resource, "Created resource state");

        Self::notify(&mut state, EventType::Created, resource.clone()).await;
        Ok(())
    }

    async fn update(&self, resource: &mut Resource) -> Result<()> {
        validate(resource)?;

        let mut state = self.state.write().await;
        let kind = resource.metadata.kind.clone();
        let name = resource.metadata.name.clone();

        let Some(existing) = state.data.get(&kind).and_then(|entries| entries.get(&name)) else {
            error!(kind = %kind, name = %name, "Resource not found for update");
            return Err(Error::not_found(kind, name));
        };

        // Second line of defense behind the ownership wrapper.
        if !existing.metadata.owner.is_empty()
            && existing.metadata.owner != resource.metadata.owner
        {
            error!(
                kind = %kind,
                name = %name,
                owner = %existing.metadata.owner,
                attempted_owner = %resource.metadata.owner,
                "Unauthorized update attempt"
            );
            return Err(Error::ownership(
                kind,
                name,
                existing.metadata.owner.clone(),
                "update",
            ));
        }

        // Check for actual changes before touching the generation.
        if *existing == *resource {
            debug!(kind = %kind, name = %name, "No changes detected in update");
            return Ok(());
        }

        resource.metadata.generation = existing.metadata.generation + 1;

        let diff = diff_resources(existing, resource);
        debug!(kind = %kind, name = %name, diff = %diff, "Resource changes");

        if let Some(entries) = state.data.get_mut(&kind) {
            entries.insert(name.clone(), resource.clone());
        }

        info!(
            kind = %kind,
            name = %name,
            generation = resource.metadata.generation,
            "Resource updated"
        );

        Self::notify(&mut state, EventType::Updated, resource.clone()).await;
        Ok(())
    }

    async fn delete(&self, kind: &str, name: &str) -> Result<()> {
        let mut state = self.state.write().await;

        let Some(entries) = state.data.get_mut(kind) else {
            debug!(kind = %kind, "Kind not found for delete");
            return Err(Error::not_found(kind, name));
        };
        let Some(resource) = entries.get(name) else {
            debug!(kind = %kind, name = %name, "Resource not found for delete");
            return Err(Error::not_found(kind, name));
        };

        if !resource.metadata.finalizers.is_empty() {
            error!(
                kind = %kind,
                name = %name,
                finalizers = ?resource.metadata.finalizers,
                "Resource has pending finalizers"
            );
            return Err(Error::finalizers_pending(kind, name));
        }

        match entries.remove(name) {
            Some(removed) => {
                info!(kind = %kind, name = %name, "Resource deleted");
                Self::notify(&mut state, EventType::Deleted, removed).await;
                Ok(())
            }
            None => Err(Error::not_found(kind, name)),
        }
    }

    async fn watch(&self, kind: &str, cancel: CancellationToken) -> Result<EventStream> {
        let (sender, receiver) = mpsc::channel(self.config.watch_capacity);

        let id = {
            let mut state = self.state.write().await;
            let id = state.next_watcher_id;
            state.next_watcher_id += 1;
            state
                .watchers
                .entry(kind.to_string())
                .or_default()
                .push(Watcher { id, sender });
            id
        };

        // Deregister (and thereby close the stream) once the subscriber's
        // token fires.
        let shared = Arc::clone(&self.state);
        let kind = kind.to_string();
        tokio::spawn(async move {
            cancel.cancelled().await;
            let mut state = shared.write().await;
            if let Some(watchers) = state.watchers.get_mut(&kind) {
                watchers.retain(|w| w.id != id);
                if watchers.is_empty() {
                    state.watchers.remove(&kind);
                }
            }
        });

        Ok(EventStream::new(receiver))
    }
}

/// Render a line diff of two resources for debug logging.
fn diff_resources(old: &Resource, new: &Resource) -> String {
    let old_text = serde_json::to_string_pretty(old).unwrap_or_default();
    let new_text = serde_json::to_string_pretty(new).unwrap_or_default();

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let mut diff = String::new();
    for i in 0..old_lines.len().max(new_lines.len()) {
        let old_line = old_lines.get(i).copied().unwrap_or("");
        let new_line = new_lines.get(i).copied().unwrap_or("");

        if old_line != new_line {
            if !old_line.is_empty() {
                diff.push_str("- ");
                diff.push_str(old_line);
                diff.push('\n');
            }
            if !new_line.is_empty() {
                diff.push_str("+ ");
                diff.push_str(new_line);
                diff.push('\n');
            }
        }
    }

    diff
}
