//! Store decorator that enforces single-owner mutation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::event::EventStream;
use crate::resource::Resource;
use crate::store::Store;

/// Wraps a [`Store`] with a fixed owner chosen at construction.
///
/// Creates stamp the owner onto the resource; updates and deletes are
/// refused when the stored resource belongs to someone else. Reads and
/// watches pass through unfiltered.
pub struct OwnershipStore {
    inner: Arc<dyn Store>,
    owner: String,
}

impl OwnershipStore {
    /// Create a new ownership wrapper around `inner`.
    pub fn new(inner: Arc<dyn Store>, owner: impl Into<String>) -> Self {
        Self {
            inner,
            owner: owner.into(),
        }
    }

    /// The owner this wrapper stamps and enforces.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

#[async_trait]
impl Store for OwnershipStore {
    async fn get(&self, kind: &str, name: &str) -> Result<Resource> {
        self.inner.get(kind, name).await
    }

    async fn list(&self, kind: &str) -> Result<Vec<Resource>> {
        self.inner.list(kind).await
    }

    async fn create(&self, resource: &mut Resource) -> Result<()> {
        if !resource.metadata.owner.is_empty() && resource.metadata.owner != self.owner {
            return Err(Error::ownership(
                resource.kind(),
                resource.name(),
                resource.metadata.owner.clone(),
                "create",
            ));
        }
        resource.metadata.owner = self.owner.clone();

        self.inner.create(resource).await
    }

    async fn update(&self, resource: &mut Resource) -> Result<()> {
        let existing = self.inner.get(resource.kind(), resource.name()).await?;

        if !existing.metadata.owner.is_empty() && existing.metadata.owner != self.owner {
            return Err(Error::ownership(
                resource.kind(),
                resource.name(),
                existing.metadata.owner,
                "update",
            ));
        }

        // Preserve ownership across the write.
        resource.metadata.owner = self.owner.clone();

        self.inner.update(resource).await
    }

    async fn delete(&self, kind: &str, name: &str) -> Result<()> {
        let existing = self.inner.get(kind, name).await?;

        if existing.metadata.owner != self.owner {
            return Err(Error::ownership(
                kind,
                name,
                existing.metadata.owner,
                "delete",
            ));
        }

        self.inner.delete(kind, name).await
    }

    async fn watch(&self, kind: &str, cancel: CancellationToken) -> Result<EventStream> {
        self.inner.watch(kind, cancel).await
    }
}
