//! Kind-parameterized facade over a [`Store`].

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resource::{Metadata, Record, Resource};
use crate::store::Store;

/// Buffered records per typed stream before forwarding blocks.
const TYPED_STREAM_CAPACITY: usize = 100;

/// A resource projected through its registered record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRecord<T> {
    pub metadata: Metadata,
    pub spec: T,
}

impl<T: Record> TypedRecord<T> {
    fn from_resource(resource: Resource) -> Result<Self> {
        let Resource { metadata, spec } = resource;
        match T::from_spec(&spec) {
            Some(inner) => Ok(Self {
                metadata,
                spec: inner.clone(),
            }),
            None => Err(Error::spec_mismatch(T::KIND)),
        }
    }
}

/// Type-safe access to the resources of one kind.
///
/// Works over any [`Store`], including the wrapped stores handed to
/// generators.
pub struct TypedStore<T> {
    store: Arc<dyn Store>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> TypedStore<T> {
    /// Create a typed view over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Retrieve a typed record by name.
    pub async fn get(&self, name: &str) -> Result<TypedRecord<T>> {
        let resource = self.store.get(T::KIND, name).await?;
        TypedRecord::from_resource(resource)
    }

    /// All records of this kind.
    pub async fn list(&self) -> Result<Vec<TypedRecord<T>>> {
        let resources = self.store.list(T::KIND).await?;
        resources
            .into_iter()
            .map(TypedRecord::from_resource)
            .collect()
    }

    /// Create a new resource around `spec`.
    pub async fn create(&self, name: &str, spec: T) -> Result<()> {
        let mut resource = Resource::from_record(name, spec);
        self.store.create(&mut resource).await
    }

    /// Replace the resource named `name` with a fresh envelope around
    /// `spec`.
    ///
    /// The envelope carries no owner, finalizers or labels; callers that
    /// need to preserve such metadata must get, modify and update the full
    /// resource instead.
    pub async fn update(&self, name: &str, spec: T) -> Result<()> {
        let mut resource = Resource::from_record(name, spec);
        self.store.update(&mut resource).await
    }

    /// Remove the resource named `name`.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(T::KIND, name).await
    }

    /// Subscribe to changes of this kind as typed records.
    ///
    /// The event type is intentionally dropped: reconcilers converge on the
    /// latest observed record regardless of how it changed. The stream
    /// closes when `cancel` fires or the underlying watch closes.
    pub async fn watch(&self, cancel: CancellationToken) -> Result<TypedStream<T>> {
        let mut events = self.store.watch(T::KIND, cancel.clone()).await?;
        let (sender, receiver) = mpsc::channel(TYPED_STREAM_CAPACITY);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => return,
                    event = events.recv() => {
                        let Some(event) = event else { return };
                        let record = match TypedRecord::<T>::from_resource(event.resource) {
                            Ok(record) => record,
                            Err(e) => {
                                debug!(error = %e, "Skipping event with foreign spec");
                                continue;
                            }
                        };
                        tokio::select! {
                            () = cancel.cancelled() => return,
                            sent = sender.send(record) => {
                                if sent.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok(TypedStream { receiver })
    }
}

/// Receiving half of a typed watch.
#[derive(Debug)]
pub struct TypedStream<T> {
    receiver: mpsc::Receiver<TypedRecord<T>>,
}

impl<T> TypedStream<T> {
    /// Receive the next record. Returns `None` once the stream is closed.
    pub async fn recv(&mut self) -> Option<TypedRecord<T>> {
        self.receiver.recv().await
    }

    /// Receive a record without waiting.
    pub fn try_recv(&mut self) -> Option<TypedRecord<T>> {
        self.receiver.try_recv().ok()
    }
}
