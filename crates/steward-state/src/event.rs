//! Change notification types for store watchers.

use tokio::sync::mpsc;

use crate::resource::Resource;

/// What happened to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Created,
    Updated,
    Deleted,
}

/// A single change observed on a watched kind.
///
/// The carried resource is an independent snapshot taken at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: EventType,
    pub resource: Resource,
}

/// Receiving half of a watch registration.
///
/// The stream yields events in commit order and closes when the
/// subscriber's cancellation token fires or the store drops the watcher.
#[derive(Debug)]
pub struct EventStream {
    receiver: mpsc::Receiver<Event>,
}

impl EventStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Receive the next event. Returns `None` once the stream is closed.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Receive an event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}
