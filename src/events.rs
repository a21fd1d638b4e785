use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// Handle returned by [`Emitter::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Boxed synchronous event listener.
pub type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Synchronous, ordered event dispatch to registered callbacks.
///
/// Listeners run on the caller's stack in registration order, so they
/// observe events in exactly the order they were fired.
pub struct Emitter<E> {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn fire(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Mutation notifications fired by the resource store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    Added { resource: Resource },
    Updated { old: Resource, new: Resource },
    Deleted { resource: Resource },
}

impl StoreEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreEvent::Added { .. } => "added",
            StoreEvent::Updated { .. } => "updated",
            StoreEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Everything a workspace publishes: the three store mutations plus the
/// aggregate notification sent after the graph has been re-resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    Added { resource: Resource },
    Updated { old: Resource, new: Resource },
    Deleted { resource: Resource },
    GraphChanged { connections: usize, placeholders: usize },
}

impl From<StoreEvent> for WorkspaceEvent {
    fn from(event: StoreEvent) -> Self {
        match event {
            StoreEvent::Added { resource } => WorkspaceEvent::Added { resource },
            StoreEvent::Updated { old, new } => WorkspaceEvent::Updated { old, new },
            StoreEvent::Deleted { resource } => WorkspaceEvent::Deleted { resource },
        }
    }
}
