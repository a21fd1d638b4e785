use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::{ResolutionMode, WorkspaceConfig};
use crate::errors::Result;
use crate::events::{Emitter, ListenerId, StoreEvent, WorkspaceEvent};
use crate::graph::{
    ChangeMonitor, ConnectionIndex, GraphQueryManager, GraphTraverser, Neighborhood,
    RebuildStats, ResourceMetrics, TraversalDirection,
};
use crate::resolution::{LinkResolver, Reference};
use crate::store::ResourceStore;
use crate::types::*;
use crate::uri::Uri;

/// Capacity of the broadcast channel returned by [`Workspace::subscribe`].
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

type Outbox = Arc<Mutex<Vec<StoreEvent>>>;

/// Owner of all graph state: the resource store, the connection index and
/// the optional change monitor.
///
/// Mutations go through `&mut Workspace`, so there is exactly one writer.
/// Every mutation is republished as a [`WorkspaceEvent`] to synchronous
/// listeners and to broadcast subscribers, followed by `GraphChanged` when
/// the graph was re-resolved.
pub struct Workspace {
    config: WorkspaceConfig,
    store: ResourceStore,
    graph: ConnectionIndex,
    monitor: Option<ChangeMonitor>,
    outbox: Outbox,
    listeners: Emitter<WorkspaceEvent>,
    events: broadcast::Sender<WorkspaceEvent>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Workspace {
    /// Creates an empty workspace. A `Monitored` mode in the configuration
    /// enables the change monitor right away.
    pub fn new(config: WorkspaceConfig) -> Self {
        let mut store = ResourceStore::new(&config);
        let outbox: Outbox = Arc::new(Mutex::new(Vec::new()));
        let relay = Arc::clone(&outbox);
        store.subscribe(move |event: &StoreEvent| {
            if let Ok(mut queue) = relay.lock() {
                queue.push(event.clone());
            }
        });
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut workspace = Self {
            graph: ConnectionIndex::new(config.case_sensitive),
            store,
            monitor: None,
            outbox,
            listeners: Emitter::new(),
            events,
            config,
        };
        if workspace.config.mode == ResolutionMode::Monitored {
            workspace.monitor();
        }
        info!(
            mode = ?workspace.config.mode,
            ambiguity = ?workspace.config.ambiguity,
            "workspace created"
        );
        workspace
    }

    /// Creates a workspace holding `resources` with the graph already built.
    pub fn with_resources(
        config: WorkspaceConfig,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Self {
        let mut workspace = Self::new(config);
        // Bulk load straight into the store and resolve once at the end.
        for resource in resources {
            workspace.store.set(resource);
        }
        workspace.drain_outbox();
        if let Some(monitor) = &workspace.monitor {
            monitor.take_pending();
        }
        workspace.rebuild();
        debug!(
            monitored = workspace.is_monitored(),
            resources = workspace.store.len(),
            "workspace loaded"
        );
        workspace
    }

    /// Enables monitored resolution for the rest of this workspace's life
    /// and brings the graph up to date. Calling it again does nothing.
    pub fn monitor(&mut self) -> &mut Self {
        if self.monitor.is_none() {
            self.monitor = Some(ChangeMonitor::attach(&mut self.store));
            self.config.mode = ResolutionMode::Monitored;
            info!("change monitor enabled");
            self.rebuild();
        }
        self
    }

    pub fn is_monitored(&self) -> bool {
        self.monitor.is_some()
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn graph(&self) -> &ConnectionIndex {
        &self.graph
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

impl Workspace {
    /// Inserts or replaces a resource. In monitored mode the graph is rebuilt
    /// before this returns.
    pub fn set(&mut self, resource: Resource) -> &mut Self {
        self.store.set(resource);
        self.after_mutation();
        self
    }

    /// Removes a resource. In monitored mode the graph is rebuilt before
    /// this returns.
    pub fn delete(&mut self, uri: &Uri) -> Option<Resource> {
        let removed = self.store.delete(uri);
        self.after_mutation();
        removed
    }

    /// Re-resolves every link, replacing connections and placeholders, and
    /// publishes `GraphChanged`.
    pub fn rebuild(&mut self) -> RebuildStats {
        let stats = self.graph.rebuild(&mut self.store, &self.config);
        self.publish(WorkspaceEvent::GraphChanged {
            connections: stats.connections,
            placeholders: stats.placeholders,
        });
        stats
    }

    /// Registers a synchronous listener for workspace events.
    pub fn on_event(
        &mut self,
        listener: impl FnMut(&WorkspaceEvent) + Send + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Returns a receiver for workspace events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// Rebuilds first when monitored, so that every store event below is
    /// observed with the graph already consistent.
    fn after_mutation(&mut self) {
        let pending = self
            .monitor
            .as_ref()
            .map_or(0, ChangeMonitor::take_pending);
        let stats = (pending > 0).then(|| self.graph.rebuild(&mut self.store, &self.config));

        for event in self.drain_outbox() {
            self.publish(event.into());
        }
        if let Some(stats) = stats {
            self.publish(WorkspaceEvent::GraphChanged {
                connections: stats.connections,
                placeholders: stats.placeholders,
            });
        }
    }

    fn drain_outbox(&self) -> Vec<StoreEvent> {
        self.outbox
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }

    fn publish(&mut self, event: WorkspaceEvent) {
        self.listeners.fire(&event);
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

// ---------------------------------------------------------------------------
// Query delegation
// ---------------------------------------------------------------------------

impl Workspace {
    /// Returns the resource at `uri`, failing with `NotFound` if absent.
    pub fn get(&self, uri: &Uri) -> Result<&Resource> {
        self.store.get(uri)
    }

    /// Looks up by identity, key or absolute path. Never fails.
    pub fn find(&self, reference: impl Into<Reference>) -> Option<&Resource> {
        self.store.find(reference)
    }

    pub fn exists(&self, uri: &Uri) -> bool {
        self.store.exists(uri)
    }

    pub fn list(&self) -> Vec<&Resource> {
        self.store.list()
    }

    /// Resolves a single link against the current store without touching
    /// the index.
    pub fn resolve(&self, source: &Resource, link: &RawLink) -> Uri {
        LinkResolver::new(&self.store, &self.config).resolve(source, link)
    }

    pub fn links_from(&self, uri: &Uri) -> Vec<Uri> {
        self.graph.links_from(uri)
    }

    pub fn links_to(&self, uri: &Uri) -> Vec<Uri> {
        self.graph.links_to(uri)
    }

    pub fn incident(&self, uri: &Uri) -> Vec<&Connection> {
        self.graph.incident(uri)
    }

    pub fn all(&self) -> &[Connection] {
        self.graph.all()
    }

    pub fn placeholders(&self) -> &[Uri] {
        self.graph.placeholders()
    }

    /// Shortest wikilink key that resolves to `uri`.
    pub fn identifier_for(&self, uri: &Uri) -> String {
        self.store.identifier_for(uri)
    }

    /// Notes and attachments with no connections at all.
    pub fn orphans(&self) -> Vec<&Resource> {
        GraphQueryManager::new(&self.store, &self.graph).find_orphans(&[])
    }

    pub fn metrics(&self, uri: &Uri) -> ResourceMetrics {
        GraphQueryManager::new(&self.store, &self.graph).get_resource_metrics(uri)
    }

    pub fn neighborhood(
        &self,
        start: &Uri,
        max_depth: usize,
        direction: TraversalDirection,
    ) -> Neighborhood {
        GraphTraverser::new(&self.graph).neighborhood(start, max_depth, direction)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}
