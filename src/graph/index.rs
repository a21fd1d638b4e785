use std::collections::HashMap;

use tracing::debug;

use crate::config::WorkspaceConfig;
use crate::resolution::LinkResolver;
use crate::store::ResourceStore;
use crate::types::*;
use crate::uri::Uri;

use super::placeholders;

/// Counts describing one rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub connections: usize,
    pub resolved: usize,
    pub placeholders: usize,
    pub placeholders_added: usize,
    pub placeholders_removed: usize,
}

/// Forward and backward adjacency over the resolved connections.
///
/// Connections are kept in a single arena in rebuild order; the adjacency
/// maps hold indices into it, keyed by normalized identity.
#[derive(Debug, Clone, Default)]
pub struct ConnectionIndex {
    case_sensitive: bool,
    connections: Vec<Connection>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
    placeholders: Vec<Uri>,
}

impl ConnectionIndex {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    /// Whether identities differing only in case are distinct.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Builds an index from a finished resolution pass.
    pub fn from_resolution(result: ResolutionResult, case_sensitive: bool) -> Self {
        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, connection) in result.connections.iter().enumerate() {
            outgoing
                .entry(connection.source.key(case_sensitive))
                .or_default()
                .push(idx);
            incoming
                .entry(connection.target.key(case_sensitive))
                .or_default()
                .push(idx);
        }

        Self {
            case_sensitive,
            connections: result.connections,
            outgoing,
            incoming,
            placeholders: result.placeholders,
        }
    }

    /// Re-resolves every link in the store and replaces this index.
    ///
    /// The new index is assembled aside and swapped in at the end, and the
    /// store's placeholders are reconciled against the links that need
    /// them, so afterwards every connection target is stored.
    pub fn rebuild(&mut self, store: &mut ResourceStore, config: &WorkspaceConfig) -> RebuildStats {
        let result = LinkResolver::new(store, config).resolve_all(store.iter());
        let changes = placeholders::reconcile(store, &result.placeholders);

        let stats = RebuildStats {
            connections: result.total,
            resolved: result.resolved_count,
            placeholders: result.placeholders.len(),
            placeholders_added: changes.added.len(),
            placeholders_removed: changes.removed.len(),
        };
        debug!(
            connections = stats.connections,
            resolved = stats.resolved,
            placeholders = stats.placeholders,
            added = stats.placeholders_added,
            removed = stats.placeholders_removed,
            "connection index rebuilt"
        );

        *self = Self::from_resolution(result, self.case_sensitive);
        stats
    }

    /// Targets linked from `uri`, in the source's document order.
    pub fn links_from(&self, uri: &Uri) -> Vec<Uri> {
        self.connections_from(uri)
            .into_iter()
            .map(|c| c.target.clone())
            .collect()
    }

    /// Sources linking to `uri`, grouped by source in rebuild order with
    /// one entry per link.
    pub fn links_to(&self, uri: &Uri) -> Vec<Uri> {
        self.connections_to(uri)
            .into_iter()
            .map(|c| c.source.clone())
            .collect()
    }

    pub fn connections_from(&self, uri: &Uri) -> Vec<&Connection> {
        self.lookup(&self.outgoing, uri)
    }

    pub fn connections_to(&self, uri: &Uri) -> Vec<&Connection> {
        self.lookup(&self.incoming, uri)
    }

    /// Every connection touching `uri`: outgoing first, then incoming.
    pub fn incident(&self, uri: &Uri) -> Vec<&Connection> {
        let mut result = self.connections_from(uri);
        result.extend(self.connections_to(uri));
        result
    }

    /// All connections in rebuild order.
    pub fn all(&self) -> &[Connection] {
        &self.connections
    }

    /// Placeholder identities referenced by the current connections.
    pub fn placeholders(&self) -> &[Uri] {
        &self.placeholders
    }

    /// Whether any connection starts or ends at `uri`.
    pub fn contains(&self, uri: &Uri) -> bool {
        let key = uri.key(self.case_sensitive);
        self.outgoing.contains_key(&key) || self.incoming.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn lookup(&self, adjacency: &HashMap<String, Vec<usize>>, uri: &Uri) -> Vec<&Connection> {
        adjacency
            .get(&uri.key(self.case_sensitive))
            .map(|indices| indices.iter().map(|&i| &self.connections[i]).collect())
            .unwrap_or_default()
    }
}
