use std::collections::HashSet;

use crate::store::ResourceStore;
use crate::types::*;
use crate::uri::Uri;

use super::index::ConnectionIndex;

/// Metrics describing the connectivity around a single resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetrics {
    /// Number of incoming connections (one per linking raw link).
    pub incoming_count: usize,
    /// Number of outgoing connections.
    pub outgoing_count: usize,
    /// Outgoing connections that end at a placeholder.
    pub unresolved_count: usize,
    /// Distinct resources linking here.
    pub distinct_sources: usize,
    /// Distinct resources linked from here.
    pub distinct_targets: usize,
}

/// Analytical queries over a store and its connection index.
pub struct GraphQueryManager<'a> {
    store: &'a ResourceStore,
    index: &'a ConnectionIndex,
}

impl<'a> GraphQueryManager<'a> {
    pub fn new(store: &'a ResourceStore, index: &'a ConnectionIndex) -> Self {
        Self { store, index }
    }

    /// Resources with no incoming or outgoing connections.
    ///
    /// Placeholders are never orphans: they only exist while referenced. If
    /// `kinds` is non-empty, only resources of those kinds are reported.
    pub fn find_orphans(&self, kinds: &[ResourceKind]) -> Vec<&'a Resource> {
        self.store
            .iter()
            .filter(|r| !r.is_placeholder())
            .filter(|r| kinds.is_empty() || kinds.contains(&r.kind()))
            .filter(|r| !self.index.contains(r.uri()))
            .collect()
    }

    /// Every referenced placeholder with the number of links pointing at it,
    /// most referenced first, ties by path.
    pub fn find_placeholders(&self) -> Vec<(Uri, usize)> {
        let mut result: Vec<(Uri, usize)> = self
            .index
            .placeholders()
            .iter()
            .map(|uri| (uri.clone(), self.index.connections_to(uri).len()))
            .collect();
        result.sort_by(|(a_uri, a_count), (b_uri, b_count)| {
            b_count.cmp(a_count).then_with(|| a_uri.path().cmp(b_uri.path()))
        });
        result
    }

    pub fn get_resource_metrics(&self, uri: &Uri) -> ResourceMetrics {
        let outgoing = self.index.connections_from(uri);
        let incoming = self.index.connections_to(uri);

        let distinct_targets: HashSet<&Uri> = outgoing.iter().map(|c| &c.target).collect();
        let distinct_sources: HashSet<&Uri> = incoming.iter().map(|c| &c.source).collect();

        ResourceMetrics {
            incoming_count: incoming.len(),
            outgoing_count: outgoing.len(),
            unresolved_count: outgoing
                .iter()
                .filter(|c| c.target.is_placeholder())
                .count(),
            distinct_sources: distinct_sources.len(),
            distinct_targets: distinct_targets.len(),
        }
    }
}
