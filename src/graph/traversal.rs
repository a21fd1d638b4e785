use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::Connection;
use crate::uri::Uri;

use super::index::ConnectionIndex;

/// Direction for graph traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    Outgoing,
    Incoming,
    Both,
}

/// The part of the graph reachable from a starting resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Reached identities in breadth-first order, starting node first.
    pub nodes: Vec<Uri>,
    /// Connections followed to reach them.
    pub connections: Vec<Connection>,
}

/// Breadth-first walks over a connection index.
pub struct GraphTraverser<'a> {
    index: &'a ConnectionIndex,
}

impl<'a> GraphTraverser<'a> {
    pub fn new(index: &'a ConnectionIndex) -> Self {
        Self { index }
    }

    /// Collects everything within `max_depth` hops of `start`.
    ///
    /// Each node is visited once, identities compared by store key. A
    /// connection is recorded when it first reaches a node, so the result is
    /// a spanning forest of the walk.
    pub fn neighborhood(
        &self,
        start: &Uri,
        max_depth: usize,
        direction: TraversalDirection,
    ) -> Neighborhood {
        let case_sensitive = self.index.case_sensitive();
        let mut visited: HashSet<String> = HashSet::new();
        let mut result = Neighborhood::default();
        let mut queue: VecDeque<(Uri, usize)> = VecDeque::new();

        visited.insert(start.key(case_sensitive));
        result.nodes.push(start.clone());
        queue.push_back((start.clone(), 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            for (connection, neighbor) in self.step(&current, direction) {
                if !visited.insert(neighbor.key(case_sensitive)) {
                    continue;
                }
                result.nodes.push(neighbor.clone());
                result.connections.push(connection.clone());
                queue.push_back((neighbor.clone(), depth + 1));
            }
        }

        result
    }

    fn step(&self, uri: &Uri, direction: TraversalDirection) -> Vec<(&'a Connection, &'a Uri)> {
        let mut edges = Vec::new();
        if matches!(
            direction,
            TraversalDirection::Outgoing | TraversalDirection::Both
        ) {
            edges.extend(self.index.connections_from(uri).into_iter().map(|c| (c, &c.target)));
        }
        if matches!(
            direction,
            TraversalDirection::Incoming | TraversalDirection::Both
        ) {
            edges.extend(self.index.connections_to(uri).into_iter().map(|c| (c, &c.source)));
        }
        edges
    }
}
