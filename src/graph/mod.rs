/// Resolved connections with forward and backward adjacency.
pub mod index;

/// Placeholder maintenance performed by every rebuild.
pub mod placeholders;

/// Automatic rebuilds driven by store events.
pub mod monitor;

/// Query operations for analyzing the link graph.
pub mod queries;

/// Graph traversal over resolved connections.
pub mod traversal;

pub use index::{ConnectionIndex, RebuildStats};
pub use monitor::ChangeMonitor;
pub use placeholders::PlaceholderChanges;
pub use queries::{GraphQueryManager, ResourceMetrics};
pub use traversal::{GraphTraverser, Neighborhood, TraversalDirection};
