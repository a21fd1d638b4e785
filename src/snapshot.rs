use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{should_include_resource, WorkspaceConfig};
use crate::errors::{GraphError, Result};
use crate::types::{Resource, ResourceKind};
use crate::workspace::Workspace;

/// Producer output: every parsed resource with its raw links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub resources: Vec<Resource>,
}

/// Reads a snapshot file, dropping resources excluded by `config`.
pub fn load_snapshot(path: &Path, config: &WorkspaceConfig) -> Result<Snapshot> {
    let contents = fs::read_to_string(path).map_err(|e| GraphError::Snapshot {
        message: format!("failed to read snapshot: {e}"),
        path: path.display().to_string(),
    })?;
    let mut snapshot: Snapshot =
        serde_json::from_str(&contents).map_err(|e| GraphError::Snapshot {
            message: format!("failed to parse snapshot: {e}"),
            path: path.display().to_string(),
        })?;

    let before = snapshot.resources.len();
    snapshot
        .resources
        .retain(|r| should_include_resource(r.uri().path(), config));
    debug!(
        path = %path.display(),
        kept = snapshot.resources.len(),
        excluded = before - snapshot.resources.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Writes a snapshot as pretty-printed JSON.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// A node of the exported graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
}

/// An edge of the exported graph, one per connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub line: u32,
}

/// The resolved graph in a renderer-friendly shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

/// Exports every stored resource (placeholders included) and every
/// connection of the workspace.
pub fn export_graph(workspace: &Workspace) -> GraphExport {
    let nodes = workspace
        .list()
        .into_iter()
        .map(|r| ExportNode {
            id: r.uri().to_string(),
            kind: r.kind(),
            title: r.title().to_string(),
        })
        .collect();
    let edges = workspace
        .all()
        .iter()
        .map(|c| ExportEdge {
            source: c.source.to_string(),
            target: c.target.to_string(),
            line: c.link.range().start.line,
        })
        .collect();
    GraphExport { nodes, edges }
}
