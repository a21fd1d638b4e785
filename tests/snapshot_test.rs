use std::fs;

use notegraph::config::WorkspaceConfig;
use notegraph::errors::GraphError;
use notegraph::snapshot::*;
use notegraph::types::*;
use notegraph::uri::Uri;
use notegraph::Workspace;
use tempfile::TempDir;

/// Helper: the snapshot used by most tests, written as the parser would.
fn sample_snapshot() -> Snapshot {
    Snapshot {
        resources: vec![
            Resource::note(
                Uri::file("/notes/index.md"),
                "Index",
                vec![
                    RawLink::wikilink("todo", Range::new(3, 0, 3, 8)),
                    RawLink::wikilink("ideas", Range::new(5, 2, 5, 11)),
                ],
                Vec::new(),
            ),
            Resource::note(Uri::file("/notes/todo.md"), "Todo", Vec::new(), Vec::new()),
            Resource::note(
                Uri::file("/site/_layouts/base.md"),
                "Layout",
                Vec::new(),
                Vec::new(),
            ),
            Resource::attachment(Uri::file("/.git/HEAD")),
        ],
    }
}

#[test]
fn test_save_and_load_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    let snapshot = sample_snapshot();
    save_snapshot(&path, &snapshot).unwrap();

    let config = WorkspaceConfig {
        exclude: Vec::new(),
        ..WorkspaceConfig::default()
    };
    let loaded = load_snapshot(&path, &config).unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_load_applies_excludes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    save_snapshot(&path, &sample_snapshot()).unwrap();

    let loaded = load_snapshot(&path, &WorkspaceConfig::default()).unwrap();
    let paths: Vec<&str> = loaded.resources.iter().map(|r| r.uri().path()).collect();
    assert_eq!(paths, vec!["/notes/index.md", "/notes/todo.md"]);
}

#[test]
fn test_load_reports_unreadable_snapshot() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        load_snapshot(&missing, &WorkspaceConfig::default()),
        Err(GraphError::Snapshot { .. })
    ));

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "[1, 2, 3]").unwrap();
    match load_snapshot(&garbage, &WorkspaceConfig::default()) {
        Err(GraphError::Snapshot { path, .. }) => assert!(path.ends_with("garbage.json")),
        other => panic!("expected snapshot error, got {other:?}"),
    }
}

#[test]
fn test_export_graph() {
    let ws = Workspace::with_resources(
        WorkspaceConfig::default(),
        sample_snapshot().resources.into_iter().take(2),
    );

    let export = export_graph(&ws);
    let ids: Vec<&str> = export.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["/notes/index.md", "/notes/todo.md", "placeholder://ideas"]
    );
    assert_eq!(export.nodes[2].kind, ResourceKind::Placeholder);
    assert_eq!(export.nodes[1].title, "Todo");

    assert_eq!(
        export.edges,
        vec![
            ExportEdge {
                source: "/notes/index.md".to_string(),
                target: "/notes/todo.md".to_string(),
                line: 3,
            },
            ExportEdge {
                source: "/notes/index.md".to_string(),
                target: "placeholder://ideas".to_string(),
                line: 5,
            },
        ]
    );

    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["nodes"][0]["type"], "note");
}
