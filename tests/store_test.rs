use std::sync::{Arc, Mutex};

use notegraph::config::WorkspaceConfig;
use notegraph::errors::GraphError;
use notegraph::events::StoreEvent;
use notegraph::store::ResourceStore;
use notegraph::types::*;
use notegraph::uri::Uri;

fn note(path: &str, title: &str) -> Resource {
    Resource::note(Uri::file(path), title, Vec::new(), Vec::new())
}

/// Helper: a store that records the kind of every event it fires.
fn recording_store() -> (ResourceStore, Arc<Mutex<Vec<String>>>) {
    let mut store = ResourceStore::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |event: &StoreEvent| {
        let uri = match event {
            StoreEvent::Added { resource } | StoreEvent::Deleted { resource } => {
                resource.uri().to_string()
            }
            StoreEvent::Updated { new, .. } => new.uri().to_string(),
        };
        sink.lock().unwrap().push(format!("{} {}", event.as_str(), uri));
    });
    (store, seen)
}

#[test]
fn test_set_then_get() {
    let mut store = ResourceStore::default();
    let page = note("/path/to/page-a.md", "Page A");
    store.set(page.clone());

    assert_eq!(store.get(page.uri()).unwrap(), &page);
    assert!(store.exists(page.uri()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_get_missing_fails_with_not_found() {
    let store = ResourceStore::default();
    let uri = Uri::file("/nowhere.md");

    match store.get(&uri) {
        Err(GraphError::NotFound { uri }) => assert_eq!(uri, "/nowhere.md"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(store.find(&uri).is_none());
    assert!(!store.exists(&uri));
}

#[test]
fn test_set_overwrites_and_chains() {
    let mut store = ResourceStore::default();
    store
        .set(note("/a.md", "First"))
        .set(note("/a.md", "Second"))
        .set(note("/b.md", "B"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&Uri::file("/a.md")).unwrap().title(), "Second");
}

#[test]
fn test_events_follow_mutation_order() {
    let (mut store, seen) = recording_store();
    store.set(note("/a.md", "A"));
    store.set(note("/a.md", "A2"));
    store.set(note("/b.md", "B"));
    assert!(store.delete(&Uri::file("/a.md")).is_some());
    assert!(store.delete(&Uri::file("/a.md")).is_none());

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["added /a.md", "updated /a.md", "added /b.md", "deleted /a.md"]
    );
}

#[test]
fn test_list_is_sorted_by_identity() {
    let mut store = ResourceStore::default();
    store.set(note("/c.md", "C"));
    store.set(Resource::attachment(Uri::file("/a.pdf")));
    store.set(note("/b.md", "B"));

    let paths: Vec<&str> = store.list().iter().map(|r| r.uri().path()).collect();
    assert_eq!(paths, vec!["/a.pdf", "/b.md", "/c.md"]);
}

#[test]
fn test_find_by_key_and_path() {
    let mut store = ResourceStore::default();
    store.set(note("/path/to/page-a.md", "A"));
    store.set(note("/path/to/more/page-b.md", "B2"));
    store.set(note("/path/to/another/page-b.md", "B1"));

    assert_eq!(store.find("page-a").unwrap().title(), "A");
    assert_eq!(store.find("page-b").unwrap().title(), "B1");
    assert_eq!(store.find("more/page-b").unwrap().title(), "B2");
    assert_eq!(store.find("/path/to/page-a").unwrap().title(), "A");
    assert_eq!(store.find("/path/to/page-a.md#intro").unwrap().title(), "A");
    assert!(store.find("./page-a").is_none());
    assert!(store.find("page-z").is_none());
}

#[test]
fn test_list_by_identifier_sorts_by_path() {
    let mut store = ResourceStore::default();
    store.set(Resource::attachment(Uri::file("/path/to/more/attachment-a.pdf")));
    store.set(Resource::attachment(Uri::file("/path/to/attachment-a.pdf")));
    store.set(note("/zzz/attachment-a.md", "Z"));

    let paths: Vec<&str> = store
        .list_by_identifier("attachment-a")
        .iter()
        .map(|r| r.uri().path())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/path/to/attachment-a.pdf",
            "/path/to/more/attachment-a.pdf",
            "/zzz/attachment-a.md",
        ]
    );
}

#[test]
fn test_delete_removes_from_key_lookup() {
    let mut store = ResourceStore::default();
    store.set(note("/path/to/page-b.md", "B"));
    assert!(store.find("page-b").is_some());

    store.delete(&Uri::file("/path/to/page-b.md"));
    assert!(store.find("page-b").is_none());
    assert!(store.list_by_identifier("page-b").is_empty());
}

#[test]
fn test_identifier_for_is_shortest_unique_key() {
    let mut store = ResourceStore::default();
    store.set(note("/path/to/page-a.md", "A"));
    store.set(note("/path/to/another/page-b.md", "B1"));
    store.set(note("/path/to/more/page-b.md", "B2"));
    store.set(Resource::attachment(Uri::file("/path/to/attachment-a.pdf")));

    assert_eq!(store.identifier_for(&Uri::file("/path/to/page-a.md")), "page-a");
    assert_eq!(
        store.identifier_for(&Uri::file("/path/to/another/page-b.md")),
        "page-b"
    );
    assert_eq!(
        store.identifier_for(&Uri::file("/path/to/more/page-b.md")),
        "more/page-b"
    );
    assert_eq!(
        store.identifier_for(&Uri::file("/path/to/attachment-a.pdf")),
        "attachment-a"
    );
}

#[test]
fn test_case_insensitive_store_shares_identity() {
    let config = WorkspaceConfig {
        case_sensitive: false,
        ..WorkspaceConfig::default()
    };
    let mut store = ResourceStore::new(&config);
    store.set(note("/Notes/Page.md", "Original"));
    store.set(note("/notes/page.md", "Replaced"));

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&Uri::file("/NOTES/PAGE.md")).unwrap().title(), "Replaced");
    assert_eq!(store.find("PAGE").unwrap().title(), "Replaced");
}
