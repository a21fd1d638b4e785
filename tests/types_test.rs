use notegraph::types::*;
use notegraph::uri::Uri;

#[test]
fn resource_kind_as_str_roundtrip() {
    let kinds = vec![
        ResourceKind::Note,
        ResourceKind::Attachment,
        ResourceKind::Placeholder,
    ];

    for kind in kinds {
        let s = kind.as_str();
        let parsed = ResourceKind::from_str(s)
            .unwrap_or_else(|| panic!("failed to parse ResourceKind from '{}'", s));
        assert_eq!(kind, parsed, "roundtrip failed for ResourceKind::{}", s);
    }
}

#[test]
fn resource_kind_from_str_unknown_returns_none() {
    assert!(ResourceKind::from_str("folder").is_none());
    assert!(ResourceKind::from_str("").is_none());
}

#[test]
fn positions_order_by_line_then_column() {
    assert!(Position::new(1, 9) < Position::new(2, 0));
    assert!(Position::new(3, 1) < Position::new(3, 4));
}

#[test]
fn links_in_document_order_is_stable() {
    let note = Resource::note(
        Uri::file("/a.md"),
        "A",
        vec![
            RawLink::wikilink("third", Range::new(4, 0, 4, 9)),
            RawLink::wikilink("first", Range::new(1, 2, 1, 11)),
            RawLink::direct("./second.md", "same start", Range::new(2, 0, 2, 20)),
            RawLink::wikilink("second-b", Range::new(2, 0, 2, 12)),
        ],
        Vec::new(),
    );

    let order: Vec<&str> = note
        .links_in_document_order()
        .into_iter()
        .map(RawLink::target_text)
        .collect();
    assert_eq!(order, vec!["first", "./second.md", "second-b", "third"]);
}

#[test]
fn only_notes_carry_links_and_definitions() {
    let attachment = Resource::attachment(Uri::file("/img/logo.png"));
    assert!(attachment.links().is_empty());
    assert!(attachment.definitions().is_empty());
    assert_eq!(attachment.kind(), ResourceKind::Attachment);
}

#[test]
fn title_falls_back_to_basename() {
    let untitled = Resource::note(Uri::file("/notes/daily.md"), "", Vec::new(), Vec::new());
    assert_eq!(untitled.title(), "daily.md");

    let titled = Resource::note(Uri::file("/notes/daily.md"), "Daily", Vec::new(), Vec::new());
    assert_eq!(titled.title(), "Daily");

    let placeholder = Resource::placeholder(Uri::placeholder("missing"));
    assert_eq!(placeholder.title(), "missing");
    assert!(placeholder.is_placeholder());
}

#[test]
fn resource_deserializes_from_parser_output() {
    let json = r#"{
        "type": "note",
        "uri": "/path/to/page-a.md",
        "title": "Page A",
        "links": [
            { "type": "wikilink", "slug": "page-b",
              "range": { "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 10 } } },
            { "type": "direct_link", "target": "https://example.com",
              "range": { "start": { "line": 2, "column": 0 }, "end": { "line": 2, "column": 30 } } }
        ],
        "definitions": [ { "label": "page-b", "url": "./more/page-b.md" } ]
    }"#;

    let resource: Resource = serde_json::from_str(json).unwrap();
    assert_eq!(resource.uri(), &Uri::file("/path/to/page-a.md"));
    assert_eq!(resource.links().len(), 2);
    assert_eq!(
        resource.links()[1],
        RawLink::direct("https://example.com", "", Range::new(2, 0, 2, 30))
    );
    assert_eq!(
        resource.definitions(),
        &[Definition::new("page-b", "./more/page-b.md")]
    );
}

#[test]
fn minimal_attachment_json() {
    let resource: Resource =
        serde_json::from_str(r#"{ "type": "attachment", "uri": "/img/logo.png" }"#).unwrap();
    assert_eq!(resource, Resource::attachment(Uri::file("/img/logo.png")));
}

#[test]
fn placeholder_identity_survives_serialization() {
    let connection = Connection {
        source: Uri::file("/a.md"),
        target: Uri::placeholder("https://example.com/page"),
        link: RawLink::direct("https://example.com/page", "site", Range::new(1, 0, 1, 32)),
    };

    let json = serde_json::to_string(&connection).unwrap();
    assert!(json.contains("placeholder://https://example.com/page"));
    let back: Connection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, connection);
}
