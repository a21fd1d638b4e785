use serde::{Deserialize, Serialize};

use crate::uri::Uri;

/// Kinds of resources held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Note,
    Attachment,
    Placeholder,
}

#[allow(clippy::should_implement_trait)]
impl ResourceKind {
    /// Returns the string representation of this resource kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Note => "note",
            ResourceKind::Attachment => "attachment",
            ResourceKind::Placeholder => "placeholder",
        }
    }

    /// Parses a string into a `ResourceKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<ResourceKind> {
        match s {
            "note" => Some(ResourceKind::Note),
            "attachment" => Some(ResourceKind::Attachment),
            "placeholder" => Some(ResourceKind::Placeholder),
            _ => None,
        }
    }
}

/// A 1-based document coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Start and end of a link inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start: Position::new(start_line, start_column),
            end: Position::new(end_line, end_column),
        }
    }
}

/// A link as produced by the document parser, before resolution.
///
/// The range is carried for ordering and presentation only; it never
/// influences which target a link resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawLink {
    Wikilink {
        slug: String,
        range: Range,
    },
    DirectLink {
        target: String,
        #[serde(default)]
        label: String,
        range: Range,
    },
}

impl RawLink {
    pub fn wikilink(slug: impl Into<String>, range: Range) -> Self {
        RawLink::Wikilink {
            slug: slug.into(),
            range,
        }
    }

    pub fn direct(target: impl Into<String>, label: impl Into<String>, range: Range) -> Self {
        RawLink::DirectLink {
            target: target.into(),
            label: label.into(),
            range,
        }
    }

    pub fn range(&self) -> Range {
        match self {
            RawLink::Wikilink { range, .. } | RawLink::DirectLink { range, .. } => *range,
        }
    }

    /// The reference text as written: the slug or the link target.
    pub fn target_text(&self) -> &str {
        match self {
            RawLink::Wikilink { slug, .. } => slug,
            RawLink::DirectLink { target, .. } => target,
        }
    }
}

/// Note-scoped override mapping a wikilink label to an explicit url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Definition {
    pub label: String,
    pub url: String,
}

impl Definition {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A resource known to the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    Note {
        uri: Uri,
        #[serde(default)]
        title: String,
        #[serde(default)]
        links: Vec<RawLink>,
        #[serde(default)]
        definitions: Vec<Definition>,
    },
    Attachment {
        uri: Uri,
    },
    Placeholder {
        uri: Uri,
    },
}

impl Resource {
    pub fn note(
        uri: Uri,
        title: impl Into<String>,
        links: Vec<RawLink>,
        definitions: Vec<Definition>,
    ) -> Self {
        Resource::Note {
            uri,
            title: title.into(),
            links,
            definitions,
        }
    }

    pub fn attachment(uri: Uri) -> Self {
        Resource::Attachment { uri }
    }

    pub fn placeholder(uri: Uri) -> Self {
        Resource::Placeholder { uri }
    }

    pub fn uri(&self) -> &Uri {
        match self {
            Resource::Note { uri, .. }
            | Resource::Attachment { uri }
            | Resource::Placeholder { uri } => uri,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Note { .. } => ResourceKind::Note,
            Resource::Attachment { .. } => ResourceKind::Attachment,
            Resource::Placeholder { .. } => ResourceKind::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Resource::Placeholder { .. })
    }

    /// Display title: the note title when set, otherwise the basename
    /// (or the raw reference for placeholders).
    pub fn title(&self) -> &str {
        match self {
            Resource::Note { title, uri, .. } if title.is_empty() => uri.basename(),
            Resource::Note { title, .. } => title,
            Resource::Attachment { uri } => uri.basename(),
            Resource::Placeholder { uri } => uri.path(),
        }
    }

    /// Raw links in the order the producer supplied them. Empty for
    /// anything but notes.
    pub fn links(&self) -> &[RawLink] {
        match self {
            Resource::Note { links, .. } => links,
            _ => &[],
        }
    }

    pub fn definitions(&self) -> &[Definition] {
        match self {
            Resource::Note { definitions, .. } => definitions,
            _ => &[],
        }
    }

    /// Raw links sorted by document position. The sort is stable, so links
    /// sharing a start position keep their supplied order.
    pub fn links_in_document_order(&self) -> Vec<&RawLink> {
        let mut links: Vec<&RawLink> = self.links().iter().collect();
        links.sort_by_key(|link| link.range().start);
        links
    }
}

/// A directed edge produced by resolving one raw link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: Uri,
    pub target: Uri,
    pub link: RawLink,
}

/// Result of resolving every raw link in a set of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// One connection per raw link, in resource order then link order.
    pub connections: Vec<Connection>,
    /// Placeholder identities referenced by at least one connection,
    /// deduplicated, in first-reference order.
    pub placeholders: Vec<Uri>,
    /// Number of raw links processed.
    pub total: usize,
    /// Number of links that reached a real resource.
    pub resolved_count: usize,
}
