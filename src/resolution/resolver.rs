use std::collections::HashSet;

use tracing::trace;

use crate::config::WorkspaceConfig;
use crate::store::{strip_fragment, ResourceStore};
use crate::types::*;
use crate::uri::{normalize_path, Uri};

use super::classifier::{classify_text, Reference, ReferenceKind};

/// Outcome of resolving a single raw link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Identity of the target: a stored resource or a placeholder.
    pub target: Uri,
    /// How the (possibly definition-substituted) reference was classified.
    pub kind: ReferenceKind,
    /// Whether a note definition replaced the wikilink slug.
    pub via_definition: bool,
}

impl Resolution {
    pub fn is_placeholder(&self) -> bool {
        self.target.is_placeholder()
    }
}

/// Resolves raw links into target identities against a store snapshot.
///
/// Resolution never fails. Whatever cannot be matched against a stored
/// resource resolves to a placeholder identity instead.
pub struct LinkResolver<'a> {
    store: &'a ResourceStore,
    /// Normalized workspace root; empty when absolute links are taken as-is.
    root: String,
}

impl<'a> LinkResolver<'a> {
    pub fn new(store: &'a ResourceStore, config: &WorkspaceConfig) -> Self {
        let root = normalize_path(config.root_dir.trim());
        let root = if root == "/" { String::new() } else { root };
        Self { store, root }
    }

    /// Resolves one raw link of `source` to its target identity.
    pub fn resolve(&self, source: &Resource, link: &RawLink) -> Uri {
        self.resolve_one(source, link).target
    }

    /// Resolves one raw link, reporting how the target was reached.
    ///
    /// Steps, in order:
    /// 1. A wikilink whose slug, minus any `#section`, equals the label of
    ///    one of the source's definitions is replaced by the definition url
    ///    and re-classified.
    /// 2. Keys are matched by path suffix; several matches are settled by the
    ///    store's ambiguity policy.
    /// 3. Relative paths are resolved against the source's directory.
    /// 4. Absolute paths are resolved against the workspace root.
    /// 5. Identities resolve to themselves when stored.
    pub fn resolve_one(&self, source: &Resource, link: &RawLink) -> Resolution {
        let (reference, via_definition) = match link {
            RawLink::Wikilink { slug, .. } => {
                let label = strip_fragment(slug);
                match source.definitions().iter().find(|def| def.label == label) {
                    Some(def) => (Reference::parse(&def.url), true),
                    None => (Reference::parse(slug), false),
                }
            }
            RawLink::DirectLink { target, .. } => (Reference::parse(target), false),
        };

        let (target, kind) = match reference {
            Reference::Uri(uri) => (self.resolve_uri(&uri), ReferenceKind::Uri),
            Reference::Text(text) => {
                let text = strip_fragment(&text);
                let kind = classify_text(text);
                let target = if text.is_empty() {
                    // `[[#section]]` points into the source itself.
                    source.uri().clone()
                } else {
                    match kind {
                        ReferenceKind::RelativePath => {
                            self.resolve_path(&source.uri().resolve(text))
                        }
                        ReferenceKind::AbsolutePath => self.resolve_absolute(text),
                        ReferenceKind::Key | ReferenceKind::Uri => self.resolve_key(source, text),
                    }
                };
                (target, kind)
            }
        };

        trace!(
            source = %source.uri(),
            reference = link.target_text(),
            kind = kind.as_str(),
            target = %target,
            "resolved link"
        );

        Resolution {
            target,
            kind,
            via_definition,
        }
    }

    /// Resolves every raw link of every resource, in iteration order and
    /// then document order within each resource.
    pub fn resolve_all<'r>(
        &self,
        resources: impl IntoIterator<Item = &'r Resource>,
    ) -> ResolutionResult {
        let mut connections = Vec::new();
        let mut placeholders = Vec::new();
        let mut seen_placeholders: HashSet<String> = HashSet::new();
        let mut resolved_count = 0;

        for resource in resources {
            for link in resource.links_in_document_order() {
                let target = self.resolve(resource, link);
                if target.is_placeholder() {
                    if seen_placeholders.insert(self.store.key(&target)) {
                        placeholders.push(target.clone());
                    }
                } else {
                    resolved_count += 1;
                }
                connections.push(Connection {
                    source: resource.uri().clone(),
                    target,
                    link: link.clone(),
                });
            }
        }

        ResolutionResult {
            total: connections.len(),
            connections,
            placeholders,
            resolved_count,
        }
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    /// Bare wikilink slug. Unmatched slugs with a separator become an
    /// absolute placeholder next to the source; bare ones stay bare.
    fn resolve_key(&self, source: &Resource, slug: &str) -> Uri {
        if let Some(found) = self.store.find_by_identifier(slug) {
            return found.uri().clone();
        }
        if slug.contains('/') {
            Uri::placeholder(source.uri().resolve(slug).path())
        } else {
            Uri::placeholder(slug)
        }
    }

    fn resolve_path(&self, uri: &Uri) -> Uri {
        match self.store.find_path(uri) {
            Some(found) => found.uri().clone(),
            None => Uri::placeholder(uri.path()),
        }
    }

    /// Absolute link: the root-prefixed path wins, the raw path is the
    /// fallback for identities that already carry the root.
    fn resolve_absolute(&self, text: &str) -> Uri {
        let raw = Uri::file(text);
        if self.root.is_empty() {
            return self.resolve_path(&raw);
        }
        let rooted = Uri::file(format!("{}/{}", self.root, text));
        if let Some(found) = self
            .store
            .find_path(&rooted)
            .or_else(|| self.store.find_path(&raw))
        {
            return found.uri().clone();
        }
        Uri::placeholder(rooted.path())
    }

    fn resolve_uri(&self, uri: &Uri) -> Uri {
        if uri.is_placeholder() {
            return uri.clone();
        }
        match self.store.find(uri) {
            Some(found) => found.uri().clone(),
            None => Uri::placeholder(uri.to_string()),
        }
    }
}
