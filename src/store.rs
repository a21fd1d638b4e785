use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use crate::config::{AmbiguityPolicy, WorkspaceConfig};
use crate::errors::{GraphError, Result};
use crate::events::{Emitter, ListenerId, StoreEvent};
use crate::resolution::{classify, Reference, ReferenceKind};
use crate::types::Resource;
use crate::uri::{basename, normalize_path, strip_extension, Uri};

/// All known resources, keyed by normalized identity.
///
/// Besides the primary map the store keeps a name index from basename (with
/// and without extension) to keys, so key lookups only inspect resources that
/// can possibly match. Placeholders live in the same map but are never
/// indexed by name: they are not candidates for key lookups.
#[derive(Debug)]
pub struct ResourceStore {
    case_sensitive: bool,
    default_extension: String,
    ambiguity: AmbiguityPolicy,
    resources: BTreeMap<String, Resource>,
    names: HashMap<String, BTreeSet<String>>,
    on_change: Emitter<StoreEvent>,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new(&WorkspaceConfig::default())
    }
}

impl ResourceStore {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            default_extension: config.default_extension.clone(),
            ambiguity: config.ambiguity,
            resources: BTreeMap::new(),
            names: HashMap::new(),
            on_change: Emitter::new(),
        }
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Inserts or replaces the resource at its identity and notifies
    /// listeners with `Added` or `Updated`.
    pub fn set(&mut self, resource: Resource) -> &mut Self {
        let key = self.key(resource.uri());
        let previous = self.resources.insert(key.clone(), resource.clone());
        if let Some(old) = previous.as_ref().filter(|old| !old.is_placeholder()) {
            self.unindex_name(&key, old.uri());
        }
        if !resource.is_placeholder() {
            self.index_name(&key, resource.uri());
        }
        let event = match previous {
            Some(old) => StoreEvent::Updated { old, new: resource },
            None => StoreEvent::Added { resource },
        };
        trace!(event = event.as_str(), "resource stored");
        self.on_change.fire(&event);
        self
    }

    /// Removes the resource at `uri`, notifying listeners with `Deleted`.
    /// Returns `None` without firing anything when nothing was stored.
    pub fn delete(&mut self, uri: &Uri) -> Option<Resource> {
        let removed = self.remove_entry(uri)?;
        trace!(uri = %uri, "resource deleted");
        self.on_change.fire(&StoreEvent::Deleted {
            resource: removed.clone(),
        });
        Some(removed)
    }

    /// Returns the resource at `uri`, failing with `NotFound` if absent.
    pub fn get(&self, uri: &Uri) -> Result<&Resource> {
        self.resources
            .get(&self.key(uri))
            .ok_or_else(|| GraphError::NotFound {
                uri: uri.to_string(),
            })
    }

    pub fn exists(&self, uri: &Uri) -> bool {
        self.resources.contains_key(&self.key(uri))
    }

    /// Looks up a resource by identity, key or absolute path. Never fails.
    ///
    /// Keys go through the same candidate search and tie-break as wikilink
    /// resolution, so a lookup and a link with the same text agree. Relative
    /// paths have no base directory here and find nothing.
    pub fn find(&self, reference: impl Into<Reference>) -> Option<&Resource> {
        let reference = reference.into();
        match (&reference, classify(&reference)) {
            (Reference::Uri(uri), _) => self.resources.get(&self.key(uri)),
            (Reference::Text(text), ReferenceKind::Key) => {
                self.find_by_identifier(strip_fragment(text))
            }
            (Reference::Text(text), ReferenceKind::AbsolutePath) => {
                self.find_path(&Uri::file(strip_fragment(text)))
            }
            _ => None,
        }
    }

    /// All resources in key order. The order is stable for a given store
    /// state.
    pub fn list(&self) -> Vec<&Resource> {
        self.resources.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Registers a synchronous listener for store mutations.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + Send + 'static) -> ListenerId {
        self.on_change.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.on_change.unsubscribe(id)
    }

    /// Every non-placeholder resource matching `identifier` by path suffix,
    /// sorted by path ascending.
    ///
    /// A resource matches when its path ends with `/identifier` on a segment
    /// boundary, or does so once its extension is removed.
    pub fn list_by_identifier(&self, identifier: &str) -> Vec<&Resource> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Vec::new();
        }
        let needle = normalize_path(&format!("/{identifier}"));
        let needle = self.fold(&needle);
        let Some(keys) = self.names.get(basename(&needle)) else {
            return Vec::new();
        };

        let mut matches: Vec<&Resource> = keys
            .iter()
            .filter_map(|key| self.resources.get(key))
            .filter(|resource| {
                let folded = self.fold(resource.uri().path());
                let path = anchored(&folded);
                path.ends_with(&*needle) || strip_extension(&path).ends_with(&*needle)
            })
            .collect();
        matches.sort_by(|a, b| a.uri().path().cmp(b.uri().path()));
        matches
    }

    /// Resolves a key to a single resource, applying the configured
    /// ambiguity policy.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Resource> {
        let candidates = self.list_by_identifier(identifier);
        match (candidates.len(), self.ambiguity) {
            (0, _) => None,
            (1, _) | (_, AmbiguityPolicy::Alphabetical) => candidates.first().copied(),
            (_, AmbiguityPolicy::Unresolved) => None,
        }
    }

    /// The shortest key that resolves back to `uri`.
    ///
    /// The extension is dropped whenever the shorter key still resolves back
    /// to `uri`. Falls back to the full path, which always
    /// resolves as an absolute path.
    pub fn identifier_for(&self, uri: &Uri) -> String {
        let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
        let target_key = self.key(uri);

        for drop_extension in [true, false] {
            for take in 1..=segments.len() {
                let mut candidate = segments[segments.len() - take..].join("/");
                if drop_extension {
                    let stripped = strip_extension(&candidate);
                    if stripped.len() == candidate.len() {
                        continue;
                    }
                    candidate = stripped.to_string();
                }
                let resolves_back = self
                    .find_by_identifier(&candidate)
                    .is_some_and(|found| self.key(found.uri()) == target_key);
                if resolves_back {
                    return candidate;
                }
            }
        }

        uri.path().to_string()
    }

    /// Looks up a path, then the path with the default extension appended
    /// when it has none.
    pub(crate) fn find_path(&self, uri: &Uri) -> Option<&Resource> {
        if let Some(found) = self.resources.get(&self.key(uri)) {
            return Some(found);
        }
        if uri.extension().is_none() {
            let with_ext = uri.with_suffix(&self.default_extension);
            return self.resources.get(&self.key(&with_ext));
        }
        None
    }

    /// Identities of every placeholder currently stored.
    pub fn placeholder_uris(&self) -> Vec<Uri> {
        self.resources
            .values()
            .filter(|r| r.is_placeholder())
            .map(|r| r.uri().clone())
            .collect()
    }

    /// Inserts a placeholder without notifying listeners. Does nothing if
    /// the identity is already taken.
    pub(crate) fn insert_placeholder(&mut self, uri: Uri) -> bool {
        let key = self.key(&uri);
        if self.resources.contains_key(&key) {
            return false;
        }
        self.resources.insert(key, Resource::placeholder(uri));
        true
    }

    /// Removes a resource without notifying listeners.
    pub(crate) fn remove_silently(&mut self, uri: &Uri) -> Option<Resource> {
        self.remove_entry(uri)
    }

    pub(crate) fn key(&self, uri: &Uri) -> String {
        uri.key(self.case_sensitive)
    }

    fn remove_entry(&mut self, uri: &Uri) -> Option<Resource> {
        let key = self.key(uri);
        let removed = self.resources.remove(&key)?;
        if !removed.is_placeholder() {
            self.unindex_name(&key, removed.uri());
        }
        Some(removed)
    }

    fn fold<'s>(&self, text: &'s str) -> Cow<'s, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    fn name_entries(&self, uri: &Uri) -> Vec<String> {
        let name = self.fold(uri.basename()).into_owned();
        let stem = strip_extension(&name).to_string();
        if stem == name {
            vec![name]
        } else {
            vec![name, stem]
        }
    }

    fn index_name(&mut self, key: &str, uri: &Uri) {
        for name in self.name_entries(uri) {
            self.names.entry(name).or_default().insert(key.to_string());
        }
    }

    fn unindex_name(&mut self, key: &str, uri: &Uri) {
        for name in self.name_entries(uri) {
            if let Some(keys) = self.names.get_mut(&name) {
                keys.remove(key);
                if keys.is_empty() {
                    self.names.remove(&name);
                }
            }
        }
    }
}

/// Roots a path at `/` so bare producer paths such as `b.md` still match
/// keys on a segment boundary.
fn anchored(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Drops a `#section` suffix from a reference.
pub(crate) fn strip_fragment(text: &str) -> &str {
    match text.find('#') {
        Some(idx) => &text[..idx],
        None => text,
    }
}
