use std::collections::HashSet;

use tracing::trace;

use crate::store::ResourceStore;
use crate::uri::Uri;

/// Placeholders inserted into and retired from the store by one reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderChanges {
    pub added: Vec<Uri>,
    pub removed: Vec<Uri>,
}

/// Brings the store's placeholders in line with the ones the current
/// connections reference.
///
/// Stored placeholders nothing points at are retired; referenced ones not yet
/// stored are inserted. Neither direction notifies store listeners, so a
/// monitored workspace does not rebuild again in response.
pub(crate) fn reconcile(store: &mut ResourceStore, referenced: &[Uri]) -> PlaceholderChanges {
    let wanted: HashSet<String> = referenced.iter().map(|uri| store.key(uri)).collect();
    let mut changes = PlaceholderChanges::default();

    for uri in store.placeholder_uris() {
        if !wanted.contains(&store.key(&uri)) && store.remove_silently(&uri).is_some() {
            trace!(uri = %uri, "placeholder retired");
            changes.removed.push(uri);
        }
    }

    for uri in referenced {
        if store.insert_placeholder(uri.clone()) {
            trace!(uri = %uri, "placeholder created");
            changes.added.push(uri.clone());
        }
    }

    changes
}
