use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::events::StoreEvent;
use crate::store::ResourceStore;

/// Store listener that records mutations so the owning workspace can
/// rebuild before the mutating call returns.
///
/// Once attached it stays attached; there is no detach.
#[derive(Debug)]
pub struct ChangeMonitor {
    pending: Arc<AtomicUsize>,
}

impl ChangeMonitor {
    /// Subscribes to every add, update and delete on `store`.
    pub fn attach(store: &mut ResourceStore) -> Self {
        let pending = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pending);
        store.subscribe(move |_: &StoreEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        Self { pending }
    }

    /// Number of store events seen since the last call, resetting it.
    pub fn take_pending(&self) -> usize {
        self.pending.swap(0, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resource;
    use crate::uri::Uri;

    #[test]
    fn counts_every_store_event() {
        let mut store = ResourceStore::default();
        let monitor = ChangeMonitor::attach(&mut store);

        let uri = Uri::file("/a.md");
        store.set(Resource::attachment(uri.clone()));
        store.set(Resource::attachment(uri.clone()));
        store.delete(&uri);
        store.delete(&uri);

        assert_eq!(monitor.take_pending(), 3);
        assert_eq!(monitor.take_pending(), 0);
    }
}
