//! A shared handle for readers that must survive a store rebuild.

use crate::store::ParameterStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Holds the current [`ParameterStore`] for many readers.
///
/// Readers take a snapshot with [`load`](Self::load) and keep using it even
/// if a rebuild happens meanwhile. A rebuild constructs the new store first
/// and then swaps the pointer, so no reader ever sees a half-built store.
#[derive(Debug, Default)]
pub struct SharedParameters {
    current: RwLock<Arc<ParameterStore>>,
}

impl SharedParameters {
    pub fn new(store: ParameterStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Snapshot of the current store.
    pub fn load(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current store, returning the one it replaced.
    pub fn replace(&self, store: ParameterStore) -> Arc<ParameterStore> {
        let next = Arc::new(store);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        info!("parameter store replaced");
        previous
    }

    /// Re-parse an argument vector (program name excluded) and swap it in.
    pub fn reload<I, S>(&self, args: I) -> Arc<ParameterStore>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.replace(ParameterStore::from_args(args))
    }
}

impl From<ParameterStore> for SharedParameters {
    fn from(store: ParameterStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_load_returns_current_store() {
        let shared = SharedParameters::new(ParameterStore::from_args(["-MTK=11"]));
        assert_eq!(shared.load().get_int("-MTK", 0), 11);
    }

    #[test]
    fn test_reload_swaps_whole_store() {
        let shared = SharedParameters::new(ParameterStore::from_args(["-MTK=11", "-bar"]));
        let before = shared.load();

        let previous = shared.reload(["-MTK=12"]);
        assert!(Arc::ptr_eq(&before, &previous));

        let after = shared.load();
        assert_eq!(after.get_int("-MTK", 0), 12);
        assert!(!after.has_option("-bar"));
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let shared = SharedParameters::new(ParameterStore::from_args(["-noMTK"]));
        let snapshot = shared.load();
        shared.reload(["-MTK"]);

        assert!(!snapshot.get_flag("-MTK"));
        assert!(shared.load().get_flag("-MTK"));
    }

    #[test]
    fn test_default_is_empty() {
        let shared = SharedParameters::default();
        assert!(shared.load().is_empty());
    }

    #[test]
    fn test_concurrent_readers_see_complete_stores() {
        let shared = Arc::new(SharedParameters::new(ParameterStore::from_args([
            "-a=1", "-b=1",
        ])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let store = shared.load();
                        assert_eq!(store.get_int("-a", -1), store.get_int("-b", -2));
                    }
                })
            })
            .collect();

        for n in 2..50 {
            let a = format!("-a={}", n);
            let b = format!("-b={}", n);
            shared.reload([a, b]);
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
