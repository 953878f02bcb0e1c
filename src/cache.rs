// Caller-owned caches shared between rebuilds and sibling tasks

use crate::bundler::Bundle;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Single-slot cache holding the most recent successful bundle.
///
/// The slot is caller-owned and passed into the task explicitly, so its
/// lifetime is visible at the call site: one slot per watch session, never
/// shared across concurrent invocations. It is consulted only when the
/// context requests cache reuse, written only after a successful watch-mode
/// invocation, and cleared on any failure.
#[derive(Debug, Default)]
pub struct BundleCache {
    slot: Mutex<Option<Bundle>>,
}

impl BundleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current slot value, cloned as an incremental bundling hint
    pub fn hint(&self) -> Option<Bundle> {
        self.slot.lock().clone()
    }

    /// Replace the slot with a newly produced bundle
    pub fn store(&self, bundle: Bundle) {
        *self.slot.lock() = Some(bundle);
    }

    /// Drop whatever the slot holds
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

/// Module-path store consumed by sibling tasks that need to know which
/// source files are live without re-bundling.
#[derive(Debug, Default)]
pub struct ModulePathCache {
    paths: Mutex<Vec<PathBuf>>,
}

impl ModulePathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored list with the bundler-reported module paths
    pub fn publish(&self, paths: Vec<PathBuf>) {
        *self.paths.lock() = paths;
    }

    /// Snapshot of the last published module paths
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(code: &str) -> Bundle {
        Bundle {
            code: code.to_string(),
            modules: vec![PathBuf::from("src/app/main.dev.ts")],
            source_map: None,
        }
    }

    #[test]
    fn fresh_cache_has_no_hint() {
        let cache = BundleCache::new();
        assert!(cache.is_empty());
        assert!(cache.hint().is_none());
    }

    #[test]
    fn store_then_hint_returns_bundle() {
        let cache = BundleCache::new();
        cache.store(bundle("v1"));
        assert_eq!(cache.hint().unwrap().code, "v1");
    }

    #[test]
    fn store_replaces_previous_bundle() {
        let cache = BundleCache::new();
        cache.store(bundle("v1"));
        cache.store(bundle("v2"));
        assert_eq!(cache.hint().unwrap().code, "v2");
    }

    #[test]
    fn clear_empties_the_slot() {
        let cache = BundleCache::new();
        cache.store(bundle("v1"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn module_paths_publish_replaces() {
        let store = ModulePathCache::new();
        store.publish(vec![PathBuf::from("src/a.ts")]);
        store.publish(vec![PathBuf::from("src/b.ts"), PathBuf::from("src/c.ts")]);
        assert_eq!(
            store.paths(),
            vec![PathBuf::from("src/b.ts"), PathBuf::from("src/c.ts")]
        );
    }
}
