//! Dependency-tracked memoization
//!
//! A derived artifact is rebuilt only when the key describing its
//! upstream inputs changes. Keys are cheap snapshots (generation
//! counters, search terms, category sets); values are shared out as
//! `Arc` so readers keep a consistent snapshot across a rebuild.

use std::sync::Arc;

#[derive(Debug)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: Option<Arc<V>>,
    rebuilds: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
            rebuilds: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, running `build` only if the key changed.
    pub fn get_or_rebuild<F>(&mut self, key: K, build: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let (Some(cached_key), Some(value)) = (&self.key, &self.value) {
            if *cached_key == key {
                return Arc::clone(value);
            }
        }

        let value = Arc::new(build());
        self.key = Some(key);
        self.value = Some(Arc::clone(&value));
        self.rebuilds += 1;
        value
    }

    /// Current value without checking dependencies.
    pub fn peek(&self) -> Option<Arc<V>> {
        self.value.clone()
    }

    /// Drop the value; the next access rebuilds.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.value = None;
    }

    /// Number of times `build` has run.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuilds_only_on_key_change() {
        let mut memo: Memo<(u64, String), usize> = Memo::new();

        let first = memo.get_or_rebuild((1, "steel".into()), || 10);
        let second = memo.get_or_rebuild((1, "steel".into()), || 20);
        assert_eq!(*first, 10);
        assert_eq!(*second, 10);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(memo.rebuild_count(), 1);

        let third = memo.get_or_rebuild((2, "steel".into()), || 30);
        assert_eq!(*third, 30);
        assert_eq!(memo.rebuild_count(), 2);

        // Old snapshot stays valid for existing readers
        assert_eq!(*first, 10);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut memo: Memo<u64, &str> = Memo::new();
        memo.get_or_rebuild(1, || "a");
        memo.invalidate();
        assert!(memo.peek().is_none());

        let value = memo.get_or_rebuild(1, || "b");
        assert_eq!(*value, "b");
        assert_eq!(memo.rebuild_count(), 2);
    }
}
