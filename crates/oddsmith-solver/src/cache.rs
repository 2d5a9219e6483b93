//! Bounded least-recently-used caches shared by the engines.
//!
//! Both the per-scenario memo tables of [`Engine`](crate::Engine) and the
//! optimizer's finished schedulers live in an [`lru::LruCache`]. A lookup
//! through `get` or `get_mut` marks the entry as most recently used, and
//! `push` hands back the entry it evicted so callers can log it.

use std::{hash::Hash, num::NonZeroUsize};

pub use lru::LruCache;

/// Scenarios whose memo tables an [`Engine`](crate::Engine) keeps by default.
pub const DEFAULT_SCENARIO_CAPACITY: usize = 20;

/// An LRU cache holding at most `capacity` entries.
///
/// A capacity of 0 is raised to 1, so the last insertion is always kept.
#[must_use]
pub fn bounded<K, V>(capacity: usize) -> LruCache<K, V>
where
    K: Hash + Eq,
{
    LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = bounded(2);
        assert!(cache.push("a", 1).is_none());
        assert!(cache.push("b", 2).is_none());
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.push("c", 3), Some(("b", 2)));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn test_put_on_existing_key_keeps_others() {
        let mut cache = bounded(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 10), Some(1));
        assert_eq!(cache.len(), 2);
        // "a" was refreshed, so "b" goes first
        assert_eq!(cache.push("c", 3), Some(("b", 2)));
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let mut cache = bounded(0);
        cache.put("a", 1);
        assert_eq!(cache.push("b", 2), Some(("a", 1)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cap().get(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = bounded(DEFAULT_SCENARIO_CAPACITY);
        for i in 0..5 {
            cache.put(i, i * i);
        }
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains(&3));
    }
}
