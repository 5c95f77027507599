//! # Cache Trait Hierarchy
//!
//! Two families of traits, split by who owns synchronization:
//!
//! ```text
//!   single owner (&mut self)                 shared (&self, internally locked)
//!   ┌─────────────────────────────┐          ┌──────────────────────────────┐
//!   │       CoreCache<K, V>       │          │   ConcurrentCache<K, V>      │
//!   │                             │          │   : Send + Sync              │
//!   │  insert → Result<Option<V>> │          │                              │
//!   │  get → Option<&V>           │          │  get → Result<V>   (clone)   │
//!   │  contains / len / capacity  │          │  put → Result<()>            │
//!   │  clear                      │          │  del → Result<()>            │
//!   └──────────────┬──────────────┘          │  clear / len / capacity      │
//!                  │                         └──────────────────────────────┘
//!                  ▼
//!   ┌─────────────────────────────┐
//!   │     MutableCache<K, V>      │
//!   │  remove → Option<V>         │
//!   └─────────────────────────────┘
//! ```
//!
//! | Trait             | Implemented by                          |
//! |-------------------|-----------------------------------------|
//! | `CoreCache`       | [`ClockCache`](crate::policy::clock::ClockCache) |
//! | `MutableCache`    | [`ClockCache`](crate::policy::clock::ClockCache) |
//! | `ConcurrentCache` | [`ClockShard`](crate::policy::clock::ClockShard), [`ShardTable`](crate::table::ShardTable) |
//!
//! `ConcurrentCache` is the contract a request-dispatch layer programs
//! against: it cannot tell one shard from a routed table of shards.

use crate::error::ShardError;

/// Core operations for a cache owned by a single caller.
///
/// # Example
///
/// ```
/// use clockshard::policy::clock::ClockCache;
/// use clockshard::traits::CoreCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, items: &[(u64, &str)]) {
///     for (key, value) in items {
///         cache.insert(*key, value.to_string()).unwrap();
///     }
/// }
///
/// let mut cache = ClockCache::try_new(8).unwrap();
/// warm(&mut cache, &[(1, "one"), (2, "two")]);
/// assert_eq!(CoreCache::len(&cache), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is full and the key is new, one entry is evicted first.
    /// Fails only when storage for the new entry cannot be allocated, in
    /// which case the cache is unchanged.
    fn insert(&mut self, key: K, value: V) -> Result<Option<V>, ShardError>;

    /// Gets a reference to a value by key, updating access state.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity of the cache.
    fn capacity(&self) -> usize;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use clockshard::policy::clock::ClockCache;
/// use clockshard::traits::{CoreCache, MutableCache};
///
/// let mut cache = ClockCache::try_new(4).unwrap();
/// CoreCache::insert(&mut cache, 1, "one").unwrap();
/// CoreCache::insert(&mut cache, 2, "two").unwrap();
///
/// let removed = cache.remove_batch(&[1, 99]);
/// assert_eq!(removed, vec![Some("one"), None]);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys; results are in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Thread-safe cache operations over shared references.
///
/// Every method is synchronous: it blocks until the owning shard's lock is
/// acquired and the operation has completed. Values are returned as clones.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use clockshard::error::ShardError;
/// use clockshard::policy::clock::ClockShard;
/// use clockshard::traits::ConcurrentCache;
///
/// fn serve<C: ConcurrentCache<u64, u64>>(cache: &C) -> Result<u64, ShardError> {
///     cache.put(7, 49)?;
///     cache.get(&7)
/// }
///
/// let shard = Arc::new(ClockShard::try_new(4).unwrap());
/// assert_eq!(serve(shard.as_ref()), Ok(49));
/// ```
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Returns a copy of the value for `key` and marks it referenced.
    fn get(&self, key: &K) -> Result<V, ShardError>;

    /// Inserts or updates `key`.
    fn put(&self, key: K, value: V) -> Result<(), ShardError>;

    /// Removes `key`.
    fn del(&self, key: &K) -> Result<(), ShardError>;

    /// Removes every entry.
    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}
