//! Routed table of clock shards.
//!
//! A [`ShardTable`] owns a fixed set of [`ClockShard`]s and sends every key
//! to exactly one of them through a seeded [`ShardSelector`]. Each operation
//! locks only the shard that owns the key, so there is never more than one
//! shard lock held and no lock ordering to get wrong.
//!
//! ```text
//!   put("user:7", v)
//!        │
//!        ▼
//!   ShardSelector ── hash(seed, key) % n ──► shard 2
//!        │
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ shard 0 │ shard 1 │ shard 2 │ shard 3 │   one RwLock each
//!   └─────────┴─────────┴────▲────┴─────────┘
//!                            └── write lock held for the put only
//! ```
//!
//! Whole-table operations (`clear`, `len`) visit shards one at a time and
//! are not atomic across shards.
//!
//! ## Example Usage
//!
//! ```
//! use clockshard::builder::ShardTableBuilder;
//!
//! let table = ShardTableBuilder::new(64).shards(4).try_build::<String, String>()?;
//! table.put("user:7".to_string(), "alice".to_string()).unwrap();
//! assert_eq!(table.get("user:7").unwrap(), "alice");
//! assert_eq!(table.capacity(), 256);
//! # Ok::<(), clockshard::error::ConfigError>(())
//! ```

use std::borrow::Borrow;
use std::hash::Hash;

use crate::ds::ShardSelector;
use crate::error::ShardError;
use crate::policy::clock::ClockShard;
use crate::traits::ConcurrentCache;

/// Fixed set of shards with deterministic key routing.
pub struct ShardTable<K, V> {
    shards: Vec<ClockShard<K, V>>,
    selector: ShardSelector,
}

impl<K, V> ShardTable<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub(crate) fn from_parts(shards: Vec<ClockShard<K, V>>, selector: ShardSelector) -> Self {
        debug_assert_eq!(shards.len(), selector.shard_count());
        Self { shards, selector }
    }

    /// Index of the shard that owns `key`.
    pub fn shard_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.selector.shard_for_key(key)
    }

    /// The shard that owns `key`.
    pub fn shard_for<Q>(&self, key: &Q) -> &ClockShard<K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        &self.shards[self.shard_index(key)]
    }

    /// Shard `index`, for diagnostics such as [`ClockShard::snapshot`].
    pub fn shard(&self, index: usize) -> Option<&ClockShard<K, V>> {
        self.shards.get(index)
    }

    /// Iterates the shards in index order.
    pub fn shards(&self) -> impl Iterator<Item = &ClockShard<K, V>> {
        self.shards.iter()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Sum of all shard capacities.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(ClockShard::capacity).sum()
    }

    /// Sum of all shard lengths; not a consistent cut under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(ClockShard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(ClockShard::is_empty)
    }

    pub fn get<Q>(&self, key: &Q) -> Result<V, ShardError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).get(key)
    }

    pub fn put(&self, key: K, value: V) -> Result<(), ShardError> {
        self.shard_for(&key).put(key, value)
    }

    pub fn del<Q>(&self, key: &Q) -> Result<(), ShardError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).del(key)
    }

    /// Clears every shard, one lock at a time.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
    }

    #[cfg(feature = "metrics")]
    /// Merged metrics of every shard.
    pub fn metrics_snapshot(&self) -> crate::metrics::snapshot::ClockMetricsSnapshot {
        use crate::metrics::traits::MetricsSnapshotProvider;

        self.shards
            .iter()
            .map(|shard| shard.snapshot_metrics())
            .fold(Default::default(), |acc, snap| acc.merge(&snap))
    }
}

impl<K, V> ConcurrentCache<K, V> for ShardTable<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Result<V, ShardError> {
        ShardTable::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Result<(), ShardError> {
        ShardTable::put(self, key, value)
    }

    fn del(&self, key: &K) -> Result<(), ShardError> {
        ShardTable::del(self, key)
    }

    fn clear(&self) {
        ShardTable::clear(self);
    }

    fn len(&self) -> usize {
        ShardTable::len(self)
    }

    fn capacity(&self) -> usize {
        ShardTable::capacity(self)
    }
}

impl<K, V> std::fmt::Debug for ShardTable<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardTable")
            .field("shards", &self.shards.len())
            .field("seed", &self.selector.seed())
            .finish_non_exhaustive()
    }
}
