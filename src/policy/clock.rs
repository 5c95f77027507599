//! Clock (second-chance) cache shard.
//!
//! Implements the Clock algorithm over an explicit clock order: entries are
//! appended at the tail when inserted, and the eviction scan starts at the
//! head. A referenced entry found at the head loses its flag and is moved to
//! the tail (its "second chance"); the first unreferenced entry found is the
//! victim.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         ClockShard<K, V>                                    │
//! │                                                                             │
//! │   inner: parking_lot::RwLock<ClockCache<K, V>>                              │
//! │   ┌─────────────────────────────────────────────────────────────────────┐   │
//! │   │  index: FxHashMap<K, SlotId>      (key -> node handle)              │   │
//! │   └─────────────────────────────────────────────────────────────────────┘   │
//! │   ┌─────────────────────────────────────────────────────────────────────┐   │
//! │   │  order: IntrusiveList<Entry<K, V>>  (clock order, arena-owned)      │   │
//! │   │                                                                     │   │
//! │   │   head                                                    tail      │   │
//! │   │    ┌───┐     ┌───┐     ┌───┐     ┌───┐     ┌───┐                    │   │
//! │   │    │ A │ ◄─► │ B │ ◄─► │ C │ ◄─► │ D │ ◄─► │ E │                    │   │
//! │   │    │ref│     │   │     │ref│     │   │     │ref│                    │   │
//! │   │    └───┘     └───┘     └───┘     └───┘     └───┘                    │   │
//! │   │      ▲ scan starts here               new entries attach here ▲     │   │
//! │   └─────────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! GET(key):
//!   1. Look up handle in index (content equality)
//!   2. Set referenced = true
//!   3. Return a clone of the value          (order unchanged)
//!
//! PUT(key, value):
//!   1. If key exists: overwrite value, referenced = true   (no eviction)
//!   2. Reserve storage (AllocationFailure leaves shard untouched)
//!   3. If full: EVICT()
//!   4. Append entry at tail with referenced = true
//!
//! EVICT():
//!   loop:
//!     entry = head
//!     if entry.referenced:
//!       entry.referenced = false
//!       move entry to tail          // second chance, no copy
//!     else:
//!       remove entry; return it     // victim
//! ```
//!
//! Every entry demoted by a scan stays unreferenced until the scan ends, so
//! the scan inspects at most `len + 1` entries and removes exactly one.
//!
//! ## Locking
//!
//! `get`, `put`, `del` and `clear` hold the write guard for their whole
//! duration: even a lookup sets the reference flag. `snapshot`, `len` and
//! the metrics snapshot only read, so they take the read guard. Guards are
//! released on drop, including on early error returns.
//!
//! ## Example Usage
//!
//! ```
//! use clockshard::error::ShardError;
//! use clockshard::policy::clock::ClockShard;
//!
//! let shard: ClockShard<String, String> = ClockShard::try_new(3)?;
//! shard.put("a".into(), "1".into())?;
//! shard.put("b".into(), "2".into())?;
//! shard.put("c".into(), "3".into())?;
//!
//! // Full shard: every entry is demoted once, then "a" is evicted.
//! shard.put("d".into(), "4".into())?;
//! assert_eq!(shard.get("a"), Err(ShardError::NotFound));
//!
//! let order: Vec<_> = shard
//!     .snapshot()
//!     .into_iter()
//!     .map(|e| (e.key, e.referenced))
//!     .collect();
//! assert_eq!(
//!     order,
//!     vec![("b".into(), false), ("c".into(), false), ("d".into(), true)]
//! );
//! # Ok::<(), ShardError>(())
//! ```

use std::borrow::Borrow;
use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, ShardError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ClockMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ClockMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    ClockMetricsRecorder, CoreMetricsRecorder, MetricsReset, MetricsSnapshotProvider,
};
use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

/// Smallest capacity that can run the second-chance scan.
///
/// Eviction needs one entry to demote before another can be evicted.
pub const MIN_CAPACITY: usize = 2;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    referenced: bool,
}

/// One entry of a [`ClockShard::snapshot`], in clock order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot<K, V> {
    pub key: K,
    pub value: V,
    pub referenced: bool,
}

// ---------------------------------------------------------------------------
// ClockCache
// ---------------------------------------------------------------------------

/// Unsynchronized clock shard: entry store, clock order and eviction.
///
/// [`ClockShard`] wraps this type in a lock; use `ClockCache` directly only
/// when the caller already owns exclusive access.
///
/// # Example
///
/// ```
/// use clockshard::policy::clock::ClockCache;
///
/// let mut cache = ClockCache::try_new(2).unwrap();
/// cache.try_insert("a", 1).unwrap();
/// cache.try_insert("b", 2).unwrap();
///
/// // Both entries are referenced: both get demoted, then "a" goes.
/// assert_eq!(cache.try_insert("c", 3).unwrap(), Some(("a", 1)));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct ClockCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: ClockMetrics,
}

impl<K, V> ClockCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Fails with [`ShardError::InvalidCapacity`] if `capacity < 2`.
    pub fn try_new(capacity: usize) -> Result<Self, ShardError> {
        if capacity < MIN_CAPACITY {
            return Err(ShardError::InvalidCapacity { capacity });
        }
        Ok(Self {
            // Room for twice the live bound plus the pending key, so clearing
            // tombstones left by evictions rehashes in place instead of growing.
            index: FxHashMap::with_capacity_and_hasher(
                capacity.saturating_add(1).saturating_mul(2),
                Default::default(),
            ),
            order: IntrusiveList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: ClockMetrics::default(),
        })
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries held.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `key` is present. Does not touch the reference flag.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` without setting the reference flag.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Returns the value for `key` and marks the entry referenced.
    ///
    /// Does not reorder entries.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            trace!(len = self.order.len(), "clock get miss");
            return None;
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        trace!(len = self.order.len(), "clock get hit");
        let entry = self.order.get_mut(id)?;
        entry.referenced = true;
        Some(&entry.value)
    }

    /// Inserts or updates `key`.
    ///
    /// - Existing key: value overwritten, entry referenced, nothing evicted.
    /// - New key with room: appended at the tail, referenced.
    /// - New key on a full cache: one victim evicted by the clock scan, then
    ///   the new entry is appended. The victim is returned.
    ///
    /// Storage is reserved before anything is mutated; on
    /// [`ShardError::AllocationFailure`] the cache is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<(K, V)>, ShardError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.referenced = true;
            }
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            trace!(len = self.order.len(), "clock put update");
            return Ok(None);
        }

        // Evicting leaves a tombstone in the index, so it reserves for every
        // new key. The arena reuses the victim's slot once the cache is full.
        self.index.try_reserve(1)?;
        if self.order.len() < self.capacity {
            self.order.try_reserve(1)?;
        }

        let victim = if self.order.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.order.push_back(Entry {
            key: key.clone(),
            value,
            referenced: true,
        });
        self.index.insert(key, id);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        trace!(len = self.order.len(), "clock put insert");
        Ok(victim)
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(id) = self.index.remove(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_remove_miss();
            trace!(len = self.order.len(), "clock del miss");
            return None;
        };
        let entry = self.order.remove(id)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_hit();
        trace!(len = self.order.len(), "clock del hit");
        Some(entry.value)
    }

    /// Drops every entry. Safe to call on an empty cache.
    pub fn clear(&mut self) {
        let dropped = self.order.len();
        self.order.clear();
        self.index.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        debug!(dropped, capacity = self.capacity, "clock shard cleared");
    }

    /// Returns the entry the next eviction would remove, without mutating.
    ///
    /// That is the first unreferenced entry from the head, or the head
    /// itself when every entry is referenced (a full sweep demotes all of
    /// them and comes back around).
    pub fn peek_victim(&self) -> Option<(&K, &V)> {
        self.order
            .iter()
            .find(|entry| !entry.referenced)
            .or_else(|| self.order.front())
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Iterates `(key, value, referenced)` in clock order, head first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, bool)> {
        self.order
            .iter()
            .map(|entry| (&entry.key, &entry.value, entry.referenced))
    }

    /// Copies the clock order without touching any flag.
    pub fn snapshot(&self) -> Vec<EntrySnapshot<K, V>>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value, referenced)| EntrySnapshot {
                key: key.clone(),
                value: value.clone(),
                referenced,
            })
            .collect()
    }

    /// Runs the second-chance scan and removes exactly one entry.
    fn evict(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let mut demoted = 0usize;
        while let Some(id) = self.order.front_id() {
            #[cfg(feature = "metrics")]
            self.metrics.record_scan_step();

            let entry = self.order.get_mut(id)?;
            if entry.referenced {
                entry.referenced = false;
                self.order.rotate_front();
                demoted += 1;
                #[cfg(feature = "metrics")]
                self.metrics.record_demotion();
                debug_assert!(demoted <= self.capacity, "clock scan did not terminate");
                continue;
            }

            let victim = self.order.remove(id)?;
            self.index.remove(&victim.key);
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            debug!(
                demoted,
                len = self.order.len(),
                capacity = self.capacity,
                "clock evicted victim"
            );
            return Some((victim.key, victim.value));
        }
        None
    }

    /// Checks capacity, key uniqueness, index/order agreement and list links.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_invariants()?;

        if self.order.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.order.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but order holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }
        for (id, entry) in self.order.iter_entries() {
            // With equal lengths, every entry resolving to its own handle
            // also rules out duplicate keys.
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "entry at slot {} is not indexed by its key",
                    id.index()
                )));
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("clock cache invariant violated: {err}");
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> ClockMetricsSnapshot {
        self.metrics.to_snapshot(self.order.len(), self.capacity)
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = ClockMetrics::default();
    }
}

impl<K, V> CoreCache<K, V> for ClockCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Inserts or updates `key`, returning the previous value on update.
    fn insert(&mut self, key: K, value: V) -> Result<Option<V>, ShardError> {
        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_insert_call();
                self.metrics.record_insert_update();
            }
            return Ok(self.order.get_mut(id).map(|entry| {
                entry.referenced = true;
                std::mem::replace(&mut entry.value, value)
            }));
        }
        self.try_insert(key, value).map(|_| None)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        ClockCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ClockCache::contains(self, key)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        ClockCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for ClockCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        ClockCache::remove(self, key)
    }
}

impl<K, V> std::fmt::Debug for ClockCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockCache")
            .field("capacity", &self.capacity)
            .field("len", &self.order.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ClockShard
// ---------------------------------------------------------------------------

/// Thread-safe clock shard guarded by a single `parking_lot::RwLock`.
///
/// Values handed out by [`get`](Self::get) and [`snapshot`](Self::snapshot)
/// are clones owned by the caller.
pub struct ClockShard<K, V> {
    inner: RwLock<ClockCache<K, V>>,
    capacity: usize,
}

impl<K, V> ClockShard<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Creates an empty shard; fails with [`ShardError::InvalidCapacity`]
    /// if `capacity < 2`.
    pub fn try_new(capacity: usize) -> Result<Self, ShardError> {
        let cache = ClockCache::try_new(capacity)?;
        Ok(Self {
            inner: RwLock::new(cache),
            capacity,
        })
    }

    /// Returns the fixed capacity. Takes no lock.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current entry count (read lock).
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the shard holds no entries (read lock).
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Looks up `key`, marks it referenced and returns a copy of its value.
    pub fn get<Q>(&self, key: &Q) -> Result<V, ShardError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.get(key).cloned().ok_or(ShardError::NotFound)
    }

    /// Inserts or updates `key`, evicting one entry if the shard is full.
    pub fn put(&self, key: K, value: V) -> Result<(), ShardError> {
        let mut cache = self.inner.write();
        cache.try_insert(key, value).map(|_| ())
    }

    /// Removes `key`; fails with [`ShardError::NotFound`] if absent.
    pub fn del<Q>(&self, key: &Q) -> Result<(), ShardError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.remove(key).map(|_| ()).ok_or(ShardError::NotFound)
    }

    /// Removes every entry. Always succeeds.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns `(key, value, referenced)` in clock order without mutating.
    ///
    /// Takes the read lock, so snapshots run alongside each other.
    pub fn snapshot(&self) -> Vec<EntrySnapshot<K, V>> {
        self.inner.read().snapshot()
    }

    /// Checks the shard invariants under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    /// Consumes the shard and returns the unsynchronized cache.
    pub fn into_inner(self) -> ClockCache<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> ConcurrentCache<K, V> for ClockShard<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Result<V, ShardError> {
        ClockShard::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Result<(), ShardError> {
        ClockShard::put(self, key, value)
    }

    fn del(&self, key: &K) -> Result<(), ShardError> {
        ClockShard::del(self, key)
    }

    fn clear(&self) {
        ClockShard::clear(self);
    }

    fn len(&self) -> usize {
        ClockShard::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<ClockMetricsSnapshot> for ClockShard<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot_metrics(&self) -> ClockMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsReset for ClockShard<K, V>
where
    K: Clone + Eq + Hash,
{
    fn reset_metrics(&self) {
        self.inner.write().reset_metrics();
    }
}

impl<K, V> std::fmt::Debug for ClockShard<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockShard")
            .field("capacity", &self.capacity)
            .field("len", &self.inner.read().order.len())
            .finish_non_exhaustive()
    }
}
