//! Deterministic key-to-shard selection.
//!
//! Used by [`ShardTable`](crate::table::ShardTable) to decide which
//! [`ClockShard`](crate::policy::clock::ClockShard) owns a key.
//!
//! ```text
//!   key ──► SipHash(seed, key) ──► % shards ──► shard index
//!
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │
//!   │  A, E   │  B, F   │  C, G   │  D, H   │
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! The same `(key, seed, shards)` always yields the same index, and keys
//! that compare equal through `Borrow` hash identically, so a `String` key
//! and its `&str` form route to the same shard.
//!
//! ## Example Usage
//!
//! ```
//! use clockshard::ds::ShardSelector;
//!
//! let selector = ShardSelector::new(4, 0);
//! let shard = selector.shard_for_key("user:123");
//! assert!(shard < 4);
//! assert_eq!(selector.shard_for_key(&"user:123".to_string()), shard);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic shard selector using a seeded hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards with the given `seed`.
    ///
    /// The shard count is clamped to at least 1.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Returns the seed mixed into every hash.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Maps a key to a shard index in `[0, shards)`.
    pub fn shard_for_key<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        if self.shards == 1 {
            return 0;
        }
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() % self.shards as u64) as usize
    }
}

impl Default for ShardSelector {
    /// Creates a single-shard selector with seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_selector_is_deterministic() {
        let selector = ShardSelector::new(8, 123);

        let a = selector.shard_for_key("key");
        let b = selector.shard_for_key("key");
        assert_eq!(a, b);
        assert!(a < selector.shard_count());
    }

    #[test]
    fn shard_selector_borrowed_forms_agree() {
        let selector = ShardSelector::new(16, 7);
        let owned = String::from("session:42");
        assert_eq!(
            selector.shard_for_key(&owned),
            selector.shard_for_key("session:42")
        );
    }

    #[test]
    fn shard_selector_zero_shards_clamped() {
        let selector = ShardSelector::new(0, 0);
        assert_eq!(selector.shard_count(), 1);
        assert_eq!(selector.shard_for_key(&99u64), 0);
        assert_eq!(ShardSelector::default(), selector);
    }

    #[test]
    fn shard_selector_spreads_keys() {
        let selector = ShardSelector::new(4, 0);
        let mut counts = [0usize; 4];
        for i in 0..4_000u64 {
            counts[selector.shard_for_key(&i)] += 1;
        }
        for count in counts {
            assert!(count > 500, "uneven distribution: {counts:?}");
        }
    }
}
