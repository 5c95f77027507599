//! Validated construction of shard tables.
//!
//! ## Example
//!
//! ```rust
//! use clockshard::builder::ShardTableBuilder;
//!
//! let table = ShardTableBuilder::new(128)
//!     .shards(8)
//!     .seed(0x5eed)
//!     .try_build::<u64, String>()
//!     .unwrap();
//! assert_eq!(table.shard_count(), 8);
//! assert_eq!(table.capacity(), 1024);
//! ```

use std::hash::Hash;

use crate::ds::ShardSelector;
use crate::error::ConfigError;
use crate::policy::clock::{ClockShard, MIN_CAPACITY};
use crate::table::ShardTable;

/// Shard count used when [`ShardTableBuilder::shards`] is not called.
pub const DEFAULT_SHARDS: usize = 16;

/// Builder for [`ShardTable`] instances.
#[derive(Debug, Clone)]
pub struct ShardTableBuilder {
    capacity_per_shard: usize,
    shards: usize,
    seed: u64,
}

impl ShardTableBuilder {
    /// Create a builder whose shards each hold `capacity_per_shard` entries.
    pub fn new(capacity_per_shard: usize) -> Self {
        Self {
            capacity_per_shard,
            shards: DEFAULT_SHARDS,
            seed: 0,
        }
    }

    /// Number of shards (default [`DEFAULT_SHARDS`]).
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Seed mixed into key routing (default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the table, validating every parameter first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `shards == 0` or when the per-shard
    /// capacity is below [`MIN_CAPACITY`].
    pub fn try_build<K, V>(self) -> Result<ShardTable<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
        V: Clone,
    {
        if self.shards == 0 {
            return Err(ConfigError::new("shards must be > 0"));
        }
        if self.capacity_per_shard < MIN_CAPACITY {
            return Err(ConfigError::new(format!(
                "capacity per shard must be >= {MIN_CAPACITY}, got {}",
                self.capacity_per_shard
            )));
        }

        let shards = (0..self.shards)
            .map(|_| ClockShard::try_new(self.capacity_per_shard))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            shards = self.shards,
            capacity_per_shard = self.capacity_per_shard,
            seed = self.seed,
            "built shard table"
        );
        Ok(ShardTable::from_parts(
            shards,
            ShardSelector::new(self.shards, self.seed),
        ))
    }
}
