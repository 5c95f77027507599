//! clockshard: bounded, thread-safe cache shards with CLOCK (second-chance)
//! eviction.
//!
//! - [`ClockShard`]: one lock-guarded shard; the unit of mutual exclusion.
//! - [`ClockCache`]: the same shard without a lock, for single owners.
//! - [`ShardTable`]: many shards behind a seeded key router.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod table;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::ds::{IntrusiveList, ShardSelector, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, ShardError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::ClockMetricsSnapshot;
pub use crate::policy::clock::{ClockCache, ClockShard, EntrySnapshot, MIN_CAPACITY};
pub use crate::table::ShardTable;
