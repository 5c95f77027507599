pub use crate::builder::ShardTableBuilder;
pub use crate::error::{ConfigError, ShardError};
pub use crate::policy::clock::{ClockCache, ClockShard, EntrySnapshot};
pub use crate::table::ShardTable;
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
