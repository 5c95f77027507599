//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate concerns so the shard
//! only ever writes counters, while tests and monitoring read them.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │     CoreMetricsRecorder     │
//!                 │  get_hit/get_miss/insert    │
//!                 │  evict/clear                │
//!                 └──────────────┬──────────────┘
//!                                │
//!                                ▼
//!                 ┌─────────────────────────────┐
//!                 │    ClockMetricsRecorder     │
//!                 │  scan_step/demotion/remove  │
//!                 └─────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders take `&mut self`: every recording call site already holds the
//! shard's write lock.

/// Counters every shard operation feeds.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Metrics for the second-chance scan and explicit deletes.
pub trait ClockMetricsRecorder: CoreMetricsRecorder {
    /// One head inspection during an eviction scan.
    fn record_scan_step(&mut self);
    /// A referenced entry had its flag cleared and moved to the tail.
    fn record_demotion(&mut self);
    fn record_remove_hit(&mut self);
    fn record_remove_miss(&mut self);
}

/// Copies the current counters out of a shard or table.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot_metrics(&self) -> S;
}

/// Zeroes every counter; gauges keep tracking live state.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Publishes a snapshot to an external sink.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
