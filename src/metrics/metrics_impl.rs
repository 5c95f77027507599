use crate::metrics::snapshot::ClockMetricsSnapshot;
use crate::metrics::traits::{ClockMetricsRecorder, CoreMetricsRecorder};

// ---------------------------------------------------------------------------
// ClockMetrics
// ---------------------------------------------------------------------------

/// Counters for one clock shard.
#[derive(Debug, Default, Clone)]
pub struct ClockMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub scan_steps: u64,
    pub demotions: u64,
    pub remove_calls: u64,
    pub remove_hits: u64,
    pub clears: u64,
}

impl ClockMetrics {
    /// Copies the counters and attaches the current gauges.
    pub fn to_snapshot(&self, cache_len: usize, capacity: usize) -> ClockMetricsSnapshot {
        ClockMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            scan_steps: self.scan_steps,
            demotions: self.demotions,
            remove_calls: self.remove_calls,
            remove_hits: self.remove_hits,
            clears: self.clears,
            cache_len,
            capacity,
        }
    }
}

impl CoreMetricsRecorder for ClockMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl ClockMetricsRecorder for ClockMetrics {
    fn record_scan_step(&mut self) {
        self.scan_steps += 1;
    }
    fn record_demotion(&mut self) {
        self.demotions += 1;
    }
    fn record_remove_hit(&mut self) {
        self.remove_calls += 1;
        self.remove_hits += 1;
    }
    fn record_remove_miss(&mut self) {
        self.remove_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_metrics_counts_hits_and_misses() {
        let mut m = ClockMetrics::default();
        m.record_get_hit();
        m.record_get_hit();
        m.record_get_miss();
        m.record_remove_hit();
        m.record_remove_miss();

        let snap = m.to_snapshot(3, 8);
        assert_eq!(snap.get_calls, 3);
        assert_eq!(snap.get_hits, 2);
        assert_eq!(snap.get_misses, 1);
        assert_eq!(snap.remove_calls, 2);
        assert_eq!(snap.remove_hits, 1);
        assert_eq!(snap.cache_len, 3);
        assert_eq!(snap.capacity, 8);
    }

    #[test]
    fn clock_metrics_scan_counters() {
        let mut m = ClockMetrics::default();
        m.record_evict_call();
        m.record_scan_step();
        m.record_demotion();
        m.record_scan_step();
        m.record_evicted_entry();
        m.record_clear();

        let snap = m.to_snapshot(0, 2);
        assert_eq!(snap.evict_calls, 1);
        assert_eq!(snap.scan_steps, 2);
        assert_eq!(snap.demotions, 1);
        assert_eq!(snap.evicted_entries, 1);
        assert_eq!(snap.clears, 1);
    }
}
