/// Point-in-time copy of a shard's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub scan_steps: u64, // head inspections across all eviction scans
    pub demotions: u64,  // referenced entries moved to the tail

    pub remove_calls: u64,
    pub remove_hits: u64,

    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl ClockMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before any call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    /// Sums counters and gauges of several shards (e.g. one table).
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            get_calls: self.get_calls + other.get_calls,
            get_hits: self.get_hits + other.get_hits,
            get_misses: self.get_misses + other.get_misses,
            insert_calls: self.insert_calls + other.insert_calls,
            insert_updates: self.insert_updates + other.insert_updates,
            insert_new: self.insert_new + other.insert_new,
            evict_calls: self.evict_calls + other.evict_calls,
            evicted_entries: self.evicted_entries + other.evicted_entries,
            scan_steps: self.scan_steps + other.scan_steps,
            demotions: self.demotions + other.demotions,
            remove_calls: self.remove_calls + other.remove_calls,
            remove_hits: self.remove_hits + other.remove_hits,
            clears: self.clears + other.clears,
            cache_len: self.cache_len + other.cache_len,
            capacity: self.capacity + other.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_handles_zero_calls() {
        assert_eq!(ClockMetricsSnapshot::default().hit_ratio(), 0.0);
        let snap = ClockMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert!((snap.hit_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_adds_fields() {
        let a = ClockMetricsSnapshot {
            get_calls: 1,
            evicted_entries: 2,
            cache_len: 3,
            capacity: 4,
            ..Default::default()
        };
        let merged = a.merge(&a);
        assert_eq!(merged.get_calls, 2);
        assert_eq!(merged.evicted_entries, 4);
        assert_eq!(merged.cache_len, 6);
        assert_eq!(merged.capacity, 8);
    }
}
