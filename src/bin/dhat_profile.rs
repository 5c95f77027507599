//! DHAT heap profiler for clockshard.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::sync::Arc;

use clockshard::builder::ShardTableBuilder;
use clockshard::policy::clock::{ClockCache, ClockShard};
use clockshard::traits::{ConcurrentCache, CoreCache};

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// Hotset workload: 90% of accesses hit 10% of keys.
fn hotset_workload<C: ConcurrentCache<u64, Arc<u64>>>(
    cache: &C,
    operations: usize,
    universe: u64,
    seed: u64,
) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe as f64 * 0.1) as u64;

    for _ in 0..operations {
        let key = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + (rng.next_u64() % (universe - hot_size))
        };

        if cache.get(&key).is_err() {
            let _ = cache.put(key, Arc::new(key));
        }
    }
}

/// Sequential scan larger than the cache.
fn scan_workload<C: ConcurrentCache<u64, Arc<u64>>>(cache: &C, operations: usize, universe: u64) {
    for i in 0..operations {
        let key = (i as u64) % universe;
        if cache.get(&key).is_err() {
            let _ = cache.put(key, Arc::new(key));
        }
    }
}

/// Eviction churn: every put is a new key.
fn eviction_churn<C: CoreCache<u64, Arc<u64>>>(cache: &mut C, operations: usize) {
    for i in 0..operations {
        let _ = cache.insert(i as u64, Arc::new(i as u64));
    }
}

fn profile_cache() {
    println!("=== Profiling ClockCache ===");
    let capacity = 4096;
    let operations = 100_000;

    let Ok(mut cache) = ClockCache::try_new(capacity) else {
        return;
    };
    for i in 0..capacity as u64 {
        let _ = cache.try_insert(i, Arc::new(i));
    }
    eviction_churn(&mut cache, operations);

    println!("  Final size: {}", cache.len());
}

fn profile_shard() {
    println!("=== Profiling ClockShard ===");
    let capacity = 4096;
    let operations = 100_000;
    let universe = 16_384;

    let Ok(shard) = ClockShard::try_new(capacity) else {
        return;
    };
    for i in 0..capacity as u64 {
        let _ = shard.put(i, Arc::new(i));
    }
    hotset_workload(&shard, operations, universe, 42);
    scan_workload(&shard, operations / 2, universe);

    println!("  Final size: {}", shard.len());
}

fn profile_table() {
    println!("=== Profiling ShardTable (16 shards) ===");
    let operations = 100_000;
    let universe = 16_384;

    let table = match ShardTableBuilder::new(256).shards(16).try_build::<u64, Arc<u64>>() {
        Ok(table) => table,
        Err(err) => {
            eprintln!("  build failed: {err}");
            return;
        },
    };
    hotset_workload(&table, operations, universe, 7);
    scan_workload(&table, operations / 2, universe);

    println!("  Final size: {}", table.len());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("clockshard DHAT Heap Profiling");
    println!("==============================\n");

    profile_cache();
    profile_shard();
    profile_table();

    println!("\n==============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
