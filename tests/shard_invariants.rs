// ==============================================
// CLOCK SHARD INVARIANT TESTS (integration)
// ==============================================
//
// Single-threaded behaviour through the public API: eviction order, flag
// transitions, clear, capacity bound, and routing through ShardTable.

use clockshard::builder::ShardTableBuilder;
use clockshard::error::ShardError;
use clockshard::policy::clock::{ClockShard, EntrySnapshot};
use clockshard::traits::ConcurrentCache;

fn order(shard: &ClockShard<String, String>) -> Vec<(String, bool)> {
    shard
        .snapshot()
        .into_iter()
        .map(|e| (e.key, e.referenced))
        .collect()
}

fn put(shard: &ClockShard<String, String>, key: &str, value: &str) {
    shard.put(key.to_string(), value.to_string()).unwrap();
}

fn expect(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
    pairs.iter().map(|(k, r)| (k.to_string(), *r)).collect()
}

mod scenarios {
    use super::*;

    #[test]
    fn capacity_three_walkthrough() {
        let shard = ClockShard::try_new(3).unwrap();
        put(&shard, "a", "1");
        put(&shard, "b", "2");
        put(&shard, "c", "3");
        assert_eq!(
            order(&shard),
            expect(&[("a", true), ("b", true), ("c", true)])
        );

        // Full sweep: every entry demoted, "a" comes back around and goes.
        put(&shard, "d", "4");
        assert_eq!(
            order(&shard),
            expect(&[("b", false), ("c", false), ("d", true)])
        );
        assert_eq!(shard.get("a"), Err(ShardError::NotFound));

        // "b" earns a second chance; "c" is the first unreferenced entry.
        assert_eq!(shard.get("b").unwrap(), "2");
        assert_eq!(
            order(&shard),
            expect(&[("b", true), ("c", false), ("d", true)])
        );
        put(&shard, "e", "5");
        assert_eq!(
            order(&shard),
            expect(&[("d", true), ("b", false), ("e", true)])
        );
        assert_eq!(shard.get("c"), Err(ShardError::NotFound));
        shard.check_invariants().unwrap();
    }

    #[test]
    fn update_refreshes_flag_without_moving() {
        let shard = ClockShard::try_new(3).unwrap();
        put(&shard, "a", "1");
        put(&shard, "b", "2");
        put(&shard, "c", "3");
        put(&shard, "d", "4"); // b, c unreferenced now

        put(&shard, "c", "33");
        assert_eq!(
            order(&shard),
            expect(&[("b", false), ("c", true), ("d", true)])
        );
        assert_eq!(shard.get("c").unwrap(), "33");
        assert_eq!(shard.len(), 3);

        put(&shard, "e", "5");
        assert_eq!(shard.get("b"), Err(ShardError::NotFound));
    }

    #[test]
    fn del_then_reinsert_lands_at_tail() {
        let shard = ClockShard::try_new(4).unwrap();
        for key in ["w", "x", "y", "z"] {
            put(&shard, key, key);
        }
        shard.del("w").unwrap();
        assert_eq!(shard.del("w"), Err(ShardError::NotFound));
        put(&shard, "w", "again");
        assert_eq!(
            order(&shard),
            expect(&[("x", true), ("y", true), ("z", true), ("w", true)])
        );
    }

    #[test]
    fn misses_leave_shard_untouched() {
        let shard = ClockShard::try_new(2).unwrap();
        put(&shard, "a", "1");
        put(&shard, "b", "2");
        put(&shard, "c", "3");
        let before = shard.snapshot();
        assert_eq!(shard.get("missing"), Err(ShardError::NotFound));
        assert_eq!(shard.snapshot(), before);
        assert_eq!(shard.del("missing"), Err(ShardError::NotFound));
        assert_eq!(shard.snapshot(), before);
    }
}

mod clear {
    use super::*;

    #[test]
    fn clear_on_empty_and_full() {
        let shard: ClockShard<String, String> = ClockShard::try_new(3).unwrap();
        shard.clear();
        assert!(shard.is_empty());

        for key in ["a", "b", "c"] {
            put(&shard, key, key);
        }
        shard.clear();
        assert!(shard.snapshot().is_empty());
        for key in ["a", "b", "c"] {
            assert_eq!(shard.get(key), Err(ShardError::NotFound));
        }
        assert_eq!(shard.capacity(), 3);
    }

    #[test]
    fn refill_after_clear_needs_no_eviction() {
        let shard: ClockShard<String, String> = ClockShard::try_new(3).unwrap();
        for key in ["a", "b", "c", "d", "e"] {
            put(&shard, key, key);
        }
        shard.clear();
        for key in ["p", "q", "r"] {
            put(&shard, key, key);
        }
        assert_eq!(
            order(&shard),
            expect(&[("p", true), ("q", true), ("r", true)])
        );
    }
}

mod capacity {
    use super::*;

    #[test]
    fn capacity_bound_holds_for_long_runs() {
        for capacity in [2usize, 3, 7, 64] {
            let shard: ClockShard<u64, u64> = ClockShard::try_new(capacity).unwrap();
            for i in 0..(capacity as u64 * 20) {
                shard.put(i % (capacity as u64 * 3), i).unwrap();
                if i % 4 == 0 {
                    let _ = shard.get(&(i / 2));
                }
                assert!(shard.len() <= capacity);
            }
            assert_eq!(shard.len(), capacity);
            shard.check_invariants().unwrap();
        }
    }

    #[test]
    fn invalid_capacities_are_rejected() {
        assert_eq!(
            ClockShard::<u8, u8>::try_new(0).unwrap_err(),
            ShardError::InvalidCapacity { capacity: 0 }
        );
        assert_eq!(
            ClockShard::<u8, u8>::try_new(1).unwrap_err().to_string(),
            "invalid capacity 1: shard capacity must be at least 2"
        );
    }

    #[test]
    fn snapshot_entries_carry_values() {
        let shard: ClockShard<u8, &'static str> = ClockShard::try_new(2).unwrap();
        shard.put(1, "one").unwrap();
        assert_eq!(
            shard.snapshot(),
            vec![EntrySnapshot {
                key: 1,
                value: "one",
                referenced: true
            }]
        );
    }
}

mod routing {
    use super::*;

    #[test]
    fn routing_is_stable_per_seed() {
        let build = |seed| {
            ShardTableBuilder::new(8)
                .shards(5)
                .seed(seed)
                .try_build::<u64, u64>()
                .unwrap()
        };
        let a = build(42);
        let b = build(42);
        for key in 0..500u64 {
            assert_eq!(a.shard_index(&key), b.shard_index(&key));
            assert!(a.shard_index(&key) < 5);
        }
    }

    #[test]
    fn single_shard_table_behaves_like_a_shard() {
        let table = ShardTableBuilder::new(3)
            .shards(1)
            .try_build::<&'static str, u32>()
            .unwrap();
        let shard = ClockShard::try_new(3).unwrap();

        for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            table.put(key, value).unwrap();
            shard.put(key, value).unwrap();
        }
        assert_eq!(table.shard(0).unwrap().snapshot(), shard.snapshot());
    }
}

mod trait_contract {
    use super::*;

    fn exercise<C: ConcurrentCache<u64, String>>(cache: &C) {
        assert!(cache.is_empty());
        cache.put(1, "one".to_string()).unwrap();
        cache.put(2, "two".to_string()).unwrap();
        assert_eq!(cache.get(&1).unwrap(), "one");
        assert_eq!(cache.len(), 2);
        cache.del(&1).unwrap();
        assert_eq!(cache.get(&1), Err(ShardError::NotFound));
        assert_eq!(cache.del(&1), Err(ShardError::NotFound));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn shard_and_table_share_contract() {
        let shard: ClockShard<u64, String> = ClockShard::try_new(4).unwrap();
        exercise(&shard);
        assert_eq!(ConcurrentCache::capacity(&shard), 4);

        let table = ShardTableBuilder::new(4)
            .shards(3)
            .try_build::<u64, String>()
            .unwrap();
        exercise(&table);
        assert_eq!(ConcurrentCache::capacity(&table), 12);
    }
}
