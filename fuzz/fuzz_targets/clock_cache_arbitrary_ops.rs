#![no_main]

use std::collections::HashMap;

use clockshard::policy::clock::ClockCache;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on ClockCache
//
// The first byte picks the capacity; each following pair is (op, key).
// A shadow map tracks the value last written for every live key so reads
// can be checked against it.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let capacity = (data[0] as usize % 32) + 2;
    let mut cache: ClockCache<u8, u32> = match ClockCache::try_new(capacity) {
        Ok(cache) => cache,
        Err(_) => return,
    };
    let mut shadow: HashMap<u8, u32> = HashMap::new();

    for (step, pair) in data[1..].chunks_exact(2).enumerate() {
        let op = pair[0] % 6;
        let key = pair[1] % 48;
        let value = step as u32;

        match op {
            0 | 1 => {
                // put
                let existed = cache.contains(&key);
                let before = cache.len();
                let evicted = cache
                    .try_insert(key, value)
                    .expect("small inserts do not fail");
                if existed {
                    assert!(evicted.is_none());
                    assert_eq!(cache.len(), before);
                } else if before == capacity {
                    let (victim, victim_value) = evicted.expect("full cache evicts");
                    assert_ne!(victim, key);
                    assert_eq!(shadow.remove(&victim), Some(victim_value));
                } else {
                    assert!(evicted.is_none());
                }
                shadow.insert(key, value);
            }
            2 => {
                // get
                assert_eq!(cache.get(&key).copied(), shadow.get(&key).copied());
            }
            3 => {
                // remove
                assert_eq!(cache.remove(&key), shadow.remove(&key));
            }
            4 => {
                // peek_victim agrees with the next eviction
                if cache.len() == capacity && !cache.contains(&key) {
                    let predicted = cache.peek_victim().map(|(k, _)| *k);
                    let evicted = cache
                        .try_insert(key, value)
                        .expect("small inserts do not fail")
                        .map(|(k, _)| k);
                    assert_eq!(predicted, evicted);
                    if let Some(victim) = evicted {
                        shadow.remove(&victim);
                    }
                    shadow.insert(key, value);
                }
            }
            5 => {
                // clear (rarely)
                if key == 0 {
                    cache.clear();
                    shadow.clear();
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(cache.len(), shadow.len());
        assert!(cache.len() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
