#![no_main]

use clockshard::ds::IntrusiveList;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Exercises the operations the clock order relies on: push_back,
// pop_front, move_to_back, remove, get_mut, clear. Links are validated
// after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut all_ids = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let value = u32::from(data[idx + 1]);

        match op {
            0 | 1 => {
                // push_back
                let id = list.push_back(value);
                all_ids.push(id);

                assert_eq!(list.back(), Some(&value));
                assert_eq!(list.back_id(), Some(id));
                assert_eq!(list.get(id), Some(&value));
            }
            2 => {
                // pop_front
                let old_len = list.len();
                let old_front = list.front().copied();
                let popped = list.pop_front();

                assert_eq!(popped, old_front);
                if popped.is_some() {
                    assert_eq!(list.len(), old_len - 1);
                } else {
                    assert_eq!(list.len(), 0);
                }
            }
            3 => {
                // move_to_back
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let old_len = list.len();
                    if list.move_to_back(id) {
                        assert_eq!(list.back_id(), Some(id));
                    }
                    assert_eq!(list.len(), old_len);
                }
            }
            4 => {
                // remove
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let old_len = list.len();
                    if list.remove(id).is_some() {
                        assert_eq!(list.len(), old_len - 1);
                        assert!(!list.contains(id));
                    }
                }
            }
            5 => {
                // get_mut
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    if let Some(slot) = list.get_mut(id) {
                        *slot = value;
                        assert_eq!(list.get(id), Some(&value));
                    }
                }
            }
            6 => {
                // iteration agrees with len
                assert_eq!(list.iter().count(), list.len());
                assert_eq!(list.iter().next(), list.front());
            }
            7 => {
                // clear
                list.clear();
                all_ids.clear();

                assert!(list.is_empty());
                assert_eq!(list.front(), None);
                assert_eq!(list.back(), None);
            }
            _ => unreachable!(),
        }

        assert!(list.check_invariants().is_ok());
        idx += 2;
    }
});
