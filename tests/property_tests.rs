//! Property tests: random operation sequences are replayed against each cache
//! and against a naive reference model. After every step the structural
//! invariants must hold and every observable result must match the model.

use bucket_cache::{LfuCache, LruCache};
use proptest::prelude::*;
use std::num::NonZeroUsize;

#[derive(Debug, Clone)]
enum Op {
    Get(u8),
    Put(u8, u32),
    Peek(u8),
    Remove(u8),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Small key space so hits, updates and evictions all happen often
    prop_oneof![
        4 => (0u8..12).prop_map(Op::Get),
        4 => (0u8..12, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        1 => (0u8..12).prop_map(Op::Peek),
        1 => (0u8..12).prop_map(Op::Remove),
        1 => Just(Op::Pop),
    ]
}

/// LRU model: a vector ordered least recent first.
#[derive(Default)]
struct LruModel {
    cap: usize,
    entries: Vec<(u8, u32)>,
}

impl LruModel {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let idx = self.position(key)?;
        let entry = self.entries.remove(idx);
        self.entries.push(entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32) -> Option<(u8, u32)> {
        if let Some(idx) = self.position(key) {
            let (_, old) = self.entries.remove(idx);
            self.entries.push((key, value));
            return Some((key, old));
        }
        let evicted = if self.entries.len() == self.cap {
            Some(self.entries.remove(0))
        } else {
            None
        };
        self.entries.push((key, value));
        evicted
    }
}

/// LFU model: eviction picks the lowest `(frequency, last access)` pair.
#[derive(Default)]
struct LfuModel {
    cap: usize,
    clock: u64,
    entries: Vec<(u8, u32, u64, u64)>,
}

impl LfuModel {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|e| e.0 == key)
    }

    fn touch(&mut self, idx: usize) {
        self.clock += 1;
        self.entries[idx].2 += 1;
        self.entries[idx].3 = self.clock;
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let idx = self.position(key)?;
        self.touch(idx);
        Some(self.entries[idx].1)
    }

    fn victim(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.2, e.3))
            .map(|(idx, _)| idx)
    }

    fn pop(&mut self) -> Option<(u8, u32)> {
        let idx = self.victim()?;
        let (k, v, _, _) = self.entries.remove(idx);
        Some((k, v))
    }

    fn put(&mut self, key: u8, value: u32) -> Option<(u8, u32)> {
        if let Some(idx) = self.position(key) {
            self.touch(idx);
            let old = std::mem::replace(&mut self.entries[idx].1, value);
            return Some((key, old));
        }
        let evicted = if self.entries.len() == self.cap {
            self.pop()
        } else {
            None
        };
        self.clock += 1;
        self.entries.push((key, value, 1, self.clock));
        evicted
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }
}

proptest! {
    /// Property: the LRU cache behaves exactly like the reference model
    #[test]
    fn prop_lru_matches_model(
        cap in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache: LruCache<u8, u32> = LruCache::new(NonZeroUsize::new(cap).unwrap());
        let mut model = LruModel { cap, ..Default::default() };

        for op in ops {
            match op {
                Op::Get(k) => {
                    prop_assert_eq!(cache.get(&k).copied(), model.get(k));
                }
                Op::Put(k, v) => {
                    prop_assert_eq!(cache.put(k, v), model.put(k, v));
                }
                Op::Peek(k) => {
                    let expected = model.position(k).map(|idx| model.entries[idx].1);
                    prop_assert_eq!(cache.peek(&k).copied(), expected);
                }
                Op::Remove(k) => {
                    let expected = model.position(k).map(|idx| model.entries.remove(idx).1);
                    prop_assert_eq!(cache.remove(&k), expected);
                }
                Op::Pop => {
                    let expected = if model.entries.is_empty() {
                        None
                    } else {
                        Some(model.entries.remove(0))
                    };
                    prop_assert_eq!(cache.pop(), expected);
                }
            }

            prop_assert!(cache.check_invariants().is_ok());
            prop_assert_eq!(cache.len(), model.entries.len());
            prop_assert_eq!(cache.is_at_capacity(), model.entries.len() == cap);
            let order: Vec<(u8, u32)> = cache.iter().rev().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(order, model.entries.clone());
        }
    }

    /// Property: the LFU cache behaves exactly like the reference model
    #[test]
    fn prop_lfu_matches_model(
        cap in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache: LfuCache<u8, u32> = LfuCache::new(NonZeroUsize::new(cap).unwrap());
        let mut model = LfuModel { cap, ..Default::default() };

        for op in ops {
            match op {
                Op::Get(k) => {
                    prop_assert_eq!(cache.get(&k).copied(), model.get(k));
                }
                Op::Put(k, v) => {
                    prop_assert_eq!(cache.put(k, v), model.put(k, v));
                }
                Op::Peek(k) => {
                    let expected = model.position(k).map(|idx| model.entries[idx].1);
                    prop_assert_eq!(cache.peek(&k).copied(), expected);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(cache.remove(&k), model.remove(k));
                }
                Op::Pop => {
                    prop_assert_eq!(cache.pop(), model.pop());
                }
            }

            let checked = cache.check_invariants();
            prop_assert!(checked.is_ok(), "{:?}", checked);
            prop_assert_eq!(cache.len(), model.entries.len());
            for (key, _, frequency, _) in &model.entries {
                prop_assert_eq!(cache.frequency(key), Some(*frequency));
            }
        }
    }

    /// Property: bucket frequencies are strictly increasing and every bucket
    /// holds at least one key
    #[test]
    fn prop_lfu_buckets_ordered_and_non_empty(
        ops in prop::collection::vec((0u8..3, 0u16..16), 0..300)
    ) {
        let mut cache: LfuCache<u16, ()> = LfuCache::new(NonZeroUsize::new(8).unwrap());

        for (op, key) in ops {
            match op % 3 {
                0 => { cache.put(key, ()); }
                1 => { cache.get(&key); }
                2 => { cache.remove(&key); }
                _ => unreachable!(),
            }

            let frequencies: Vec<u64> = cache.frequencies().collect();
            prop_assert!(frequencies.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(frequencies.first().map_or(true, |&f| f >= 1));

            let mut live: Vec<u64> = cache.iter().map(|(_, _, f)| f).collect();
            live.dedup();
            prop_assert_eq!(live, frequencies);
        }
    }

    /// Property: a put immediately followed by a get returns the value
    #[test]
    fn prop_put_then_get(
        cap in 1usize..8,
        prefill in prop::collection::vec((any::<u16>(), any::<u16>()), 0..20),
        key in any::<u16>(),
        value in any::<u16>()
    ) {
        let cap = NonZeroUsize::new(cap).unwrap();
        let mut lru = LruCache::new(cap);
        let mut lfu = LfuCache::new(cap);
        for (k, v) in prefill {
            lru.put(k, v);
            lfu.put(k, v);
        }

        lru.put(key, value);
        lfu.put(key, value);
        prop_assert_eq!(lru.get(&key), Some(&value));
        prop_assert_eq!(lfu.get(&key), Some(&value));
    }
}
