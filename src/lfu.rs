//! Least Frequently Used Cache Implementation.
//!
//! The LFU (Least Frequently Used) cache evicts the least frequently accessed
//! item when the cache reaches capacity, breaking ties between equally frequent
//! items by evicting the least recently accessed one.
//!
//! # Algorithm
//!
//! Keys are grouped by access count into frequency buckets. The buckets form an
//! outer linked list in strictly increasing frequency order, and each bucket
//! owns an LRU segment holding the keys currently at its frequency:
//!
//! ```text
//!   head ⇄ [freq 1] ⇄ [freq 2] ⇄ [freq 5] ⇄ tail
//!            │           │          │
//!           c ⇄ d        a          b        (inner LRU lists, most recent first)
//! ```
//!
//! Every access of a key moves it from its bucket to the bucket for the next
//! frequency, creating that bucket right after the current one if needed and
//! dropping the current one if the move emptied it. New keys go into the
//! frequency-1 bucket at the front of the list. Eviction takes the least
//! recently used key of the front bucket. No step scans, so every operation is
//! O(1).
//!
//! A single lookup map takes each key to its bucket and to its node inside that
//! bucket. Only relocation, insertion and removal ever touch the map and a
//! bucket together.
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Put: O(1)
//! - Remove: O(1)
//! - Memory: one bucket per distinct live frequency on top of the entries
//!
//! # Thread Safety
//!
//! Not thread-safe. Callers sharing a cache must serialize every call through a
//! lock; a relocation in progress must never be observed.

extern crate alloc;

use crate::base::{CacheBase, DefaultHashBuilder};
use crate::bucket::FrequencyBucket;
use crate::config::{Capacity, LfuCacheConfig};
use crate::error::{CacheError, Result};
use crate::list::{self, List, NodeId};
use crate::lru;
use alloc::format;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use log::{debug, trace};

/// Where a key lives: its bucket in the outer list and its node in that
/// bucket's LRU segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    bucket: NodeId,
    entry: NodeId,
}

/// Internal LFU segment containing the two-level bucket structure.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    base: CacheBase<K, Slot, S>,
    buckets: List<FrequencyBucket<K, V, S>>,
}

impl<K, V, S> LfuSegment<K, V, S> {
    #[inline]
    pub(crate) fn cap(&self) -> Capacity {
        self.base.cap()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    #[inline]
    pub(crate) fn is_at_capacity(&self) -> bool {
        self.base.is_at_capacity()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LfuSegment<K, V, S> {
    /// Creates an empty segment. The key map grows as entries arrive.
    pub(crate) fn with_hasher(cap: Capacity, hash_builder: S) -> Self {
        LfuSegment {
            base: CacheBase::with_hasher(cap, hash_builder),
            buckets: List::new(),
        }
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.contains(key)
    }

    fn bucket(&self, id: NodeId) -> &FrequencyBucket<K, V, S> {
        match self.buckets.get(id) {
            Some(bucket) => bucket,
            None => panic!("lfu: {id:?} is not a live bucket"),
        }
    }

    fn bucket_mut(&mut self, id: NodeId) -> &mut FrequencyBucket<K, V, S> {
        match self.buckets.get_mut(id) {
            Some(bucket) => bucket,
            None => panic!("lfu: {id:?} is not a live bucket"),
        }
    }

    fn value(&self, slot: Slot) -> &V {
        match self.bucket(slot.bucket).cache.value_at(slot.entry) {
            Some(value) => value,
            None => panic!("lfu: {slot:?} does not hold an entry"),
        }
    }

    fn value_mut(&mut self, slot: Slot) -> &mut V {
        match self.bucket_mut(slot.bucket).cache.value_at_mut(slot.entry) {
            Some(value) => value,
            None => panic!("lfu: {slot:?} does not hold an entry"),
        }
    }

    /// Returns the bucket for `frequency` directly after `after`, creating it
    /// if the next bucket has a different frequency or there is none.
    fn bucket_after(&mut self, after: NodeId, frequency: u64) -> NodeId {
        if let Some(next) = self.buckets.next(after) {
            if self.bucket(next).frequency == frequency {
                return next;
            }
        }
        let bucket = FrequencyBucket::new(frequency, self.cap(), self.base.hasher().clone());
        let id = self.buckets.alloc(bucket);
        self.buckets.insert_after(id, after);
        trace!("lfu: created bucket for frequency {frequency}");
        id
    }

    /// Unlinks and drops an empty bucket.
    fn retire(&mut self, id: NodeId) {
        let bucket = self.buckets.remove(id);
        debug_assert!(bucket.is_empty());
        trace!("lfu: retired bucket for frequency {}", bucket.frequency);
    }

    /// Moves the key at `slot` into the bucket for its next frequency, as the
    /// most recent entry there, and returns its new slot.
    ///
    /// This is the only path that moves an entry between buckets. A key that
    /// has already reached `u64::MAX` accesses stays in its bucket and is only
    /// marked most recent.
    fn relocate<Q>(&mut self, key: &Q, slot: Slot) -> Slot
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let current = self.bucket_mut(slot.bucket);
        let Some(next_frequency) = current.frequency.checked_add(1) else {
            current.cache.get(key);
            return slot;
        };
        let (owned_key, value) = match current.cache.take(key) {
            Some(pair) => pair,
            None => panic!("lfu: key is missing from its bucket"),
        };
        let emptied = current.is_empty();

        let target = self.bucket_after(slot.bucket, next_frequency);
        let entry = self.bucket_mut(target).cache.insert_front(owned_key, value);
        if emptied {
            self.retire(slot.bucket);
        }

        let moved = Slot {
            bucket: target,
            entry,
        };
        match self.base.lookup_mut(key) {
            Some(stored) => *stored = moved,
            None => panic!("lfu: relocated key is missing from the lookup map"),
        }
        moved
    }

    /// Inserts a key that is not present into the frequency-1 bucket.
    ///
    /// # Panics
    ///
    /// Panics if the cache is already at capacity.
    fn insert_new(&mut self, key: K, value: V) {
        assert!(
            !self.is_at_capacity(),
            "lfu: insert into a cache already at capacity {}",
            self.cap()
        );
        let head = self.buckets.head();
        let bucket = self.bucket_after(head, 1);
        let entry = self.bucket_mut(bucket).cache.insert_front(key.clone(), value);
        self.base.insert(key, Slot { bucket, entry });
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.base.lookup(key)?;
        let slot = self.relocate(key, slot);
        Some(self.value(slot))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.base.lookup(key)?;
        let slot = self.relocate(key, slot);
        Some(self.value_mut(slot))
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.base.lookup(key)?;
        Some(self.value(slot))
    }

    pub(crate) fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.base.lookup(key)?;
        Some(self.bucket(slot.bucket).frequency)
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&slot) = self.base.lookup(&key) {
            let slot = self.relocate(&key, slot);
            let old_value = mem::replace(self.value_mut(slot), value);
            return Some((key, old_value));
        }

        let mut evicted = None;
        if self.is_at_capacity() {
            evicted = Some(self.evict_least_frequent());
        }
        self.insert_new(key, value);
        evicted
    }

    /// Removes the least recently used key of the lowest frequency bucket.
    ///
    /// # Panics
    ///
    /// Panics if the cache is empty.
    pub(crate) fn evict_least_frequent(&mut self) -> (K, V) {
        let first = match self.buckets.first() {
            Some(id) => id,
            None => panic!("evict_least_frequent: cache is empty"),
        };
        let bucket = self.bucket_mut(first);
        let frequency = bucket.frequency;
        let (key, value) = bucket.cache.evict_least_recently_used();
        let emptied = bucket.is_empty();

        self.base.remove(&key);
        if emptied {
            self.retire(first);
        }
        trace!("lfu: evicted an entry at frequency {frequency}");
        (key, value)
    }

    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        Some(self.evict_least_frequent())
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.base.lookup(key)?;
        let bucket = self.bucket_mut(slot.bucket);
        let (_, value) = bucket.cache.take(key)?;
        let emptied = bucket.is_empty();

        self.base.remove(key);
        if emptied {
            self.retire(slot.bucket);
        }
        Some(value)
    }

    pub(crate) fn clear(&mut self) {
        self.base.clear();
        self.buckets.clear();
    }

    pub(crate) fn frequencies(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().map(|(_, bucket)| bucket.frequency)
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len(),
        }
    }

    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.len() > self.cap().get() {
            return Err(CacheError::invariant(format!(
                "lfu: size {} exceeds capacity {}",
                self.len(),
                self.cap()
            )));
        }

        let mut previous = 0;
        let mut total = 0;
        for (_, bucket) in self.buckets.iter() {
            if bucket.frequency <= previous {
                return Err(CacheError::invariant(format!(
                    "lfu: bucket frequency {} follows {}",
                    bucket.frequency, previous
                )));
            }
            if bucket.is_empty() {
                return Err(CacheError::invariant(format!(
                    "lfu: bucket for frequency {} is empty",
                    bucket.frequency
                )));
            }
            bucket.cache.check_invariants()?;
            previous = bucket.frequency;
            total += bucket.cache.len();
        }
        if total != self.len() {
            return Err(CacheError::invariant(format!(
                "lfu: buckets hold {} keys but the lookup map holds {}",
                total,
                self.len()
            )));
        }

        for (key, slot) in self.base.iter() {
            if !self.buckets.is_linked(slot.bucket) {
                return Err(CacheError::invariant(
                    "lfu: key points at a bucket outside the list",
                ));
            }
            if self.bucket(slot.bucket).cache.node_of(key) != Some(slot.entry) {
                return Err(CacheError::invariant(
                    "lfu: key is not at its recorded node in its bucket",
                ));
            }
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.base.cap())
            .field("len", &self.base.len())
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

/// An implementation of a Least Frequently Used (LFU) cache.
///
/// The cache tracks how many times each key has been read or written and, when
/// full, evicts a key with the lowest count. Among keys with the same count
/// the least recently accessed one goes first.
///
/// # Examples
///
/// ```
/// use bucket_cache::LfuCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LfuCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // "apple" is read once more, so it now has a higher frequency
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.frequency(&"apple"), Some(2));
///
/// // "banana" has the lowest frequency and is evicted
/// assert_eq!(cache.put("cherry", 3), Some(("banana", 2)));
/// assert!(cache.contains(&"apple"));
/// assert!(!cache.contains(&"banana"));
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: LfuSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LfuCache<K, V, S> {
    /// Creates a new LFU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        debug!("lfu cache created: capacity={cap}");
        Self {
            segment: LfuSegment::with_hasher(cap.into(), hash_builder),
        }
    }

    /// Creates a cache from a configuration, validating its capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `config.capacity` is zero.
    pub fn init(config: LfuCacheConfig, hash_builder: Option<S>) -> Result<Self>
    where
        S: Default,
    {
        let cap = config.validate()?;
        Ok(Self::with_hasher(
            cap.as_non_zero(),
            hash_builder.unwrap_or_default(),
        ))
    }

    /// Returns the maximum number of key-value pairs the cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap().as_non_zero()
    }

    /// Returns the current number of key-value pairs in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache contains no key-value pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if the next insert of a new key will evict.
    #[inline]
    pub fn is_at_capacity(&self) -> bool {
        self.segment.is_at_capacity()
    }

    /// Returns `true` if `key` is cached. Does not count as an access.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Returns a reference to the value for `key`, incrementing its frequency.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value for `key`, incrementing its
    /// frequency.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without counting an access.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns how many times `key` has been accessed since it was inserted,
    /// counting the insert itself.
    #[inline]
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.frequency(key)
    }

    /// Inserts a key-value pair into the cache.
    ///
    /// Updating an existing key replaces its value, counts as an access and
    /// returns the old pair. Inserting a new key into a full cache evicts and
    /// returns the least frequently used entry. New keys start at frequency 1.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }

    /// Removes `key`, returning its value if it was cached.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Evicts the entry a full cache would evict next: the least recently
    /// accessed key among those with the lowest frequency.
    ///
    /// # Panics
    ///
    /// Panics if the cache is empty. Use [`pop`](Self::pop) for a
    /// non-panicking variant.
    #[inline]
    pub fn evict_least_frequent(&mut self) -> (K, V) {
        self.segment.evict_least_frequent()
    }

    /// Removes and returns the next eviction candidate, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.segment.pop()
    }

    /// Clears the cache, removing all key-value pairs.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// The distinct frequencies currently held, lowest first.
    pub fn frequencies(&self) -> impl Iterator<Item = u64> + '_ {
        self.segment.frequencies()
    }

    /// Iterates `(key, value, frequency)` in eviction order.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        self.segment.iter()
    }

    /// Verifies the bucket ordering, that no bucket is empty, and that the
    /// lookup map agrees with every bucket on where each key lives.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Invariant`] describing the first inconsistency.
    pub fn check_invariants(&self) -> Result<()> {
        self.segment.check_invariants()
    }
}

impl<K: Hash + Eq + Clone, V> LfuCache<K, V> {
    /// Creates a new LFU cache with the specified capacity.
    pub fn new(cap: NonZeroUsize) -> LfuCache<K, V, DefaultHashBuilder> {
        LfuCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LFU cache, rejecting a capacity of zero.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<LfuCache<K, V, DefaultHashBuilder>> {
        let cap = Capacity::new(capacity)?;
        Ok(LfuCache::new(cap.as_non_zero()))
    }
}

impl<'a, K: Hash + Eq + Clone, V, S: BuildHasher + Clone> IntoIterator for &'a LfuCache<K, V, S> {
    type Item = (&'a K, &'a V, u64);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`LfuCache`] in eviction order.
///
/// Lowest frequency first; within one frequency, least recently accessed first.
pub struct Iter<'a, K, V, S = DefaultHashBuilder> {
    buckets: list::Iter<'a, FrequencyBucket<K, V, S>>,
    current: Option<(u64, lru::Iter<'a, K, V>)>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((frequency, entries)) = &mut self.current {
                if let Some((key, value)) = entries.next_back() {
                    self.remaining -= 1;
                    return Some((key, value, *frequency));
                }
            }
            let (_, bucket) = self.buckets.next()?;
            self.current = Some((bucket.frequency, bucket.cache.iter()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {}

impl<K, V, S> fmt::Debug for Iter<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn make_lfu<K: Hash + Eq + Clone, V>(cap: usize) -> LfuCache<K, V> {
        LfuCache::new(NonZeroUsize::new(cap).unwrap())
    }

    fn frequencies<K: Hash + Eq + Clone, V>(cache: &LfuCache<K, V>) -> Vec<u64> {
        cache.frequencies().collect()
    }

    #[test]
    fn test_lfu_basic() {
        let mut cache = make_lfu(3);

        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("b", 2), None);
        assert_eq!(cache.put("c", 3), None);

        // Access "a" multiple times to increase its frequency
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"a"), Some(&1));

        // Access "b" once
        assert_eq!(cache.get(&"b"), Some(&2));

        // "c" has the lowest frequency and goes first
        let evicted = cache.put("d", 4);
        assert_eq!(evicted, Some(("c", 3)));

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"d"), Some(&4));
        assert_eq!(cache.get(&"c"), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_frequency_tie_break() {
        let mut cache = make_lfu(2);
        cache.put(1, 'X');
        cache.put(2, 'Y');
        assert_eq!(cache.get(&1), Some(&'X'));
        assert_eq!(cache.frequency(&1), Some(2));
        assert_eq!(cache.frequency(&2), Some(1));

        assert_eq!(cache.put(3, 'Z'), Some((2, 'Y')));
        assert_eq!(cache.get(&1), Some(&'X'));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&'Z'));
    }

    #[test]
    fn test_lfu_recency_breaks_equal_frequency() {
        let mut cache = make_lfu(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        // All at frequency 2, "b" touched first
        cache.get(&"b");
        cache.get(&"a");
        cache.get(&"c");
        assert_eq!(frequencies(&cache), vec![2]);
        assert_eq!(cache.put("d", 4), Some(("b", 2)));
    }

    #[test]
    fn test_lfu_capacity_one_churn() {
        let mut cache = make_lfu(1);
        cache.put(4, 9);
        assert_eq!(cache.get(&4), Some(&9));
        assert_eq!(cache.put(2, 5), Some((4, 9)));
        assert_eq!(cache.get(&4), None);
        assert_eq!(cache.get(&2), Some(&5));
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_update_counts_as_access() {
        let mut cache = make_lfu(2);
        cache.put("a", 1);
        assert_eq!(cache.put("a", 10), Some(("a", 1)));
        assert_eq!(cache.frequency(&"a"), Some(2));
        assert_eq!(cache.peek(&"a"), Some(&10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lfu_buckets_created_and_retired() {
        let mut cache = make_lfu(3);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(frequencies(&cache), vec![1]);

        cache.get(&"a");
        assert_eq!(frequencies(&cache), vec![1, 2]);

        // "b" joins "a" in the existing frequency-2 bucket; bucket 1 empties
        cache.get(&"b");
        assert_eq!(frequencies(&cache), vec![2]);

        cache.get(&"a");
        cache.get(&"a");
        assert_eq!(frequencies(&cache), vec![2, 4]);

        cache.put("c", 3);
        assert_eq!(frequencies(&cache), vec![1, 2, 4]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_new_bucket_lands_between_neighbours() {
        let mut cache = make_lfu(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"b");
        cache.get(&"b");
        assert_eq!(frequencies(&cache), vec![1, 3]);

        cache.get(&"a");
        assert_eq!(frequencies(&cache), vec![2, 3]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_peek_and_contains_do_not_count() {
        let mut cache = make_lfu(2);
        cache.put("a", 1);
        cache.put("b", 2);
        for _ in 0..5 {
            assert_eq!(cache.peek(&"a"), Some(&1));
            assert!(cache.contains(&"a"));
        }
        assert_eq!(cache.frequency(&"a"), Some(1));
        // Still "a" first: it is the least recent at frequency 1
        assert_eq!(cache.put("c", 3), Some(("a", 1)));
    }

    #[test]
    fn test_lfu_get_mut() {
        let mut cache = make_lfu(2);
        cache.put("a", 1);
        cache.put("b", 2);
        if let Some(value) = cache.get_mut(&"a") {
            *value = 10;
        }
        assert_eq!(cache.frequency(&"a"), Some(2));
        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert_eq!(cache.get(&"a"), Some(&10));
    }

    #[test]
    fn test_lfu_remove() {
        let mut cache = make_lfu(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get(&"a");

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(frequencies(&cache), vec![1]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_pop_and_iter_follow_eviction_order() {
        let mut cache = make_lfu(4);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        cache.put("d", 4);
        cache.get(&"a");
        cache.get(&"a");
        cache.get(&"c");

        let order: Vec<_> = cache.iter().map(|(k, _, f)| (*k, f)).collect();
        assert_eq!(order, vec![("b", 1), ("d", 1), ("c", 2), ("a", 3)]);
        assert_eq!(cache.iter().len(), 4);

        assert_eq!(cache.pop(), Some(("b", 2)));
        assert_eq!(cache.pop(), Some(("d", 4)));
        assert_eq!(cache.evict_least_frequent(), ("c", 3));
        assert_eq!(cache.pop(), Some(("a", 1)));
        assert_eq!(cache.pop(), None);
        assert!(cache.is_empty());
        assert_eq!(frequencies(&cache), Vec::<u64>::new());
    }

    #[test]
    #[should_panic(expected = "cache is empty")]
    fn test_lfu_evict_from_empty_panics() {
        let mut cache: LfuCache<u32, u32> = make_lfu(2);
        cache.evict_least_frequent();
    }

    #[test]
    fn test_lfu_clear() {
        let mut cache = make_lfu(2);
        cache.put("a", 1);
        cache.get(&"a");
        cache.put("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.frequencies().count(), 0);
        cache.put("c", 3);
        assert_eq!(cache.frequency(&"c"), Some(1));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_capacity_flags() {
        let mut cache = make_lfu(2);
        assert!(!cache.is_at_capacity());
        cache.put(1, 1);
        cache.put(2, 2);
        assert!(cache.is_at_capacity());
        cache.put(3, 3);
        assert!(cache.is_at_capacity());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cap().get(), 2);
    }

    #[test]
    fn test_lfu_string_keys() {
        let mut cache = make_lfu(2);
        cache.put("apple".to_string(), 1);
        cache.put(String::from("banana"), 2);
        assert_eq!(cache.get("apple"), Some(&1));
        assert_eq!(cache.frequency("apple"), Some(2));
        assert_eq!(cache.remove("banana"), Some(2));
        assert!(!cache.contains("banana"));
    }

    #[test]
    fn test_lfu_try_new_and_init() {
        assert!(LfuCache::<u8, u8>::try_new(0).is_err());
        assert_eq!(LfuCache::<u8, u8>::try_new(3).unwrap().cap().get(), 3);

        let cache: LfuCache<u8, u8> = LfuCache::init(LfuCacheConfig { capacity: 4 }, None).unwrap();
        assert_eq!(cache.cap().get(), 4);
        let rejected: Result<LfuCache<u8, u8>> = LfuCache::init(LfuCacheConfig { capacity: 0 }, None);
        assert!(matches!(rejected, Err(CacheError::InvalidCapacity(_))));
    }

    #[test]
    fn test_lfu_segment_relocate_keeps_mappings_in_step() {
        let mut segment: LfuSegment<u32, u32> =
            LfuSegment::with_hasher(Capacity::new(4).unwrap(), DefaultHashBuilder::default());
        for key in 0..4 {
            segment.put(key, key * 10);
        }
        for round in 0..10 {
            for key in 0..=(round % 4) {
                segment.get(&key);
                segment.check_invariants().unwrap();
            }
        }
        assert_eq!(segment.frequency(&0), Some(11));
        assert_eq!(segment.frequency(&3), Some(3));
    }

    #[test]
    fn test_lfu_debug_output() {
        let mut segment: LfuSegment<u32, u32> =
            LfuSegment::with_hasher(Capacity::new(4).unwrap(), DefaultHashBuilder::default());
        segment.put(1, 1);
        segment.put(2, 2);
        segment.get(&1);
        assert_eq!(
            alloc::format!("{:?}", segment),
            "LfuSegment { capacity: Capacity(4), len: 2, buckets: 2 }"
        );
        assert_eq!(
            alloc::format!("{:?}", segment.iter()),
            "Iter { remaining: 2 }"
        );
    }

    #[test]
    fn test_lfu_huge_capacity() {
        let mut cache = LfuCache::<u32, u32>::try_new(usize::MAX).unwrap();
        assert_eq!(cache.cap().get(), usize::MAX);
        for i in 0..100 {
            assert_eq!(cache.put(i, i), None);
        }
        cache.get(&7);
        assert_eq!(cache.len(), 100);
        assert!(!cache.is_at_capacity());
        assert_eq!(cache.frequency(&7), Some(2));
        assert_eq!(frequencies(&cache), vec![1, 2]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lfu_externally_synchronized() {
        use std::sync::{Arc, Mutex};
        use std::thread;

        let cache = Arc::new(Mutex::new(make_lfu::<String, i32>(50)));
        let mut handles = Vec::new();

        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    let key = std::format!("key_{}", i % 100);
                    let mut guard = cache.lock().unwrap();
                    if i % 3 == 0 {
                        guard.put(key, t * 1000 + i);
                    } else {
                        let _ = guard.get(&key);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let guard = cache.lock().unwrap();
        assert!(guard.len() <= 50);
        guard.check_invariants().unwrap();
    }
}
