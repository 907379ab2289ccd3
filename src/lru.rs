//! Least Recently Used (LRU) Cache Implementation
//!
//! This module provides an LRU cache with O(1) operations for all common cache
//! operations. The same algorithm also backs every frequency bucket of the
//! [`LfuCache`](crate::LfuCache): a bucket *is* an LRU segment holding the keys
//! currently at one frequency.
//!
//! # Algorithm
//!
//! Entries sit in a doubly linked list ordered from most recently used (just
//! after the head sentinel) to least recently used (just before the tail
//! sentinel). A key lookup map points at each entry's node. A hit relinks the
//! node at the front; a miss that finds the cache full evicts the node at the
//! back before inserting the new one at the front.
//!
//! ```text
//!   head ⇄ [most recent] ⇄ ... ⇄ [least recent] ⇄ tail
//!               ▲                       │
//!          get / put               evicted first
//! ```
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Put: O(1)
//! - Remove: O(1)
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! cache in a synchronization primitive such as `Mutex` and hold the lock for
//! the whole of each call.

extern crate alloc;

use crate::base::{prealloc_len, CacheBase, DefaultHashBuilder};
use crate::config::{Capacity, LruCacheConfig};
use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};
use crate::list::{self, List, NodeId};
use alloc::format;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use log::{debug, trace};

/// Internal LRU segment containing the actual cache algorithm.
///
/// This is shared between `LruCache` and the frequency buckets of
/// `LfuCache`. All recency logic lives here.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    base: CacheBase<K, NodeId, S>,
    list: List<CacheEntry<K, V>>,
}

impl<K, V, S> LruSegment<K, V, S> {
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

    /// Value of the entry stored at `node`.
    pub(crate) fn value_at(&self, node: NodeId) -> Option<&V> {
        self.list.get(node).map(|entry| &entry.value)
    }

    pub(crate) fn value_at_mut(&mut self, node: NodeId) -> Option<&mut V> {
        self.list.get_mut(node).map(|entry| &mut entry.value)
    }

    /// Most recent to least recent.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    /// Creates a segment with its map and list sized for `cap` entries, up to
    /// a fixed preallocation limit.
    pub(crate) fn with_hasher(cap: Capacity, hash_builder: S) -> Self {
        LruSegment {
            base: CacheBase::with_capacity_and_hasher(cap, hash_builder),
            list: List::with_capacity(prealloc_len(cap)),
        }
    }

    /// Creates a segment that allocates only as entries arrive.
    ///
    /// Frequency buckets are created and dropped on the hot path, so they
    /// must not pay for their (cache-wide) capacity up front.
    pub(crate) fn unallocated(cap: Capacity, hash_builder: S) -> Self {
        LruSegment {
            base: CacheBase::with_hasher(cap, hash_builder),
            list: List::new(),
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

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.base.lookup(key)?;
        self.list.move_to_front(node);
        self.list.get(node).map(|entry| &entry.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.base.lookup(key)?;
        self.list.move_to_front(node);
        self.list.get_mut(node).map(|entry| &mut entry.value)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.base.lookup(key)?;
        self.list.get(node).map(|entry| &entry.value)
    }

    /// The list node holding `key`.
    pub(crate) fn node_of<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.lookup(key).copied()
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(&node) = self.base.lookup(&key) {
            self.list.move_to_front(node);
            let entry = match self.list.get_mut(node) {
                Some(entry) => entry,
                None => panic!("lru: map points at {node:?}, which holds no entry"),
            };
            let old_value = entry.replace_value(value);
            return Some((key, old_value));
        }

        let mut evicted = None;
        if self.is_at_capacity() {
            trace!("lru: full at {}, evicting least recently used", self.cap());
            evicted = Some(self.evict_least_recently_used());
        }
        self.insert_front(key, value);
        evicted
    }

    /// Inserts a key that is not yet present as the most recent entry.
    ///
    /// # Panics
    ///
    /// Panics if the segment is already at capacity. Callers make room first.
    pub(crate) fn insert_front(&mut self, key: K, value: V) -> NodeId
    where
        K: Clone,
    {
        assert!(
            !self.is_at_capacity(),
            "insert_front: segment is already at capacity {}",
            self.cap()
        );
        debug_assert!(!self.contains(&key));
        let node = self.list.push_front(CacheEntry::new(key.clone(), value));
        self.base.insert(key, node);
        node
    }

    /// Removes and returns the least recently used entry.
    ///
    /// # Panics
    ///
    /// Panics if the segment is empty.
    pub(crate) fn evict_least_recently_used(&mut self) -> (K, V) {
        let node = match self.list.last() {
            Some(node) => node,
            None => panic!("evict_least_recently_used: segment is empty"),
        };
        let entry = self.list.remove(node);
        self.base.remove(&entry.key);
        entry.into_pair()
    }

    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        Some(self.evict_least_recently_used())
    }

    /// Detaches the entry for `key` without counting it as an eviction.
    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.base.remove(key)?;
        Some(self.list.remove(node).into_pair())
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(key).map(|(_, value)| value)
    }

    pub(crate) fn clear(&mut self) {
        self.base.clear();
        self.list.clear();
    }

    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.base.len() > self.cap().get() {
            return Err(CacheError::invariant(format!(
                "lru: size {} exceeds capacity {}",
                self.base.len(),
                self.cap()
            )));
        }
        if self.base.len() != self.list.len() {
            return Err(CacheError::invariant(format!(
                "lru: map holds {} keys but list holds {} nodes",
                self.base.len(),
                self.list.len()
            )));
        }
        for (node, entry) in self.list.iter() {
            if self.base.lookup(&entry.key) != Some(&node) {
                return Err(CacheError::invariant(
                    "lru: list node is not the one the map points at",
                ));
            }
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.base.cap())
            .field("len", &self.list.len())
            .finish()
    }
}

/// An implementation of a Least Recently Used (LRU) cache.
///
/// The cache has a fixed capacity and supports O(1) operations for
/// inserting, retrieving, and updating entries. When the cache reaches capacity,
/// the least recently used entry will be evicted to make room for new entries.
///
/// # Examples
///
/// ```
/// use bucket_cache::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// // Add items to the cache
/// cache.put("apple", 1);
/// cache.put("banana", 2);
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(&1));
///
/// // Adding beyond capacity evicts the least recently used item
/// cache.put("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(&1));
/// assert_eq!(cache.get(&"cherry"), Some(&3));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        debug!("lru cache created: capacity={cap}");
        Self {
            segment: LruSegment::with_hasher(cap.into(), hash_builder),
        }
    }

    /// Creates a cache from a configuration, validating its capacity.
    ///
    /// Uses `hash_builder` if given, otherwise `S::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `config.capacity` is zero.
    pub fn init(config: LruCacheConfig, hash_builder: Option<S>) -> Result<Self>
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

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if the next insert of a new key will evict.
    #[inline]
    pub fn is_at_capacity(&self) -> bool {
        self.segment.is_at_capacity()
    }

    /// Returns `true` if `key` is cached. Does not affect recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Returns a reference to the value for `key` and marks it most recently used.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a mutable reference to the value for `key` and marks it most
    /// recently used.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without touching its recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
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

    /// Removes and returns the least recently used entry, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.segment.pop()
    }

    /// Removes every entry. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Iterates entries from most recently to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.segment.iter()
    }

    /// Verifies that the lookup map and the recency list agree and that the
    /// size is within capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Invariant`] describing the first inconsistency.
    pub fn check_invariants(&self) -> Result<()> {
        self.segment.check_invariants()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts a key-value pair, marking it most recently used.
    ///
    /// If the key was already cached its value is replaced and the old pair is
    /// returned. Otherwise, if the cache was full, the least recently used
    /// entry is evicted and returned.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new LRU cache with the specified capacity.
    pub fn new(cap: NonZeroUsize) -> LruCache<K, V, DefaultHashBuilder> {
        LruCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache, rejecting a capacity of zero.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<LruCache<K, V, DefaultHashBuilder>> {
        let cap = Capacity::new(capacity)?;
        Ok(LruCache::new(cap.as_non_zero()))
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`LruCache`], most recently used first.
///
/// Reverse it to walk in eviction order.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, CacheEntry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|(_, entry)| (&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.size_hint().0)
            .finish()
    }
}
