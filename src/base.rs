//! Bookkeeping shared by both cache flavours.
//!
//! [`CacheBase`] pairs the fixed capacity with the key lookup map. The LRU
//! segment embeds one mapping keys to list nodes; the LFU segment embeds one
//! mapping keys to their bucket and node. Size is the map's length, so it can
//! never drift from the set of live keys.

use crate::config::Capacity;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::HashMap;

/// Upper bound on how many entries a cache reserves room for up front.
///
/// Larger caches still accept their full capacity; the map and list grow on
/// demand past this point.
pub(crate) const PREALLOC_LIMIT: usize = 1 << 16;

/// Number of slots to reserve for a cache of capacity `cap`.
#[inline]
pub(crate) fn prealloc_len(cap: Capacity) -> usize {
    cap.get().min(PREALLOC_LIMIT)
}

/// Capacity plus key lookup map.
///
/// `I` is whatever handle the owning cache needs to find a key's entry in
/// O(1).
pub(crate) struct CacheBase<K, I, S = DefaultHashBuilder> {
    cap: Capacity,
    map: HashMap<K, I, S>,
}

impl<K, I, S> CacheBase<K, I, S> {
    #[inline]
    pub(crate) fn cap(&self) -> Capacity {
        self.cap
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn is_at_capacity(&self) -> bool {
        self.map.len() == self.cap.get()
    }
}

impl<K: Hash + Eq, I, S: BuildHasher> CacheBase<K, I, S> {
    /// Creates an empty base whose map grows on demand.
    pub(crate) fn with_hasher(cap: Capacity, hash_builder: S) -> Self {
        CacheBase {
            cap,
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Creates an empty base with the map sized for a full cache up front,
    /// up to [`PREALLOC_LIMIT`] entries.
    pub(crate) fn with_capacity_and_hasher(cap: Capacity, hash_builder: S) -> Self {
        CacheBase {
            cap,
            map: HashMap::with_capacity_and_hasher(prealloc_len(cap), hash_builder),
        }
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    #[inline]
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<&I>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    #[inline]
    pub(crate) fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut I>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_mut(key)
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: K, handle: I) -> Option<I> {
        self.map.insert(key, handle)
    }

    #[inline]
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<I>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    pub(crate) fn hasher(&self) -> &S {
        self.map.hasher()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &I)> {
        self.map.iter()
    }
}
