//! Frequency buckets for the LFU cache.
//!
//! A bucket is one node of the LFU cache's outer list. It records the access
//! count shared by all of its keys and owns an LRU segment holding exactly
//! those keys, most recently touched first. Buckets are created the first time
//! a key reaches their frequency and dropped as soon as their segment empties.

use crate::base::DefaultHashBuilder;
use crate::config::Capacity;
use crate::lru::LruSegment;
use core::fmt;
use core::hash::{BuildHasher, Hash};

pub(crate) struct FrequencyBucket<K, V, S = DefaultHashBuilder> {
    pub(crate) frequency: u64,
    pub(crate) cache: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V, S: BuildHasher> FrequencyBucket<K, V, S> {
    /// An empty bucket for `frequency`, able to hold every key of the cache.
    pub(crate) fn new(frequency: u64, cap: Capacity, hash_builder: S) -> Self {
        debug_assert!(frequency > 0);
        FrequencyBucket {
            frequency,
            cache: LruSegment::unallocated(cap, hash_builder),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<K, V, S> fmt::Debug for FrequencyBucket<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyBucket")
            .field("frequency", &self.frequency)
            .field("cache", &self.cache)
            .finish()
    }
}
