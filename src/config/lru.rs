//! Configuration for the Least Recently Used (LRU) cache.
//!
//! # Examples
//!
//! ```
//! use bucket_cache::config::LruCacheConfig;
//! use bucket_cache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 10_000 };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None).unwrap();
//! assert!(cache.is_empty());
//! ```

use super::Capacity;
use crate::error::Result;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// LRU evicts the least recently accessed item when the cache is full.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. Must be at
///   least one; [`LruCache::init`](crate::LruCache::init) rejects zero.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a configuration from an already non-zero capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: capacity.get(),
        }
    }

    /// Checks the configuration and returns the validated capacity.
    pub fn validate(&self) -> Result<Capacity> {
        Capacity::new(self.capacity)
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
