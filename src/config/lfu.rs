//! Configuration for the Least Frequently Used (LFU) cache.
//!
//! # Examples
//!
//! ```
//! use bucket_cache::config::LfuCacheConfig;
//! use bucket_cache::LfuCache;
//!
//! let config = LfuCacheConfig { capacity: 100 };
//! let cache: LfuCache<String, i32> = LfuCache::init(config, None).unwrap();
//! assert_eq!(cache.cap().get(), 100);
//! ```

use super::Capacity;
use crate::error::Result;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// LFU tracks how often each key is accessed and evicts the least frequently
/// used key when the cache is full, breaking ties by recency.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. This is also
///   the capacity of every frequency bucket, since a single frequency may
///   hold every live key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LfuCacheConfig {
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

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
