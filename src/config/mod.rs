//! Cache Configuration Module
//!
//! This module provides configuration structures for both cache implementations,
//! plus the validated [`Capacity`] type they are built from.
//!
//! # Design Philosophy
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Checked once**: `validate()` turns the raw capacity into a [`Capacity`]
//!   or a [`CacheError::InvalidCapacity`]
//! - **Immutable afterwards**: a cache never changes its capacity
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | `LfuCacheConfig` | [`LfuCache`](crate::LfuCache) | Least Frequently Used |
//!
//! # Examples
//!
//! ```
//! use bucket_cache::config::LruCacheConfig;
//! use bucket_cache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 1000 };
//! let cache: LruCache<String, i32> = LruCache::init(config, None).unwrap();
//! assert_eq!(cache.cap().get(), 1000);
//!
//! // A zero capacity is rejected instead of producing a useless cache
//! let rejected: Result<LruCache<String, i32>, _> = LruCache::init(LruCacheConfig { capacity: 0 }, None);
//! assert!(rejected.is_err());
//! ```

extern crate alloc;

use crate::error::{CacheError, Result};
use alloc::string::ToString;
use core::fmt;
use core::num::NonZeroUsize;

pub mod lfu;
pub mod lru;

pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;

/// A validated cache capacity: a whole number of entries, at least one.
///
/// Every construction path goes through this type, so a cache can never be
/// built with a capacity of zero. The `TryFrom` impls cover capacities that
/// arrive as signed or floating point numbers.
///
/// # Examples
///
/// ```
/// use bucket_cache::config::Capacity;
///
/// assert_eq!(Capacity::new(8).unwrap().get(), 8);
/// assert!(Capacity::new(0).is_err());
/// assert!(Capacity::try_from(-3_i64).is_err());
/// assert!(Capacity::try_from(2.5_f64).is_err());
/// assert_eq!(Capacity::try_from(4.0_f64).unwrap().get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validates `capacity`, rejecting zero.
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Capacity)
            .ok_or_else(|| CacheError::InvalidCapacity(capacity.to_string()))
    }

    /// Returns the capacity as a plain `usize`.
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the capacity as a `NonZeroUsize`.
    #[inline]
    pub const fn as_non_zero(self) -> NonZeroUsize {
        self.0
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(cap: NonZeroUsize) -> Self {
        Capacity(cap)
    }
}

impl From<Capacity> for NonZeroUsize {
    fn from(cap: Capacity) -> Self {
        cap.0
    }
}

impl TryFrom<usize> for Capacity {
    type Error = CacheError;

    fn try_from(capacity: usize) -> Result<Self> {
        Capacity::new(capacity)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = CacheError;

    fn try_from(capacity: i64) -> Result<Self> {
        let raw = usize::try_from(capacity)
            .map_err(|_| CacheError::InvalidCapacity(capacity.to_string()))?;
        Capacity::new(raw)
    }
}

impl TryFrom<f64> for Capacity {
    type Error = CacheError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(capacity: f64) -> Result<Self> {
        // NaN fails both comparisons.
        if !(capacity >= 1.0 && capacity < usize::MAX as f64) {
            return Err(CacheError::InvalidCapacity(capacity.to_string()));
        }
        let whole = capacity as usize;
        if whole as f64 != capacity {
            return Err(CacheError::InvalidCapacity(capacity.to_string()));
        }
        Capacity::new(whole)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_from_usize() {
        assert_eq!(Capacity::new(1).unwrap().get(), 1);
        assert_eq!(Capacity::try_from(42_usize).unwrap().get(), 42);
        assert_eq!(
            Capacity::new(0),
            Err(CacheError::InvalidCapacity("0".to_string()))
        );
    }

    #[test]
    fn test_capacity_from_signed() {
        assert_eq!(Capacity::try_from(7_i64).unwrap().get(), 7);
        assert!(Capacity::try_from(0_i64).is_err());
        assert!(Capacity::try_from(-1_i64).is_err());
        assert!(Capacity::try_from(i64::MIN).is_err());
    }

    #[test]
    fn test_capacity_from_float() {
        assert_eq!(Capacity::try_from(3.0_f64).unwrap().get(), 3);
        assert!(Capacity::try_from(0.0_f64).is_err());
        assert!(Capacity::try_from(0.5_f64).is_err());
        assert!(Capacity::try_from(1.5_f64).is_err());
        assert!(Capacity::try_from(-2.0_f64).is_err());
        assert!(Capacity::try_from(f64::NAN).is_err());
        assert!(Capacity::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_capacity_non_zero_round_trip() {
        let cap = NonZeroUsize::new(9).unwrap();
        let capacity = Capacity::from(cap);
        assert_eq!(capacity.as_non_zero(), cap);
        assert_eq!(NonZeroUsize::from(capacity), cap);
        assert_eq!(capacity.to_string(), "9");
    }
}
