//! Error types.
//!
//! Only two things can go wrong from a caller's point of view: a cache was
//! configured with a capacity that is not a positive whole number, or
//! [`check_invariants`](crate::LfuCache::check_invariants) found the internal
//! structure in an inconsistent state. Missing keys are not errors; lookups
//! return `None` for them.
//!
//! # Examples
//!
//! ```
//! use bucket_cache::{CacheError, LruCache};
//!
//! let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
//! assert!(matches!(err, CacheError::InvalidCapacity(_)));
//! assert!(err.to_string().contains("capacity"));
//! ```

extern crate alloc;

use alloc::string::String;
use thiserror::Error;

/// Errors reported by cache construction and invariant checking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested capacity is zero, negative, fractional, not finite, or
    /// larger than `usize::MAX`. The payload describes the rejected input.
    #[error("capacity must be a positive integer, got {0}")]
    InvalidCapacity(String),

    /// An internal structural invariant does not hold.
    #[error("cache invariant violated: {0}")]
    Invariant(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CacheError>;

impl CacheError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        CacheError::Invariant(msg.into())
    }
}
