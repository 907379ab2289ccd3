//! Cache Entry Type
//!
//! A `CacheEntry<K, V>` is the payload of one node in an LRU list: the key it
//! is filed under and the cached value. The key is kept next to the value so
//! that evicting the back of a list can also clear the lookup map without a
//! reverse index.
//!
//! # Examples
//!
//! ```
//! use bucket_cache::CacheEntry;
//!
//! let entry = CacheEntry::new("key", 42);
//! assert_eq!(entry.key, "key");
//! assert_eq!(entry.value, 42);
//! assert_eq!(entry.into_pair(), ("key", 42));
//! ```

use core::fmt;

/// One cached key/value pair.
#[derive(Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    /// The cached key
    pub key: K,

    /// The cached value
    pub value: V,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates a new cache entry.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Replaces the value, returning the previous one.
    #[inline]
    pub fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its `(key, value)` pair.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CacheEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}
