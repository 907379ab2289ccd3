#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Cache | Evicts | Tie-break | Best Use Case |
//! |-------|--------|-----------|---------------|
//! | [`LruCache`] | Least recently used | n/a | General purpose, recency-based access |
//! | [`LfuCache`] | Least frequently used | Least recently used | Stable popularity patterns |
//!
//! ## Performance Characteristics
//!
//! | Cache | Get | Put | Remove | Evict |
//! |-------|-----|-----|--------|-------|
//! | LRU   | O(1)| O(1)| O(1)   | O(1)  |
//! | LFU   | O(1)| O(1)| O(1)   | O(1)  |
//!
//! ## Code Examples
//!
//! ### LRU (Least Recently Used)
//!
//! ```rust
//! use bucket_cache::LruCache;
//! use bucket_cache::config::LruCacheConfig;
//!
//! let mut cache: LruCache<&str, i32> = LruCache::init(LruCacheConfig { capacity: 2 }, None).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" becomes most recently used
//! cache.put("c", 3);    // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### LFU (Least Frequently Used)
//!
//! ```rust
//! use bucket_cache::LfuCache;
//! use bucket_cache::config::LfuCacheConfig;
//!
//! let mut cache: LfuCache<&str, i32> = LfuCache::init(LfuCacheConfig { capacity: 2 }, None).unwrap();
//! cache.put("rare", 1);
//! cache.put("popular", 2);
//!
//! // Access "popular" multiple times
//! for _ in 0..10 { cache.get(&"popular"); }
//! assert_eq!(cache.frequency(&"popular"), Some(11));
//!
//! cache.put("new", 3);  // "rare" evicted (lowest frequency)
//! assert!(cache.get(&"popular").is_some());
//! assert!(cache.get(&"rare").is_none());
//!
//! // One bucket per live frequency, lowest first
//! assert_eq!(cache.frequencies().collect::<Vec<_>>(), vec![1, 12]);
//! ```
//!
//! ## Sharing Between Threads
//!
//! Neither cache synchronizes internally. Wrap it in a lock and hold the lock
//! for the whole of each call:
//!
//! ```rust
//! use bucket_cache::LfuCache;
//! use core::num::NonZeroUsize;
//! use std::sync::{Arc, Mutex};
//!
//! let cache = Arc::new(Mutex::new(LfuCache::new(NonZeroUsize::new(100).unwrap())));
//!
//! let shared = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     shared.lock().unwrap().put("key", 42);
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(cache.lock().unwrap().get(&"key"), Some(&42));
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: Least Recently Used cache implementation
//! - [`lfu`]: Least Frequently Used cache implementation
//! - [`config`]: Capacity validation and configuration structures
//! - [`entry`]: The key/value payload stored in LRU lists
//! - [`error`]: Error types

#![no_std]

#[cfg(any(test, not(feature = "hashbrown")))]
extern crate std;

#[cfg(not(any(feature = "hashbrown", feature = "std")))]
compile_error!("bucket-cache needs a hash map: enable the `hashbrown` or the `std` feature");

mod base;
mod bucket;
mod list;

/// Cache configuration structures and the validated [`Capacity`] type.
pub mod config;

/// The key/value payload stored in every LRU list node.
pub mod entry;

/// Error types.
pub mod error;

/// Least Frequently Used (LFU) cache built from frequency buckets.
///
/// Keys are grouped by access count into buckets kept in ascending frequency
/// order; each bucket is an LRU cache of its keys, so ties at the lowest
/// frequency are broken by recency.
pub mod lfu;

/// Least Recently Used (LRU) cache implementation.
///
/// Also the inner cache of every LFU frequency bucket.
pub mod lru;

pub use base::DefaultHashBuilder;
pub use config::{Capacity, LfuCacheConfig, LruCacheConfig};
pub use entry::CacheEntry;
pub use error::{CacheError, Result};
pub use lfu::LfuCache;
pub use lru::LruCache;
