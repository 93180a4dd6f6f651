//! Memo LRU - A bounded in-process memoization cache
//!
//! Provides a thread-safe LRU cache with optional per-entry expiration and an
//! atomic get-or-add, meant to sit in front of expensive or remote lookups.
//!
//! Expiration is lazy: entries are checked when they are read, and nothing runs
//! in the background.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, Loader, Lru};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
