//! Cache Module
//!
//! Bounded LRU caching with lazy TTL expiration and atomic get-or-add.

mod entry;
mod loader;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{ttl_from_secs, CacheEntry};
pub use loader::Loader;
pub use lru::{Handle, LruTracker};
pub use shared::Lru;
pub use stats::CacheStats;
pub use store::LruStore;
