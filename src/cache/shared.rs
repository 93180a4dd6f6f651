//! Shared Cache Module
//!
//! Thread-safe LRU cache handed out to callers by reference (usually inside an `Arc`).

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::entry::ttl_from_secs;
use crate::cache::{CacheStats, LruStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == Lru ==
/// Bounded, thread-safe LRU cache with lazy per-entry expiration.
///
/// Every operation takes one lock over the whole structure and does O(1) work
/// under it (except [`Lru::keys`], which copies the keys). Values are handed
/// out as clones; use `Arc<T>` values for payloads that are expensive to clone.
///
/// Expiration is evaluated on access only. There is no background sweep, so an
/// expired entry that is never looked up again keeps its slot until it is
/// evicted, removed or purged.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memo_lru::Lru;
///
/// let cache = Lru::new(2);
/// cache.add("a", 1);
/// cache.add("b", 2);
/// cache.get(&"a");
/// cache.add("c", 3);
///
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.keys(), vec!["a", "c"]);
///
/// assert_eq!(cache.get_or_add("d", 4, Duration::ZERO), (4, false));
/// assert_eq!(cache.get_or_add("d", 40, Duration::ZERO), (4, true));
/// ```
#[derive(Debug)]
pub struct Lru<K, V> {
    inner: Mutex<LruStore<K, V>>,
    /// TTL applied by `add_default`
    default_ttl: Duration,
}

impl<K, V> Lru<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`Lru::try_new`] to get an error instead.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a cache holding at most `capacity` entries, rejecting zero.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(LruStore::new(capacity)?),
            default_ttl: Duration::ZERO,
        })
    }

    /// Creates a cache sized and defaulted from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let mut cache = Self::try_new(config.capacity)?;
        cache.default_ttl = ttl_from_secs(config.default_ttl_secs);
        Ok(cache)
    }

    // == Add ==
    /// Inserts or overwrites `key` with no expiration and marks it most recently used.
    pub fn add(&self, key: K, value: V) {
        self.inner.lock().insert_persistent(key, value);
    }

    /// Same as [`Lru::add`], expiring `ttl_secs` seconds from now.
    ///
    /// Zero or negative means no expiration.
    pub fn add_with_expires_in_secs(&self, key: K, value: V, ttl_secs: i64) {
        self.add_with_ttl(key, value, ttl_from_secs(ttl_secs));
    }

    /// Same as [`Lru::add`], expiring `ttl` from now. `Duration::ZERO` means no expiration.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.inner.lock().insert(key, value, ttl);
    }

    /// Inserts with the default TTL taken from [`CacheConfig`].
    pub fn add_default(&self, key: K, value: V) {
        self.add_with_ttl(key, value, self.default_ttl);
    }

    // == Get ==
    /// Returns a clone of the live value for `key` and marks it most recently used.
    ///
    /// An expired entry is removed as a side effect and reported as `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key).cloned()
    }

    // == Get Or Add ==
    /// Atomically returns the live value for `key`, or stores `value` if there is none.
    ///
    /// Returns `(existing, true)` when a live entry was found (it is only
    /// touched, and `value` is dropped), or `(value, false)` when `value` was
    /// stored with `ttl` (`Duration::ZERO` = no expiration). Among callers racing
    /// on the same key exactly one stores its value; the rest load it.
    ///
    /// The value is produced by the caller before the call, so racing callers
    /// each pay for producing one. To compute a value only once per key, use
    /// [`crate::cache::Loader`].
    pub fn get_or_add(&self, key: K, value: V, ttl: Duration) -> (V, bool) {
        let mut inner = self.inner.lock();
        let (value, loaded) = inner.get_or_insert(key, value, ttl);
        (value.clone(), loaded)
    }

    /// [`Lru::get_or_add`] without counting a hit or miss.
    pub(crate) fn get_or_add_unrecorded(&self, key: K, value: V, ttl: Duration) -> (V, bool) {
        let mut inner = self.inner.lock();
        let (value, loaded) = inner.get_or_insert_unrecorded(key, value, ttl);
        (value.clone(), loaded)
    }

    // == Peek / Contains ==
    /// Returns a clone of the live value without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Checks for a live entry without touching recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    // == Remove ==
    /// Deletes `key` if present, returning the value it held.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        self.inner.lock().remove_oldest()
    }

    /// Returns the least recently used entry without touching it.
    pub fn get_oldest(&self) -> Option<(K, V)> {
        self.inner
            .lock()
            .get_oldest()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    // == Keys ==
    /// Snapshot of all tracked keys, least recently used first.
    ///
    /// Entries that have expired but were not looked up since are still listed,
    /// so [`Lru::get`] may miss on a key returned here.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys()
    }

    // == Len / Purge ==
    /// Number of tracked entries, counted the same way as [`Lru::keys`].
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Empties the cache.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}
