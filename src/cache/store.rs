//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and lazy TTL expiration.

use std::borrow::Borrow;
use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::lru::Handle;
use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};

/// Index record: where the key sits in the recency order, and its payload.
#[derive(Debug)]
struct Slot<V> {
    handle: Handle,
    entry: CacheEntry<V>,
}

// == Cache Store ==
/// Capacity-bounded map with LRU eviction and lazy expiration.
///
/// Not synchronized; [`crate::cache::Lru`] wraps it in a lock for shared use.
/// Expired entries are only dropped when a lookup observes them, so they keep
/// occupying a slot (and show up in [`LruStore::keys`] and [`LruStore::len`])
/// until touched, evicted or removed.
#[derive(Debug)]
pub struct LruStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, Slot<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new LruStore holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Insert ==
    /// Stores a key-value pair that expires `ttl` from now (zero = never).
    ///
    /// If the key already exists, the value and expiration are replaced and the
    /// key becomes most recently used. If a new key would exceed capacity, the
    /// least recently used entry is evicted first.
    pub fn insert(&mut self, key: K, value: V, ttl: Duration) -> &V {
        self.put(key, CacheEntry::new(value, ttl))
    }

    /// Stores a value with no expiration.
    pub fn insert_persistent(&mut self, key: K, value: V) -> &V {
        self.put(key, CacheEntry::persistent(value))
    }

    // == Get ==
    /// Retrieves a live value by key and marks it most recently used.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = match self.entries.get(key) {
            Some(slot) => slot.entry.is_expired_at(Instant::now()),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.expire(key);
            self.stats.record_miss();
            return None;
        }

        let slot = self.entries.get(key)?;
        self.lru.touch(slot.handle);
        self.stats.record_hit();
        Some(&slot.entry.value)
    }

    // == Get Or Insert ==
    /// Returns the live value for `key` if there is one, otherwise stores `value`.
    ///
    /// The boolean is `true` when an existing value was loaded (and `value`
    /// dropped), `false` when `value` was stored. An expired entry counts as
    /// absent and is replaced.
    pub fn get_or_insert(&mut self, key: K, value: V, ttl: Duration) -> (&V, bool) {
        self.lookup_or_put(key, value, ttl, true)
    }

    /// Same as [`LruStore::get_or_insert`] without counting a hit or miss.
    ///
    /// For callers that already counted the lookup themselves.
    pub fn get_or_insert_unrecorded(&mut self, key: K, value: V, ttl: Duration) -> (&V, bool) {
        self.lookup_or_put(key, value, ttl, false)
    }

    fn lookup_or_put(&mut self, key: K, value: V, ttl: Duration, record: bool) -> (&V, bool) {
        let live = match self.entries.get(&key) {
            Some(slot) if slot.entry.is_expired_at(Instant::now()) => {
                self.stats.record_expiration();
                debug!("replacing expired entry on get-or-insert");
                false
            }
            Some(_) => true,
            None => false,
        };

        if live {
            let slot = &self.entries[&key];
            self.lru.touch(slot.handle);
            if record {
                self.stats.record_hit();
            }
            return (&slot.entry.value, true);
        }

        if record {
            self.stats.record_miss();
        }
        (self.put(key, CacheEntry::new(value, ttl)), false)
    }

    // == Peek ==
    /// Returns a live value without changing recency or dropping expired entries.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|slot| !slot.entry.is_expired())
            .map(|slot| &slot.entry.value)
    }

    // == Contains ==
    /// Checks for a live entry without changing recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek(key).is_some()
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.entries.remove(key)?;
        self.lru.remove(slot.handle);
        Some(slot.entry.value)
    }

    // == Oldest ==
    /// Removes and returns the least recently used entry, expired or not.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let key = self.lru.evict_oldest()?;
        let slot = self.entries.remove(&key)?;
        Some((key, slot.entry.value))
    }

    /// Returns the least recently used entry, expired or not, without touching it.
    pub fn get_oldest(&self) -> Option<(&K, &V)> {
        let key = self.lru.peek_oldest()?;
        let slot = self.entries.get(key)?;
        Some((key, &slot.entry.value))
    }

    // == Keys ==
    /// Returns every tracked key from least to most recently used.
    ///
    /// Expired entries that have not been observed yet are included.
    pub fn keys(&self) -> Vec<K> {
        self.lru.iter_oldest_first().cloned().collect()
    }

    // == Purge ==
    /// Removes every entry. Counters are kept.
    pub fn purge(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        debug!(dropped, "purged cache");
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, including not-yet-observed expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Places an entry as most recently used, evicting first if a new key
    /// would exceed capacity.
    fn put(&mut self, key: K, entry: CacheEntry<V>) -> &V {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let lru = &mut self.lru;
        let slot = match self.entries.entry(key) {
            hash_map::Entry::Occupied(occupied) => {
                let slot = occupied.into_mut();
                slot.entry = entry;
                lru.touch(slot.handle);
                slot
            }
            hash_map::Entry::Vacant(vacant) => {
                let handle = lru.push_front(vacant.key().clone());
                vacant.insert(Slot { handle, entry })
            }
        };
        &slot.entry.value
    }

    fn evict_oldest(&mut self) {
        if let Some(key) = self.lru.evict_oldest() {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
    }

    fn expire<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.remove(key).is_some() {
            self.stats.record_expiration();
            debug!("dropped expired entry on access");
        }
    }
}
