//! Loader Module
//!
//! Per-key call coalescing on top of [`Lru`]: concurrent misses for the same key
//! run the producing function once.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::Lru;

/// Gate serializing producers of one key.
type Gate = Arc<Mutex<()>>;

// == Loader ==
/// Memoizes an expensive lookup in an [`Lru`], computing each missing key once.
///
/// Callers that miss on the same key queue on a per-key gate. The first one
/// runs the producer and stores the result with get-or-add semantics; the
/// others wake up, find the stored value and return it. Each call counts as
/// one cache lookup in [`Lru::stats`]. Different keys never
/// wait on each other, except for the brief cache and gate-map locks.
///
/// Errors from the producer are returned to that caller only and nothing is
/// cached, so the next caller in line retries.
#[derive(Debug)]
pub struct Loader<K, V> {
    cache: Arc<Lru<K, V>>,
    in_flight: Mutex<HashMap<K, Gate>>,
}

impl<K, V> Loader<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(cache: Arc<Lru<K, V>>) -> Self {
        Self {
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The cache this loader fills.
    pub fn cache(&self) -> &Arc<Lru<K, V>> {
        &self.cache
    }

    // == Get Or Load ==
    /// Returns the cached value for `key`, or produces, stores and returns it.
    ///
    /// The boolean is `true` when the value came from the cache and `false`
    /// when this call ran `load`. The stored entry expires after `ttl`
    /// (`Duration::ZERO` = never).
    pub fn get_or_load<F, E>(&self, key: K, ttl: Duration, load: F) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        // The only counted lookup; the calls below leave hit/miss alone.
        if let Some(value) = self.cache.get(&key) {
            return Ok((value, true));
        }

        let in_flight = InFlight {
            loader: self,
            key: &key,
            gate: Some(self.acquire_gate(&key)),
        };
        let _turn = in_flight.gate.as_ref().map(|gate| gate.lock());

        // An earlier holder of the gate may have filled the key.
        if let Some(value) = self.cache.peek(&key) {
            return Ok((value, true));
        }

        trace!("loading missing cache entry");
        let value = load()?;
        Ok(self.cache.get_or_add_unrecorded(key.clone(), value, ttl))
    }

    /// Number of keys with a producer running or queued.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn acquire_gate(&self, key: &K) -> Gate {
        let mut in_flight = self.in_flight.lock();
        let gate = in_flight.entry(key.clone()).or_default();
        if Arc::strong_count(gate) > 1 {
            trace!("waiting on in-flight load");
        }
        Arc::clone(gate)
    }

    /// Drops the caller's gate handle and forgets the gate once nobody holds it.
    fn release_gate(&self, key: &K, gate: Gate) {
        let mut in_flight = self.in_flight.lock();
        drop(gate);
        let idle = in_flight
            .get(key)
            .is_some_and(|gate| Arc::strong_count(gate) == 1);
        if idle {
            in_flight.remove(key);
        }
    }
}

/// Holds a caller's gate handle; returning or unwinding hands it back.
struct InFlight<'a, K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    loader: &'a Loader<K, V>,
    key: &'a K,
    gate: Option<Gate>,
}

impl<K, V> Drop for InFlight<'_, K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if let Some(gate) = self.gate.take() {
            self.loader.release_gate(self.key, gate);
        }
    }
}
