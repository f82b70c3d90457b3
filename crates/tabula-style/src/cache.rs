//! Bounded least-frequently-used map.
//!
//! Reports with very many distinct elements would otherwise keep one cache
//! entry per element alive for the whole session. When the map is full the
//! entry with the fewest hits is dropped; among equally cold entries the
//! oldest one goes first. Entries are kept ordered by `(hits, insertion)`
//! next to the map, so finding the coldest one is a first-key lookup.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug)]
struct Slot<V> {
    value: V,
    hits: u64,
    inserted: u64,
}

/// A map holding at most `capacity` entries, evicting the least frequently
/// used one on overflow.
#[derive(Debug)]
pub struct LfuCache<K, V> {
    capacity: usize,
    slots: HashMap<K, Slot<V>>,
    /// Every key under its `(hits, inserted)` rank; the first is the coldest.
    order: BTreeMap<(u64, u64), K>,
    clock: u64,
}

impl<K: Eq + Hash + Clone, V> LfuCache<K, V> {
    /// An empty cache. A capacity of zero disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        LfuCache {
            capacity,
            slots: HashMap::new(),
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a value, counting the access as a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = self.slots.get_mut(key)?;
        if let Some(owner) = self.order.remove(&(slot.hits, slot.inserted)) {
            slot.hits += 1;
            let _ = self.order.insert((slot.hits, slot.inserted), owner);
        }
        Some(&slot.value)
    }

    /// Look up a value without counting a hit.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Returns true if the key is cached.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Insert or overwrite a value.
    ///
    /// Overwriting keeps the entry's hit count. Inserting a new key into a
    /// full cache evicts the coldest entry first; the evicted key is
    /// returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.value = value;
            return None;
        }

        let evicted = if self.slots.len() >= self.capacity {
            self.evict_coldest()
        } else {
            None
        };

        self.clock += 1;
        let _ = self.order.insert((0, self.clock), key.clone());
        let _ = self.slots.insert(
            key,
            Slot {
                value,
                hits: 0,
                inserted: self.clock,
            },
        );
        evicted
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.slots.remove(key)?;
        let _ = self.order.remove(&(slot.hits, slot.inserted));
        Some(slot.value)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    fn evict_coldest(&mut self) -> Option<K> {
        let (_, coldest) = self.order.pop_first()?;
        let _ = self.slots.remove(&coldest);
        Some(coldest)
    }
}
