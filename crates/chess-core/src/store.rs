//! Sparse square-to-piece storage.
//!
//! [`PositionStore`] is an open-addressing hash table with linear probing.
//! Deleted entries leave tombstones so that probe sequences of entries stored
//! after them stay intact until the next rehash. The table doubles when the
//! load factor reaches 0.75 and halves (never below [`MIN_CAPACITY`]) when it
//! drops to 0.25.

use std::mem;

use tracing::trace;

use crate::error::StoreError;

/// Hash function signature: maps a key to a slot for the given capacity.
pub type HashFn = fn(key: usize, capacity: usize) -> usize;

/// Capacity of a fresh table and floor for shrinking.
pub const MIN_CAPACITY: usize = 11;

/// Load factor at which the table doubles before an insertion.
const GROW_LOAD: f64 = 0.75;

/// Load factor at which the table halves after a deletion.
const SHRINK_LOAD: f64 = 0.25;

/// Fractional part of the golden ratio, (sqrt(5) - 1) / 2.
const GOLDEN_RATIO_FRACTION: f64 = 0.618_033_988_749_894_9;

/// Fibonacci (multiplicative) hashing scaled to the table capacity.
///
/// Multiplies the key by the golden ratio fraction and scales the fractional
/// part of the product to `0..capacity`.
pub fn fibonacci_hash(key: usize, capacity: usize) -> usize {
    let product = key as f64 * GOLDEN_RATIO_FRACTION;
    ((product - product.floor()) * capacity as f64) as usize
}

#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Tombstone,
    Live { key: usize, value: V },
}

/// Dynamically resizing open-addressing map from small integer keys to values.
#[derive(Clone, Debug)]
pub struct PositionStore<V> {
    slots: Vec<Slot<V>>,
    len: usize,
    hasher: HashFn,
}

impl<V> Default for PositionStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PositionStore<V> {
    /// Creates an empty store using [`fibonacci_hash`].
    pub fn new() -> Self {
        Self::with_hasher(fibonacci_hash)
    }

    /// Creates an empty store using a custom hash function.
    ///
    /// The result of `hasher` is reduced modulo the capacity, so any value is
    /// acceptable.
    pub fn with_hasher(hasher: HashFn) -> Self {
        PositionStore {
            slots: empty_slots(MIN_CAPACITY),
            len: 0,
            hasher,
        }
    }

    /// Replaces the hash function and rehashes all live entries.
    pub fn set_hasher(&mut self, hasher: HashFn) {
        self.hasher = hasher;
        self.resize(self.capacity());
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// * [`StoreError::Duplicate`] if `key` already has a live entry.
    /// * [`StoreError::CapacityExhausted`] if no slot could be found.
    pub fn add(&mut self, key: usize, value: V) -> Result<(), StoreError> {
        if self.load() >= GROW_LOAD {
            self.resize(self.capacity() * 2);
        }
        self.insert_slot(key, value)
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if there is no live entry for `key`.
    pub fn get(&self, key: usize) -> Result<&V, StoreError> {
        match self.find(key).map(|index| &self.slots[index]) {
            Some(Slot::Live { value, .. }) => Ok(value),
            _ => Err(StoreError::NotFound(key)),
        }
    }

    /// Returns true if `key` has a live entry.
    #[inline]
    pub fn contains(&self, key: usize) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry for `key`, leaving a tombstone, and returns its value.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if there is no live entry for `key`.
    pub fn delete(&mut self, key: usize) -> Result<V, StoreError> {
        let index = self.find(key).ok_or(StoreError::NotFound(key))?;
        let Slot::Live { value, .. } = mem::replace(&mut self.slots[index], Slot::Tombstone) else {
            return Err(StoreError::NotFound(key));
        };
        self.len -= 1;

        let capacity = self.capacity();
        if self.load() <= SHRINK_LOAD && capacity > MIN_CAPACITY {
            self.resize((capacity / 2).max(MIN_CAPACITY));
        }
        Ok(value)
    }

    /// Iterates over live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Live { key, value } => Some((*key, value)),
            _ => None,
        })
    }

    /// Iterates over live keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(|(key, _)| key)
    }

    #[inline]
    fn load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    #[inline]
    fn home(&self, key: usize) -> usize {
        (self.hasher)(key, self.capacity()) % self.capacity()
    }

    /// Probes for the slot holding `key`; stops at the first empty slot or
    /// after wrapping back to the home slot.
    fn find(&self, key: usize) -> Option<usize> {
        let capacity = self.capacity();
        let home = self.home(key);
        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Live { key: k, .. } if *k == key => return Some(index),
                _ => {}
            }
        }
        None
    }

    /// Places an entry without checking the load factor.
    ///
    /// The whole probe sequence up to the first empty slot is scanned so a
    /// live duplicate behind a tombstone is still detected; the entry goes
    /// into the first reusable slot.
    fn insert_slot(&mut self, key: usize, value: V) -> Result<(), StoreError> {
        let capacity = self.capacity();
        let home = self.home(key);
        let mut free = None;

        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => {
                    if free.is_none() {
                        free = Some(index);
                    }
                    break;
                }
                Slot::Tombstone => {
                    if free.is_none() {
                        free = Some(index);
                    }
                }
                Slot::Live { key: k, .. } if *k == key => return Err(StoreError::Duplicate(key)),
                Slot::Live { .. } => {}
            }
        }

        let index = free.ok_or(StoreError::CapacityExhausted { capacity })?;
        self.slots[index] = Slot::Live { key, value };
        self.len += 1;
        Ok(())
    }

    /// Rehashes every live entry into a fresh table of `new_capacity` slots.
    fn resize(&mut self, new_capacity: usize) {
        trace!(
            from = self.capacity(),
            to = new_capacity,
            len = self.len,
            "resizing position store"
        );
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.len = 0;
        for slot in old {
            if let Slot::Live { key, value } = slot {
                let inserted = self.insert_slot(key, value);
                debug_assert!(inserted.is_ok(), "rehash dropped key {key}: {inserted:?}");
            }
        }
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn constant_hash(_key: usize, _capacity: usize) -> usize {
        3
    }

    #[test]
    fn test_fibonacci_hash_in_range() {
        for capacity in [11, 22, 44, 88] {
            for key in 0..64 {
                assert!(fibonacci_hash(key, capacity) < capacity);
            }
        }
    }

    #[test]
    fn test_add_get_delete() {
        let mut store = PositionStore::new();
        assert!(store.is_empty());

        store.add(12, 'P').unwrap();
        store.add(4, 'K').unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(12), Ok(&'P'));
        assert!(store.contains(4));
        assert!(!store.contains(5));

        assert_eq!(store.delete(12), Ok('P'));
        assert_eq!(store.get(12), Err(StoreError::NotFound(12)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_and_missing_keys() {
        let mut store = PositionStore::new();
        store.add(7, 1).unwrap();
        assert_eq!(store.add(7, 2), Err(StoreError::Duplicate(7)));
        assert_eq!(store.get(7), Ok(&1));
        assert_eq!(store.delete(8), Err(StoreError::NotFound(8)));
        assert_eq!(store.get(63), Err(StoreError::NotFound(63)));
    }

    #[test]
    fn test_tombstone_keeps_probe_chain() {
        let mut store = PositionStore::with_hasher(constant_hash);
        store.add(10, "a").unwrap();
        store.add(20, "b").unwrap();
        store.add(30, "c").unwrap();

        // 20 and 30 were placed after 10 on the same chain.
        store.delete(10).unwrap();
        assert_eq!(store.get(20), Ok(&"b"));
        assert_eq!(store.get(30), Ok(&"c"));

        // A duplicate behind the tombstone is still rejected.
        assert_eq!(store.add(30, "d"), Err(StoreError::Duplicate(30)));
        store.add(40, "e").unwrap();
        assert_eq!(store.get(40), Ok(&"e"));
    }

    #[test]
    fn test_full_table_reports_capacity_exhausted() {
        let mut store = PositionStore::with_hasher(constant_hash);
        for key in 0..MIN_CAPACITY {
            store.insert_slot(key, key).unwrap();
        }
        assert_eq!(store.len(), MIN_CAPACITY);
        assert_eq!(
            store.insert_slot(MIN_CAPACITY, 0),
            Err(StoreError::CapacityExhausted {
                capacity: MIN_CAPACITY
            })
        );
        assert_eq!(store.len(), MIN_CAPACITY);
        assert!(!store.contains(MIN_CAPACITY));
    }

    #[test]
    fn test_grow_preserves_entries() {
        let mut store = PositionStore::new();
        for key in 0..64 {
            store.add(key, key * 10).unwrap();
        }
        assert!(store.capacity() > MIN_CAPACITY);
        assert!(store.len() as f64 / store.capacity() as f64 <= GROW_LOAD);
        for key in 0..64 {
            assert_eq!(store.get(key), Ok(&(key * 10)));
        }
    }

    #[test]
    fn test_shrink_preserves_entries() {
        let mut store = PositionStore::new();
        for key in 0..64 {
            store.add(key, key).unwrap();
        }
        let grown = store.capacity();
        for key in 0..60 {
            store.delete(key).unwrap();
        }
        assert!(store.capacity() < grown);
        assert!(store.capacity() >= MIN_CAPACITY);
        for key in 60..64 {
            assert_eq!(store.get(key), Ok(&key));
        }
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_shrink_never_below_minimum() {
        let mut store = PositionStore::new();
        store.add(1, ()).unwrap();
        store.delete(1).unwrap();
        assert_eq!(store.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn test_custom_hash_collisions() {
        let mut store = PositionStore::with_hasher(constant_hash);
        for key in 0..40 {
            store.add(key, key + 1).unwrap();
        }
        for key in (0..40).step_by(3) {
            store.delete(key).unwrap();
        }
        for key in 0..40 {
            assert_eq!(store.contains(key), key % 3 != 0);
        }
    }

    #[test]
    fn test_set_hasher_rehashes() {
        let mut store = PositionStore::new();
        for key in [0, 9, 18, 27, 36] {
            store.add(key, key).unwrap();
        }
        store.set_hasher(constant_hash);
        for key in [0, 9, 18, 27, 36] {
            assert_eq!(store.get(key), Ok(&key));
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_iter_yields_live_entries() {
        let mut store = PositionStore::new();
        for key in [3, 5, 8] {
            store.add(key, key).unwrap();
        }
        store.delete(5).unwrap();
        let mut keys: Vec<usize> = store.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![3, 8]);
    }

    #[test]
    fn test_matches_hashmap_under_random_operations() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut store = PositionStore::new();
        let mut reference = HashMap::new();

        for step in 0..5_000 {
            let key = rng.random_range(0..64);
            if rng.random_bool(0.55) {
                let expected = if reference.contains_key(&key) {
                    Err(StoreError::Duplicate(key))
                } else {
                    reference.insert(key, step);
                    Ok(())
                };
                assert_eq!(store.add(key, step), expected);
            } else {
                let expected = reference.remove(&key).ok_or(StoreError::NotFound(key));
                assert_eq!(store.delete(key), expected);
            }

            assert_eq!(store.len(), reference.len());
        }

        for key in 0..64 {
            assert_eq!(store.contains(key), reference.contains_key(&key));
            assert_eq!(store.get(key).ok(), reference.get(&key));
        }
    }
}
