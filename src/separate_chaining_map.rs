use std::{borrow::Borrow, hash::Hash, iter, mem};

use log::{debug, trace};

use crate::{
    AssociativeMap, Entry, MapConfig, MapError, TableStats,
    hashing::{HashCoefficients, next_prime},
    utils::load_ratio,
};

/// Load factor ceiling used by [`SeparateChainingMap::new`]
pub const DEFAULT_LOAD_FACTOR: f64 = 4.0;

/// `next_prime(DEFAULT_EXPECTED_COUNT / DEFAULT_LOAD_FACTOR)`
const DEFAULT_CAPACITY: usize = 5;

/// Entries sharing one slot, in insertion order
type Chain<K, V> = Vec<Entry<K, V>>;

/// A hash table resolving collisions with separate chaining.
///
/// Every slot holds a chain of entries. Colliding keys are appended to the chain, so
/// iteration visits slots in table order and each chain in insertion order. The table
/// is rebuilt at `next_prime(2 * capacity)` slots as soon as the load factor reaches
/// the configured ceiling.
///
/// ```rust
/// use primemap::SeparateChainingMap;
///
/// let mut map = SeparateChainingMap::try_new(4, 2.0).unwrap();
/// map.put("apple".to_string(), 1);
/// map.put("banana".to_string(), 2);
///
/// assert_eq!(map.get("apple"), Some(&1));
/// assert_eq!(map.put("apple".to_string(), 10), Some(1));
/// assert_eq!(map.remove("banana"), Some(2));
/// assert_eq!(map.size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SeparateChainingMap<K, V> {
    /// One chain per slot; its length is the capacity
    chains: Vec<Chain<K, V>>,
    /// Hashing coefficients, fixed for the life of the map
    coefficients: HashCoefficients,
    /// Total number of entries across all chains
    size: usize,
    /// `size / capacity`, refreshed on every change to either
    current_factor: f64,
    /// Ceiling that `current_factor` must stay below
    limit_factor: f64,
}

impl<K, V> Default for SeparateChainingMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for SeparateChainingMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> SeparateChainingMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates a map sized for 16 entries at load factor 4.0
    #[must_use]
    pub fn new() -> Self {
        Self::allocate(HashCoefficients::default(), DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a map sized for `expected_count` entries with the given load factor ceiling.
    ///
    /// # Errors
    ///
    /// See [`SeparateChainingMap::with_config`].
    pub fn try_new(expected_count: usize, load_factor: f64) -> Result<Self, MapError> {
        Self::with_config(&MapConfig::new(expected_count, load_factor))
    }

    /// Creates a map from a full configuration.
    ///
    /// Chains can grow without bound, so any positive load factor is accepted.
    ///
    /// # Errors
    ///
    /// Any error from [`MapConfig::initial_capacity`] or [`MapConfig::coefficients`].
    pub fn with_config(config: &MapConfig) -> Result<Self, MapError> {
        let capacity = config.initial_capacity()?;
        let coefficients = config.coefficients()?;
        trace!(
            "separate chaining map: {} chains for {} entries, load factor {}",
            capacity,
            config.expected_count(),
            config.load_factor()
        );
        Ok(Self::allocate(coefficients, capacity, config.load_factor()))
    }

    /// Builds a table of empty chains
    fn allocate(coefficients: HashCoefficients, capacity: usize, limit_factor: f64) -> Self {
        Self {
            chains: empty_chains(capacity),
            coefficients,
            size: 0,
            current_factor: 0.0,
            limit_factor,
        }
    }

    /// The chain `key` hashes to
    fn chain<Q>(&self, key: &Q) -> Option<&Chain<K, V>>
    where
        Q: Hash + ?Sized,
    {
        self.chains.get(self.coefficients.slot(key, self.chains.len()))
    }

    /// The chain `key` hashes to, mutably
    fn chain_mut<Q>(&mut self, key: &Q) -> Option<&mut Chain<K, V>>
    where
        Q: Hash + ?Sized,
    {
        let index = self.coefficients.slot(key, self.chains.len());
        self.chains.get_mut(index)
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// New keys go to the tail of their chain. May rebuild the table before returning.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let chain = self.chain_mut(&key)?;
        if let Some(entry) = chain.iter_mut().find(|entry| *entry.key() == key) {
            return Some(entry.set_value(value));
        }
        chain.push(Entry::new(key, value));
        self.size = self.size.saturating_add(1);
        self.refresh_factor();

        if self.current_factor >= self.limit_factor {
            self.rehash();
        }
        None
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain(key)?.iter().find(|entry| entry.key().borrow() == key).map(Entry::value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain_mut(key)?
            .iter_mut()
            .find(|entry| entry.key().borrow() == key)
            .map(Entry::value_mut)
    }

    /// Returns true if the map holds `key`
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes `key` from its chain; the rest of the chain keeps its order
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let chain = self.chain_mut(key)?;
        let position = chain.iter().position(|entry| entry.key().borrow() == key)?;
        let (_, value) = chain.remove(position).into_parts();
        self.size = self.size.saturating_sub(1);
        self.refresh_factor();
        Some(value)
    }

    /// Moves every entry into `next_prime(2 * capacity)` fresh chains.
    ///
    /// Chains are drained in table order and each entry is appended to its new chain,
    /// so entries that collide again keep their relative order.
    fn rehash(&mut self) {
        let old_capacity = self.capacity();
        let Some(new_capacity) = old_capacity.checked_mul(2).and_then(next_prime) else {
            debug!("separate chaining rehash skipped: {old_capacity} chains cannot double");
            return;
        };

        let mut chains = empty_chains(new_capacity);
        for entry in mem::take(&mut self.chains).into_iter().flatten() {
            let index = self.coefficients.slot(entry.key(), new_capacity);
            if let Some(chain) = chains.get_mut(index) {
                chain.push(entry);
            }
        }
        self.chains = chains;
        self.refresh_factor();

        debug!(
            "separate chaining rehash: {} -> {} chains, {} entries",
            old_capacity, new_capacity, self.size
        );
    }

    /// Recomputes `current_factor` from `size` and capacity
    fn refresh_factor(&mut self) {
        self.current_factor = load_ratio(self.size, self.chains.len());
    }
}

impl<K, V> SeparateChainingMap<K, V> {
    /// Returns the number of live entries
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of chains
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chains.len()
    }

    /// Returns the current load factor
    #[must_use]
    pub const fn load_factor(&self) -> f64 {
        self.current_factor
    }

    /// Returns the load factor ceiling
    #[must_use]
    pub const fn limit_factor(&self) -> f64 {
        self.limit_factor
    }

    /// Returns the hashing coefficients
    #[must_use]
    pub const fn coefficients(&self) -> HashCoefficients {
        self.coefficients
    }

    /// Iterates over entries slot by slot, each chain in insertion order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { entries: self.chains.iter().flatten() }
    }

    /// Keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Values in table order, aligned with [`SeparateChainingMap::keys`]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Empties every chain; the capacity is kept
    pub fn clear(&mut self) {
        self.chains.iter_mut().for_each(Vec::clear);
        self.size = 0;
        self.current_factor = 0.0;
    }

    /// Occupancy snapshot; `longest_run` is the longest chain
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.capacity(),
            size: self.size,
            load_factor: self.current_factor,
            tombstones: 0,
            empty_slots: self.chains.iter().filter(|chain| chain.is_empty()).count(),
            longest_run: self.chains.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

impl<K, V> AssociativeMap<K, V> for SeparateChainingMap<K, V>
where
    K: Eq + Hash,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        Ok(self.put(key, value))
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key)
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.contains(key)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn key_set(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    fn value_set(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }
}

/// Iterator over the entries of a [`SeparateChainingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining entries across all chains
    entries: iter::Flatten<std::slice::Iter<'a, Chain<K, V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| (entry.key(), entry.value()))
    }
}

/// A table of `capacity` empty chains
fn empty_chains<K, V>(capacity: usize) -> Vec<Chain<K, V>> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT_EXPECTED_COUNT, utils::init_test_logger};
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Two keys from `0..` that share a chain at the map's current capacity
    fn colliding_pair<V>(map: &SeparateChainingMap<u64, V>) -> (u64, u64) {
        let capacity = map.capacity();
        let first = map.coefficients().slot(&0_u64, capacity);
        let second = (1_u64..).find(|key| map.coefficients().slot(key, capacity) == first);
        (0, second.unwrap())
    }

    #[test]
    fn test_insert_get_update() {
        init_test_logger();
        let mut map = SeparateChainingMap::new();
        assert_eq!(map.put("key1".to_string(), 1), None);
        assert_eq!(map.put("key2".to_string(), 2), None);
        assert_eq!(map.put("key1".to_string(), 10), Some(1));

        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), None);
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn test_forced_collision() {
        init_test_logger();
        let mut map = SeparateChainingMap::try_new(4, 4.0).unwrap();
        assert_eq!(map.capacity(), 2);
        let (first, second) = colliding_pair(&map);

        map.put(first, "first");
        map.put(second, "second");
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.stats().longest_run, 2);
        assert_eq!(map.get(&first), Some(&"first"));
        assert_eq!(map.get(&second), Some(&"second"));

        assert_eq!(map.remove(&first), Some("first"));
        assert!(!map.contains(&first));
        assert_eq!(map.get(&second), Some(&"second"));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn test_chain_keeps_insertion_order() {
        let mut map = SeparateChainingMap::try_new(4, 8.0).unwrap();
        assert_eq!(map.capacity(), 2);
        let capacity = map.capacity();
        let target = map.coefficients().slot(&0_u64, capacity);
        let colliding: Vec<u64> = (0_u64..)
            .filter(|key| map.coefficients().slot(key, capacity) == target)
            .take(4)
            .collect();
        for &key in colliding.iter().rev() {
            map.put(key, key);
        }
        map.remove(&colliding[2]);

        let order: Vec<u64> = map.keys().copied().collect();
        assert_eq!(order, vec![colliding[3], colliding[1], colliding[0]]);
    }

    #[test]
    fn test_rehash_trigger_is_at_or_above() {
        init_test_logger();
        let mut map = SeparateChainingMap::try_new(1, 0.5).unwrap();
        assert_eq!(map.capacity(), 2);

        // 1/2 reaches the 0.5 ceiling
        map.put(1_u64, "one");
        assert_eq!(map.capacity(), 5);
        assert_eq!(map.get(&1), Some(&"one"));
    }

    #[test]
    fn test_rehash_grows_to_next_prime_of_double() {
        let mut map = SeparateChainingMap::try_new(4, 0.5).unwrap();
        for key in 0..5_u64 {
            map.put(key, key * 10);
        }
        assert_eq!(map.capacity(), 11);
        let coefficients = map.coefficients();

        // 6 / 11 >= 0.5
        map.put(5, 50);
        assert_eq!(map.capacity(), 23);
        assert_eq!(map.size(), 6);
        assert_eq!(map.coefficients(), coefficients);
        for key in 0..6_u64 {
            assert_eq!(map.get(&key), Some(&(key * 10)));
        }
        let total: usize = map.chains.iter().map(Vec::len).sum();
        assert_eq!(total, map.size());
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            SeparateChainingMap::<u64, u64>::try_new(4, 0.0).unwrap_err(),
            MapError::InvalidLoadFactor(0.0)
        );
        assert!(matches!(
            SeparateChainingMap::<u64, u64>::try_new(0, 1.0),
            Err(MapError::InvalidCapacity { .. })
        ));
        assert!(SeparateChainingMap::<u64, u64>::try_new(4, 3.0).is_ok());
    }

    #[test]
    fn test_default_capacity_matches_config() {
        let config = MapConfig::new(DEFAULT_EXPECTED_COUNT, DEFAULT_LOAD_FACTOR);
        assert_eq!(config.initial_capacity(), Ok(DEFAULT_CAPACITY));
        let map: SeparateChainingMap<u64, u64> = SeparateChainingMap::default();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert!(map.is_empty());
    }

    #[test]
    fn test_extend_get_mut_clear() {
        let mut map = SeparateChainingMap::new();
        map.extend((0..40_u64).map(|key| (key, key)));
        assert_eq!(map.size(), 40);

        if let Some(value) = map.get_mut(&7) {
            *value += 100;
        }
        assert_eq!(map.get(&7), Some(&107));

        let capacity = map.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.stats().empty_slots, capacity);
        assert_eq!(map.get(&7), None);
    }

    #[test]
    fn test_lookups_do_not_mutate() {
        let mut map = SeparateChainingMap::try_new(8, 2.0).unwrap();
        for key in 0..6_u64 {
            map.put(key, key);
        }
        let before = map.stats();
        let keys: Vec<u64> = map.keys().copied().collect();

        for key in 0..12_u64 {
            let _ = map.get(&key);
            let _ = map.contains(&key);
        }

        assert_eq!(map.stats(), before);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), keys);
    }

    proptest! {
        #[test]
        fn prop_matches_std_hashmap(
            ops in prop::collection::vec((any::<bool>(), 0_u16..64, any::<u32>()), 0..300),
            load_factor in 0.25_f64..6.0,
        ) {
            let mut map = SeparateChainingMap::try_new(4, load_factor).unwrap();
            let mut model = HashMap::new();
            for (insert, key, value) in ops {
                if insert {
                    prop_assert_eq!(map.put(key, value), model.insert(key, value));
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                prop_assert_eq!(map.size(), model.len());
            }
            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            let keys = map.key_set();
            let values = map.value_set();
            prop_assert_eq!(keys.len(), model.len());
            for (key, value) in keys.iter().zip(&values) {
                prop_assert_eq!(model.get(key), Some(value));
            }
        }
    }
}
