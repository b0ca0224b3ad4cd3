use std::{borrow::Borrow, hash::Hash, iter, mem};

use log::{debug, error, trace};

use crate::{
    AssociativeMap, Entry, MapConfig, MapError, TableStats,
    hashing::{HashCoefficients, next_prime},
    utils::load_ratio,
};

/// Load factor ceiling used by [`LinearProbingMap::new`]
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// `next_prime(DEFAULT_EXPECTED_COUNT / DEFAULT_LOAD_FACTOR)`
const DEFAULT_CAPACITY: usize = 37;

/// State of one table slot
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never written since the table was allocated; ends a probe sequence
    Empty,
    /// Previously occupied; probing continues past it
    Tombstone,
    /// Holds a live entry
    Occupied(Entry<K, V>),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Outcome of walking a probe sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index
    Found(usize),
    /// The key is absent; this is the first reusable slot on its probe sequence
    Vacant(usize),
    /// The key is absent and every slot is occupied
    Full,
}

/// A hash table resolving collisions with linear probing.
///
/// The table size is always prime. Removed entries leave a tombstone so that keys
/// displaced past them stay reachable. Once the load factor rises strictly above
/// the configured ceiling, the table is rebuilt at `next_prime(2 * capacity)` slots.
///
/// ```rust
/// use primemap::LinearProbingMap;
///
/// let mut map = LinearProbingMap::try_new(4, 0.5).unwrap();
/// map.put("a", 1).unwrap();
/// map.put("b", 2).unwrap();
///
/// assert_eq!(map.get("b"), Some(&2));
/// assert_eq!(map.remove("a"), Some(1));
/// assert!(!map.contains("a"));
/// ```
///
/// Note: This implementation is not thread-safe; wrap it in a lock to share it.
#[derive(Debug, Clone)]
pub struct LinearProbingMap<K, V> {
    /// One slot per table position; its length is the capacity
    slots: Vec<Slot<K, V>>,
    /// Hashing coefficients, fixed for the life of the map
    coefficients: HashCoefficients,
    /// Number of occupied slots
    size: usize,
    /// `size / capacity`, refreshed on every change to either
    current_factor: f64,
    /// Ceiling that `current_factor` must not exceed
    limit_factor: f64,
}

impl<K, V> Default for LinearProbingMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LinearProbingMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates a map sized for 16 entries at load factor 0.5
    #[must_use]
    pub fn new() -> Self {
        Self::allocate(HashCoefficients::default(), DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a map sized for `expected_count` entries with the given load factor ceiling.
    ///
    /// # Errors
    ///
    /// See [`LinearProbingMap::with_config`].
    pub fn try_new(expected_count: usize, load_factor: f64) -> Result<Self, MapError> {
        Self::with_config(&MapConfig::new(expected_count, load_factor))
    }

    /// Creates a map from a full configuration.
    ///
    /// # Errors
    ///
    /// Any error from [`MapConfig::initial_capacity`] or [`MapConfig::coefficients`], and
    /// [`MapError::LoadFactorTooHigh`] when the load factor is 1.0 or more.
    pub fn with_config(config: &MapConfig) -> Result<Self, MapError> {
        let capacity = config.initial_capacity()?;
        if config.load_factor() >= 1.0 {
            return Err(MapError::LoadFactorTooHigh(config.load_factor()));
        }
        let coefficients = config.coefficients()?;
        trace!(
            "linear probing map: {} slots for {} entries, load factor {}",
            capacity,
            config.expected_count(),
            config.load_factor()
        );
        Ok(Self::allocate(coefficients, capacity, config.load_factor()))
    }

    /// Builds a table with every slot empty
    fn allocate(coefficients: HashCoefficients, capacity: usize, limit_factor: f64) -> Self {
        Self {
            slots: empty_slots(capacity),
            coefficients,
            size: 0,
            current_factor: 0.0,
            limit_factor,
        }
    }

    /// Walks the probe sequence of `key`.
    ///
    /// Stops at the matching entry or at the first never-used slot. Tombstones are
    /// remembered as insertion points but never end the walk. At most one full cycle
    /// is made.
    fn find_slot<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.slots.len();
        let mut index = self.coefficients.slot(key, capacity);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match self.slots.get(index) {
                Some(Slot::Empty) => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Some(Slot::Tombstone) => {
                    first_tombstone.get_or_insert(index);
                }
                Some(Slot::Occupied(entry)) if entry.key().borrow() == key => {
                    return Probe::Found(index);
                }
                Some(Slot::Occupied(_)) => {}
                None => break,
            }
            index = wrap(index.saturating_add(1), capacity);
        }

        first_tombstone.map_or(Probe::Full, Probe::Vacant)
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// May rebuild the table at a larger prime capacity before returning.
    ///
    /// # Errors
    ///
    /// [`MapError::TableFull`] if no slot is free, which means the growth trigger failed.
    /// [`MapError::CapacityOverflow`] if the table cannot grow. In that case the entry
    /// stays in the current table.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        let index = match self.find_slot(&key) {
            Probe::Found(index) => {
                if let Some(Slot::Occupied(entry)) = self.slots.get_mut(index) {
                    return Ok(Some(entry.set_value(value)));
                }
                return Ok(None); // Unreachable: find_slot only reports occupied slots as found
            }
            Probe::Vacant(index) => index,
            Probe::Full => {
                error!("linear probing table of {} slots has no free slot", self.capacity());
                return Err(MapError::TableFull { capacity: self.capacity() });
            }
        };

        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Slot::Occupied(Entry::new(key, value));
            self.size = self.size.saturating_add(1);
            self.refresh_factor();
        }

        if self.current_factor > self.limit_factor {
            self.rehash()?;
        }
        Ok(None)
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.find_slot(key) {
            Probe::Found(index) => match self.slots.get(index) {
                Some(Slot::Occupied(entry)) => Some(entry.value()),
                _ => None,
            },
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.find_slot(key) {
            Probe::Found(index) => match self.slots.get_mut(index) {
                Some(Slot::Occupied(entry)) => Some(entry.value_mut()),
                _ => None,
            },
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Returns true if the map holds `key`
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(self.find_slot(key), Probe::Found(_))
    }

    /// Removes `key`, leaving a tombstone in its slot
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Probe::Found(index) = self.find_slot(key) else {
            return None;
        };
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                self.refresh_factor();
                Some(entry.into_parts().1)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuilds the table at `next_prime(2 * capacity)` slots.
    ///
    /// Every destination is computed before any entry moves, so a failure leaves
    /// the current table untouched.
    fn rehash(&mut self) -> Result<(), MapError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .and_then(next_prime)
            .ok_or(MapError::CapacityOverflow { capacity: old_capacity })?;

        let mut taken = vec![false; new_capacity];
        let mut moves = Vec::with_capacity(self.size);
        for (from, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                let start = self.coefficients.slot(entry.key(), new_capacity);
                let to = first_free(&taken, start)
                    .ok_or(MapError::TableFull { capacity: new_capacity })?;
                if let Some(flag) = taken.get_mut(to) {
                    *flag = true;
                }
                moves.push((from, to));
            }
        }

        let mut slots = empty_slots(new_capacity);
        for (from, to) in moves {
            if let (Some(source), Some(target)) = (self.slots.get_mut(from), slots.get_mut(to)) {
                *target = mem::take(source);
            }
        }
        self.slots = slots;
        self.refresh_factor();

        debug!(
            "linear probing rehash: {} -> {} slots, {} entries",
            old_capacity, new_capacity, self.size
        );
        Ok(())
    }

    /// Recomputes `current_factor` from `size` and capacity
    fn refresh_factor(&mut self) {
        self.current_factor = load_ratio(self.size, self.slots.len());
    }
}

impl<K, V> LinearProbingMap<K, V> {
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

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
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

    /// Iterates over live entries in slot order.
    ///
    /// The order depends on capacity, not on insertion order.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: self.slots.iter() }
    }

    /// Keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Values in slot order, aligned with [`LinearProbingMap::keys`]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Forgets every entry and tombstone; the capacity is kept
    pub fn clear(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.size = 0;
        self.current_factor = 0.0;
    }

    /// Occupancy snapshot; `longest_run` is the longest cluster of non-empty slots
    #[must_use]
    pub fn stats(&self) -> TableStats {
        let mut tombstones: usize = 0;
        let mut empty_slots: usize = 0;
        let mut run: usize = 0;
        let mut longest_run: usize = 0;
        for slot in &self.slots {
            match slot {
                Slot::Empty => {
                    empty_slots = empty_slots.saturating_add(1);
                    run = 0;
                    continue;
                }
                Slot::Tombstone => tombstones = tombstones.saturating_add(1),
                Slot::Occupied(_) => {}
            }
            run = run.saturating_add(1);
            longest_run = longest_run.max(run);
        }
        TableStats {
            capacity: self.capacity(),
            size: self.size,
            load_factor: self.current_factor,
            tombstones,
            empty_slots,
            longest_run,
        }
    }
}

impl<K, V> AssociativeMap<K, V> for LinearProbingMap<K, V>
where
    K: Eq + Hash,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        self.put(key, value)
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

/// Iterator over the live entries of a [`LinearProbingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining slots
    slots: std::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied(entry) => Some((entry.key(), entry.value())),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

/// A table of `capacity` never-used slots
fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Reduces `index` into `0..capacity`
fn wrap(index: usize, capacity: usize) -> usize {
    index.checked_rem(capacity).unwrap_or(0)
}

/// First unclaimed position at or after `start`, wrapping around
fn first_free(taken: &[bool], start: usize) -> Option<usize> {
    let capacity = taken.len();
    (0..capacity)
        .map(|offset| wrap(start.saturating_add(offset), capacity))
        .find(|&index| taken.get(index) == Some(&false))
}
