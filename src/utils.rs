//! Traits and helpers shared by `LinearProbingMap` and `SeparateChainingMap`

use std::{borrow::Borrow, hash::Hash};

use crate::MapError;

/// Operations both map variants offer.
///
/// Lets callers write code once and pick the collision strategy later:
///
/// ```rust
/// use primemap::{AssociativeMap, LinearProbingMap, SeparateChainingMap, from_pairs};
///
/// let pairs = vec![("a".to_string(), 1), ("b".to_string(), 2)];
/// let probing = from_pairs(LinearProbingMap::new(), pairs.clone()).unwrap();
/// let chaining = from_pairs(SeparateChainingMap::new(), pairs).unwrap();
///
/// assert_eq!(probing.size(), chaining.size());
/// assert!(AssociativeMap::contains(&chaining, "b"));
/// ```
pub trait AssociativeMap<K, V> {
    /// Inserts or overwrites `key`, returning the previous value if there was one.
    ///
    /// # Errors
    ///
    /// Fails only if the table broke its own growth invariant and has no free slot left.
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError>;

    /// Returns the value stored for `key`
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns true if `key` is present
    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Removes `key` and returns its value
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Number of live entries
    fn size(&self) -> usize;

    /// Returns true if there are no live entries
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Keys in table order
    fn key_set(&self) -> Vec<K>
    where
        K: Clone;

    /// Values in table order, aligned with [`AssociativeMap::key_set`]
    fn value_set(&self) -> Vec<V>
    where
        V: Clone;
}

/// Occupancy snapshot of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Number of slots
    pub capacity: usize,
    /// Number of live entries
    pub size: usize,
    /// `size / capacity`
    pub load_factor: f64,
    /// Slots holding a tombstone (always 0 for chaining)
    pub tombstones: usize,
    /// Slots that were never written, or empty chains
    pub empty_slots: usize,
    /// Longest run of non-empty slots, or the longest chain
    pub longest_run: usize,
}

/// Inserts every pair from `iter` into `map`
///
/// # Errors
///
/// Propagates the first error returned by [`AssociativeMap::put`].
pub fn from_pairs<M, K, V, I>(mut map: M, iter: I) -> Result<M, MapError>
where
    M: AssociativeMap<K, V>,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in iter {
        map.put(key, value)?;
    }
    Ok(map)
}

/// Ratio of live entries to slots
#[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)]
pub(crate) fn load_ratio(size: usize, capacity: usize) -> f64 {
    if capacity == 0 { 0.0 } else { size as f64 / capacity as f64 }
}

/// Routes `log` output to the test harness
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let initialized =
        env_logger::builder().filter_level(log::LevelFilter::Trace).is_test(true).try_init();
    if let Err(err) = initialized {
        log::trace!("test logger already set: {err}");
    }
}
