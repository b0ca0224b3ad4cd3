//! Key-value record stored by both map variants

use std::mem;

/// A key-value pair owned by exactly one slot or chain.
///
/// The key is fixed once the entry exists; only the value can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates a new entry
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key of the entry
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value of the entry
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns a mutable reference to the value of the entry
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the value in place and hands back the previous one
    pub fn set_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_returns_previous() {
        let mut entry = Entry::new("key", 1);
        assert_eq!(entry.set_value(2), 1);
        assert_eq!(entry.key(), &"key");
        assert_eq!(entry.value(), &2);
    }

    #[test]
    fn test_value_mut_and_into_parts() {
        let mut entry = Entry::new("key".to_string(), vec![1]);
        entry.value_mut().push(2);

        let (key, value) = entry.into_parts();
        assert_eq!(key, "key");
        assert_eq!(value, vec![1, 2]);
    }
}
