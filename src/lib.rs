//! # Prime Map
//!
//! In-memory hash maps with prime-sized tables and universal multiplicative hashing.
//!
//! This crate provides two hash map implementations:
//!
//! - `LinearProbingMap`: open addressing with linear probing and tombstones
//! - `SeparateChainingMap`: separate chaining with one insertion-ordered chain per slot
//!
//! Both hash keys with `((scale * h + shift) mod prime) mod capacity`, keep their
//! capacity prime, and rebuild the table at `next_prime(2 * capacity)` slots once the
//! load factor crosses the configured ceiling.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primemap::LinearProbingMap;
//!
//! // Room for 4 entries at load factor 0.5: next_prime(8) = 11 slots
//! let mut map = LinearProbingMap::try_new(4, 0.5).unwrap();
//! assert_eq!(map.capacity(), 11);
//!
//! map.put("a", 1).unwrap();
//! map.put("b", 2).unwrap();
//! map.put("c", 3).unwrap();
//! assert_eq!(map.size(), 3);
//! assert_eq!(map.get("b"), Some(&2));
//!
//! // Removing leaves a tombstone that a later insert can reuse
//! map.remove("a");
//! assert!(!map.contains("a"));
//! map.put("a", 9).unwrap();
//! assert_eq!(map.get("a"), Some(&9));
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use primemap::SeparateChainingMap;
//!
//! let mut map = SeparateChainingMap::try_new(100, 4.0).unwrap();
//! for i in 0..200 {
//!     map.put(format!("key-{}", i), i);
//! }
//!
//! assert_eq!(map.size(), 200);
//! assert_eq!(map.get("key-42"), Some(&42));
//! let keys: Vec<_> = map.keys().collect();
//! let values: Vec<_> = map.values().collect();
//! assert_eq!(keys.len(), values.len());
//! ```
//!
//! Neither map synchronizes internally. Every mutation takes `&mut self`, so sharing
//! one across threads requires an external lock.

/// Sizing and hashing configuration
mod config;
/// Key-value record stored in the tables
mod entry;
/// Error type for construction and insertion
mod error;
/// Universal hashing and prime helpers
mod hashing;
/// Open addressing with linear probing
mod linear_probing_map;
/// Separate chaining with per-slot chains
mod separate_chaining_map;
/// Shared trait and helpers for the hash maps
mod utils;

pub use config::{DEFAULT_EXPECTED_COUNT, HashingMode, MAX_CAPACITY, MapConfig};
pub use entry::Entry;
pub use error::MapError;
pub use hashing::{DEFAULT_PRIME, HashCoefficients, is_prime, next_prime, raw_hash};
pub use linear_probing_map::LinearProbingMap;
pub use separate_chaining_map::SeparateChainingMap;
pub use utils::{AssociativeMap, TableStats, from_pairs};

/// Iterators over map entries
pub mod iter {
    pub use crate::{
        linear_probing_map::Iter as LinearProbingIter,
        separate_chaining_map::Iter as SeparateChainingIter,
    };
}
