//! Error type shared by both map variants

use thiserror::Error;

/// Failures raised while building or mutating a map.
///
/// Missing keys are not errors: lookups report them through `Option` and `bool`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// The load factor is zero, negative, or not a finite number
    #[error("load factor must be a finite number greater than zero, got {0}")]
    InvalidLoadFactor(f64),

    /// The load factor would let an open-addressing table fill up before it grows
    #[error("load factor {0} is too high for open addressing, it must stay below 1.0")]
    LoadFactorTooHigh(f64),

    /// The expected element count cannot be turned into a usable table size
    #[error("cannot size a table for {expected_count} entries at load factor {load_factor}")]
    InvalidCapacity {
        /// Number of entries the caller asked room for
        expected_count: usize,
        /// Load factor the table was configured with
        load_factor: f64,
    },

    /// The hashing modulus is not an odd prime
    #[error("hashing modulus {0} must be an odd prime")]
    InvalidPrime(u64),

    /// The multiplicative coefficient vanishes modulo the prime
    #[error("scale {scale} must be non-zero modulo {prime}")]
    InvalidScale {
        /// Rejected multiplier
        scale: u64,
        /// Modulus it was checked against
        prime: u64,
    },

    /// Growing the table would need more slots than `usize` can address
    #[error("cannot grow a table of {capacity} slots any further")]
    CapacityOverflow {
        /// Number of slots before the failed growth
        capacity: usize,
    },

    /// Probing went around the whole table without meeting a free slot
    #[error("probe sequence visited all {capacity} slots without finding a free one")]
    TableFull {
        /// Number of slots in the table at the time of the failure
        capacity: usize,
    },
}
