//! Universal multiplicative hashing onto prime-sized tables

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::Rng;

use crate::MapError;

/// Modulus used when a map is built without an explicit prime
pub const DEFAULT_PRIME: u64 = 109_345_121;

/// Coefficients of `((scale * h + shift) mod prime) mod capacity`.
///
/// A map keeps the same coefficients for its whole life, rehashes included,
/// so a key always lands on the same slot for a given capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCoefficients {
    /// Odd prime used as the first modulus
    prime: u64,
    /// Multiplier applied to the normalized hash
    scale: u64,
    /// Offset added after multiplication
    shift: u64,
}

impl Default for HashCoefficients {
    fn default() -> Self {
        Self::fixed(DEFAULT_PRIME)
    }
}

impl HashCoefficients {
    /// Identity coefficients: scale 1, shift 0.
    ///
    /// The prime is not validated here; use [`HashCoefficients::new`] for untrusted input.
    #[must_use]
    pub const fn fixed(prime: u64) -> Self {
        Self { prime, scale: 1, shift: 0 }
    }

    /// Draws scale from `[1, prime)` and shift from `[0, prime)`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPrime`] if `prime` is not an odd prime.
    pub fn randomized(prime: u64) -> Result<Self, MapError> {
        validate_prime(prime)?;
        let mut rng = rand::rng();
        Ok(Self { prime, scale: rng.random_range(1..prime), shift: rng.random_range(0..prime) })
    }

    /// Builds coefficients from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPrime`] if `prime` is not an odd prime and
    /// [`MapError::InvalidScale`] if `scale` is a multiple of it.
    pub fn new(prime: u64, scale: u64, shift: u64) -> Result<Self, MapError> {
        validate_prime(prime)?;
        if scale.checked_rem(prime).unwrap_or(0) == 0 {
            return Err(MapError::InvalidScale { scale, prime });
        }
        Ok(Self { prime, scale, shift })
    }

    /// The modulus
    #[must_use]
    pub const fn prime(&self) -> u64 {
        self.prime
    }

    /// The multiplier
    #[must_use]
    pub const fn scale(&self) -> u64 {
        self.scale
    }

    /// The offset
    #[must_use]
    pub const fn shift(&self) -> u64 {
        self.shift
    }

    /// Maps `key` onto a slot in `0..capacity`.
    ///
    /// Pure for fixed coefficients and capacity. A zero capacity maps everything to slot 0.
    pub fn slot<Q: ?Sized + Hash>(&self, key: &Q, capacity: usize) -> usize {
        let mixed = u128::from(self.scale)
            .saturating_mul(u128::from(normalize(raw_hash(key))))
            .saturating_add(u128::from(self.shift))
            .checked_rem(u128::from(self.prime))
            .unwrap_or(0);
        let capacity = u128::try_from(capacity).unwrap_or(u128::MAX);
        mixed.checked_rem(capacity).and_then(|slot| usize::try_from(slot).ok()).unwrap_or(0)
    }
}

/// Implementation-defined 64-bit hash of a key
pub fn raw_hash<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Reads the raw hash as a signed number and takes its magnitude
const fn normalize(raw: u64) -> u64 {
    i64::from_ne_bytes(raw.to_ne_bytes()).unsigned_abs()
}

/// Checks that `prime` is usable as a hashing modulus
fn validate_prime(prime: u64) -> Result<(), MapError> {
    let odd_prime = prime % 2 == 1 && usize::try_from(prime).is_ok_and(is_prime);
    if odd_prime { Ok(()) } else { Err(MapError::InvalidPrime(prime)) }
}

/// Returns true if `n` is prime
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    // Every prime above 3 sits next to a multiple of six
    let mut divisor: usize = 5;
    while divisor.checked_mul(divisor).is_some_and(|square| square <= n) {
        if n % divisor == 0 || n % divisor.saturating_add(2) == 0 {
            return false;
        }
        divisor = divisor.saturating_add(6);
    }
    true
}

/// Smallest prime greater than or equal to `n`.
///
/// Returns `None` only when no such prime fits in a `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
