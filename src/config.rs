//! Construction parameters shared by both map variants

use crate::{
    MapError,
    hashing::{DEFAULT_PRIME, HashCoefficients, next_prime},
};

/// Number of entries a map made with `new()` expects
pub const DEFAULT_EXPECTED_COUNT: usize = 16;

/// Largest slot count a map may be created with
pub const MAX_CAPACITY: usize = 1 << 31;

/// How a map picks its hashing coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashingMode {
    /// Scale 1 and shift 0, identical across instances
    #[default]
    Fixed,
    /// Scale and shift drawn once per instance
    Randomized,
    /// Caller-provided coefficients
    Explicit {
        /// Multiplier
        scale: u64,
        /// Offset
        shift: u64,
    },
}

/// Sizing and hashing parameters for a new map.
///
/// ```rust
/// use primemap::{LinearProbingMap, MapConfig};
///
/// let config = MapConfig::new(4, 0.5);
/// assert_eq!(config.initial_capacity(), Ok(11));
///
/// let map: LinearProbingMap<&str, i32> = LinearProbingMap::with_config(&config).unwrap();
/// assert_eq!(map.capacity(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Number of entries the caller expects to store
    expected_count: usize,
    /// Load factor ceiling that triggers a rehash
    load_factor: f64,
    /// Modulus for the hash function
    prime: u64,
    /// Coefficient selection
    hashing: HashingMode,
}

impl MapConfig {
    /// Creates a config with the default prime and fixed coefficients
    #[must_use]
    pub const fn new(expected_count: usize, load_factor: f64) -> Self {
        Self { expected_count, load_factor, prime: DEFAULT_PRIME, hashing: HashingMode::Fixed }
    }

    /// Overrides the hashing modulus
    #[must_use]
    pub const fn with_prime(mut self, prime: u64) -> Self {
        self.prime = prime;
        self
    }

    /// Overrides how coefficients are chosen
    #[must_use]
    pub const fn with_hashing(mut self, hashing: HashingMode) -> Self {
        self.hashing = hashing;
        self
    }

    /// Expected number of entries
    #[must_use]
    pub const fn expected_count(&self) -> usize {
        self.expected_count
    }

    /// Load factor ceiling
    #[must_use]
    pub const fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Validates the load factor and returns `next_prime(expected_count / load_factor)`.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidLoadFactor`] for a non-positive or non-finite load factor,
    /// [`MapError::InvalidCapacity`] for a zero expected count or a table larger than
    /// [`MAX_CAPACITY`].
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::arithmetic_side_effects
    )]
    pub fn initial_capacity(&self) -> Result<usize, MapError> {
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(MapError::InvalidLoadFactor(self.load_factor));
        }
        let invalid = || MapError::InvalidCapacity {
            expected_count: self.expected_count,
            load_factor: self.load_factor,
        };
        if self.expected_count == 0 {
            return Err(invalid());
        }

        let slots = (self.expected_count as f64 / self.load_factor).floor();
        if !slots.is_finite() || slots > MAX_CAPACITY as f64 {
            return Err(invalid());
        }
        // Rounded down and bounded above, so the cast is exact
        let slots = (slots as usize).max(1);
        next_prime(slots)
            .filter(|&capacity| capacity <= MAX_CAPACITY)
            .ok_or_else(invalid)
    }

    /// Resolves the coefficients this config asks for.
    ///
    /// # Errors
    ///
    /// [`MapError::InvalidPrime`] or [`MapError::InvalidScale`] for unusable values.
    pub fn coefficients(&self) -> Result<HashCoefficients, MapError> {
        match self.hashing {
            HashingMode::Fixed => HashCoefficients::new(self.prime, 1, 0),
            HashingMode::Randomized => HashCoefficients::randomized(self.prime),
            HashingMode::Explicit { scale, shift } => {
                HashCoefficients::new(self.prime, scale, shift)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_capacity_is_next_prime() {
        assert_eq!(MapConfig::new(4, 0.5).initial_capacity(), Ok(11));
        assert_eq!(MapConfig::new(10, 1.0).initial_capacity(), Ok(11));
        assert_eq!(MapConfig::new(100, 4.0).initial_capacity(), Ok(29));
        assert_eq!(MapConfig::new(1, 4.0).initial_capacity(), Ok(2));
    }

    #[test]
    fn test_invalid_load_factor() {
        for load_factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = MapConfig::new(4, load_factor).initial_capacity();
            assert!(matches!(result, Err(MapError::InvalidLoadFactor(_))), "{load_factor}");
        }
    }

    #[test]
    fn test_invalid_sizing() {
        assert_eq!(
            MapConfig::new(0, 0.5).initial_capacity(),
            Err(MapError::InvalidCapacity { expected_count: 0, load_factor: 0.5 })
        );
        assert!(matches!(
            MapConfig::new(usize::MAX, 0.5).initial_capacity(),
            Err(MapError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            MapConfig::new(10, f64::MIN_POSITIVE).initial_capacity(),
            Err(MapError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_coefficients_by_mode() {
        let fixed = MapConfig::new(4, 0.5).coefficients().unwrap();
        assert_eq!(fixed, HashCoefficients::fixed(DEFAULT_PRIME));

        let explicit = MapConfig::new(4, 0.5)
            .with_prime(13)
            .with_hashing(HashingMode::Explicit { scale: 3, shift: 4 })
            .coefficients()
            .unwrap();
        assert_eq!((explicit.prime(), explicit.scale(), explicit.shift()), (13, 3, 4));

        let random =
            MapConfig::new(4, 0.5).with_hashing(HashingMode::Randomized).coefficients().unwrap();
        assert_eq!(random.prime(), DEFAULT_PRIME);

        assert_eq!(
            MapConfig::new(4, 0.5).with_prime(15).coefficients(),
            Err(MapError::InvalidPrime(15))
        );
    }
}
