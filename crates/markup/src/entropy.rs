//! Randomness capability consulted by the identifier generator.
//!
//! The generator never reaches for ambient randomness itself; it is handed an
//! [`Entropy`] so tests can pin every tier down with [`SeededEntropy`].

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Exclusive upper bound of [`Entropy::pseudo_random`].
pub const PSEUDO_RANDOM_RANGE: u64 = 1_000_000_000;

#[derive(Debug, thiserror::Error)]
pub enum EntropyError {
    #[error("no strong random source available")]
    Unavailable,
    #[error("os random source failed: {0}")]
    Os(getrandom::Error),
}

/// Token generation tiers, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdTier {
    Uuid,
    RandomBytes,
    Clock,
}

pub trait Entropy {
    /// A v4 UUID from a strong source, if one exists.
    fn random_uuid(&mut self) -> Option<Uuid>;

    /// Fills `buf` from a strong source.
    fn random_bytes(&mut self, buf: &mut [u8]) -> Result<(), EntropyError>;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&mut self) -> u64;

    /// Weak uniform draw in `[0, PSEUDO_RANDOM_RANGE)`.
    fn pseudo_random(&mut self) -> u64;
}

/// Operating-system entropy: `getrandom` for the strong tiers, `rand`'s thread-local
/// generator for the weak one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    fn random_uuid(&mut self) -> Option<Uuid> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes).ok()?;
        Some(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    fn random_bytes(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buf).map_err(EntropyError::Os)
    }

    fn now_millis(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn pseudo_random(&mut self) -> u64 {
        rand::rng().random_range(0..PSEUDO_RANDOM_RANGE)
    }
}

/// Deterministic entropy with a frozen clock.
///
/// `strongest` caps which tiers are available: `IdTier::Clock` simulates a platform
/// without any strong random source.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: StdRng,
    millis: u64,
    strongest: IdTier,
}

impl SeededEntropy {
    pub fn new(seed: u64, strongest: IdTier) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            millis: 1_700_000_000_000,
            strongest,
        }
    }

    pub fn with_millis(mut self, millis: u64) -> Self {
        self.millis = millis;
        self
    }

    pub fn advance_clock(&mut self, millis: u64) {
        self.millis += millis;
    }
}

impl Entropy for SeededEntropy {
    fn random_uuid(&mut self) -> Option<Uuid> {
        if self.strongest > IdTier::Uuid {
            return None;
        }
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Some(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    fn random_bytes(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        if self.strongest > IdTier::RandomBytes {
            return Err(EntropyError::Unavailable);
        }
        self.rng.fill_bytes(buf);
        Ok(())
    }

    fn now_millis(&mut self) -> u64 {
        self.millis
    }

    fn pseudo_random(&mut self) -> u64 {
        self.rng.random_range(0..PSEUDO_RANDOM_RANGE)
    }
}
