//! Process-wide cryptographically secure random source

use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};

/// Source of cryptographically secure random bytes.
///
/// Everything that needs unpredictability takes one of these, so tests can
/// substitute a deterministic or counting implementation.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes
    fn fill(&self, dest: &mut [u8]) -> Result<()>;

    /// Return `n` freshly generated random bytes
    fn bytes(&self, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.fill(&mut out)?;
        Ok(out)
    }
}

static GLOBAL: OnceLock<SystemRandom> = OnceLock::new();

/// CSPRNG seeded once from the operating system and never reseeded.
///
/// The generator sits behind a mutex so concurrent `fill` calls are safe.
pub struct SystemRandom {
    rng: Mutex<StdRng>,
}

impl SystemRandom {
    /// Seed a new generator from the OS entropy source
    pub fn new() -> Result<Self> {
        let rng = StdRng::from_rng(OsRng)?;
        Ok(Self {
            rng: Mutex::new(rng),
        })
    }

    /// Process-wide instance, created on the first call.
    ///
    /// Call this once during startup to surface a missing entropy source
    /// before any crypto work begins.
    pub fn global() -> Result<&'static SystemRandom> {
        if let Some(rng) = GLOBAL.get() {
            return Ok(rng);
        }

        let rng = Self::new()?;
        if GLOBAL.set(rng).is_ok() {
            debug!("Initialized process-wide secure random source");
        }

        GLOBAL.get().ok_or_else(|| {
            CryptoError::EntropyUnavailable("global random source was not initialized".to_string())
        })
    }
}

impl RandomSource for SystemRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.try_fill_bytes(dest)?;
        Ok(())
    }
}

/// Generate a 256-bit secret key, hex encoded (64 characters)
pub fn random_key_hex(rng: &dyn RandomSource) -> Result<Zeroizing<String>> {
    let mut key = Zeroizing::new([0u8; 32]);
    rng.fill(&mut key[..])?;
    Ok(Zeroizing::new(hex::encode(&key[..])))
}

/// Generate a random 128-bit identifier as 32 lowercase hex characters
pub fn random_uuid_hex(rng: &dyn RandomSource) -> Result<String> {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes)?;
    let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
    Ok(id.simple().to_string())
}

impl fmt::Debug for SystemRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRandom").finish_non_exhaustive()
    }
}
