//! Multi-pass random overwrite of sensitive buffers
//!
//! Each pass draws fresh random data for every element. Stores go through
//! `ptr::write_volatile` and each pass ends with a compiler fence, so the
//! optimizer cannot drop them as dead writes.

use std::ptr;
use std::sync::atomic::{compiler_fence, Ordering};

use tracing::{trace, warn};
use zeroize::Zeroizing;

use super::key::KeyHandle;
use super::random::{RandomSource, SystemRandom};
use crate::error::{CryptoError, Result};

/// Number of random overwrite passes applied by [`Sanitizer::sanitize`]
pub const SANITIZATION_COUNT: usize = 10_000;

/// Random bytes are drawn in blocks of this size
const SCRATCH_LEN: usize = 256;

/// Element types a sanitizer can overwrite with random values.
pub trait Scrub: Copy {
    /// Random bytes consumed per element
    const WIDTH: usize;

    /// Build an element from exactly `WIDTH` random bytes
    fn from_random(bytes: &[u8]) -> Self;
}

impl Scrub for u8 {
    const WIDTH: usize = 1;

    fn from_random(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl Scrub for u16 {
    const WIDTH: usize = 2;

    fn from_random(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl Scrub for char {
    const WIDTH: usize = 4;

    // Scalars below the surrogate range are always valid chars
    fn from_random(bytes: &[u8]) -> Self {
        let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) % 0xD800;
        char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Overwrites caller-owned buffers in place, [`SANITIZATION_COUNT`] times.
///
/// The sanitizer only borrows buffers for the duration of a call; length and
/// location never change.
#[derive(Clone, Copy)]
pub struct Sanitizer<'a> {
    rng: &'a dyn RandomSource,
}

impl<'a> Sanitizer<'a> {
    /// Create a sanitizer drawing from the given random source
    pub fn new(rng: &'a dyn RandomSource) -> Self {
        Self { rng }
    }

    /// Sanitizer backed by the process-wide [`SystemRandom`]
    pub fn system() -> Result<Sanitizer<'static>> {
        Ok(Sanitizer::new(SystemRandom::global()?))
    }

    /// Overwrite every element of `buf` with random data, once per pass.
    ///
    /// An empty buffer is a no-op.
    pub fn sanitize<T: Scrub>(&self, buf: &mut [T]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        trace!(len = buf.len(), passes = SANITIZATION_COUNT, "Sanitizing buffer");

        let mut scratch = Zeroizing::new([0u8; SCRATCH_LEN]);
        let per_block = SCRATCH_LEN / T::WIDTH;

        for _ in 0..SANITIZATION_COUNT {
            for block in buf.chunks_mut(per_block) {
                let random = &mut scratch[..block.len() * T::WIDTH];
                self.rng.fill(random)?;

                for (slot, bytes) in block.iter_mut().zip(random.chunks_exact(T::WIDTH)) {
                    // SAFETY: `slot` comes from a live `&mut [T]`, so it is
                    // valid and aligned for a write of `T`.
                    unsafe { ptr::write_volatile(slot, T::from_random(bytes)) };
                }
            }
            compiler_fence(Ordering::SeqCst);
        }

        Ok(())
    }

    /// Sanitize each byte buffer in order
    pub fn erase_many(&self, buffers: &mut [&mut [u8]]) -> Result<()> {
        for buf in buffers.iter_mut() {
            self.sanitize(&mut buf[..])?;
        }
        Ok(())
    }

    /// Overwrite the raw material behind a key handle.
    ///
    /// Fails with [`CryptoError::UnsupportedErasure`] when the handle does not
    /// expose mutable key bytes.
    pub fn erase_key(&self, key: &mut dyn KeyHandle) -> Result<()> {
        let algorithm = key.algorithm().to_string();
        match key.raw_bytes_mut() {
            Some(raw) => self.sanitize(raw),
            None => {
                warn!(algorithm = %algorithm, "Key material is not extractable, cannot erase");
                Err(CryptoError::UnsupportedErasure(format!(
                    "{} key does not expose its raw bytes",
                    algorithm
                )))
            }
        }
    }

    /// Erase every key handle in order.
    ///
    /// A handle that cannot be erased does not stop the rest; the first
    /// error is returned once all handles have been visited.
    pub fn erase_keys(&self, keys: &mut [&mut dyn KeyHandle]) -> Result<()> {
        let mut first_err = None;
        for key in keys.iter_mut() {
            if let Err(e) = self.erase_key(&mut **key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for Sanitizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("passes", &SANITIZATION_COUNT)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::SecretKey;
    use crate::crypto::random::testing::{CountingRandom, FailingRandom};

    struct HardwareKey;

    impl KeyHandle for HardwareKey {
        fn algorithm(&self) -> &str {
            "HSM-AES"
        }

        fn raw_bytes_mut(&mut self) -> Option<&mut [u8]> {
            None
        }
    }

    #[test]
    fn test_sanitize_keeps_length_and_changes_content() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let original = [0x5Au8; 48];
        let mut buf = original;
        sanitizer.sanitize(&mut buf).unwrap();

        assert_eq!(buf.len(), 48);
        assert_ne!(buf, original);
    }

    #[test]
    fn test_sanitize_empty_is_noop() {
        let rng = CountingRandom::default();
        let sanitizer = Sanitizer::new(&rng);

        let mut buf: [u8; 0] = [];
        sanitizer.sanitize(&mut buf).unwrap();
        assert_eq!(rng.calls(), 0);
    }

    #[test]
    fn test_sanitize_draws_fresh_data_every_pass() {
        let rng = CountingRandom::default();
        let sanitizer = Sanitizer::new(&rng);

        let mut buf = [0u8; 32];
        sanitizer.sanitize(&mut buf).unwrap();

        assert_eq!(rng.calls(), SANITIZATION_COUNT);

        // The buffer holds the last pass, which differs from a single pass
        // over a fresh source.
        let single = CountingRandom::default();
        let mut first_pass = [0u8; 32];
        single.fill(&mut first_pass).unwrap();
        assert_ne!(buf, first_pass);
        assert_ne!(buf, [0u8; 32]);
    }

    #[test]
    fn test_sanitize_large_buffer_uses_blocks() {
        let rng = CountingRandom::default();
        let sanitizer = Sanitizer::new(&rng);

        let mut buf = vec![0u8; SCRATCH_LEN * 2 + 1];
        sanitizer.sanitize(&mut buf).unwrap();

        assert_eq!(buf.len(), SCRATCH_LEN * 2 + 1);
        assert_eq!(rng.calls(), SANITIZATION_COUNT * 3);
    }

    #[test]
    fn test_sanitize_chars_stay_valid() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let original: Vec<char> = "correct horse battery staple".chars().collect();
        let mut buf = original.clone();
        sanitizer.sanitize(&mut buf).unwrap();

        assert_eq!(buf.len(), original.len());
        assert_ne!(buf, original);
        assert!(buf.iter().all(|c| (*c as u32) < 0xD800));
    }

    #[test]
    fn test_sanitize_elements_are_not_uniform() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let mut buf = [0u16; 64];
        sanitizer.sanitize(&mut buf).unwrap();
        assert!(buf.iter().any(|v| *v != buf[0]));
    }

    #[test]
    fn test_sanitize_propagates_entropy_failure() {
        let sanitizer = Sanitizer::new(&FailingRandom);
        let mut buf = [1u8; 8];
        assert!(matches!(
            sanitizer.sanitize(&mut buf),
            Err(CryptoError::EntropyUnavailable(_))
        ));
    }

    #[test]
    fn test_erase_many() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let mut a = [7u8; 16];
        let mut b = [9u8; 24];
        let mut empty: [u8; 0] = [];
        sanitizer
            .erase_many(&mut [&mut a[..], &mut b[..], &mut empty[..]])
            .unwrap();

        assert_ne!(a, [7u8; 16]);
        assert_ne!(b, [9u8; 24]);
    }

    #[test]
    fn test_erase_key_overwrites_material() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let mut key = SecretKey::new([0x11; 32]);
        sanitizer.erase_key(&mut key).unwrap();
        assert_ne!(key.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn test_erase_key_unsupported() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let mut key = HardwareKey;
        let err = sanitizer.erase_key(&mut key).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedErasure(_)));
    }

    #[test]
    fn test_erase_keys_continues_past_unsupported() {
        let rng = SystemRandom::new().unwrap();
        let sanitizer = Sanitizer::new(&rng);

        let mut first = SecretKey::new([0x22; 32]);
        let mut hardware = HardwareKey;
        let mut last = SecretKey::new([0x33; 32]);

        let mut keys: [&mut dyn KeyHandle; 3] = [&mut first, &mut hardware, &mut last];
        let result = sanitizer.erase_keys(&mut keys);
        assert!(matches!(result, Err(CryptoError::UnsupportedErasure(_))));
        assert_ne!(first.as_bytes(), &[0x22; 32]);
        assert_ne!(last.as_bytes(), &[0x33; 32]);
    }
}
