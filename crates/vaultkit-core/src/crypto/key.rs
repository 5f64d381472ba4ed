//! Key handles and the software secret key

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::random::RandomSource;
use super::validate::is_key;
use crate::error::{CryptoError, Result};

/// Size of a secret key in bytes (256 bits)
pub const KEY_LEN: usize = 32;

/// Opaque key object whose raw form may or may not be extractable.
pub trait KeyHandle {
    /// Algorithm name, for diagnostics
    fn algorithm(&self) -> &str;

    /// Mutable view of the underlying key bytes.
    ///
    /// Returns `None` when the material lives outside process memory
    /// (hardware-backed or otherwise non-exportable keys).
    fn raw_bytes_mut(&mut self) -> Option<&mut [u8]>;
}

/// 256-bit secret key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_LEN],
}

impl SecretKey {
    /// Create a new secret key from raw bytes
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Generate a fresh key from the given random source
    pub fn generate(rng: &dyn RandomSource) -> Result<Self> {
        let mut key = Self::new([0u8; KEY_LEN]);
        rng.fill(&mut key.key)?;
        Ok(key)
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != KEY_LEN {
            return Err(CryptoError::InvalidLength {
                expected: KEY_LEN,
                actual: slice.len(),
            });
        }
        let mut key = Self::new([0u8; KEY_LEN]);
        key.key.copy_from_slice(slice);
        Ok(key)
    }

    /// Parse a 64-character hex representation
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        if !is_key(hex_key) {
            return Err(CryptoError::InvalidFormat(
                "secret key must be 64 hexadecimal characters".to_string(),
            ));
        }
        let mut key = Self::new([0u8; KEY_LEN]);
        hex::decode_to_slice(hex_key, &mut key.key)
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;
        Ok(key)
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Hex form of the key, zeroed when dropped
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.key))
    }
}

impl KeyHandle for SecretKey {
    fn algorithm(&self) -> &str {
        "AES-256"
    }

    fn raw_bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.key)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
