//! # vaultkit-core
//!
//! Cryptographic support for the Vaultkit client including:
//! - A process-wide secure random source
//! - Multi-pass random sanitization of passphrases, buffers and keys
//! - UTF-8 text and big-endian integer codecs
//! - Hex, secret-key and uuid format validation
//! - Client settings persisted as JSON

pub mod crypto;
pub mod error;
pub mod settings;

pub use crypto::{
    bytes_to_int, int_to_bytes, is_hex, is_key, is_uuid, random_key_hex, random_uuid_hex,
    text_to_bytes, utf16_to_bytes, KeyHandle, RandomSource, Sanitizer, SecretKey, SystemRandom,
    SANITIZATION_COUNT,
};
pub use error::{CryptoError, Result};
pub use settings::{Settings, SettingsManager, TlsSettings};
