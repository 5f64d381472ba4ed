//! Cryptographic support routines
//!
//! This module provides:
//! - A process-wide secure random source behind an injectable trait
//! - Multi-pass random sanitization of sensitive buffers and keys
//! - UTF-8 and big-endian integer codecs
//! - Hex, key and uuid format checks

mod codec;
mod key;
mod random;
mod sanitize;
mod validate;

pub use codec::{bytes_to_int, int_to_bytes, text_to_bytes, utf16_to_bytes, INT_LEN};
pub use key::{KeyHandle, SecretKey, KEY_LEN};
pub use random::{random_key_hex, random_uuid_hex, RandomSource, SystemRandom};
pub use sanitize::{Sanitizer, Scrub, SANITIZATION_COUNT};
pub use validate::{is_hex, is_key, is_uuid, KEY_HEX_LEN, UUID_HEX_LEN};
