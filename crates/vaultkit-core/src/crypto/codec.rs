//! Text and integer conversions for secret-bearing data
//!
//! Text conversions work on a private copy of the caller's characters and
//! sanitize every intermediate buffer before returning.

use std::mem;

use zeroize::Zeroizing;

use super::sanitize::Sanitizer;
use crate::error::{CryptoError, Result};

/// Width of an encoded integer
pub const INT_LEN: usize = 4;

/// Encode characters as UTF-8.
///
/// The caller's slice is never modified.
pub fn text_to_bytes(chars: &[char], sanitizer: &Sanitizer<'_>) -> Result<Vec<u8>> {
    let mut working = Zeroizing::new(chars.to_vec());
    let mut bytes = encode_utf8(&working, sanitizer)?;
    sanitizer.sanitize(working.as_mut_slice())?;
    Ok(mem::take(&mut *bytes))
}

/// Encode UTF-16 code units as UTF-8.
///
/// Unpaired surrogates are replaced by U+FFFD, so the output is always valid
/// UTF-8 and the mapping is deterministic.
pub fn utf16_to_bytes(units: &[u16], sanitizer: &Sanitizer<'_>) -> Result<Vec<u8>> {
    let mut working = Zeroizing::new(units.to_vec());
    let mut decoded: Zeroizing<Vec<char>> = Zeroizing::new(Vec::with_capacity(working.len()));
    decoded.extend(
        char::decode_utf16(working.iter().copied())
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );

    let mut bytes = encode_utf8(&decoded, sanitizer)?;
    sanitizer.sanitize(working.as_mut_slice())?;
    sanitizer.sanitize(decoded.as_mut_slice())?;
    Ok(mem::take(&mut *bytes))
}

// Sized up front so the intermediate buffer never reallocates and leaves a
// stale copy behind. The output stays wrapped until every sanitize succeeds.
fn encode_utf8(chars: &[char], sanitizer: &Sanitizer<'_>) -> Result<Zeroizing<Vec<u8>>> {
    let len: usize = chars.iter().map(|c| c.len_utf8()).sum();
    let mut encoded = Zeroizing::new(Vec::with_capacity(len));
    let mut scratch = Zeroizing::new([0u8; 4]);
    for c in chars {
        encoded.extend_from_slice(c.encode_utf8(&mut scratch[..]).as_bytes());
    }

    let bytes = Zeroizing::new(encoded.to_vec());
    sanitizer.sanitize(encoded.as_mut_slice())?;
    Ok(bytes)
}

/// Big-endian encoding of a 32-bit integer
pub fn int_to_bytes(value: i32) -> [u8; INT_LEN] {
    value.to_be_bytes()
}

/// Decode a big-endian 32-bit integer from the first four bytes.
///
/// Fewer than four bytes is an [`CryptoError::InvalidLength`]; anything past
/// the fourth byte is ignored.
pub fn bytes_to_int(bytes: &[u8]) -> Result<i32> {
    match bytes.get(..INT_LEN) {
        Some(&[b0, b1, b2, b3]) => Ok(i32::from_be_bytes([b0, b1, b2, b3])),
        _ => Err(CryptoError::InvalidLength {
            expected: INT_LEN,
            actual: bytes.len(),
        }),
    }
}
