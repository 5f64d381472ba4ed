//! Format checks for hex-encoded keys and identifiers

/// Hex length of a 256-bit secret key
pub const KEY_HEX_LEN: usize = 64;

/// Hex length of a 128-bit uuid
pub const UUID_HEX_LEN: usize = 32;

/// True if `s` decodes as hexadecimal: even length, `[0-9a-fA-F]` only.
///
/// The empty string decodes to zero bytes and is accepted.
pub fn is_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True if `s` is the hex form of a 256-bit key
pub fn is_key(s: &str) -> bool {
    is_hex(s) && s.len() == KEY_HEX_LEN
}

/// True if `s` is the hex form of a 16-byte uuid
pub fn is_uuid(s: &str) -> bool {
    is_hex(s) && s.len() == UUID_HEX_LEN
}
