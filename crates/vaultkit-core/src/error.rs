//! Error types for vaultkit-core

use thiserror::Error;

/// Result type alias for crypto support operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Crypto support error types
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The OS entropy source could not be read. Fatal; callers must not
    /// continue with crypto operations.
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    /// The key handle does not expose its raw bytes, so erasure cannot be
    /// guaranteed.
    #[error("Key material cannot be erased: {0}")]
    UnsupportedErasure(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<rand::Error> for CryptoError {
    fn from(err: rand::Error) -> Self {
        CryptoError::EntropyUnavailable(err.to_string())
    }
}
