//! Error types for vaultkit-tls

use thiserror::Error;

/// Result type alias for TLS setup
pub type Result<T> = std::result::Result<T, TlsError>;

/// TLS setup error types
#[derive(Error, Debug)]
pub enum TlsError {
    /// The TLS implementation or its algorithm provider is unusable.
    /// Not retriable.
    #[error("TLS initialization failed: {0}")]
    Initialization(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Unsupported cipher suite: {0}")]
    UnsupportedCipherSuite(String),

    #[error("Invalid session configuration: {0}")]
    Configuration(String),

    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("Rustls error: {0}")]
    Rustls(#[from] rustls::Error),
}
