//! # vaultkit-tls
//!
//! Fixed TLS profile for Vaultkit client connections:
//! - TLS 1.2 only, ECDHE-RSA with AES-GCM only
//! - A `TlsSession` seam the profile is applied through, per session
//! - A rustls-backed context factory with bundled trust anchors

mod context;
pub mod error;
mod profile;
mod session;

pub use context::TlsContext;
pub use error::{Result, TlsError};
pub use profile::{apply_profile, TlsSession, CIPHER_SUITE_ALLOW_LIST, PROTOCOL_ALLOW_LIST};
pub use session::ClientSession;
