//! The pinned TLS profile and the session seam it is applied through

use rustls::{ProtocolVersion, SupportedCipherSuite, SupportedProtocolVersion};
use tracing::debug;

use crate::error::{Result, TlsError};

/// Protocol versions a profiled session may negotiate
pub const PROTOCOL_ALLOW_LIST: [&str; 1] = ["TLSv1.2"];

/// Cipher suites a profiled session may negotiate
pub const CIPHER_SUITE_ALLOW_LIST: [&str; 2] = [
    "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
    "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
];

/// A TLS session object whose negotiable parameters can be restricted
/// before the handshake.
///
/// Enabled lists are allow-lists: anything not listed is refused. They
/// belong to one session object and are not shared.
pub trait TlsSession {
    /// Every protocol name this session could enable
    fn supported_protocols(&self) -> Vec<String>;

    /// Every cipher suite name this session could enable
    fn supported_cipher_suites(&self) -> Vec<String>;

    /// Currently enabled protocols
    fn enabled_protocols(&self) -> &[String];

    /// Currently enabled cipher suites
    fn enabled_cipher_suites(&self) -> &[String];

    /// Replace the enabled protocol list
    fn set_enabled_protocols(&mut self, protocols: &[&str]) -> Result<()>;

    /// Replace the enabled cipher suite list
    fn set_enabled_cipher_suites(&mut self, suites: &[&str]) -> Result<()>;
}

/// Restrict `session` to exactly [`PROTOCOL_ALLOW_LIST`] and
/// [`CIPHER_SUITE_ALLOW_LIST`].
///
/// Both lists are checked against what the session supports before either
/// is applied, so a failure leaves the session untouched.
pub fn apply_profile(session: &mut dyn TlsSession) -> Result<()> {
    let protocols = session.supported_protocols();
    if let Some(missing) = PROTOCOL_ALLOW_LIST
        .iter()
        .find(|p| !protocols.iter().any(|s| s == *p))
    {
        return Err(TlsError::UnsupportedProtocol(missing.to_string()));
    }

    let suites = session.supported_cipher_suites();
    if let Some(missing) = CIPHER_SUITE_ALLOW_LIST
        .iter()
        .find(|c| !suites.iter().any(|s| s == *c))
    {
        return Err(TlsError::UnsupportedCipherSuite(missing.to_string()));
    }

    session.set_enabled_protocols(&PROTOCOL_ALLOW_LIST)?;
    session.set_enabled_cipher_suites(&CIPHER_SUITE_ALLOW_LIST)?;

    debug!(
        protocols = ?PROTOCOL_ALLOW_LIST,
        cipher_suites = ?CIPHER_SUITE_ALLOW_LIST,
        "Applied TLS profile"
    );
    Ok(())
}

/// Standard name of a protocol version ("TLSv1.2", "TLSv1.3")
pub(crate) fn protocol_name(version: &SupportedProtocolVersion) -> Option<&'static str> {
    match version.version {
        ProtocolVersion::TLSv1_2 => Some("TLSv1.2"),
        ProtocolVersion::TLSv1_3 => Some("TLSv1.3"),
        _ => None,
    }
}

/// Look up the rustls version for a standard protocol name
pub(crate) fn protocol_version(name: &str) -> Option<&'static SupportedProtocolVersion> {
    match name {
        "TLSv1.2" => Some(&rustls::version::TLS12),
        "TLSv1.3" => Some(&rustls::version::TLS13),
        _ => None,
    }
}

/// IANA name of a cipher suite
pub(crate) fn cipher_suite_name(suite: &SupportedCipherSuite) -> String {
    format!("{:?}", suite.suite())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for a platform socket that supports a fixed menu
    struct FakeSocket {
        supported_protocols: Vec<String>,
        supported_suites: Vec<String>,
        protocols: Vec<String>,
        suites: Vec<String>,
    }

    impl FakeSocket {
        fn new(protocols: &[&str], suites: &[&str]) -> Self {
            let protocols: Vec<String> = protocols.iter().map(|p| p.to_string()).collect();
            let suites: Vec<String> = suites.iter().map(|s| s.to_string()).collect();
            Self {
                supported_protocols: protocols.clone(),
                supported_suites: suites.clone(),
                protocols,
                suites,
            }
        }
    }

    impl TlsSession for FakeSocket {
        fn supported_protocols(&self) -> Vec<String> {
            self.supported_protocols.clone()
        }

        fn supported_cipher_suites(&self) -> Vec<String> {
            self.supported_suites.clone()
        }

        fn enabled_protocols(&self) -> &[String] {
            &self.protocols
        }

        fn enabled_cipher_suites(&self) -> &[String] {
            &self.suites
        }

        fn set_enabled_protocols(&mut self, protocols: &[&str]) -> Result<()> {
            self.protocols = protocols.iter().map(|p| p.to_string()).collect();
            Ok(())
        }

        fn set_enabled_cipher_suites(&mut self, suites: &[&str]) -> Result<()> {
            self.suites = suites.iter().map(|s| s.to_string()).collect();
            Ok(())
        }
    }

    #[test]
    fn test_apply_profile_restricts_to_allow_lists() {
        let mut socket = FakeSocket::new(
            &["SSLv3", "TLSv1", "TLSv1.1", "TLSv1.2", "TLSv1.3"],
            &[
                "TLS_RSA_WITH_AES_128_CBC_SHA",
                "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
                "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
                "TLS13_AES_128_GCM_SHA256",
            ],
        );

        apply_profile(&mut socket).unwrap();

        assert_eq!(socket.enabled_protocols(), ["TLSv1.2"]);
        assert_eq!(
            socket.enabled_cipher_suites(),
            [
                "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
                "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
            ]
        );
        for legacy in ["SSLv3", "TLSv1.1", "TLSv1.3"] {
            assert!(!socket.enabled_protocols().iter().any(|p| p == legacy));
        }
    }

    #[test]
    fn test_apply_profile_missing_protocol_leaves_session_untouched() {
        let mut socket = FakeSocket::new(
            &["TLSv1.3"],
            &[
                "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
                "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
            ],
        );

        let err = apply_profile(&mut socket).unwrap_err();
        assert!(matches!(err, TlsError::UnsupportedProtocol(p) if p == "TLSv1.2"));
        assert_eq!(socket.enabled_protocols(), ["TLSv1.3"]);
    }

    #[test]
    fn test_apply_profile_missing_cipher_suite() {
        let mut socket = FakeSocket::new(&["TLSv1.2"], &["TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"]);

        let err = apply_profile(&mut socket).unwrap_err();
        assert!(matches!(
            err,
            TlsError::UnsupportedCipherSuite(s) if s == "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
        ));
    }

    #[test]
    fn test_protocol_names_round_trip() {
        for name in ["TLSv1.2", "TLSv1.3"] {
            let version = protocol_version(name).unwrap();
            assert_eq!(protocol_name(version), Some(name));
        }
        assert!(protocol_version("SSLv3").is_none());
    }

    #[test]
    fn test_cipher_suite_names() {
        let name = cipher_suite_name(
            &rustls::crypto::ring::cipher_suite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        );
        assert_eq!(name, "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384");
    }
}
