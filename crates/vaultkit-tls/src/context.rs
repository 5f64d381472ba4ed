//! TLS context factory: crypto provider, trust anchors and secure random

use std::path::Path;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use tracing::{debug, info};
use vaultkit_core::TlsSettings;
use zeroize::Zeroize;

use crate::error::{Result, TlsError};
use crate::profile::{cipher_suite_name, protocol_name};
use crate::session::ClientSession;

/// Shared TLS state from which client sessions are created.
///
/// Cheap to clone; clones share the provider and root store.
#[derive(Clone)]
pub struct TlsContext {
    provider: Arc<CryptoProvider>,
    roots: Arc<RootCertStore>,
}

impl TlsContext {
    /// Context with the `ring` provider and the bundled Mozilla root store
    pub fn new() -> Result<Self> {
        Self::with_settings(&TlsSettings::default())
    }

    /// Context that also trusts the PEM bundles named in `settings`
    pub fn with_settings(settings: &TlsSettings) -> Result<Self> {
        Self::from_provider(rustls::crypto::ring::default_provider(), settings)
    }

    /// Build a context over an explicit crypto provider
    pub fn from_provider(provider: CryptoProvider, settings: &TlsSettings) -> Result<Self> {
        if provider.cipher_suites.is_empty() {
            return Err(TlsError::Initialization(
                "crypto provider offers no cipher suites".to_string(),
            ));
        }

        let mut probe = [0u8; 32];
        provider.secure_random.fill(&mut probe).map_err(|_| {
            TlsError::Initialization("secure random source unavailable".to_string())
        })?;
        probe.zeroize();

        let mut roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        for path in &settings.extra_ca_files {
            add_pem_bundle(&mut roots, path)?;
        }

        info!(
            cipher_suites = provider.cipher_suites.len(),
            trust_anchors = roots.len(),
            "Initialized TLS context"
        );

        Ok(Self {
            provider: Arc::new(provider),
            roots: Arc::new(roots),
        })
    }

    /// A fresh session with every supported protocol and suite enabled
    pub fn new_session(&self) -> ClientSession {
        ClientSession::new(self.clone())
    }

    /// Protocol names the provider can negotiate, newest last
    pub fn supported_protocols(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for suite in &self.provider.cipher_suites {
            if let Some(name) = protocol_name(suite.version()) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        names
    }

    /// Cipher suite names the provider can negotiate, in preference order
    pub fn supported_cipher_suites(&self) -> Vec<String> {
        self.provider
            .cipher_suites
            .iter()
            .map(cipher_suite_name)
            .collect()
    }

    pub(crate) fn provider(&self) -> &CryptoProvider {
        &self.provider
    }

    pub(crate) fn roots(&self) -> Arc<RootCertStore> {
        Arc::clone(&self.roots)
    }
}

impl std::fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsContext")
            .field("cipher_suites", &self.supported_cipher_suites())
            .field("trust_anchors", &self.roots.len())
            .finish()
    }
}

fn add_pem_bundle(roots: &mut RootCertStore, path: &Path) -> Result<()> {
    let certs = CertificateDer::pem_file_iter(path)
        .map_err(|e| TlsError::CertificateError(format!("{}: {}", path.display(), e)))?;

    let mut added = 0usize;
    for cert in certs {
        let cert =
            cert.map_err(|e| TlsError::CertificateError(format!("{}: {}", path.display(), e)))?;
        roots
            .add(cert)
            .map_err(|e| TlsError::CertificateError(format!("{}: {}", path.display(), e)))?;
        added += 1;
    }

    if added == 0 {
        return Err(TlsError::CertificateError(format!(
            "{}: no certificates found",
            path.display()
        )));
    }

    debug!("Added {} trust anchors from {:?}", added, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_new_context() {
        let context = TlsContext::new().unwrap();
        assert!(!context.roots().is_empty());
        assert!(context
            .supported_protocols()
            .iter()
            .any(|p| p == "TLSv1.2"));
        for suite in crate::CIPHER_SUITE_ALLOW_LIST {
            assert!(context.supported_cipher_suites().iter().any(|s| s == suite));
        }
    }

    #[test]
    fn test_provider_without_suites_fails() {
        let mut provider = rustls::crypto::ring::default_provider();
        provider.cipher_suites.clear();

        let err = TlsContext::from_provider(provider, &TlsSettings::default()).unwrap_err();
        assert!(matches!(err, TlsError::Initialization(_)));
    }

    #[test]
    fn test_missing_ca_file_fails() {
        let settings = TlsSettings {
            extra_ca_files: vec![PathBuf::from("/nonexistent/vaultkit-ca.pem")],
        };
        let err = TlsContext::with_settings(&settings).unwrap_err();
        assert!(matches!(err, TlsError::CertificateError(_)));
    }

    #[test]
    fn test_empty_ca_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();

        let settings = TlsSettings {
            extra_ca_files: vec![file.path().to_path_buf()],
        };
        let err = TlsContext::with_settings(&settings).unwrap_err();
        assert!(matches!(err, TlsError::CertificateError(_)));
    }
}
