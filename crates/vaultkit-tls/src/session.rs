//! rustls-backed client session with per-session allow-lists

use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use tracing::debug;

use crate::context::TlsContext;
use crate::error::{Result, TlsError};
use crate::profile::{cipher_suite_name, protocol_version, TlsSession};

/// A client session that has not started its handshake yet.
///
/// Starts with everything the context supports enabled; callers narrow it
/// with [`crate::apply_profile`] before turning it into a connection.
#[derive(Debug, Clone)]
pub struct ClientSession {
    context: TlsContext,
    enabled_protocols: Vec<String>,
    enabled_cipher_suites: Vec<String>,
}

impl ClientSession {
    pub(crate) fn new(context: TlsContext) -> Self {
        let enabled_protocols = context.supported_protocols();
        let enabled_cipher_suites = context.supported_cipher_suites();
        Self {
            context,
            enabled_protocols,
            enabled_cipher_suites,
        }
    }

    /// Client configuration restricted to the enabled lists.
    ///
    /// Cipher suites are offered in enabled-list order, so that order is the
    /// client's preference.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>> {
        let versions = self
            .enabled_protocols
            .iter()
            .filter_map(|name| protocol_version(name))
            .collect::<Vec<_>>();

        let mut provider = self.context.provider().clone();
        provider.cipher_suites = self
            .enabled_cipher_suites
            .iter()
            .filter_map(|name| {
                self.context
                    .provider()
                    .cipher_suites
                    .iter()
                    .find(|suite| cipher_suite_name(suite) == *name)
                    .copied()
            })
            .filter(|suite| versions.iter().any(|v| v.version == suite.version().version))
            .collect();

        if provider.cipher_suites.is_empty() {
            return Err(TlsError::Configuration(
                "no enabled cipher suite matches the enabled protocols".to_string(),
            ));
        }

        let config = ClientConfig::builder_with_provider(Arc::new(provider))
            .with_protocol_versions(&versions)?
            .with_root_certificates(self.context.roots())
            .with_no_client_auth();

        Ok(Arc::new(config))
    }

    /// Create the rustls connection for `server_name`.
    ///
    /// No I/O happens here; the caller drives the handshake over its own
    /// transport.
    pub fn into_connection(self, server_name: &str) -> Result<ClientConnection> {
        let name = ServerName::try_from(server_name.to_string())
            .map_err(|e| TlsError::InvalidServerName(format!("{}: {}", server_name, e)))?;
        let config = self.client_config()?;

        debug!(
            server = server_name,
            protocols = ?self.enabled_protocols,
            cipher_suites = ?self.enabled_cipher_suites,
            "Creating TLS client connection"
        );

        Ok(ClientConnection::new(config, name)?)
    }
}

impl TlsSession for ClientSession {
    fn supported_protocols(&self) -> Vec<String> {
        self.context.supported_protocols()
    }

    fn supported_cipher_suites(&self) -> Vec<String> {
        self.context.supported_cipher_suites()
    }

    fn enabled_protocols(&self) -> &[String] {
        &self.enabled_protocols
    }

    fn enabled_cipher_suites(&self) -> &[String] {
        &self.enabled_cipher_suites
    }

    fn set_enabled_protocols(&mut self, protocols: &[&str]) -> Result<()> {
        let supported = self.supported_protocols();
        if let Some(bad) = protocols.iter().find(|p| !supported.iter().any(|s| s == *p)) {
            return Err(TlsError::UnsupportedProtocol(bad.to_string()));
        }
        self.enabled_protocols = protocols.iter().map(|p| p.to_string()).collect();
        Ok(())
    }

    fn set_enabled_cipher_suites(&mut self, suites: &[&str]) -> Result<()> {
        let supported = self.supported_cipher_suites();
        if let Some(bad) = suites.iter().find(|c| !supported.iter().any(|s| s == *c)) {
            return Err(TlsError::UnsupportedCipherSuite(bad.to_string()));
        }
        self.enabled_cipher_suites = suites.iter().map(|s| s.to_string()).collect();
        Ok(())
    }
}
