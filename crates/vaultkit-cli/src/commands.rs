//! Command implementations, kept separate from argument parsing

use anyhow::{bail, Context};
use tracing::{debug, info};
use vaultkit_core::{
    is_hex, is_key, is_uuid, random_key_hex, random_uuid_hex, RandomSource, SettingsManager,
    TlsSettings,
};
use vaultkit_tls::{apply_profile, TlsContext, TlsSession};
use zeroize::Zeroizing;

/// Upper bound for `random`, to keep output printable
pub const MAX_RANDOM_BYTES: usize = 4096;

/// Which format a value is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Hex,
    Key,
    Uuid,
}

/// Hex encoding of `n` random bytes
pub fn random(rng: &dyn RandomSource, n: usize) -> anyhow::Result<String> {
    if n > MAX_RANDOM_BYTES {
        bail!("at most {} bytes can be generated at once", MAX_RANDOM_BYTES);
    }
    let bytes = rng.bytes(n)?;
    Ok(hex::encode(bytes))
}

/// A fresh 256-bit key in hex, wiped when dropped
pub fn key(rng: &dyn RandomSource) -> anyhow::Result<Zeroizing<String>> {
    Ok(random_key_hex(rng)?)
}

/// A fresh 128-bit identifier in hex
pub fn uuid(rng: &dyn RandomSource) -> anyhow::Result<String> {
    Ok(random_uuid_hex(rng)?)
}

/// Whether `value` matches `format`
pub fn check(format: Format, value: &str) -> bool {
    let valid = match format {
        Format::Hex => is_hex(value),
        Format::Key => is_key(value),
        Format::Uuid => is_uuid(value),
    };
    debug!(?format, valid, "Checked value format");
    valid
}

/// Build a context, apply the profile to a fresh session and report the
/// resulting allow-lists. With `server`, also prepares a connection.
pub fn tls_profile(settings: &TlsSettings, server: Option<&str>) -> anyhow::Result<String> {
    let context = TlsContext::with_settings(settings).context("failed to create TLS context")?;
    let mut session = context.new_session();
    apply_profile(&mut session)?;

    let mut report = String::new();
    report.push_str(&format!("protocols: {}\n", session.enabled_protocols().join(", ")));
    report.push_str(&format!(
        "cipher suites: {}\n",
        session.enabled_cipher_suites().join(", ")
    ));

    if let Some(server) = server {
        session
            .into_connection(server)
            .with_context(|| format!("failed to prepare connection to {}", server))?;
        report.push_str(&format!("connection to {} prepared\n", server));
    }

    Ok(report)
}

/// Write the current settings to disk, creating the file if needed
pub async fn init_config(manager: &SettingsManager) -> anyhow::Result<()> {
    manager.save().await.context("failed to save settings")?;
    info!("Settings written");
    Ok(())
}
