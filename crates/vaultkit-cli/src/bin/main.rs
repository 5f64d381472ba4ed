//! Vaultkit CLI - crypto support utilities for the Vaultkit client
//!
//! Generates random key material and identifiers, validates their hex
//! forms, and reports the TLS profile client sessions are pinned to.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use vaultkit_cli::{commands, Format};
use vaultkit_core::{SettingsManager, SystemRandom};

/// Vaultkit - secure random, format checks and TLS profile
#[derive(Parser, Debug)]
#[command(name = "vaultkit")]
#[command(author = "Vaultkit Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Vaultkit - crypto support utilities")]
struct Args {
    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, env = "VAULTKIT_CONFIG_DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print N random bytes as hex
    Random {
        /// Number of bytes
        bytes: usize,
    },
    /// Print a new 256-bit secret key as hex
    Key,
    /// Print a new 128-bit identifier as hex
    Uuid,
    /// Check a value's format; exits with status 1 when invalid
    Check {
        #[arg(value_enum)]
        format: FormatArg,
        value: String,
    },
    /// Apply the TLS profile to a fresh session and print it
    TlsProfile {
        /// Also prepare a client connection for this server name
        #[arg(long)]
        server: Option<String>,
    },
    /// Write the current settings to the config directory
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Hex,
    Key,
    Uuid,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Hex => Format::Hex,
            FormatArg::Key => Format::Key,
            FormatArg::Uuid => Format::Uuid,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config_dir = match args.config {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    let manager = SettingsManager::new(&config_dir);

    // RUST_LOG wins over the configured filter
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&manager.get().log_filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Using config directory {:?}", config_dir);

    // Fail early if there is no entropy
    let rng = SystemRandom::global()?;

    match args.command {
        Command::Random { bytes } => println!("{}", commands::random(rng, bytes)?),
        Command::Key => {
            let key = commands::key(rng)?;
            println!("{}", key.as_str());
        }
        Command::Uuid => println!("{}", commands::uuid(rng)?),
        Command::Check { format, value } => {
            let valid = commands::check(format.into(), &value);
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::TlsProfile { server } => {
            print!(
                "{}",
                commands::tls_profile(manager.get_tls(), server.as_deref())?
            );
        }
        Command::InitConfig => {
            commands::init_config(&manager).await?;
            println!("{}", config_dir.join("settings.json").display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
