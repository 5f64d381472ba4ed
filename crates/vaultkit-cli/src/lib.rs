//! # vaultkit-cli
//!
//! Operator commands over vaultkit-core and vaultkit-tls: random material
//! generation, format checks and a TLS profile report.

pub mod commands;

pub use commands::Format;
