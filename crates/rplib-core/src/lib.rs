//! Provisioning support for recovery images.
//!
//! This crate provides:
//! - The YAML build configuration and the image builder command line
//! - A logged command runner for external tools
//! - Device key provisioning through `gpg`
//! - Hardware serial collection (SMBIOS, with a `/proc/cpuinfo` fallback)
//! - The serial vault signing client
//! - The end-to-end serial assertion workflow
//!
//! Every stage returns a typed error; nothing here terminates the process.
//! The workflow is strictly sequential and creates all key material fresh
//! inside a per-invocation target folder.

#![deny(missing_docs)]

/// Build configuration loaded from YAML.
pub mod config;
/// Error types for the provisioning workflow.
pub mod errors;
/// File helpers applying explicit permission modes.
pub mod fsutil;
/// Hardware serial collection.
pub mod hardware;
/// Device key pair provisioning.
pub mod keygen;
/// External command runner.
pub mod shell;
/// Serial vault signing client.
pub mod vault;
/// Serial assertion generation and signing workflow.
pub mod workflow;

pub use config::{Config, ConfigError};
pub use errors::ProvisionError;
pub use hardware::{HardwareSerial, SerialError, SerialSource};
pub use keygen::{provision_key, DeviceKey, GpgKeyGenerator, KeyGenerator, KeygenError};
pub use shell::ShellError;
pub use vault::{VaultClient, VaultError};
pub use workflow::{generate_unsigned, sign_serial, SERIAL_SIGNED, SERIAL_UNSIGNED};
