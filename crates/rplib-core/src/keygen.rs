//! Device key pair provisioning.
//!
//! Each target folder gets exactly one key pair. Re-running against a folder
//! that already holds key storage is an operator error, never a resume.

use crate::fsutil;
use crate::shell::{self, ShellError};
use log::info;
use rplib_assert::{encode_keyring_key, PacketError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key length in bits.
pub const KEY_LENGTH: u32 = 4096;

/// User ID name of the device key.
pub const KEY_ID: &str = "SERIAL";

/// Key storage directory inside the target folder.
pub const KEY_DIR: &str = ".gnupg";

/// Batch script file written into key storage.
pub const GEN_KEY_SCRIPT: &str = "gen-key-script";

/// Errors from provisioning the device key.
#[derive(Error, Debug)]
pub enum KeygenError {
    /// Key storage already exists in the target folder.
    #[error("key storage {0} already exists")]
    KeyStorageExists(PathBuf),
    /// Creating directories or the batch script failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The key generation tool failed.
    #[error(transparent)]
    Tool(#[from] ShellError),
    /// The exported public key could not be encoded.
    #[error("cannot encode public key: {0}")]
    Encoding(#[from] PacketError),
}

/// Generates a key pair inside a key storage directory.
pub trait KeyGenerator {
    /// User ID name the generated key carries.
    fn key_name(&self) -> &str {
        KEY_ID
    }

    /// Generates the key pair in `key_dir` and returns the exported public
    /// key as a binary OpenPGP stream.
    fn generate(&self, key_dir: &Path) -> Result<Vec<u8>, KeygenError>;
}

/// Batch parameters for unattended `gpg --gen-key`.
pub fn batch_script(bits: u32, name: &str) -> String {
    format!("Key-Type: 1\nKey-Length: {bits}\nName-Real: {name}\n%no-protection\n%commit\n")
}

/// Key generation through the `gpg` command-line tool.
#[derive(Debug, Clone)]
pub struct GpgKeyGenerator {
    /// `gpg` program to run.
    pub program: String,
    /// Key length in bits.
    pub bits: u32,
    /// User ID name.
    pub name: String,
}

impl Default for GpgKeyGenerator {
    fn default() -> Self {
        Self {
            program: "gpg".to_string(),
            bits: KEY_LENGTH,
            name: KEY_ID.to_string(),
        }
    }
}

impl KeyGenerator for GpgKeyGenerator {
    fn key_name(&self) -> &str {
        &self.name
    }

    fn generate(&self, key_dir: &Path) -> Result<Vec<u8>, KeygenError> {
        let script = key_dir.join(GEN_KEY_SCRIPT);
        fsutil::write_file(&script, batch_script(self.bits, &self.name).as_bytes(), 0o600)?;

        let homedir = format!("--homedir={}", key_dir.display());
        let script = script.to_string_lossy().into_owned();
        shell::run(
            &self.program,
            &[homedir.as_str(), "--batch", "--gen-key", script.as_str()],
        )?;
        Ok(shell::output_bytes(
            &self.program,
            &[homedir.as_str(), "--export", self.name.as_str()],
        )?)
    }
}

/// A provisioned device key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceKey {
    /// Key storage directory holding the key pair.
    pub key_dir: PathBuf,
    /// Public key in `device-key` form, single line.
    pub encoded: String,
}

/// Creates key storage in `target` and generates the device key there.
///
/// The target folder is created (0755) if absent; key storage is created
/// with 0700.
///
/// # Errors
///
/// Returns [`KeygenError::KeyStorageExists`] without touching anything if
/// key storage is already present.
pub fn provision_key(target: &Path, generator: &dyn KeyGenerator) -> Result<DeviceKey, KeygenError> {
    info!("targetFolder: {}", target.display());
    fsutil::create_dir_all(target, 0o755)?;

    let key_dir = target.join(KEY_DIR);
    if key_dir.exists() {
        return Err(KeygenError::KeyStorageExists(key_dir));
    }
    fsutil::create_dir(&key_dir, 0o700).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => KeygenError::KeyStorageExists(key_dir.clone()),
        _ => KeygenError::Io(e),
    })?;

    let exported = generator.generate(&key_dir)?;
    let encoded = encode_keyring_key(&exported, generator.key_name())?;
    info!("device key: {encoded}");

    Ok(DeviceKey { key_dir, encoded })
}
