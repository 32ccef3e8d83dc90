//! Recovery build configuration.
//!
//! Loaded once at startup and passed by reference to each stage. Keys follow
//! the established `config.yaml` layout (lowercase names, a few hyphenated).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating the build configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The YAML could not be parsed or rendered.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Required fields are empty or absent.
    #[error("required config fields not presented: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Snaps the image is assembled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapsConfig {
    /// Kernel snap.
    pub kernel: String,
    /// Core/OS snap.
    pub os: String,
    /// Gadget snap.
    pub gadget: String,
}

/// Image build parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfigs {
    /// Target architecture.
    pub arch: String,
    /// Output path of the base image.
    #[serde(rename = "baseimage")]
    pub base_image: String,
    /// Recovery partition type.
    #[serde(rename = "recoverytype")]
    pub recovery_type: String,
    /// Recovery partition size.
    #[serde(rename = "recoverysize")]
    pub recovery_size: String,
    /// Series release.
    pub release: String,
    /// Store ID.
    pub store: String,
    /// Device name.
    pub device: String,
    /// Snap channel.
    pub channel: String,
    /// Image size.
    pub size: String,
    /// Directory of OEM hooks run before install.
    #[serde(rename = "oem-preinst-hook-dir")]
    pub oem_preinst_hook_dir: String,
    /// Directory of OEM hooks run after install.
    #[serde(rename = "oem-postinst-hook-dir")]
    pub oem_postinst_hook_dir: String,
    /// Directory for OEM logs.
    #[serde(rename = "oemlogdir")]
    pub oem_log_dir: String,
    /// Extra snaps installed into the image.
    pub packages: Vec<String>,
}

/// Image builder invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdfConfig {
    /// Image builder binary.
    pub binary: String,
    /// Image builder subcommand.
    pub command: String,
}

/// Development switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Build a developer-mode image.
    pub devmode: bool,
    /// Enable ssh in the image.
    pub ssh: bool,
    /// Compress the output with xz.
    pub xz: bool,
}

/// Recovery partition layout and serial signing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// One of `field_transition`, `factory_install`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Filesystem label of the recovery partition.
    #[serde(rename = "filesystem-label")]
    pub fs_label: String,
    /// Filesystem label used during field transition.
    #[serde(rename = "transitionfslabel")]
    pub transition_fs_label: String,
    /// Boot partition label.
    #[serde(rename = "boot-partition")]
    pub boot_part: String,
    /// System-boot partition label.
    #[serde(rename = "systemboot-partition")]
    pub systemboot_part: String,
    /// Writable partition label.
    #[serde(rename = "writable-partition")]
    pub writable_part: String,
    /// Boot partition image.
    #[serde(rename = "boot-image")]
    pub boot_image: String,
    /// System-boot partition image.
    #[serde(rename = "systemboot-image")]
    pub systemboot_image: String,
    /// Writable partition image.
    #[serde(rename = "writable-image")]
    pub writable_image: String,
    /// Whether to sign a serial assertion during recovery.
    #[serde(rename = "sign-serial")]
    pub sign_serial: bool,
    /// API key sent to the serial vault.
    #[serde(rename = "sign-api-key")]
    pub sign_api_key: String,
    /// Skip checking the factory diagnostics result.
    #[serde(rename = "skip-factory-diag-result")]
    pub skip_factory_diag_result: String,
}

/// Complete recovery build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name.
    pub project: String,
    /// Snaps section.
    pub snaps: SnapsConfig,
    /// Image build section.
    pub configs: ImageConfigs,
    /// Image builder section.
    pub udf: UdfConfig,
    /// Debug section.
    pub debug: DebugOptions,
    /// Recovery section.
    pub recovery: RecoveryConfig,
}

impl Config {
    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid YAML,
    /// or lacks required fields.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading config file {} ...", path.display());
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses YAML without validating.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Renders the config back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Names of required fields that are empty, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("project", &self.project),
            ("snaps -> kernel", &self.snaps.kernel),
            ("snaps -> os", &self.snaps.os),
            ("snaps -> gadget", &self.snaps.gadget),
            ("configs -> baseimage", &self.configs.base_image),
            ("configs -> recoverytype", &self.configs.recovery_type),
            ("configs -> recoverysize", &self.configs.recovery_size),
            ("configs -> release", &self.configs.release),
            ("configs -> channel", &self.configs.channel),
            ("configs -> size", &self.configs.size),
            ("udf -> binary", &self.udf.binary),
            ("udf -> command", &self.udf.command),
            ("recovery -> filesystem-label", &self.recovery.fs_label),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFields`] listing all missing fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("check configs ...");
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        for field in &missing {
            warn!("'{field}' field not presented");
        }
        Err(ConfigError::MissingFields(missing))
    }

    /// Arguments for the image builder (`udf.binary`).
    pub fn udf_args(&self) -> Vec<String> {
        let mut args = vec![
            self.udf.command.clone(),
            self.configs.release.clone(),
            "--channel".to_string(),
            self.configs.channel.clone(),
            "--output".to_string(),
            self.configs.base_image.clone(),
            "--size".to_string(),
            self.configs.size.clone(),
            "--kernel".to_string(),
            self.snaps.kernel.clone(),
            "--os".to_string(),
            self.snaps.os.clone(),
            "--gadget".to_string(),
            self.snaps.gadget.clone(),
        ];
        if self.debug.devmode {
            args.push("--developer-mode".to_string());
        }
        if self.debug.ssh {
            args.push("--enable-ssh".to_string());
        }
        if !self.configs.store.is_empty() {
            args.push("--store".to_string());
            args.push(self.configs.store.clone());
        }
        if !self.configs.device.is_empty() {
            args.push("--device".to_string());
            args.push(self.configs.device.clone());
        }
        for snap in &self.configs.packages {
            args.push(format!("--install={snap}"));
        }
        args
    }
}
