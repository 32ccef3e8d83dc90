//! Hardware serial collection.

use log::{debug, info};
use std::path::PathBuf;
use thiserror::Error;

/// SMBIOS product serial exposed by the kernel.
pub const SMBIOS_SERIAL: &str = "/sys/class/dmi/id/product_serial";

/// CPU info table; carries a `Serial` line on ARM boards such as the Pi 3.
pub const CPUINFO: &str = "/proc/cpuinfo";

/// Errors from reading the hardware serial.
#[derive(Error, Debug)]
pub enum SerialError {
    /// Neither source exposes a serial number.
    #[error("serial number not found in {0}")]
    NotFound(PathBuf),
    /// The fallback source could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Source of the hardware serial identifier.
pub trait SerialSource {
    /// Returns the raw hardware serial, without uniqueness suffix.
    fn hardware_serial(&self) -> Result<String, SerialError>;
}

/// Reads the serial from SMBIOS, falling back to the CPU info table.
#[derive(Debug, Clone)]
pub struct HardwareSerial {
    /// Primary source, read up to the first line break.
    pub smbios_path: PathBuf,
    /// Fallback source, scanned for a `Serial` line.
    pub cpuinfo_path: PathBuf,
}

impl Default for HardwareSerial {
    fn default() -> Self {
        Self {
            smbios_path: PathBuf::from(SMBIOS_SERIAL),
            cpuinfo_path: PathBuf::from(CPUINFO),
        }
    }
}

impl SerialSource for HardwareSerial {
    fn hardware_serial(&self) -> Result<String, SerialError> {
        match std::fs::read(&self.smbios_path) {
            Ok(content) => {
                let content = String::from_utf8_lossy(&content);
                let serial = content.split('\n').next().unwrap_or_default().to_string();
                info!("Serial in {}: {serial}", self.smbios_path.display());
                Ok(serial)
            }
            Err(e) => {
                debug!(
                    "{} unavailable ({e}), scanning {}",
                    self.smbios_path.display(),
                    self.cpuinfo_path.display()
                );
                let cpuinfo = std::fs::read_to_string(&self.cpuinfo_path).map_err(|source| {
                    SerialError::Io {
                        path: self.cpuinfo_path.clone(),
                        source,
                    }
                })?;
                let serial = cpuinfo_serial(&cpuinfo)
                    .ok_or_else(|| SerialError::NotFound(self.cpuinfo_path.clone()))?;
                info!("Serial in cpuinfo: {serial}");
                Ok(serial)
            }
        }
    }
}

/// Extracts the value of the first `Serial` line (`Serial : <value>`).
pub fn cpuinfo_serial(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|line| line.contains("Serial"))
        .and_then(|line| line.split_once(": "))
        .map(|(_, value)| value.trim().to_string())
}
