//! Unsigned serial assertion layout.
//!
//! The vault parses this text positionally, so field order and labels are
//! fixed. The body repeats the device key.

use crate::errors::AssertError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Assertion type name of serial assertions.
pub const SERIAL_TYPE: &str = "serial";

/// UTC timestamp layout used in the `timestamp` header.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Renders the unsigned serial assertion text.
pub fn format_serial(
    authority: &str,
    key: &str,
    brand: &str,
    model: &str,
    revision: &str,
    serial: &str,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        "type: {SERIAL_TYPE}\n\
         authority-id: {authority}\n\
         device-key: {key}\n\
         brand-id: {brand}\n\
         model: {model}\n\
         revision: {revision}\n\
         serial: {serial}\n\
         timestamp: {}\n\
         \n\
         {key}\n",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Builds the device serial: hardware serial plus a random v4 UUID.
///
/// The suffix keeps serials unique when the hardware serial is blank or
/// shared by a batch of re-flashed units.
pub fn device_serial(hardware_serial: &str) -> String {
    format!("{hardware_serial}-{}", Uuid::new_v4())
}

/// Fields of an unsigned serial assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialAssertion {
    /// Authority that signs the assertion (from the model assertion).
    pub authority_id: String,
    /// Encoded device public key; also used as the body.
    pub device_key: String,
    /// Brand of the device.
    pub brand_id: String,
    /// Model name.
    pub model: String,
    /// Model revision.
    pub revision: String,
    /// Device serial, see [`device_serial`].
    pub serial: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl SerialAssertion {
    /// Checks that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AssertError::MissingField`] naming the first empty field.
    pub fn validate(&self) -> Result<(), AssertError> {
        let fields = [
            ("authority-id", &self.authority_id),
            ("device-key", &self.device_key),
            ("brand-id", &self.brand_id),
            ("model", &self.model),
            ("revision", &self.revision),
            ("serial", &self.serial),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(AssertError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Renders the assertion text, see [`format_serial`].
    pub fn render(&self) -> String {
        format_serial(
            &self.authority_id,
            &self.device_key,
            &self.brand_id,
            &self.model,
            &self.revision,
            &self.serial,
            self.timestamp,
        )
    }
}
