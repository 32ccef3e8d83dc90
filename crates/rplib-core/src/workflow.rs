//! Serial assertion generation and signing.
//!
//! Stages run strictly in order: model headers, device key, hardware serial,
//! unsigned text, vault signature. The first error aborts the run.

use crate::errors::ProvisionError;
use crate::fsutil;
use crate::hardware::SerialSource;
use crate::keygen::{provision_key, KeyGenerator};
use crate::vault::VaultClient;
use chrono::Utc;
use log::info;
use rplib_assert::{device_serial, ModelAssertion, SerialAssertion};
use std::path::{Path, PathBuf};

/// Unsigned serial assertion written into the target folder.
pub const SERIAL_UNSIGNED: &str = "serialUnsigned.txt";

/// Signed serial assertion written into the target folder.
pub const SERIAL_SIGNED: &str = "serial.txt";

/// Generates the unsigned serial assertion and writes it to
/// `<target>/serialUnsigned.txt`.
///
/// # Errors
///
/// Fails before creating key material if a required model header is
/// missing, and fails without touching anything if `target` already holds
/// key storage.
pub fn generate_unsigned(
    model: &ModelAssertion,
    target: &Path,
    keygen: &dyn KeyGenerator,
    serials: &dyn SerialSource,
) -> Result<String, ProvisionError> {
    let authority = model.authority_id()?;
    info!("authority: {authority}");
    let brand = model.brand_id()?;
    info!("brand: {brand}");
    let model_name = model.model()?;
    info!("model: {model_name}");
    let revision = model.revision();
    info!("revision: {revision}");

    let key = provision_key(target, keygen)?;
    let serial = device_serial(&serials.hardware_serial()?);
    info!("serial: {serial}");

    let assertion = SerialAssertion {
        authority_id: authority.to_string(),
        device_key: key.encoded,
        brand_id: brand.to_string(),
        model: model_name.to_string(),
        revision: revision.to_string(),
        serial,
        timestamp: Utc::now(),
    };
    assertion.validate()?;

    let text = assertion.render();
    fsutil::write_file(&target.join(SERIAL_UNSIGNED), text.as_bytes(), 0o644)?;
    Ok(text)
}

/// Generates the serial assertion, has the vault sign it, and writes the
/// signed bytes to `<target>/serial.txt` (0600).
///
/// Returns the path of the signed assertion. A rejection leaves no
/// `serial.txt` behind.
pub fn sign_serial(
    model: &ModelAssertion,
    target: &Path,
    vault: &VaultClient,
    keygen: &dyn KeyGenerator,
    serials: &dyn SerialSource,
) -> Result<PathBuf, ProvisionError> {
    let unsigned = generate_unsigned(model, target, keygen, serials)?;
    let signed = vault.sign(&unsigned)?;

    let signed_path = target.join(SERIAL_SIGNED);
    fsutil::write_file(&signed_path, &signed, 0o600)?;
    info!("Sign serial assertion successfully!");
    Ok(signed_path)
}
