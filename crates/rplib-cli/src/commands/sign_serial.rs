//! Sign-serial command implementation.

use crate::model::{gpg_generator, load_model};
use log::debug;
use rplib_core::{sign_serial, Config, HardwareSerial, VaultClient};
use std::path::Path;

pub fn run(
    model: String,
    target: String,
    vault_server: String,
    api_key: Option<String>,
    config: Option<String>,
    gpg: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(&model)?;

    // An explicit --api-key wins over the config file
    let api_key = match (api_key, config) {
        (Some(key), _) => Some(key),
        (None, Some(path)) => {
            let config = Config::load(&path)?;
            debug!("using recovery.sign-api-key from {}", path);
            Some(config.recovery.sign_api_key)
        }
        (None, None) => None,
    };

    let vault = VaultClient::new(&vault_server, api_key)?;
    let signed = sign_serial(
        &model,
        Path::new(&target),
        &vault,
        &gpg_generator(gpg),
        &HardwareSerial::default(),
    )?;

    println!("Signed serial assertion written to {}", signed.display());
    Ok(())
}
