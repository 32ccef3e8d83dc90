//! Unsigned-serial command implementation.

use crate::model::{gpg_generator, load_model};
use rplib_core::{generate_unsigned, HardwareSerial, SERIAL_UNSIGNED};
use std::path::Path;

pub fn run(model: String, target: String, gpg: String) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(&model)?;
    let target = Path::new(&target);

    generate_unsigned(&model, target, &gpg_generator(gpg), &HardwareSerial::default())?;

    println!(
        "Unsigned serial assertion written to {}",
        target.join(SERIAL_UNSIGNED).display()
    );
    Ok(())
}
