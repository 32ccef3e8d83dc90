//! Model assertion loading shared by the serial commands.

use rplib_assert::ModelAssertion;
use rplib_core::GpgKeyGenerator;

/// Reads and parses a model assertion file.
pub fn load_model(path: &str) -> Result<ModelAssertion, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read model assertion {}: {}", path, e))?;
    Ok(ModelAssertion::parse(&text)?)
}

/// Key generator running the given gpg program.
pub fn gpg_generator(program: String) -> GpgKeyGenerator {
    GpgKeyGenerator {
        program,
        ..GpgKeyGenerator::default()
    }
}
