//! Check-config command implementation.

use rplib_core::Config;

pub fn run(config: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&config)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
