//! Build-image command implementation.

use rplib_core::{shell, Config};

pub fn run(config: String, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&config)?;
    let args = config.udf_args();

    if dry_run {
        println!("{} {}", config.udf.binary, args.join(" "));
        return Ok(());
    }

    shell::run(&config.udf.binary, args.as_slice())
        .map_err(|e| format!("Image build failed: {}", e))?;
    println!("Image written to {}", config.configs.base_image);
    Ok(())
}
