//! rplib CLI - recovery image provisioning and serial assertion signing.

use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod model;

use commands::{build_image, check_config, sign_serial, unsigned_serial};

#[derive(Parser)]
#[command(name = "rplib")]
#[command(about = "Recovery image provisioning and serial assertion signing")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a device key and serial assertion, then have the vault sign it
    SignSerial {
        /// Path to the signed model assertion
        #[arg(long)]
        model: String,
        /// Target folder for key storage and assertion files (must not hold keys yet)
        #[arg(long)]
        target: String,
        /// Serial vault base URL; requests go to <URL>/serial
        #[arg(long)]
        vault_server: String,
        /// Vault API key (default: recovery.sign-api-key from --config)
        #[arg(long)]
        api_key: Option<String>,
        /// Build configuration supplying the API key
        #[arg(long)]
        config: Option<String>,
        /// gpg program used for key generation
        #[arg(long, default_value = "gpg")]
        gpg: String,
    },
    /// Generate a device key and the unsigned serial assertion only
    UnsignedSerial {
        /// Path to the signed model assertion
        #[arg(long)]
        model: String,
        /// Target folder for key storage and assertion files (must not hold keys yet)
        #[arg(long)]
        target: String,
        /// gpg program used for key generation
        #[arg(long, default_value = "gpg")]
        gpg: String,
    },
    /// Load and validate a build configuration, printing the result
    CheckConfig {
        /// Path to the YAML configuration
        config: String,
    },
    /// Run the image builder described by a build configuration
    BuildImage {
        /// Path to the YAML configuration
        #[arg(long)]
        config: String,
        /// Print the builder command line instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::SignSerial {
            model,
            target,
            vault_server,
            api_key,
            config,
            gpg,
        } => sign_serial::run(model, target, vault_server, api_key, config, gpg),
        Commands::UnsignedSerial { model, target, gpg } => {
            unsigned_serial::run(model, target, gpg)
        }
        Commands::CheckConfig { config } => check_config::run(config),
        Commands::BuildImage { config, dry_run } => build_image::run(config, dry_run),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
