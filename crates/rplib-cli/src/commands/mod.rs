//! Subcommand implementations.

pub mod build_image;
pub mod check_config;
pub mod sign_serial;
pub mod unsigned_serial;
