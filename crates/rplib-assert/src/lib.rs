//! Assertion text formats used when provisioning device serials.
//!
//! This crate provides:
//! - Header lookup over a pre-existing, already signed model assertion
//! - Encoding of an exported OpenPGP public key into the `device-key` form
//! - The unsigned serial assertion layout understood by the serial vault
//!
//! Nothing here touches the filesystem, spawns processes or talks to the
//! network; those stages live in `rplib-core`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use rplib_assert::{ModelAssertion, SerialAssertion};
//!
//! let model = ModelAssertion::parse(
//!     "type: model\nauthority-id: canonical\nbrand-id: canonical\nmodel: pc\nseries: 16\n\nsig\n",
//! )?;
//!
//! let assertion = SerialAssertion {
//!     authority_id: model.authority_id()?.to_string(),
//!     device_key: "openpgp AAAA".to_string(),
//!     brand_id: model.brand_id()?.to_string(),
//!     model: model.model()?.to_string(),
//!     revision: model.revision().to_string(),
//!     serial: "ABC123-00000000-0000-0000-0000-000000000000".to_string(),
//!     timestamp: Utc.with_ymd_and_hms(2017, 1, 2, 3, 4, 5).unwrap(),
//! };
//! assertion.validate()?;
//! assert!(assertion.render().starts_with("type: serial\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for assertion parsing and construction.
pub mod errors;
/// Read-only model assertion header view.
pub mod model;
/// OpenPGP packet framing and public key encoding.
pub mod openpgp;
/// Unsigned serial assertion layout.
pub mod serial;

pub use errors::{AssertError, PacketError};
pub use model::{ModelAssertion, MODEL_TYPE};
pub use openpgp::{encode_keyring_key, encode_public_key, find_primary_key, parse_packets, Packet};
pub use serial::{device_serial, format_serial, SerialAssertion, SERIAL_TYPE, TIMESTAMP_FORMAT};
