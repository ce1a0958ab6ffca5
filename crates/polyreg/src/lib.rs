//! polyreg: polymorphic type registry and tagged JSON envelopes.
//!
//! This crate lets code serialize values it only knows through a trait object
//! and get the exact concrete type back on decode.
//!
//! # Overview
//!
//! - **Registry**: every concrete type that may cross the boundary is
//!   registered once, at startup, under a stable [`TypeKey`]
//! - **Shapes**: a type registered by reference decodes by reference, a type
//!   registered by value decodes by value
//! - **Envelopes**: values travel as `{"Type": <key>, "Value": <payload>}`,
//!   either as a whole document or as a field inside a larger one
//!
//! # Quick Start
//!
//! ```rust
//! use polyreg::{AbstractValue, Registry, Shape, decode, encode, verify_round_trip};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
//! struct Alpha {
//!     #[serde(rename = "X")]
//!     x: i64,
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_named::<Alpha>("pkg", "Alpha", Shape::ByValue);
//!
//! let value = AbstractValue::by_value(Alpha { x: 5 });
//! let bytes = encode(&registry, &value).unwrap();
//! assert_eq!(bytes, br#"{"Type":"pkg/Alpha","Value":{"X":5}}"#);
//!
//! let decoded = decode(&registry, &bytes).unwrap();
//! assert_eq!(decoded, value);
//! assert!(verify_round_trip(&registry, &value).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`model`]: Type keys, shapes, the `Polymorphic` capability
//! - [`registry`]: The type registry and its builder
//! - [`codec`]: Envelope encoding/decoding, standalone or nested in other
//!   `serde` documents
//! - [`verify`]: Round-trip self checks
//! - [`util`]: Range partitioning and dimension checks
//! - [`error`]: Error types
//! - [`limits`]: Format constants and default limits
//!
//! # Errors
//!
//! Registering a key twice is a programming error and panics. Everything
//! else (unknown types, malformed payloads, size limits, round-trip
//! mismatches) is reported through `Result`.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod registry;
pub mod util;
pub mod verify;

// Re-export commonly used types at crate root
pub use codec::{
    decode, decode_with_options, encode, encode_with_options, peek_type, DecodeOptions, Deferred,
    EncodeOptions, Tagged, TaggedSeed,
};
pub use error::{
    DecodeError, DimensionError, EncodeError, NotInPackage, NotRegistered, UnmarshalMismatch,
    VerifyError,
};
pub use model::{AbstractValue, Polymorphic, Shape, TypeKey};
pub use registry::{Registry, RegistryBuilder};
pub use verify::verify_round_trip;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
