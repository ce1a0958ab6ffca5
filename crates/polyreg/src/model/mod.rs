//! Data model types for the registry.
//!
//! This module contains:
//! - Type keys and value shapes
//! - The `Polymorphic` capability and the `AbstractValue` wrapper

pub mod key;
pub mod polymorphic;

pub use key::{Shape, TypeKey};
pub use polymorphic::{AbstractValue, Polymorphic};
