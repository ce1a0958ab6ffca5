//! Builder API for ergonomic registry construction.
//!
//! # Example
//!
//! ```rust
//! use polyreg::{Registry, Shape};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
//! struct Squared;
//!
//! #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
//! struct Huber {
//!     delta: f64,
//! }
//!
//! let registry = Registry::builder()
//!     .value::<Squared>()
//!     .named::<Huber>("loss", "Huber", Shape::ByReference)
//!     .build();
//!
//! assert!(registry.contains("loss/Huber*"));
//! ```

use crate::model::{Polymorphic, Shape};
use crate::registry::Registry;

/// Builder collecting registrations into a [`Registry`].
///
/// Each method panics on a duplicate, exactly like the `Registry` methods
/// it wraps.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` by value under its derived key.
    pub fn value<T: Polymorphic + Default>(mut self) -> Self {
        self.registry.register::<T>(Shape::ByValue);
        self
    }

    /// Registers `T` by reference under its derived key.
    pub fn reference<T: Polymorphic + Default>(mut self) -> Self {
        self.registry.register::<T>(Shape::ByReference);
        self
    }

    /// Registers `T` under an explicit namespace and name.
    pub fn named<T: Polymorphic + Default>(mut self, namespace: &str, name: &str, shape: Shape) -> Self {
        self.registry.register_named::<T>(namespace, name, shape);
        self
    }

    /// Registers `T` with a zero-value factory.
    pub fn factory<T, F>(mut self, namespace: &str, name: &str, shape: Shape, factory: F) -> Self
    where
        T: Polymorphic,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry.register_factory(namespace, name, shape, factory);
        self
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}
