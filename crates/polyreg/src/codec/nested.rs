//! Envelopes embedded in larger `serde` documents.
//!
//! [`encode`](super::encode) and [`decode`](super::decode) work on whole byte
//! buffers. The adapters here let a polymorphic field sit inside any other
//! serializable structure, producing the same `{"Type", "Value"}` object at
//! that position:
//!
//! - [`Tagged`] serializes an [`AbstractValue`] against a registry
//! - [`TaggedSeed`] deserializes one through `DeserializeSeed`
//! - [`Deferred`] is a plain `Deserialize` field holding a parsed but not yet
//!   resolved envelope, for structures built with `#[derive(Deserialize)]`
//!
//! Payloads are kept as [`RawValue`], so deserialization only works through
//! `serde_json`.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::codec::envelope::{Envelope, decode_payload, present};
use crate::error::DecodeError;
use crate::model::{AbstractValue, TypeKey};
use crate::registry::Registry;

/// Serializes a value as an envelope wherever it appears.
///
/// ```rust
/// use polyreg::codec::Tagged;
/// use polyreg::{AbstractValue, Registry, Shape};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
/// struct Huber {
///     delta: f64,
/// }
///
/// #[derive(Serialize)]
/// struct Trainer<'a> {
///     epochs: u32,
///     loss: Tagged<'a>,
/// }
///
/// let registry = Registry::builder()
///     .named::<Huber>("loss", "Huber", Shape::ByValue)
///     .build();
/// let loss = AbstractValue::by_value(Huber { delta: 1.5 });
/// let trainer = Trainer { epochs: 3, loss: Tagged::new(&registry, &loss) };
///
/// let json = serde_json::to_string(&trainer).unwrap();
/// assert_eq!(json, r#"{"epochs":3,"loss":{"Type":"loss/Huber","Value":{"delta":1.5}}}"#);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Tagged<'a> {
    registry: &'a Registry,
    value: &'a AbstractValue,
}

impl<'a> Tagged<'a> {
    pub fn new(registry: &'a Registry, value: &'a AbstractValue) -> Self {
        Self { registry, value }
    }
}

impl Serialize for Tagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope::resolve(self.registry, self.value)
            .map_err(<S::Error as ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// Deserializes an envelope into an [`AbstractValue`] using a registry.
#[derive(Debug, Clone, Copy)]
pub struct TaggedSeed<'a> {
    registry: &'a Registry,
}

impl<'a> TaggedSeed<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl<'de> DeserializeSeed<'de> for TaggedSeed<'_> {
    type Value = AbstractValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<AbstractValue, D::Error> {
        Deferred::deserialize(deserializer)?
            .resolve(self.registry)
            .map_err(<D::Error as de::Error>::custom)
    }
}

/// An envelope read from a larger document but not yet resolved.
///
/// Only the shell is interpreted while the surrounding document is parsed;
/// [`Deferred::resolve`] runs the registry lookup and payload decode later.
#[derive(Deserialize)]
pub struct Deferred {
    #[serde(rename = "Type")]
    type_key: TypeKey,
    #[serde(rename = "Value", default, deserialize_with = "present")]
    value: Option<Box<RawValue>>,
}

impl Deferred {
    /// Key named by the envelope.
    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    /// Decodes the payload into the registered type.
    pub fn resolve(&self, registry: &Registry) -> Result<AbstractValue, DecodeError> {
        decode_payload(registry, self.type_key.as_str(), self.value.as_deref())
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("type_key", &self.type_key)
            .field("value", &self.value.as_ref().map(|v| v.get()))
            .finish()
    }
}
