//! Error types for registry lookups, envelope encoding/decoding and verification.

use thiserror::Error;

use crate::model::TypeKey;

/// A type key that has no entry in the registry.
///
/// Returned by lookups, and wrapped by [`EncodeError`] and [`DecodeError`]
/// when the codec meets a type it cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type {type_key} not registered")]
pub struct NotRegistered {
    pub type_key: TypeKey,
}

impl NotRegistered {
    pub(crate) fn new(type_key: impl Into<TypeKey>) -> Self {
        Self { type_key: type_key.into() }
    }
}

/// A value whose type belongs to no package known to the caller.
///
/// For dependent crates whose own encoders or decoders only handle a fixed
/// set of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("type is not in this package")]
pub struct NotInPackage;

/// A hand-written decoder read a different tag than the one it handles.
///
/// Typical for unit-like types encoded as their name, where the name read
/// back must equal the one expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unmarshal string mismatch. expected: {expected}, received: {received}")]
pub struct UnmarshalMismatch {
    pub expected: String,
    pub received: String,
}

impl UnmarshalMismatch {
    pub fn new(expected: impl Into<String>, received: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            received: received.into(),
        }
    }
}

/// Error during envelope encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    NotRegistered(#[from] NotRegistered),

    #[error("envelope length {len} exceeds maximum {max}")]
    LengthExceedsLimit { len: usize, max: usize },

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error during envelope decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("envelope length {len} exceeds maximum {max}")]
    LengthExceedsLimit { len: usize, max: usize },

    #[error("error decoding envelope: {0}")]
    UnresolvedType(#[source] NotRegistered),

    /// Structural failure reported by `serde_json`, passed through as-is.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Returns the unresolved type key, if this is an unknown-type error.
    pub fn unresolved_type(&self) -> Option<&TypeKey> {
        match self {
            DecodeError::UnresolvedType(e) => Some(&e.type_key),
            _ => None,
        }
    }
}

/// Error from a round-trip self check.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("round trip encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("round trip decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("decoded {type_key} does not match the original value")]
    DoesNotMatch { type_key: TypeKey },
}

/// Dimension errors for row-oriented numeric inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("length mismatch. inputs: {input}, outputs: {output}, weights: {weight}")]
    DataMismatch {
        input: usize,
        output: usize,
        weight: usize,
    },

    #[error("inputs do not all have the same length")]
    InputLengths,

    #[error("outputs do not all have the same length")]
    OutputLengths,

    #[error("no input data")]
    NoData,
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Deserializer};

    use super::*;

    /// Unit-like type encoded as its name.
    #[derive(Debug, PartialEq)]
    struct Tanh;

    impl<'de> Deserialize<'de> for Tanh {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let name = String::deserialize(deserializer)?;
            if name != "Tanh" {
                return Err(serde::de::Error::custom(UnmarshalMismatch::new("Tanh", name)));
            }
            Ok(Tanh)
        }
    }

    #[test]
    fn test_unmarshal_mismatch() {
        assert_eq!(serde_json::from_str::<Tanh>(r#""Tanh""#).unwrap(), Tanh);

        let err = serde_json::from_str::<Tanh>(r#""Sigmoid""#).unwrap_err();
        assert!(err
            .to_string()
            .contains("unmarshal string mismatch. expected: Tanh, received: Sigmoid"));

        let e = UnmarshalMismatch::new("Tanh", "Relu");
        assert_eq!(e.expected, "Tanh");
        assert_eq!(e.received, "Relu");
    }

    #[test]
    fn test_not_in_package() {
        fn classify(name: &str) -> Result<u8, NotInPackage> {
            match name {
                "Linear" => Ok(0),
                "Tanh" => Ok(1),
                _ => Err(NotInPackage),
            }
        }

        assert_eq!(classify("Tanh"), Ok(1));
        assert_eq!(classify("Softmax"), Err(NotInPackage));
        assert_eq!(NotInPackage.to_string(), "type is not in this package");
    }

    #[test]
    fn test_not_registered_display() {
        let e = NotRegistered::new("pkg/Gamma");
        assert_eq!(e.to_string(), "type pkg/Gamma not registered");
        let d = DecodeError::UnresolvedType(e);
        assert_eq!(d.to_string(), "error decoding envelope: type pkg/Gamma not registered");
    }
}
