//! Round-trip self checks for registered types.
//!
//! Intended for tests: every registered type can certify that it survives an
//! encode/decode cycle unchanged.

use crate::codec::{decode, encode};
use crate::error::{EncodeError, VerifyError};
use crate::model::AbstractValue;
use crate::registry::Registry;

/// Encodes and decodes `value`, then compares the result with the original.
///
/// Returns [`VerifyError::DoesNotMatch`] when the decoded value differs in
/// content or shape.
pub fn verify_round_trip(registry: &Registry, value: &AbstractValue) -> Result<(), VerifyError> {
    let bytes = encode(registry, value)?;
    let decoded = decode(registry, &bytes)?;
    if decoded != *value {
        let type_key = registry.key_of(value).map_err(EncodeError::from)?;
        return Err(VerifyError::DoesNotMatch {
            type_key: type_key.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::model::Shape;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Alpha {
        #[serde(rename = "X")]
        x: i64,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Layer {
        weights: Vec<f64>,
        labels: BTreeMap<String, u32>,
        bias: Option<f64>,
    }

    /// Loses `cache` on the way through.
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Lossy {
        kept: i32,
        #[serde(skip)]
        cache: i32,
    }

    #[test]
    fn test_verify_value() {
        let registry = Registry::builder()
            .named::<Alpha>("pkg", "Alpha", Shape::ByValue)
            .build();
        verify_round_trip(&registry, &AbstractValue::by_value(Alpha { x: 5 })).unwrap();
    }

    #[test]
    fn test_verify_nested_reference() {
        let registry = Registry::builder().reference::<Layer>().build();
        let layer = Layer {
            weights: vec![0.5, -1.25, 3.0],
            labels: BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
            bias: Some(0.1),
        };
        verify_round_trip(&registry, &AbstractValue::by_reference(layer)).unwrap();
    }

    #[test]
    fn test_verify_detects_dropped_field() {
        let registry = Registry::builder().value::<Lossy>().build();
        let value = AbstractValue::by_value(Lossy { kept: 1, cache: 7 });
        let err = verify_round_trip(&registry, &value).unwrap_err();
        assert!(matches!(err, VerifyError::DoesNotMatch { type_key } if type_key.base().ends_with("/Lossy")));

        // Without the lossy field the round trip holds
        verify_round_trip(&registry, &AbstractValue::by_value(Lossy { kept: 1, cache: 0 })).unwrap();
    }

    #[test]
    fn test_verify_unregistered() {
        let registry = Registry::new();
        let err = verify_round_trip(&registry, &AbstractValue::by_value(Alpha { x: 1 })).unwrap_err();
        assert!(matches!(err, VerifyError::Encode(EncodeError::NotRegistered(_))));
    }
}
