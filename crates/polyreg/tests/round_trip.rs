//! Property tests for envelope round trips across a shared registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use polyreg::{
    decode, encode, peek_type, verify_round_trip, AbstractValue, DecodeError, Deferred, Registry,
    Shape, Tagged, TypeKey,
};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// Stand-in for a caller's abstract capability: loss functions.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct SquaredLoss;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct HuberLoss {
    delta: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Network {
    name: String,
    layers: Vec<Vec<f64>>,
    tags: BTreeMap<String, i32>,
    activation: Option<Activation>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
enum Activation {
    #[default]
    Linear,
    Tanh,
    LeakyRelu { slope: f64 },
}

/// A caller struct carrying a polymorphic field.
#[derive(Serialize)]
struct TrainerOut<'a> {
    epochs: u32,
    loss: Tagged<'a>,
}

#[derive(Deserialize)]
struct TrainerIn {
    epochs: u32,
    loss: Deferred,
}

fn registry() -> Registry {
    Registry::builder()
        .value::<SquaredLoss>()
        .reference::<SquaredLoss>()
        .value::<HuberLoss>()
        .reference::<Network>()
        .named::<Activation>("nnet", "Activation", Shape::ByValue)
        .build()
}

fn finite() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

fn activation() -> impl Strategy<Value = Activation> {
    prop_oneof![
        Just(Activation::Linear),
        Just(Activation::Tanh),
        finite().prop_map(|slope| Activation::LeakyRelu { slope }),
    ]
}

fn network() -> impl Strategy<Value = Network> {
    (
        ".{0,16}",
        prop::collection::vec(prop::collection::vec(finite(), 0..4), 0..4),
        prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..4),
        prop::option::of(activation()),
    )
        .prop_map(|(name, layers, tags, activation)| Network {
            name,
            layers,
            tags,
            activation,
        })
}

proptest! {
    #[test]
    fn huber_round_trips_by_value(delta in finite()) {
        let registry = registry();
        let value = AbstractValue::by_value(HuberLoss { delta });
        let decoded = decode(&registry, &encode(&registry, &value).unwrap()).unwrap();
        prop_assert_eq!(decoded.shape(), Shape::ByValue);
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn network_round_trips_by_reference(net in network()) {
        let registry = registry();
        let value = AbstractValue::by_reference(net.clone());
        let decoded = decode(&registry, &encode(&registry, &value).unwrap()).unwrap();
        let back: Arc<Network> = decoded.into_reference().unwrap();
        prop_assert_eq!(&*back, &net);
    }

    #[test]
    fn activation_verifies(act in activation()) {
        let registry = registry();
        prop_assert!(verify_round_trip(&registry, &AbstractValue::by_value(act)).is_ok());
    }

    #[test]
    fn nested_field_round_trips(delta in finite(), epochs in any::<u32>()) {
        let registry = registry();
        let loss = AbstractValue::by_value(HuberLoss { delta });
        let doc = serde_json::to_vec(&TrainerOut { epochs, loss: Tagged::new(&registry, &loss) }).unwrap();

        let back: TrainerIn = serde_json::from_slice(&doc).unwrap();
        prop_assert_eq!(back.epochs, epochs);
        prop_assert_eq!(back.loss.resolve(&registry).unwrap(), loss);
    }

    #[test]
    fn unknown_keys_are_rejected(name in "[A-Z][a-z]{0,8}") {
        let registry = registry();
        let input = format!(r#"{{"Type":"elsewhere/{name}","Value":null}}"#);
        let err = decode(&registry, input.as_bytes()).unwrap_err();
        prop_assert!(matches!(err, DecodeError::UnresolvedType(_)));
    }
}

#[test]
fn unit_type_both_shapes() {
    let registry = registry();

    let by_value = encode(&registry, &AbstractValue::by_value(SquaredLoss)).unwrap();
    let by_ref = encode(&registry, &AbstractValue::by_reference(SquaredLoss)).unwrap();

    let value_key = peek_type(&by_value).unwrap();
    let ref_key = peek_type(&by_ref).unwrap();
    assert_eq!(value_key, TypeKey::of::<SquaredLoss>(Shape::ByValue));
    assert_eq!(format!("{value_key}*"), ref_key.as_str());

    assert_eq!(decode(&registry, &by_value).unwrap().shape(), Shape::ByValue);
    assert_eq!(decode(&registry, &by_ref).unwrap().shape(), Shape::ByReference);
}

#[test]
fn mixed_values_in_one_document() {
    let registry = registry();
    let values = vec![
        AbstractValue::by_value(SquaredLoss),
        AbstractValue::by_value(HuberLoss { delta: 1.5 }),
        AbstractValue::by_value(Activation::LeakyRelu { slope: 0.01 }),
    ];

    let tagged: Vec<Tagged<'_>> = values.iter().map(|v| Tagged::new(&registry, v)).collect();
    let document = serde_json::to_vec(&tagged).unwrap();

    let parsed: Vec<Deferred> = serde_json::from_slice(&document).unwrap();
    let decoded: Vec<AbstractValue> = parsed
        .iter()
        .map(|d| d.resolve(&registry).unwrap())
        .collect();
    assert_eq!(decoded, values);
}

#[test]
fn shared_registry_across_threads() {
    let registry = Arc::new(registry());
    let fingerprint = registry.fingerprint();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let value = AbstractValue::by_value(HuberLoss { delta: i as f64 });
                verify_round_trip(&registry, &value).is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(registry.fingerprint(), fingerprint);
}
