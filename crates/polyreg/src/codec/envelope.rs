//! Envelope encoding/decoding.
//!
//! An envelope is a JSON object with exactly two fields:
//!
//! ```text
//! {"Type": "<type key>", "Value": <native JSON of the concrete value>}
//! ```
//!
//! Decoding is two-phase. The shell is parsed first with `Value` kept as an
//! uninterpreted raw segment; the payload is only decoded once `Type` has been
//! resolved to a concrete type through the registry. A missing `Value` is
//! only reported once `Type` is known to be registered.

use std::borrow::Cow;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, trace};

use crate::error::{DecodeError, EncodeError, NotRegistered};
use crate::limits::MAX_ENVELOPE_SIZE;
use crate::model::{AbstractValue, Polymorphic, TypeKey};
use crate::registry::Registry;

#[derive(Serialize)]
pub(crate) struct Envelope<'a> {
    #[serde(rename = "Type")]
    type_key: &'a str,
    #[serde(rename = "Value")]
    value: &'a dyn Polymorphic,
}

impl<'a> Envelope<'a> {
    /// Pairs a value with the key it is registered under.
    pub(crate) fn resolve(registry: &'a Registry, value: &'a AbstractValue) -> Result<Self, NotRegistered> {
        let type_key = registry.key_of(value).inspect_err(|e| {
            debug!(type_key = %e.type_key, "refusing to encode unregistered type");
        })?;
        Ok(Self {
            type_key: type_key.as_str(),
            value: value.get(),
        })
    }
}

#[derive(Deserialize)]
struct RawEnvelope<'a> {
    #[serde(rename = "Type", borrow)]
    type_key: Cow<'a, str>,
    #[serde(rename = "Value", borrow, default, deserialize_with = "present")]
    value: Option<&'a RawValue>,
}

/// Keeps an explicit `null` payload distinct from a missing one.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for envelope encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Emit indented JSON instead of the compact form.
    pub pretty: bool,
    /// Reject envelopes larger than this many bytes.
    pub max_envelope_size: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            max_envelope_size: MAX_ENVELOPE_SIZE,
        }
    }
}

impl EncodeOptions {
    /// Creates default (compact) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options producing indented output.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// Encodes a value into a JSON envelope.
///
/// The concrete type must be registered with the value's shape; otherwise
/// [`EncodeError::NotRegistered`] is returned and nothing is produced.
pub fn encode(registry: &Registry, value: &AbstractValue) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(registry, value, EncodeOptions::default())
}

/// Encodes a value into a JSON envelope with the given options.
pub fn encode_with_options(
    registry: &Registry,
    value: &AbstractValue,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let envelope = Envelope::resolve(registry, value)?;
    let bytes = if options.pretty {
        serde_json::to_vec_pretty(&envelope)?
    } else {
        serde_json::to_vec(&envelope)?
    };

    if bytes.len() > options.max_envelope_size {
        return Err(EncodeError::LengthExceedsLimit {
            len: bytes.len(),
            max: options.max_envelope_size,
        });
    }

    trace!(type_key = envelope.type_key, len = bytes.len(), "encoded envelope");
    Ok(bytes)
}

// =============================================================================
// DECODING
// =============================================================================

/// Options for envelope decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject inputs larger than this many bytes before parsing.
    pub max_envelope_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_envelope_size: MAX_ENVELOPE_SIZE,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decodes a JSON envelope back into the concrete registered type.
///
/// The result has the shape the type was registered with: a by-reference
/// registration decodes to a by-reference value and vice versa.
pub fn decode(registry: &Registry, input: &[u8]) -> Result<AbstractValue, DecodeError> {
    decode_with_options(registry, input, DecodeOptions::default())
}

/// Decodes a JSON envelope with the given options.
pub fn decode_with_options(
    registry: &Registry,
    input: &[u8],
    options: DecodeOptions,
) -> Result<AbstractValue, DecodeError> {
    let envelope = read_envelope(input, options)?;
    decode_payload(registry, &envelope.type_key, envelope.value)
}

/// Second decode phase: resolves `type_key`, then decodes `payload` into a
/// fresh instance of the registered type.
pub(crate) fn decode_payload(
    registry: &Registry,
    type_key: &str,
    payload: Option<&RawValue>,
) -> Result<AbstractValue, DecodeError> {
    // Unknown types are rejected before the payload is looked at
    let (mut slot, shape) = registry.construct_new(type_key).map_err(|e| {
        debug!(type_key = %e.type_key, "envelope names an unregistered type");
        DecodeError::UnresolvedType(e)
    })?;

    let payload = payload.ok_or_else(|| serde_json::Error::missing_field("Value"))?;
    slot.decode_in_place(payload)?;

    trace!(type_key, shape = ?shape, "decoded envelope");
    Ok(AbstractValue::from_boxed(slot, shape))
}

/// Reads only the type key of an envelope, leaving the payload untouched.
pub fn peek_type(input: &[u8]) -> Result<TypeKey, DecodeError> {
    let envelope = read_envelope(input, DecodeOptions::default())?;
    Ok(TypeKey::from(envelope.type_key.into_owned()))
}

fn read_envelope(input: &[u8], options: DecodeOptions) -> Result<RawEnvelope<'_>, DecodeError> {
    if input.len() > options.max_envelope_size {
        return Err(DecodeError::LengthExceedsLimit {
            len: input.len(),
            max: options.max_envelope_size,
        });
    }
    Ok(serde_json::from_slice(input)?)
}
