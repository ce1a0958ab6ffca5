//! JSON envelope encoding/decoding for polymorphic values.

pub mod envelope;
pub mod nested;

pub use envelope::{
    decode, decode_with_options, encode, encode_with_options, peek_type, DecodeOptions,
    EncodeOptions,
};
pub use nested::{Deferred, Tagged, TaggedSeed};
