//! Type keys: stable string identifiers for concrete types.
//!
//! A key is `namespace/Name`, with a trailing `*` when the value is held by
//! reference. Keys for builtin types without a namespace are just the name.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::limits::{NAMESPACE_SEPARATOR, REFERENCE_MARKER};

/// How a value is held inside an [`AbstractValue`](crate::AbstractValue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// Plain owned value.
    ByValue,
    /// Shared indirection (`Arc`) with its own identity.
    ByReference,
}

impl Shape {
    pub fn is_reference(self) -> bool {
        matches!(self, Shape::ByReference)
    }
}

/// Identifier used to tag a concrete type in the envelope format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Builds a key from an explicit namespace and type name.
    pub fn new(namespace: &str, name: &str, shape: Shape) -> Self {
        let mut key = String::with_capacity(namespace.len() + name.len() + 2);
        if !namespace.is_empty() {
            key.push_str(namespace);
            key.push(NAMESPACE_SEPARATOR);
        }
        key.push_str(name);
        if shape.is_reference() {
            key.push(REFERENCE_MARKER);
        }
        Self(key)
    }

    /// Derives the default key for `T` from its Rust type path.
    ///
    /// The result depends only on the type, never on a value of it.
    pub fn of<T: ?Sized + 'static>(shape: Shape) -> Self {
        Self::from_type_name(std::any::type_name::<T>(), shape)
    }

    pub(crate) fn from_type_name(type_name: &str, shape: Shape) -> Self {
        let (namespace, name) = split_type_path(type_name);
        Self::new(namespace, name, shape)
    }

    /// Shape recorded by the marker suffix.
    pub fn shape(&self) -> Shape {
        if self.0.ends_with(REFERENCE_MARKER) {
            Shape::ByReference
        } else {
            Shape::ByValue
        }
    }

    /// The key without its reference marker.
    pub fn base(&self) -> &str {
        self.0.strip_suffix(REFERENCE_MARKER).unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Splits `a::b::Name<c::D>` into (`a::b`, `Name<c::D>`).
///
/// Only `::` before the first generic bracket counts as a path separator.
fn split_type_path(type_name: &str) -> (&str, &str) {
    let head_end = type_name.find('<').unwrap_or(type_name.len());
    match type_name[..head_end].rfind("::") {
        Some(pos) => (&type_name[..pos], &type_name[pos + 2..]),
        None => ("", type_name),
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TypeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TypeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for TypeKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
