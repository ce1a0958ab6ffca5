//! The capability through which registered values are held.
//!
//! [`Polymorphic`] is object safe and blanket-implemented for every
//! `serde`-capable, cloneable, comparable, thread-safe type, so callers never
//! implement it by hand. [`AbstractValue`] owns one such value, either by value
//! or by reference, and is what the envelope codec encodes and decodes.

use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::model::{Shape, TypeKey};

/// A concrete value known only through this capability.
pub trait Polymorphic: erased_serde::Serialize + Any + Debug + Send + Sync {
    /// Full Rust path of the concrete type.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Independent deep copy of the value.
    fn clone_boxed(&self) -> Box<dyn Polymorphic>;

    /// Deep equality against another value of any type.
    fn dyn_eq(&self, other: &dyn Polymorphic) -> bool;

    /// Replaces `self` with the value decoded from `raw`.
    ///
    /// The current contents are discarded, not merged: fields missing from
    /// `raw` follow the type's own `serde` rules, never the previous value.
    fn decode_in_place(&mut self, raw: &RawValue) -> serde_json::Result<()>;
}

erased_serde::serialize_trait_object!(Polymorphic);

impl<T> Polymorphic for T
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Polymorphic> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Polymorphic) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn decode_in_place(&mut self, raw: &RawValue) -> serde_json::Result<()> {
        *self = serde_json::from_str(raw.get())?;
        Ok(())
    }
}

#[derive(Debug)]
enum Held {
    Value(Box<dyn Polymorphic>),
    Reference(Arc<dyn Polymorphic>),
}

impl Clone for Held {
    fn clone(&self) -> Self {
        match self {
            Held::Value(v) => Held::Value(v.clone_boxed()),
            Held::Reference(r) => Held::Reference(Arc::clone(r)),
        }
    }
}

/// Caller-facing wrapper around one polymorphic value.
///
/// Equality is deep: two wrappers are equal when they have the same shape and
/// their concrete values compare equal, regardless of pointer identity.
///
/// Cloning a by-value wrapper copies the value. Cloning a by-reference
/// wrapper shares the same allocation.
#[derive(Debug, Clone)]
pub struct AbstractValue {
    held: Held,
}

impl AbstractValue {
    /// Wraps a plain value.
    pub fn by_value<T: Polymorphic>(value: T) -> Self {
        Self { held: Held::Value(Box::new(value)) }
    }

    /// Wraps a value behind a fresh shared reference.
    pub fn by_reference<T: Polymorphic>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing shared reference, keeping its identity.
    pub fn from_arc<T: Polymorphic>(value: Arc<T>) -> Self {
        Self { held: Held::Reference(value) }
    }

    pub(crate) fn from_boxed(value: Box<dyn Polymorphic>, shape: Shape) -> Self {
        let held = match shape {
            Shape::ByValue => Held::Value(value),
            Shape::ByReference => Held::Reference(Arc::from(value)),
        };
        Self { held }
    }

    pub fn shape(&self) -> Shape {
        match self.held {
            Held::Value(_) => Shape::ByValue,
            Held::Reference(_) => Shape::ByReference,
        }
    }

    /// The held value as a trait object.
    pub fn get(&self) -> &dyn Polymorphic {
        match &self.held {
            Held::Value(v) => v.as_ref(),
            Held::Reference(r) => r.as_ref(),
        }
    }

    /// `TypeId` of the concrete held type.
    pub fn concrete_type_id(&self) -> TypeId {
        self.get().as_any().type_id()
    }

    /// Default key derived from the concrete type and shape.
    ///
    /// A registry may know the type under an explicit name instead; use
    /// [`Registry::key_of`](crate::Registry::key_of) to resolve that.
    pub fn derived_key(&self) -> TypeKey {
        TypeKey::from_type_name(self.get().type_name(), self.shape())
    }

    pub fn is<T: Polymorphic>(&self) -> bool {
        self.get().as_any().is::<T>()
    }

    pub fn downcast_ref<T: Polymorphic>(&self) -> Option<&T> {
        self.get().as_any().downcast_ref::<T>()
    }

    /// Takes a by-value `T` out of the wrapper.
    ///
    /// Fails (returning the wrapper) when the shape is by-reference or the
    /// concrete type is not `T`.
    pub fn into_value<T: Polymorphic>(self) -> Result<T, Self> {
        match self.held {
            Held::Value(v) if v.as_any().is::<T>() => {
                // Guard has already matched the concrete type
                Ok(*v.into_any_box().downcast::<T>().expect("held type is T"))
            }
            held => Err(Self { held }),
        }
    }

    /// Takes the shared `Arc<T>` out of a by-reference wrapper.
    pub fn into_reference<T: Polymorphic>(self) -> Result<Arc<T>, Self> {
        match self.held {
            Held::Reference(r) if r.as_any().is::<T>() => {
                Ok(r.into_any_arc().downcast::<T>().expect("held type is T"))
            }
            held => Err(Self { held }),
        }
    }
}

impl PartialEq for AbstractValue {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.get().dyn_eq(other.get())
    }
}
