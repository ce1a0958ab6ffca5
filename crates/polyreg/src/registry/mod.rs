//! The type registry.
//!
//! Maps type keys to registered concrete types. Each entry keeps a zero-valued
//! exemplar, a factory producing fresh instances for decoding, and the shape
//! the type was registered with.
//!
//! Registration needs `&mut Registry` and is expected to happen once, at
//! startup. Afterwards the registry is shared immutably (`&Registry` or
//! `Arc<Registry>`) and every lookup is a plain read.

pub mod builder;

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::NotRegistered;
use crate::model::{AbstractValue, Polymorphic, Shape, TypeKey};

pub use builder::RegistryBuilder;

type Factory = Arc<dyn Fn() -> Box<dyn Polymorphic> + Send + Sync>;

/// Registered concrete type.
struct Entry {
    exemplar: Box<dyn Polymorphic>,
    factory: Factory,
    shape: Shape,
}

/// Table of registered concrete types.
#[derive(Default)]
pub struct Registry {
    entries: FxHashMap<TypeKey, Entry>,
    by_type: FxHashMap<(TypeId, Shape), TypeKey>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fluent builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registers `T` under its derived key.
    ///
    /// # Panics
    ///
    /// Panics if the key, or `T` with this shape, is already registered.
    pub fn register<T: Polymorphic + Default>(&mut self, shape: Shape) -> TypeKey {
        let key = TypeKey::of::<T>(shape);
        self.insert::<T>(key, shape, Arc::new(|| Box::new(T::default()) as Box<dyn Polymorphic>))
    }

    /// Registers `T` under an explicit namespace and name.
    ///
    /// # Panics
    ///
    /// Panics if the key, or `T` with this shape, is already registered.
    pub fn register_named<T: Polymorphic + Default>(
        &mut self,
        namespace: &str,
        name: &str,
        shape: Shape,
    ) -> TypeKey {
        let key = TypeKey::new(namespace, name, shape);
        self.insert::<T>(key, shape, Arc::new(|| Box::new(T::default()) as Box<dyn Polymorphic>))
    }

    /// Registers `T` with a factory producing its zero value.
    ///
    /// Use this for types without a `Default` impl. The factory is called once
    /// for the exemplar and once per decode, where its instance only fixes the
    /// concrete type: the decoded payload replaces it entirely, so template
    /// field values never show through in decoded results.
    ///
    /// # Panics
    ///
    /// Panics if the key, or `T` with this shape, is already registered.
    pub fn register_factory<T, F>(
        &mut self,
        namespace: &str,
        name: &str,
        shape: Shape,
        factory: F,
    ) -> TypeKey
    where
        T: Polymorphic,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let key = TypeKey::new(namespace, name, shape);
        self.insert::<T>(key, shape, Arc::new(move || Box::new(factory()) as Box<dyn Polymorphic>))
    }

    fn insert<T: Polymorphic>(&mut self, key: TypeKey, shape: Shape, factory: Factory) -> TypeKey {
        if self.entries.contains_key(&key) {
            panic!("type {key} already registered");
        }
        let type_slot = (TypeId::of::<T>(), shape);
        if let Some(existing) = self.by_type.get(&type_slot) {
            panic!(
                "type {} already registered as {existing}, cannot also register as {key}",
                std::any::type_name::<T>()
            );
        }

        let exemplar = factory();
        debug!(key = %key, shape = ?shape, rust_type = std::any::type_name::<T>(), "registered type");

        self.by_type.insert(type_slot, key.clone());
        self.entries.insert(
            key.clone(),
            Entry {
                exemplar,
                factory,
                shape,
            },
        );
        key
    }

    /// Returns the exemplar stored for `key` and its registered shape.
    pub fn lookup(&self, key: &str) -> Result<(&dyn Polymorphic, Shape), NotRegistered> {
        let entry = self.entries.get(key).ok_or_else(|| NotRegistered::new(key))?;
        Ok((entry.exemplar.as_ref(), entry.shape))
    }

    /// Returns a new zero-valued instance for `key`, ready to decode into.
    ///
    /// The instance is never the stored exemplar; concurrent decodes each get
    /// their own. The returned shape says whether the caller should hand the
    /// result out by reference or by value.
    pub fn construct_new(&self, key: &str) -> Result<(Box<dyn Polymorphic>, Shape), NotRegistered> {
        let entry = self.entries.get(key).ok_or_else(|| NotRegistered::new(key))?;
        Ok(((entry.factory)(), entry.shape))
    }

    /// Resolves the key a held value is registered under.
    ///
    /// On failure the error carries the key derived from the value's type.
    pub fn key_of(&self, value: &AbstractValue) -> Result<&TypeKey, NotRegistered> {
        self.by_type
            .get(&(value.concrete_type_id(), value.shape()))
            .ok_or_else(|| NotRegistered::new(value.derived_key()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&TypeKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        keys
    }

    /// Digest of the registered key set.
    ///
    /// Two registries that can decode each other's envelopes have the same
    /// fingerprint.
    ///
    /// ```text
    /// fingerprint = SHA-256(key_0 || "\n" || key_1 || "\n" || ...)[0:16]
    /// ```
    pub fn fingerprint(&self) -> [u8; 16] {
        let mut hasher = Sha256::new();
        for key in self.keys() {
            hasher.update(key.as_str().as_bytes());
            hasher.update(b"\n");
        }
        let hash = hasher.finalize();

        let mut out = [0u8; 16];
        out.copy_from_slice(&hash[..16]);
        out
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("keys", &self.keys()).finish()
    }
}
