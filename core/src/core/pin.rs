// anvil/src/core/pin.rs

//! Read-with-default, write-through accessors bound to fixed keys.
//!
//! A [`Pin`] binds a field name to a key inside some backing key/value
//! store and carries an optional default (a static value or a factory).
//! Reading through the pin persists a generated default back into the
//! store, so the default is computed at most once per store. Schemas
//! declare their pinned fields through [`PinSchema`] and enumerate them
//! with [`collect_from`].

use crate::core::container::{Container, ContainerHooks};
use crate::error::{AnvilError, AnvilResult};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default configuration for a [`Pin`].
pub enum PinDefault<V> {
  /// No default: a missing key is an error.
  None,
  /// A static value, cloned into the store on first read.
  Value(V),
  /// A factory invoked on first read.
  Factory(Arc<dyn Fn() -> V>),
}

impl<V: Clone> Clone for PinDefault<V> {
  fn clone(&self) -> Self {
    match self {
      PinDefault::None => PinDefault::None,
      PinDefault::Value(value) => PinDefault::Value(value.clone()),
      PinDefault::Factory(factory) => PinDefault::Factory(Arc::clone(factory)),
    }
  }
}

impl<V> fmt::Debug for PinDefault<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PinDefault::None => f.write_str("None"),
      PinDefault::Value(_) => f.write_str("Value(..)"),
      PinDefault::Factory(_) => f.write_str("Factory(..)"),
    }
  }
}

/// Mapping surface required by [`Pin`] accessors.
pub trait PinStorage<V> {
  fn get_value(&self, key: &str) -> Option<&V>;
  fn set_value(&mut self, key: String, value: V);
  fn remove_value(&mut self, key: &str) -> Option<V>;
}

impl<V> PinStorage<V> for IndexMap<String, V> {
  fn get_value(&self, key: &str) -> Option<&V> {
    self.get(key)
  }

  fn set_value(&mut self, key: String, value: V) {
    self.insert(key, value);
  }

  fn remove_value(&mut self, key: &str) -> Option<V> {
    self.shift_remove(key)
  }
}

impl<V> PinStorage<V> for HashMap<String, V> {
  fn get_value(&self, key: &str) -> Option<&V> {
    self.get(key)
  }

  fn set_value(&mut self, key: String, value: V) {
    self.insert(key, value);
  }

  fn remove_value(&mut self, key: &str) -> Option<V> {
    self.remove(key)
  }
}

// Writes route through Container::insert, so pinned values still pass the
// container's process hook.
impl<V, H: ContainerHooks<String, V>> PinStorage<V> for Container<String, V, H> {
  fn get_value(&self, key: &str) -> Option<&V> {
    self.get(key)
  }

  fn set_value(&mut self, key: String, value: V) {
    self.insert(key, value);
  }

  fn remove_value(&mut self, key: &str) -> Option<V> {
    self.remove(key)
  }
}

/// Binding of a field name to a fixed key with lazy, cached defaults.
#[derive(Debug, Clone)]
pub struct Pin<V> {
  key: String,
  default: PinDefault<V>,
}

impl<V> Pin<V> {
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      default: PinDefault::None,
    }
  }

  pub fn with_default(key: impl Into<String>, value: V) -> Self {
    Self {
      key: key.into(),
      default: PinDefault::Value(value),
    }
  }

  pub fn with_default_factory(key: impl Into<String>, factory: impl Fn() -> V + 'static) -> Self {
    Self {
      key: key.into(),
      default: PinDefault::Factory(Arc::new(factory)),
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// Reads the pinned value out of `store`.
  ///
  /// When the key is absent, the configured default (static value, else
  /// factory) is computed, stored back under the bound key, and re-read --
  /// so the generated default is persisted rather than recomputed on later
  /// reads. With no default configured, an absent key is
  /// [`AnvilError::KeyNotFound`].
  pub fn get<'s, S>(&self, store: &'s mut S) -> AnvilResult<&'s V>
  where
    S: PinStorage<V>,
    V: Clone,
  {
    if store.get_value(&self.key).is_none() {
      let value = match &self.default {
        PinDefault::Value(value) => value.clone(),
        PinDefault::Factory(factory) => factory(),
        PinDefault::None => {
          return Err(AnvilError::KeyNotFound {
            key: self.key.clone(),
          });
        }
      };
      store.set_value(self.key.clone(), value);
    }
    store.get_value(&self.key).ok_or_else(|| AnvilError::KeyNotFound {
      key: self.key.clone(),
    })
  }

  /// Writes straight through to the store under the bound key.
  pub fn set<S: PinStorage<V>>(&self, store: &mut S, value: V) {
    store.set_value(self.key.clone(), value);
  }

  /// Removes the pinned value from the store.
  pub fn delete<S: PinStorage<V>>(&self, store: &mut S) -> Option<V> {
    store.remove_value(&self.key)
  }
}

/// A pinned field declared by a [`PinSchema`]: field name plus backing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDescriptor {
  pub name: &'static str,
  pub key: &'static str,
}

/// Declares the pinned fields of a schema type, so a set of namespaced,
/// defaulted fields can be enumerated without hand-written accessor
/// boilerplate.
pub trait PinSchema {
  fn pins() -> Vec<PinDescriptor>;
}

/// Collects the declared pins of `S` as an ordered name-to-descriptor map.
pub fn collect_from<S: PinSchema>() -> IndexMap<&'static str, PinDescriptor> {
  S::pins().into_iter().map(|pin| (pin.name, pin)).collect()
}
