// anvil/src/core/container.rs

//! Generic insertion-ordered container with overridable insertion hooks
//! and shallow merge dispatch.
//!
//! `Container` wraps an [`IndexMap`] and routes every stored value through
//! a single insertion choke point (`insert`), where a [`ContainerHooks`]
//! strategy can validate, coerce, or wrap values. The same strategy can
//! recover missing entries on [`Container::fetch`].

use crate::core::matching::match_keys;
use crate::core::merge::Merge;
use crate::error::{AnvilError, AnvilResult};
use indexmap::{Equivalent, IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;

/// Insertion and recovery hooks applied by [`Container`].
///
/// `process` runs exactly once for every stored value, whatever path the
/// value arrived by (direct insert, missing-entry recovery, merge
/// overwrite). `missing` may compute a value for an absent key; returning
/// `None` leaves the lookup unresolved.
pub trait ContainerHooks<K, V> {
  /// Process the value before inserting it.
  fn process(&mut self, key: &K, value: V) -> V {
    let _ = key;
    value
  }

  /// Recover a missing entry, or `None` if the key is truly absent.
  fn missing(&mut self, key: &K) -> Option<V> {
    let _ = key;
    None
  }
}

/// Hooks that store values untouched and recover nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<K, V> ContainerHooks<K, V> for DefaultHooks {}

/// Generic dict-like container: keys unique, insertion order preserved.
pub struct Container<K, V, H = DefaultHooks> {
  entries: IndexMap<K, V>,
  hooks: H,
}

impl<K, V> Container<K, V, DefaultHooks> {
  /// Creates an empty container with no-op hooks.
  pub fn new() -> Self {
    Self::with_hooks(DefaultHooks)
  }
}

impl<K, V, H: Default> Default for Container<K, V, H> {
  fn default() -> Self {
    Self::with_hooks(H::default())
  }
}

impl<K, V, H> Container<K, V, H> {
  /// Creates an empty container with the given hook strategy.
  pub fn with_hooks(hooks: H) -> Self {
    Self {
      entries: IndexMap::new(),
      hooks,
    }
  }

  pub fn hooks(&self) -> &H {
    &self.hooks
  }

  pub fn hooks_mut(&mut self) -> &mut H {
    &mut self.hooks
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
    self.entries.keys()
  }

  pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
    self.entries.values()
  }

  pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
    self.entries.iter()
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }
}

impl<K, V, H> Container<K, V, H>
where
  K: Hash + Eq,
  H: ContainerHooks<K, V>,
{
  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    Q: ?Sized + Hash + Equivalent<K>,
  {
    self.entries.get(key)
  }

  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    Q: ?Sized + Hash + Equivalent<K>,
  {
    self.entries.get_mut(key)
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    Q: ?Sized + Hash + Equivalent<K>,
  {
    self.entries.contains_key(key)
  }

  /// Inserts a value, passing it through the `process` hook first.
  ///
  /// This is the single insertion choke point: every code path that stores
  /// a value (including `fetch` recovery and merge overwrites) goes
  /// through here.
  pub fn insert(&mut self, key: K, value: V) -> Option<V> {
    let value = self.hooks.process(&key, value);
    self.entries.insert(key, value)
  }

  /// Removes an entry, preserving the order of the remaining entries.
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    Q: ?Sized + Hash + Equivalent<K>,
  {
    self.entries.shift_remove(key)
  }

  /// Looks up `key`, recovering a missing entry through the `missing` hook.
  ///
  /// A recovered value is stored through [`Container::insert`] before being
  /// returned, so recovery runs at most once per key. Returns
  /// [`AnvilError::KeyNotFound`] when the key is absent and the hook
  /// declines to recover it.
  pub fn fetch(&mut self, key: K) -> AnvilResult<&V>
  where
    K: Clone + fmt::Display,
  {
    if !self.entries.contains_key(&key) {
      match self.hooks.missing(&key) {
        Some(value) => {
          self.insert(key.clone(), value);
        }
        None => {
          return Err(AnvilError::KeyNotFound {
            key: key.to_string(),
          });
        }
      }
    }
    self.entries.get(&key).ok_or_else(|| AnvilError::KeyNotFound {
      key: key.to_string(),
    })
  }

  /// Merges entries from a dict-like source into this container.
  ///
  /// For every incoming `(key, value)`, the existing value (if any) is
  /// offered the incoming one via [`Merge::merge`]. When the key is absent
  /// or the existing value declines (`false`), the incoming value
  /// overwrites through [`Container::insert`]. An absent key is never an
  /// error here.
  ///
  /// The dispatch is shallow: recursive behavior lives entirely in the
  /// nested values' own [`Merge`] implementations.
  pub fn merge<I>(&mut self, other: I) -> bool
  where
    V: Merge,
    I: IntoIterator<Item = (K, V)>,
  {
    for (key, mut value) in other {
      if let Some(existing) = self.entries.get_mut(&key) {
        if existing.merge(&mut value) {
          continue;
        }
      }
      self.insert(key, value);
    }
    true
  }

  /// Returns the keys matching the given ignore-style glob patterns.
  ///
  /// No patterns matches every key.
  pub fn matching(&self, patterns: &[&str]) -> AnvilResult<IndexSet<K>>
  where
    K: AsRef<str> + Clone,
  {
    match_keys(self.entries.keys(), patterns)
  }
}

impl<K, V, H> Merge for Container<K, V, H>
where
  K: Hash + Eq,
  V: Merge,
  H: ContainerHooks<K, V>,
{
  fn merge(&mut self, other: &mut Self) -> bool {
    let drained: Vec<(K, V)> = other.entries.drain(..).collect();
    Container::merge(self, drained)
  }
}

impl<K, V, H> IntoIterator for Container<K, V, H> {
  type Item = (K, V);
  type IntoIter = indexmap::map::IntoIter<K, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl<'a, K, V, H> IntoIterator for &'a Container<K, V, H> {
  type Item = (&'a K, &'a V);
  type IntoIter = indexmap::map::Iter<'a, K, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

impl<K, V, H> Extend<(K, V)> for Container<K, V, H>
where
  K: Hash + Eq,
  H: ContainerHooks<K, V>,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.insert(key, value);
    }
  }
}

impl<K, V, H> FromIterator<(K, V)> for Container<K, V, H>
where
  K: Hash + Eq,
  H: ContainerHooks<K, V> + Default,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut container = Self::with_hooks(H::default());
    container.extend(iter);
    container
  }
}

impl<K: fmt::Debug, V, H> fmt::Debug for Container<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("keys", &self.entries.keys().collect::<Vec<_>>())
      .finish()
  }
}
