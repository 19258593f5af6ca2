// anvil/src/core/proxy.rs

//! Flattened read/write view over a two-level nested container structure.
//!
//! The backing structure maps outer keys to namespaces, each namespace
//! mapping a proxy key to a [`Container`]. A `ContainerProxy` pins one
//! proxy key and exposes the selected containers across all outer entries
//! as a single flat mapping, composing and decomposing flat keys through a
//! [`KeyCodec`].

use crate::core::container::{Container, ContainerHooks};
use crate::core::matching::match_keys;
use crate::core::merge::Merge;
use crate::error::{AnvilError, AnvilResult};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;

/// Codec for composing and decomposing flat proxy keys.
///
/// Implementations must be exact inverses:
/// `join_key(split_key(k)) == k` for every valid `k`.
pub trait KeyCodec<K> {
  /// Decomposes a flat key into the outer mapping key and the nested key.
  /// `None` means the key has no valid composite form.
  fn split_key(&self, key: &K) -> Option<(K, K)>;

  /// Recomposes a flat key from the outer mapping key and the nested key.
  fn join_key(&self, outer: &K, inner: &K) -> K;
}

/// Splits string keys on the first occurrence of a separator character,
/// `"outer<sep>inner"`. The inner part may itself contain the separator.
#[derive(Debug, Clone, Copy)]
pub struct SeparatorCodec {
  separator: char,
}

impl SeparatorCodec {
  pub const fn new(separator: char) -> Self {
    Self { separator }
  }
}

impl KeyCodec<String> for SeparatorCodec {
  fn split_key(&self, key: &String) -> Option<(String, String)> {
    key
      .split_once(self.separator)
      .map(|(outer, inner)| (outer.to_string(), inner.to_string()))
  }

  fn join_key(&self, outer: &String, inner: &String) -> String {
    format!("{}{}{}", outer, self.separator, inner)
  }
}

/// The two-level structure a [`ContainerProxy`] aggregates: outer key to
/// namespace, namespace keyed by proxy key to a [`Container`].
pub type Namespaces<K, Q, V, H> = IndexMap<K, IndexMap<Q, Container<K, V, H>>>;

/// Generic aggregated view over several nested dict-like objects.
///
/// The proxy does not own any data; it borrows the backing structure for
/// its lifetime and operates on whichever containers the fixed proxy key
/// selects.
pub struct ContainerProxy<'a, K, Q, V, H, C> {
  proxy: &'a mut Namespaces<K, Q, V, H>,
  proxy_key: Q,
  codec: C,
}

impl<'a, K, Q, V, H, C> ContainerProxy<'a, K, Q, V, H, C>
where
  K: Hash + Eq + Clone + fmt::Display,
  Q: Hash + Eq + Clone,
  H: ContainerHooks<K, V> + Default,
  C: KeyCodec<K>,
{
  pub fn new(proxy: &'a mut Namespaces<K, Q, V, H>, proxy_key: Q, codec: C) -> Self {
    Self {
      proxy,
      proxy_key,
      codec,
    }
  }

  fn split(&self, key: &K) -> AnvilResult<(K, K)> {
    self.codec.split_key(key).ok_or_else(|| AnvilError::KeyNotFound {
      key: key.to_string(),
    })
  }

  pub fn get(&self, key: &K) -> Option<&V> {
    let (outer, inner) = self.codec.split_key(key)?;
    self.proxy.get(&outer)?.get(&self.proxy_key)?.get(&inner)
  }

  pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
    let (outer, inner) = self.codec.split_key(key)?;
    self
      .proxy
      .get_mut(&outer)?
      .get_mut(&self.proxy_key)?
      .get_mut(&inner)
  }

  pub fn contains_key(&self, key: &K) -> bool {
    self.get(key).is_some()
  }

  /// Inserts a value under a flat key, creating the outer namespace and
  /// the selected container on demand.
  pub fn insert(&mut self, key: K, value: V) -> AnvilResult<Option<V>> {
    let (outer, inner) = self.split(&key)?;
    let space = self
      .proxy
      .entry(outer)
      .or_default()
      .entry(self.proxy_key.clone())
      .or_default();
    Ok(space.insert(inner, value))
  }

  /// Removes the entry addressed by a flat key.
  ///
  /// Only the targeted inner entry is touched; sibling outer entries and
  /// other namespaces are left as they are.
  pub fn remove(&mut self, key: &K) -> Option<V> {
    let (outer, inner) = self.codec.split_key(key)?;
    self
      .proxy
      .get_mut(&outer)?
      .get_mut(&self.proxy_key)?
      .remove(&inner)
  }

  /// Sum of the selected namespace's sizes across all outer entries.
  pub fn len(&self) -> usize {
    self
      .proxy
      .values()
      .filter_map(|spaces| spaces.get(&self.proxy_key))
      .map(Container::len)
      .sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Iterates every flat key, recomposed through the codec.
  pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
    self
      .proxy
      .iter()
      .filter_map(move |(outer, spaces)| {
        spaces.get(&self.proxy_key).map(move |space| {
          space.keys().map(move |inner| self.codec.join_key(outer, inner))
        })
      })
      .flatten()
  }

  pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
    self
      .proxy
      .iter()
      .filter_map(move |(outer, spaces)| {
        spaces.get(&self.proxy_key).map(move |space| {
          space
            .iter()
            .map(move |(inner, value)| (self.codec.join_key(outer, inner), value))
        })
      })
      .flatten()
  }

  /// Merges entries into the flattened view, using the same algorithm as
  /// [`Container::merge`]: delegated merge first, overwrite on absence or
  /// refusal.
  pub fn merge<I>(&mut self, other: I) -> AnvilResult<bool>
  where
    V: Merge,
    I: IntoIterator<Item = (K, V)>,
  {
    for (key, mut value) in other {
      if let Some(existing) = self.get_mut(&key) {
        if existing.merge(&mut value) {
          continue;
        }
      }
      self.insert(key, value)?;
    }
    Ok(true)
  }

  /// Returns the flat keys matching the given glob patterns; no patterns
  /// matches every key.
  pub fn matching(&self, patterns: &[&str]) -> AnvilResult<IndexSet<K>>
  where
    K: AsRef<str>,
  {
    let keys: Vec<K> = self.keys().collect();
    match_keys(keys.iter(), patterns)
  }
}

impl<K, Q, V, H, C> fmt::Debug for ContainerProxy<'_, K, Q, V, H, C>
where
  K: Hash + Eq + Clone + fmt::Display + fmt::Debug,
  Q: Hash + Eq + Clone,
  H: ContainerHooks<K, V> + Default,
  C: KeyCodec<K>,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerProxy")
      .field("keys", &self.keys().collect::<Vec<_>>())
      .finish()
  }
}
