// anvil/src/core/matching.rs

//! Ignore-style glob filtering over key sets.
//!
//! This is the narrow "match keys against patterns" capability shared by
//! [`Container::matching`] and [`ContainerProxy::matching`]. The glob
//! engine itself is external (`globset`); nothing else in the crate knows
//! about pattern syntax.
//!
//! [`Container::matching`]: crate::Container::matching
//! [`ContainerProxy::matching`]: crate::ContainerProxy::matching

use crate::error::{AnvilError, AnvilResult};
use globset::{Glob, GlobSetBuilder};
use indexmap::IndexSet;
use std::hash::Hash;

/// Returns the keys matching the given glob patterns.
///
/// No patterns at all matches every key.
pub fn match_keys<'a, K, I>(keys: I, patterns: &[&str]) -> AnvilResult<IndexSet<K>>
where
  K: AsRef<str> + Clone + Hash + Eq + 'a,
  I: IntoIterator<Item = &'a K>,
{
  if patterns.is_empty() {
    return Ok(keys.into_iter().cloned().collect());
  }

  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    let glob = Glob::new(pattern).map_err(|err| AnvilError::Pattern {
      pattern: (*pattern).to_string(),
      source: err.into(),
    })?;
    builder.add(glob);
  }
  let set = builder.build().map_err(|err| AnvilError::Pattern {
    pattern: patterns.join(" "),
    source: err.into(),
  })?;

  Ok(
    keys
      .into_iter()
      .filter(|key| set.is_match(key.as_ref()))
      .cloned()
      .collect(),
  )
}
