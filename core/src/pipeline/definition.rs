// anvil/src/pipeline/definition.rs

//! Contains the `Pipeline<T>` struct definition, plugin specs, and spec
//! resolution.

use crate::error::AnvilResult;
use crate::pipeline::task::{PluginHandle, PluginId, Task};
use crate::registry::PluginRegistry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a plugin is named to the scheduler: either a direct handle, or a
/// reference string `"module.path"` / `"module.path:symbol"` resolved
/// through the pipeline's [`PluginRegistry`]. This reference syntax is the
/// only "wire format" the core parses.
pub enum PluginSpec<T> {
  Plugin(PluginHandle<T>),
  Reference(String),
}

impl<T> From<PluginHandle<T>> for PluginSpec<T> {
  fn from(handle: PluginHandle<T>) -> Self {
    PluginSpec::Plugin(handle)
  }
}

impl<T> From<&str> for PluginSpec<T> {
  fn from(reference: &str) -> Self {
    PluginSpec::Reference(reference.to_string())
  }
}

impl<T> From<String> for PluginSpec<T> {
  fn from(reference: String) -> Self {
    PluginSpec::Reference(reference)
  }
}

impl<T> fmt::Debug for PluginSpec<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PluginSpec::Plugin(handle) => f.debug_tuple("Plugin").field(handle).finish(),
      PluginSpec::Reference(reference) => f.debug_tuple("Reference").field(reference).finish(),
    }
  }
}

/// The plugin execution engine.
///
/// A pipeline owns the plugins already requested during this run (the
/// dedup map, keyed by identity) and a LIFO stack of pending tasks. It is
/// created once per build run and discarded with it; the context it
/// operates on stays owned by the caller and is passed by reference into
/// every call.
///
/// The dedup map holds the handles themselves, not just their identities:
/// an identity is the address of the shared body allocation, which must
/// stay alive for the rest of the run or a later plugin could be allocated
/// at the same address and alias it.
pub struct Pipeline<T> {
  pub(crate) registry: Arc<PluginRegistry<T>>,
  pub(crate) plugins: HashMap<PluginId, PluginHandle<T>>,
  pub(crate) tasks: Vec<Task<T>>,
}

impl<T> Pipeline<T> {
  /// Creates a pipeline with an empty registry; only direct plugin handles
  /// can be required.
  pub fn new() -> Self {
    Self::with_registry(Arc::new(PluginRegistry::new()))
  }

  /// Creates a pipeline resolving reference specs through `registry`.
  pub fn with_registry(registry: Arc<PluginRegistry<T>>) -> Self {
    Self {
      registry,
      plugins: HashMap::new(),
      tasks: Vec::new(),
    }
  }

  pub fn registry(&self) -> &Arc<PluginRegistry<T>> {
    &self.registry
  }

  /// Resolves a spec to a plugin handle.
  ///
  /// A direct handle passes through unchanged; a reference string is looked
  /// up in the registry. Resolution failures surface as
  /// [`AnvilError::PluginImport`] chaining the underlying cause.
  ///
  /// [`AnvilError::PluginImport`]: crate::AnvilError::PluginImport
  pub fn resolve(&self, spec: PluginSpec<T>) -> AnvilResult<PluginHandle<T>> {
    match spec {
      PluginSpec::Plugin(handle) => Ok(handle),
      PluginSpec::Reference(reference) => self.registry.resolve(&reference),
    }
  }

  /// Number of tasks currently suspended on the pending stack.
  pub fn pending(&self) -> usize {
    self.tasks.len()
  }
}

impl<T> Default for Pipeline<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for Pipeline<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("requested", &self.plugins.len())
      .field("pending", &self.tasks.len())
      .finish()
  }
}
