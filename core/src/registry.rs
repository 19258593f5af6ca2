// anvil/src/registry.rs

//! Defines `PluginRegistry<T>`, the identifier-to-plugin lookup service
//! backing reference specs.
//!
//! Identifiers follow the `module.path` / `module.path:symbol` convention;
//! when the symbol is omitted, the registry's configured default symbol is
//! appended. The registry is populated at startup (typically from project
//! configuration, which is external to this core) and consulted by
//! `Pipeline::resolve` whenever a reference spec is required.

use crate::error::{AnvilError, AnvilResult};
use crate::pipeline::definition::Pipeline;
use crate::pipeline::task::{PluginHandle, Work};
use anyhow::anyhow;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{event, Level};

/// Conventional symbol used when a spec names only a module path.
pub const DEFAULT_SYMBOL: &str = "default";

/// Maps normalized plugin identifiers (`"path:symbol"`) to handles.
pub struct PluginRegistry<T> {
  entries: RwLock<HashMap<String, PluginHandle<T>>>,
  default_symbol: String,
}

impl<T> PluginRegistry<T> {
  /// Creates an empty registry with the conventional default symbol.
  pub fn new() -> Self {
    Self::with_default_symbol(DEFAULT_SYMBOL)
  }

  /// Creates an empty registry appending `symbol` to symbol-less specs.
  pub fn with_default_symbol(symbol: impl Into<String>) -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
      default_symbol: symbol.into(),
    }
  }

  pub fn default_symbol(&self) -> &str {
    &self.default_symbol
  }

  /// Normalizes an identifier to its full `path:symbol` form, rejecting
  /// malformed ones.
  fn normalize(&self, ident: &str) -> AnvilResult<String> {
    let (path, symbol) = match ident.split_once(':') {
      Some((path, symbol)) => (path, symbol),
      None => (ident, self.default_symbol.as_str()),
    };
    if path.is_empty() || symbol.is_empty() || symbol.contains(':') {
      return Err(AnvilError::PluginImport {
        spec: ident.to_string(),
        source: anyhow!("malformed plugin identifier, expected 'module.path' or 'module.path:symbol'"),
      });
    }
    Ok(format!("{path}:{symbol}"))
  }

  /// Registers a plugin handle under an identifier, returning the handle
  /// renamed to its normalized identifier. Registering the same identifier
  /// again replaces the previous entry.
  pub fn register(&self, ident: &str, plugin: PluginHandle<T>) -> AnvilResult<PluginHandle<T>> {
    let ident = self.normalize(ident)?;
    let plugin = plugin.with_name(ident.as_str());
    event!(Level::DEBUG, ident = %ident, "Registering plugin.");
    if self
      .entries
      .write()
      .insert(ident.clone(), plugin.clone())
      .is_some()
    {
      event!(Level::WARN, ident = %ident, "Replaced previously registered plugin.");
    }
    Ok(plugin)
  }

  /// Convenience for registering a bare closure as a plugin body.
  pub fn register_fn(
    &self,
    ident: &str,
    f: impl Fn(&mut Pipeline<T>, &mut T) -> anyhow::Result<Work<T>> + 'static,
  ) -> AnvilResult<PluginHandle<T>> {
    self.register(ident, PluginHandle::new(f))
  }

  /// Resolves a reference spec to the registered handle.
  pub fn resolve(&self, spec: &str) -> AnvilResult<PluginHandle<T>> {
    let ident = self.normalize(spec)?;
    self
      .entries
      .read()
      .get(&ident)
      .cloned()
      .ok_or_else(|| {
        event!(Level::ERROR, ident = %ident, "No plugin registered under identifier.");
        AnvilError::PluginImport {
          spec: spec.to_string(),
          source: anyhow!("no plugin registered under '{ident}'"),
        }
      })
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }
}

impl<T> Default for PluginRegistry<T> {
  fn default() -> Self {
    Self::new()
  }
}
