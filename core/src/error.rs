// anvil/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnvilError {
  #[error("Failed to resolve plugin spec '{spec}'. Source: {source}")]
  PluginImport {
    spec: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Plugin '{plugin}' failed. Source: {source}")]
  Plugin {
    plugin: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Key not found: {key}")]
  KeyNotFound { key: String },

  #[error("Invalid match pattern '{pattern}'. Source: {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: AnyhowError,
  },
}

/// Wraps a failure raised inside a plugin body or continuation.
///
/// Scheduler errors (`Plugin`, `PluginImport`) already carry their own
/// attribution and pass through unchanged, so a nested `require` failure
/// surfaces out of the outer run intact instead of being re-wrapped at
/// every level of the require chain. Everything else becomes an
/// `AnvilError::Plugin` identifying the offending plugin and chaining the
/// original error as source.
pub(crate) fn wrap_plugin_failure(plugin: impl Into<String>, err: AnyhowError) -> AnvilError {
  match err.downcast::<AnvilError>() {
    Ok(scheduler @ (AnvilError::Plugin { .. } | AnvilError::PluginImport { .. })) => scheduler,
    Ok(other) => AnvilError::Plugin {
      plugin: plugin.into(),
      source: AnyhowError::new(other),
    },
    Err(err) => AnvilError::Plugin {
      plugin: plugin.into(),
      source: err,
    },
  }
}

pub type AnvilResult<T, E = AnvilError> = std::result::Result<T, E>;
