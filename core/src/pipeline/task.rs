// anvil/src/pipeline/task.rs

//! Plugin handles, suspension work queues, and the resumable [`Task`] unit.
//!
//! A plugin body runs exactly once and returns a [`Work`] queue of deferred
//! continuations, one per suspension point. The scheduler drives the
//! wrapping [`Task`] with [`Task::advance`], consuming one continuation per
//! tick; the cursor only ever moves forward.

use crate::error::{wrap_plugin_failure, AnvilResult};
use crate::pipeline::definition::Pipeline;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// Callable shape of a plugin body.
///
/// The body receives the scheduler (for nested `require` calls) and the
/// caller-owned context, and returns the remaining suspension points as a
/// [`Work`] queue.
pub type PluginFn<T> = dyn Fn(&mut Pipeline<T>, &mut T) -> anyhow::Result<Work<T>>;

/// One resumed section of a suspended plugin body.
pub type Continuation<T> = Box<dyn FnOnce(&mut Pipeline<T>, &mut T) -> anyhow::Result<()>>;

/// Opaque identity of a plugin: the unit of deduplication.
///
/// Two handles cloned from the same origin share an identity; two plugins
/// built from textually identical closures do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId(usize);

/// A shareable reference to a plugin body, optionally carrying the display
/// name it was registered under (used for error attribution).
pub struct PluginHandle<T> {
  func: Arc<PluginFn<T>>,
  name: Option<Arc<str>>,
}

impl<T> PluginHandle<T> {
  pub fn new(f: impl Fn(&mut Pipeline<T>, &mut T) -> anyhow::Result<Work<T>> + 'static) -> Self {
    Self {
      func: Arc::new(f),
      name: None,
    }
  }

  /// Attaches a display name. The identity is unaffected: the name rides
  /// along with the handle, the id stays with the shared body.
  pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn id(&self) -> PluginId {
    PluginId(Arc::as_ptr(&self.func) as *const () as usize)
  }

  pub(crate) fn describe(&self) -> String {
    match &self.name {
      Some(name) => name.to_string(),
      None => format!("<anonymous plugin {:#x}>", self.id().0),
    }
  }
}

impl<T> Clone for PluginHandle<T> {
  fn clone(&self) -> Self {
    Self {
      func: Arc::clone(&self.func),
      name: self.name.clone(),
    }
  }
}

impl<T> fmt::Debug for PluginHandle<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PluginHandle")
      .field("name", &self.name)
      .field("id", &self.id())
      .finish()
  }
}

/// Deferred continuations produced by a plugin body.
///
/// Each continuation is the code after one suspension point; the scheduler
/// consumes exactly one per tick, after any plugins required before the
/// suspension have fully drained.
pub struct Work<T> {
  continuations: VecDeque<Continuation<T>>,
}

impl<T> Work<T> {
  /// No suspension points: the plugin is finished once its body returns.
  pub fn done() -> Self {
    Self {
      continuations: VecDeque::new(),
    }
  }

  /// Suspend once, resuming with `f` on the next scheduling tick.
  pub fn then(f: impl FnOnce(&mut Pipeline<T>, &mut T) -> anyhow::Result<()> + 'static) -> Self {
    Self::done().and_then(f)
  }

  /// Appends another suspension point after the existing ones.
  pub fn and_then(
    mut self,
    f: impl FnOnce(&mut Pipeline<T>, &mut T) -> anyhow::Result<()> + 'static,
  ) -> Self {
    self.continuations.push_back(Box::new(f));
    self
  }

  pub fn len(&self) -> usize {
    self.continuations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.continuations.is_empty()
  }
}

impl<T> Default for Work<T> {
  fn default() -> Self {
    Self::done()
  }
}

impl<T> fmt::Debug for Work<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Work")
      .field("remaining", &self.continuations.len())
      .finish()
  }
}

/// Outcome of a single [`Task::advance`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
  /// The task has unconsumed suspension points and must be rescheduled.
  Pending,
  /// The task is exhausted and can be discarded.
  Complete,
}

impl Progress {
  pub fn is_pending(self) -> bool {
    matches!(self, Progress::Pending)
  }
}

/// A unit of work generated by the pipeline: one plugin plus its adopted
/// work queue (absent until the first advance). Owned exclusively by the
/// scheduler while pending, dropped once exhausted.
pub struct Task<T> {
  plugin: PluginHandle<T>,
  work: Option<Work<T>>,
}

impl<T> Task<T> {
  pub fn new(plugin: PluginHandle<T>) -> Self {
    Self { plugin, work: None }
  }

  pub fn plugin(&self) -> &PluginHandle<T> {
    &self.plugin
  }

  /// Makes progress on the task: the plugin body on the first call, one
  /// continuation per call after that. Reports [`Progress::Pending`] while
  /// suspension points remain.
  ///
  /// Failures that are not already scheduler errors are wrapped into
  /// [`AnvilError::Plugin`] attributing the plugin.
  ///
  /// [`AnvilError::Plugin`]: crate::AnvilError::Plugin
  pub fn advance(&mut self, pipeline: &mut Pipeline<T>, ctx: &mut T) -> AnvilResult<Progress> {
    let outcome: anyhow::Result<()> = match self.work.as_mut() {
      None => {
        event!(Level::TRACE, plugin = %self.plugin.describe(), "Invoking plugin body.");
        match (self.plugin.func)(pipeline, ctx) {
          Ok(work) => {
            self.work = Some(work);
            Ok(())
          }
          Err(err) => Err(err),
        }
      }
      Some(work) => match work.continuations.pop_front() {
        Some(continuation) => {
          event!(Level::TRACE, plugin = %self.plugin.describe(), "Resuming plugin continuation.");
          continuation(pipeline, ctx)
        }
        // Advancing an exhausted task is a no-op; it stays complete.
        None => Ok(()),
      },
    };

    if let Err(err) = outcome {
      return Err(wrap_plugin_failure(self.plugin.describe(), err));
    }

    let pending = self
      .work
      .as_ref()
      .map_or(false, |work| !work.continuations.is_empty());
    Ok(if pending {
      Progress::Pending
    } else {
      Progress::Complete
    })
  }
}

impl<T> fmt::Debug for Task<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Task")
      .field("plugin", &self.plugin)
      .field("work", &self.work)
      .finish()
  }
}
