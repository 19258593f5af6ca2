// anvil/src/pipeline/execution.rs

//! Contains `Pipeline::require()` and `Pipeline::run()`, the scheduling
//! loop that drives tasks to completion in dependency-first order.

use crate::error::AnvilResult;
use crate::pipeline::definition::{Pipeline, PluginSpec};
use crate::pipeline::task::Task;
use tracing::{event, instrument, Level};

impl<T> Pipeline<T> {
  /// Makes sure the specified plugin has been executed or is scheduled.
  ///
  /// The plugin's identity enters the dedup set before its first advance,
  /// so a plugin that re-requires itself (directly or transitively) never
  /// re-enters. If the first advance leaves suspension points, the task is
  /// pushed onto the pending stack.
  ///
  /// Called from inside a running plugin, this is the dependency idiom:
  /// the nested plugin performs its first advance immediately and lands on
  /// the stack above the requester's own continuation, so it fully drains
  /// (with everything it transitively requires) before the requester
  /// resumes.
  pub fn require(&mut self, ctx: &mut T, spec: impl Into<PluginSpec<T>>) -> AnvilResult<()> {
    let plugin = self.resolve(spec.into())?;
    if self.plugins.contains_key(&plugin.id()) {
      event!(Level::TRACE, plugin = %plugin.name().unwrap_or("<anonymous>"), "Plugin already requested, skipping.");
      return Ok(());
    }
    // The retained handle keeps the body allocation (and therefore the
    // identity) alive for the rest of the run, so a later plugin can never
    // be allocated at the same address and collide with it.
    self.plugins.insert(plugin.id(), plugin.clone());

    event!(Level::DEBUG, plugin = %plugin.name().unwrap_or("<anonymous>"), "Requiring plugin.");
    let mark = self.tasks.len();
    let mut task = Task::new(plugin);
    if task.advance(self, ctx)?.is_pending() {
      // Below anything the first advance scheduled: required work drains
      // before this plugin resumes.
      self.tasks.insert(mark, task);
    }
    Ok(())
  }

  /// Runs the specified plugins and drains every task they schedule.
  ///
  /// Seeds the stack by requiring each spec in order, then repeatedly pops
  /// the top task, advances it one tick, and returns it to the stack while
  /// it stays pending. Errors abort the remainder of the run,
  /// pending tasks included; nothing is retried or suppressed.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(context_type = %std::any::type_name::<T>()),
        err(Display)
    )]
  pub fn run<S, I>(&mut self, ctx: &mut T, specs: I) -> AnvilResult<()>
  where
    S: Into<PluginSpec<T>>,
    I: IntoIterator<Item = S>,
  {
    event!(Level::DEBUG, "Pipeline execution starting.");
    for spec in specs {
      self.require(ctx, spec)?;
    }

    while let Some(mut task) = self.tasks.pop() {
      let mark = self.tasks.len();
      if task.advance(self, ctx)?.is_pending() {
        // Re-enter beneath any tasks this tick scheduled, so a nested
        // require fully drains (transitive requires included) before the
        // requester's next checkpoint.
        self.tasks.insert(mark, task);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(())
  }
}
