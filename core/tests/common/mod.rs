// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use anvil::{Container, ContainerHooks, Merge, Pipeline, PluginHandle, Work};
use tracing::Level;

// --- Common Context Struct ---
#[derive(Debug, Default)]
pub struct TestContext {
  pub log: Vec<String>,
  pub counter: i32,
  pub artifacts: Container<String, String>,
}

impl TestContext {
  pub fn record(&mut self, entry: impl Into<String>) {
    let entry = entry.into();
    tracing::debug!(target: "test_plugins", entry = %entry, "recorded");
    self.log.push(entry);
  }
}

// --- Common Plugin Constructors ---

/// Records its label and finishes without suspending.
pub fn record_plugin(label: &'static str) -> PluginHandle<TestContext> {
  PluginHandle::new(move |_pipeline, ctx: &mut TestContext| {
    ctx.record(label);
    Ok(Work::done())
  })
}

/// Records `{label}:body` immediately and `{label}:resume` on its single
/// continuation.
pub fn suspending_plugin(label: &'static str) -> PluginHandle<TestContext> {
  PluginHandle::new(move |_pipeline, ctx: &mut TestContext| {
    ctx.record(format!("{label}:body"));
    Ok(Work::then(move |_pipeline, ctx: &mut TestContext| {
      ctx.record(format!("{label}:resume"));
      Ok(())
    }))
  })
}

/// Records `{label}:body` once and `{label}:resume{i}` for each of
/// `checkpoints` continuations.
pub fn checkpoint_plugin(label: &'static str, checkpoints: usize) -> PluginHandle<TestContext> {
  PluginHandle::new(move |_pipeline, ctx: &mut TestContext| {
    ctx.record(format!("{label}:body"));
    let mut work = Work::done();
    for i in 0..checkpoints {
      work = work.and_then(move |_pipeline: &mut Pipeline<TestContext>, ctx: &mut TestContext| {
        ctx.record(format!("{label}:resume{i}"));
        Ok(())
      });
    }
    Ok(work)
  })
}

/// Requires `dep`, suspends once, then records its label -- the canonical
/// "run dependency, continue after it is fully done" idiom.
pub fn dependent_plugin(
  label: &'static str,
  dep: PluginHandle<TestContext>,
) -> PluginHandle<TestContext> {
  PluginHandle::new(move |pipeline, ctx: &mut TestContext| {
    pipeline.require(ctx, dep.clone())?;
    Ok(Work::then(move |_pipeline, ctx: &mut TestContext| {
      ctx.record(label);
      Ok(())
    }))
  })
}

/// Fails in the plugin body itself.
pub fn failing_plugin(message: &'static str) -> PluginHandle<TestContext> {
  PluginHandle::new(move |_pipeline, _ctx: &mut TestContext| {
    Err(anyhow::anyhow!(message))
  })
}

/// Suspends once, then fails in the continuation.
pub fn failing_continuation_plugin(message: &'static str) -> PluginHandle<TestContext> {
  PluginHandle::new(move |_pipeline, _ctx: &mut TestContext| {
    Ok(Work::then(move |_pipeline, _ctx: &mut TestContext| {
      Err(anyhow::anyhow!(message))
    }))
  })
}

// --- Mergeable value for merge tests ---

/// Absorbs other tallies by summing; keeps its original tag, which makes
/// in-place mutation observable after a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
  pub total: i64,
  pub tag: &'static str,
}

impl Tally {
  pub fn new(total: i64, tag: &'static str) -> Self {
    Self { total, tag }
  }
}

impl Merge for Tally {
  fn merge(&mut self, other: &mut Self) -> bool {
    self.total += other.total;
    true
  }
}

// --- Container hook strategies ---

/// Uppercases every stored string value.
#[derive(Debug, Default)]
pub struct UppercaseHooks;

impl ContainerHooks<String, String> for UppercaseHooks {
  fn process(&mut self, _key: &String, value: String) -> String {
    value.to_uppercase()
  }
}

/// Recovers missing entries with a generated value and counts how many
/// times recovery ran.
#[derive(Debug, Default)]
pub struct RecoveringHooks {
  pub recoveries: usize,
}

impl ContainerHooks<String, String> for RecoveringHooks {
  fn missing(&mut self, key: &String) -> Option<String> {
    self.recoveries += 1;
    Some(format!("generated:{key}"))
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
