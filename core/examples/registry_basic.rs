// anvil/examples/registry_basic.rs

use anvil::{AnvilError, Pipeline, PluginRegistry, Work};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
struct ReleaseContext {
  steps: Vec<String>,
}

fn main() -> Result<(), AnvilError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Registry Example ---");

  // 1. Register plugins under import-style identifiers. A bare module path
  //    gets the default symbol appended ("release.compile:default").
  let registry = Arc::new(PluginRegistry::<ReleaseContext>::new());
  registry.register_fn("release.compile", |_pipeline, ctx: &mut ReleaseContext| {
    ctx.steps.push("compile".to_string());
    Ok(Work::done())
  })?;
  registry.register_fn("release.package:apply", |pipeline: &mut Pipeline<ReleaseContext>, ctx: &mut ReleaseContext| {
    // Compile must fully finish before packaging resumes.
    pipeline.require(ctx, "release.compile")?;
    Ok(Work::then(|_pipeline, ctx: &mut ReleaseContext| {
      ctx.steps.push("package".to_string());
      Ok(())
    }))
  })?;

  // 2. Seed the run with string identifiers; the pipeline resolves them
  //    through its registry.
  let mut pipeline = Pipeline::with_registry(Arc::clone(&registry));
  let mut ctx = ReleaseContext::default();
  pipeline.run(&mut ctx, ["release.package:apply"])?;

  info!("steps: {:?}", ctx.steps);
  assert_eq!(ctx.steps, vec!["compile", "package"]);

  // 3. Unknown identifiers surface as import errors.
  let mut other = Pipeline::with_registry(registry);
  let err = other.run(&mut ctx, ["release.sign"]).unwrap_err();
  info!("expected failure: {err}");

  Ok(())
}
