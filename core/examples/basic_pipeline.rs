// anvil/examples/basic_pipeline.rs

use anvil::{AnvilError, Container, Pipeline, PluginHandle, Work};
use tracing::info;

// 1. Define the context for the build run: the artifacts being composed.
#[derive(Debug, Default)]
struct BuildContext {
  artifacts: Container<String, String>,
  log: Vec<String>,
}

fn main() -> Result<(), AnvilError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. Define plugins. A plugin may require other plugins while running
  //    and suspend to resume after they have fully completed.
  let header = PluginHandle::new(|_pipeline, ctx: &mut BuildContext| {
    ctx
      .artifacts
      .insert("site/header.html".to_string(), "<h1>anvil</h1>".to_string());
    ctx.log.push("header".to_string());
    Ok(Work::done())
  });

  let page = PluginHandle::new(move |pipeline: &mut Pipeline<BuildContext>, ctx: &mut BuildContext| {
    // Run the dependency first, then continue after it is fully done.
    pipeline.require(ctx, header.clone())?;
    Ok(Work::then(|_pipeline, ctx: &mut BuildContext| {
      let header = ctx
        .artifacts
        .get("site/header.html")
        .cloned()
        .unwrap_or_default();
      ctx
        .artifacts
        .insert("site/index.html".to_string(), format!("{header}<p>hello</p>"));
      ctx.log.push("page".to_string());
      Ok(())
    }))
  });

  // 3. Run: the pipeline drains the page plugin and everything it requires
  //    in dependency-first order.
  let mut pipeline = Pipeline::new();
  let mut ctx = BuildContext::default();
  pipeline.run(&mut ctx, vec![page])?;

  info!("execution order: {:?}", ctx.log);
  for (key, value) in ctx.artifacts.iter() {
    info!("artifact {key}: {value}");
  }

  assert_eq!(ctx.log, vec!["header", "page"]);
  Ok(())
}
