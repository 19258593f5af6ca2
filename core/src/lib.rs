// src/lib.rs

//! Anvil: a cooperative, pluggable build-orchestration core for Rust.
//!
//! Anvil schedules resumable plugins in dependency-first order over a
//! generic merge-aware key/value data model:
//!  - Plugins are callables that may suspend; the scheduler consumes one
//!    suspension point per tick.
//!  - A plugin may `require` other plugins while running; nested requires
//!    fully drain before the requester resumes (LIFO stack discipline).
//!  - Plugin identities are deduplicated per run, so requiring the same
//!    plugin twice executes it once.
//!  - `Container` is an insertion-ordered mapping with insertion hooks and
//!    recursive merge; `ContainerProxy` flattens a two-level nesting of
//!    containers into one view; `Pin` binds names to keys with lazy,
//!    cached defaults.
//!  - A `PluginRegistry` resolves `"module.path:symbol"` reference specs
//!    to plugin handles, populated explicitly at startup.
//!
//! The engine is single-threaded and cooperative by design: the context
//! object is the only shared resource and there is never more than one
//! active mutator.

// Declare modules according to the planned structure
pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

// Scheduler types users interact with frequently
pub use crate::pipeline::definition::{Pipeline, PluginSpec};
pub use crate::pipeline::task::{Continuation, PluginFn, PluginHandle, PluginId, Progress, Task, Work};

// The data model backing generated artifacts
pub use crate::core::container::{Container, ContainerHooks, DefaultHooks};
pub use crate::core::matching::match_keys;
pub use crate::core::merge::Merge;
pub use crate::core::pin::{collect_from, Pin, PinDefault, PinDescriptor, PinSchema, PinStorage};
pub use crate::core::proxy::{ContainerProxy, KeyCodec, Namespaces, SeparatorCodec};

pub use crate::error::{AnvilError, AnvilResult};

// The plugin registry for reference specs
pub use crate::registry::PluginRegistry;

/*
    Core Workflow:
    1. Define a context struct `MyCtx` holding the artifacts being built
       (typically `Container`s or proxies over them).
    2. Register plugins with a `PluginRegistry<MyCtx>` under
       `"module.path:symbol"` identifiers, or hold `PluginHandle`s directly.
    3. Create a `Pipeline<MyCtx>` over the registry.
    4. Inside a plugin body, call `pipeline.require(ctx, spec)` for each
       dependency, then return `Work::then(..)` to resume after those
       dependencies have fully completed.
    5. Call `pipeline.run(&mut ctx, specs)` with the seed specs; errors
       abort the run synchronously with causes attached.
*/
