// anvil/src/pipeline/mod.rs

//! Defines the `Pipeline<T>` scheduler, plugin specs, and the resumable
//! `Task` unit it drives.

pub mod definition;
pub mod execution;
pub mod task;

// Re-export the main scheduler types
pub use definition::{Pipeline, PluginSpec};
pub use task::{Continuation, PluginFn, PluginHandle, PluginId, Progress, Task, Work};
