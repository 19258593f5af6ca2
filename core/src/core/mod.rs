pub mod container;
pub mod matching;
pub mod merge;
pub mod pin;
pub mod proxy;

// Re-export key types for easier access from other anvil modules (and lib.rs)
pub use container::{Container, ContainerHooks, DefaultHooks};
pub use matching::match_keys;
pub use merge::Merge;
pub use pin::{collect_from, Pin, PinDefault, PinDescriptor, PinSchema, PinStorage};
pub use proxy::{ContainerProxy, KeyCodec, Namespaces, SeparatorCodec};
