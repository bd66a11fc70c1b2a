//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, touch)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{DeviceEvent, Key, translate};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
