//! Platform abstraction layer
//!
//! Handles browser/native differences for durable storage
//! (LocalStorage on web, an in-memory map natively and in tests).

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{KeyValueStore, MemoryStore};
