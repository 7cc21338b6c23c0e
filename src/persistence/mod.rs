//! Save/load persistence for narrative state
//!
//! Features:
//! - JSON snapshots with stable field names
//! - Namespaced slot keys (`between_<slot>`)
//! - Strict decoding: partial or corrupt snapshots never replace live state

pub mod snapshot;
pub mod store;

pub use snapshot::{decode, encode, slot_key};
pub use store::GameStateStore;
