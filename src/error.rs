//! Error types
//!
//! Every failure here is recoverable: callers log it, surface it to the
//! player, or ignore it. Nothing in the crate aborts on these.

use thiserror::Error;

/// Failure talking to the durable key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },
    #[error("storage read failed for {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("storage write failed for {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Failure saving, loading or deleting a save slot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid slot name {0:?}")]
    InvalidSlot(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode game state: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot in slot {slot:?} is corrupt: {source}")]
    Corrupt {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected game-state mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    #[error("unknown game state variable: {0}")]
    Unknown(String),
    #[error("variable {name} expects {expected}")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
    },
}

/// Presentation-layer failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("no element matches {0:?}")]
    MissingTarget(String),
    #[error("browser call failed: {0}")]
    Platform(String),
}
