//! Between: Fractured Promises - client scripting layer
//!
//! Core modules:
//! - `state`: Narrative variables (trust, romance, suspicion, passage, gallery)
//! - `persistence`: Save slots with strict snapshot decoding
//! - `platform`: Durable storage (LocalStorage on web, in-memory natively)
//! - `ui`: Chat rendering, screen transitions, small effects
//! - `settings`: Presentation preferences

pub mod error;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod state;
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{StorageError, StoreError, UiError, VariableError};
pub use persistence::GameStateStore;
pub use settings::{Pacing, Settings};
pub use state::{GameState, Variable, VariableName};

/// Fixed identifiers shared with the page and its stylesheet
pub mod consts {
    /// Prefix of every save slot key (`between_<slot>`)
    pub const NAMESPACE: &str = "between";
    /// Slot loaded on startup and written at decision points
    pub const AUTOSAVE_SLOT: &str = "autosave";
    /// Passage the story starts on
    pub const START_PASSAGE: &str = "Start";

    /// Screen shown when the page loads
    pub const SPLASH_SCREEN: &str = "splash-screen";
    /// Class driving the pulse keyframes in the stylesheet
    pub const PULSE_CLASS: &str = "pulse-animation";
    /// Pulse keyframe duration (ms)
    pub const PULSE_MS: u32 = 1500;
    /// Element revealed when progress could not be saved
    pub const SAVE_WARNING: &str = "#save-warning";

    /// Settings key; the `:` keeps it outside the slot key space
    pub const SETTINGS_KEY: &str = "between:settings";
}
