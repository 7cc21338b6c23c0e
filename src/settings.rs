//! Presentation settings and preferences
//!
//! Persisted separately from save slots, in the same key-value store.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{AUTOSAVE_SLOT, PULSE_MS, SETTINGS_KEY};
use crate::platform::KeyValueStore;

/// Chat message pacing: a fixed lower bound plus uniform jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Minimum delay before a message appears (ms)
    pub min_ms: u32,
    /// Extra random delay, uniform in [0, jitter_ms] (ms)
    pub jitter_ms: u32,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min_ms: 500,
            jitter_ms: 1000,
        }
    }
}

impl Pacing {
    /// No delay at all
    pub const INSTANT: Pacing = Pacing {
        min_ms: 0,
        jitter_ms: 0,
    };

    /// Pick a delay for the next message
    pub fn delay_ms<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.jitter_ms == 0 {
            return self.min_ms;
        }
        self.min_ms.saturating_add(rng.random_range(0..=self.jitter_ms))
    }
}

/// Presentation settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chat message pacing
    pub pacing: Pacing,
    /// Pulse highlight duration (ms), matches the CSS animation
    pub pulse_ms: u32,
    /// Show messages immediately and skip pulse highlights
    pub reduced_motion: bool,
    /// Write the autosave slot at decision points
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            pulse_ms: PULSE_MS,
            reduced_motion: false,
            autosave: true,
        }
    }
}

impl Settings {
    /// Storage key. The `:` keeps it outside the `between_<slot>` key space.
    pub const STORAGE_KEY: &'static str = SETTINGS_KEY;

    /// Pacing after accounting for reduced motion
    pub fn effective_pacing(&self) -> Pacing {
        if self.reduced_motion {
            Pacing::INSTANT
        } else {
            self.pacing
        }
    }

    /// Whether pulse highlights should run
    pub fn effective_pulse(&self) -> bool {
        !self.reduced_motion && self.pulse_ms > 0
    }

    /// Pulse duration after accounting for reduced motion (0 = off)
    pub fn effective_pulse_ms(&self) -> u32 {
        if self.effective_pulse() { self.pulse_ms } else { 0 }
    }

    /// Slot to write at decision points, None when autosave is off
    pub fn autosave_slot(&self) -> Option<&'static str> {
        self.autosave.then_some(AUTOSAVE_SLOT)
    }

    /// Load settings, falling back to defaults on missing or bad data
    pub fn load<S: KeyValueStore>(storage: &S) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save<S: KeyValueStore>(&self, storage: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}
