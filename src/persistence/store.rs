//! Game state store
//!
//! Owns the live [`GameState`] and moves it in and out of save slots.
//! Failures are logged here and handed back to the caller, who decides
//! whether to retry, warn the player, or carry on.

use serde_json::Value;

use super::snapshot::{decode, encode, slot_key, slot_name};
use crate::consts::AUTOSAVE_SLOT;
use crate::error::{StoreError, VariableError};
use crate::platform::KeyValueStore;
use crate::state::{GameState, Variable, VariableName};

/// Live game state plus the durable store backing its save slots
pub struct GameStateStore<S: KeyValueStore> {
    storage: S,
    state: GameState,
}

impl<S: KeyValueStore> GameStateStore<S> {
    /// Create a store holding default state. Nothing is read until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: GameState::default(),
        }
    }

    /// Reset to defaults, then restore the autosave slot if there is one.
    ///
    /// Returns true if the autosave was restored. A corrupt autosave is
    /// reported as an error and the defaults stay active.
    pub fn initialize(&mut self) -> Result<bool, StoreError> {
        self.state = GameState::default();
        let restored = self.load(AUTOSAVE_SLOT)?;
        if !restored {
            log::info!("No autosave found, starting at {}", self.state.current_passage);
        }
        Ok(restored)
    }

    /// Write the current state to a slot (last write wins)
    pub fn save(&mut self, slot: &str) -> Result<(), StoreError> {
        let result = slot_key(slot).and_then(|key| {
            let json = encode(&self.state)?;
            self.storage.set(&key, &json)?;
            Ok(())
        });

        match &result {
            Ok(()) => log::info!("Game saved to slot: {}", slot),
            Err(e) => log::error!("Error saving game to slot {}: {}", slot, e),
        }
        result
    }

    /// Replace the live state with a slot's snapshot.
    ///
    /// `Ok(false)` if the slot has never been saved or holds an empty
    /// value. On any error the live state is left exactly as it was.
    pub fn load(&mut self, slot: &str) -> Result<bool, StoreError> {
        let result = slot_key(slot).and_then(|key| match self.storage.get(&key)? {
            Some(json) if !json.is_empty() => decode(slot, &json).map(Some),
            _ => Ok(None),
        });

        match result {
            Ok(Some(state)) => {
                self.state = state;
                log::info!(
                    "Game loaded from slot: {} (passage {})",
                    slot,
                    self.state.current_passage
                );
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                log::error!("Error loading game from slot {}: {}", slot, e);
                Err(e)
            }
        }
    }

    /// Remove a slot. Removing a slot that does not exist is not an error.
    pub fn delete(&mut self, slot: &str) -> Result<(), StoreError> {
        let key = slot_key(slot)?;
        self.storage.remove(&key)?;
        log::info!("Deleted save slot: {}", slot);
        Ok(())
    }

    /// Names of all slots present in storage, sorted
    pub fn slots(&self) -> Result<Vec<String>, StoreError> {
        let mut slots: Vec<String> = self
            .storage
            .keys()?
            .iter()
            .filter_map(|key| slot_name(key))
            .map(str::to_string)
            .collect();
        slots.sort();
        Ok(slots)
    }

    pub fn set_variable(&mut self, variable: Variable) {
        log::debug!("Game state updated: {}", variable);
        self.state.apply(variable);
    }

    /// Untyped mutation for page scripts.
    ///
    /// Unknown names and wrongly typed values leave the state untouched.
    pub fn set_variable_by_name(&mut self, name: &str, value: Value) -> Result<(), VariableError> {
        self.apply_checked(Variable::from_json(name, value))
    }

    /// Like [`set_variable_by_name`](Self::set_variable_by_name), for a value
    /// already rendered as JSON text. `None` stands for a value with no JSON
    /// form (`undefined`, functions) and is rejected.
    pub fn set_variable_from_text(
        &mut self,
        name: &str,
        json: Option<&str>,
    ) -> Result<(), VariableError> {
        self.apply_checked(Variable::from_json_text(name, json))
    }

    fn apply_checked(
        &mut self,
        variable: Result<Variable, VariableError>,
    ) -> Result<(), VariableError> {
        match variable {
            Ok(variable) => {
                self.set_variable(variable);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected game state update: {}", e);
                Err(e)
            }
        }
    }

    pub fn variable(&self, name: VariableName) -> Variable {
        self.state.get(name)
    }

    /// Unlock a gallery entry; false if it was already unlocked
    pub fn unlock_gallery(&mut self, id: &str) -> bool {
        let added = self.state.unlock_gallery(id);
        if added {
            log::info!("Gallery unlocked: {}", id);
        }
        added
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Passage the presentation layer should resume at
    pub fn current_passage(&self) -> &str {
        &self.state.current_passage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Backing store, for data kept beside the save slots (settings)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
