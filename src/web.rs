//! Browser bindings
//!
//! Exposes the game to page scripts as the JS class `Game`. Page scripts
//! own the story flow; this side owns state, saves and DOM effects.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::consts::SPLASH_SCREEN;
use crate::persistence::GameStateStore;
use crate::platform::LocalStorage;
use crate::settings::Settings;
use crate::state::VariableName;
use crate::ui::{App, BrowserScheduler, ChatView, Message, ScreenManager, WebDom};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Between starting...");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance holding all client state
#[wasm_bindgen]
pub struct Game {
    store: GameStateStore<LocalStorage>,
    settings: Settings,
    chat: ChatView<WebDom, BrowserScheduler>,
    screens: ScreenManager<WebDom, BrowserScheduler>,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Game, JsValue> {
        let storage = LocalStorage::open().map_err(to_js)?;
        let settings = Settings::load(&storage);
        let dom = Rc::new(WebDom::from_window().map_err(to_js)?);
        let seed = js_sys::Date::now() as u64;

        let chat = ChatView::new(
            Rc::clone(&dom),
            BrowserScheduler::from_window().map_err(to_js)?,
            settings.effective_pacing(),
            seed,
        );
        let screens = ScreenManager::new(
            dom,
            BrowserScheduler::from_window().map_err(to_js)?,
            settings.effective_pulse_ms(),
        )
        .with_active(SPLASH_SCREEN);

        Ok(Game {
            store: GameStateStore::new(storage),
            settings,
            chat,
            screens,
        })
    }

    /// Reset to defaults and restore the autosave.
    /// Returns true if a saved game was found.
    pub fn initialize(&mut self) -> bool {
        match self.store.initialize() {
            Ok(restored) => restored,
            Err(e) => {
                log::error!("Autosave unusable, starting fresh: {}", e);
                false
            }
        }
    }

    /// Save to a slot. On failure the player is warned and false returned.
    #[wasm_bindgen(js_name = saveGame)]
    pub fn save_game(&mut self, slot: &str) -> bool {
        let saved = self.store.save(slot).is_ok();
        self.screens.show_save_warning(!saved);
        saved
    }

    /// Save to the autosave slot.
    /// Returns true only if a snapshot was written; false when the save
    /// failed or autosave is turned off.
    pub fn autosave(&mut self) -> bool {
        match self.settings.autosave_slot() {
            Some(slot) => self.save_game(slot),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = loadGame)]
    pub fn load_game(&mut self, slot: &str) -> bool {
        self.store.load(slot).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = deleteSave)]
    pub fn delete_save(&mut self, slot: &str) -> Result<(), JsValue> {
        self.store.delete(slot).map_err(to_js)
    }

    #[wasm_bindgen(js_name = listSaves)]
    pub fn list_saves(&self) -> Result<Vec<String>, JsValue> {
        self.store.slots().map_err(to_js)
    }

    /// Set a variable from any JSON-compatible value.
    /// Returns false (and changes nothing) for unknown names or wrong types.
    #[wasm_bindgen(js_name = setVariable)]
    pub fn set_variable(&mut self, key: &str, value: JsValue) -> bool {
        // `undefined`, functions and symbols stringify to `undefined`, not a string
        let json = js_sys::JSON::stringify(&value).ok().and_then(|s| s.as_string());
        self.store.set_variable_from_text(key, json.as_deref()).is_ok()
    }

    #[wasm_bindgen(js_name = getVariable)]
    pub fn get_variable(&self, key: &str) -> JsValue {
        let Some(name) = VariableName::from_name(key) else {
            return JsValue::UNDEFINED;
        };
        let json = self.store.variable(name).to_json().to_string();
        js_sys::JSON::parse(&json).unwrap_or(JsValue::UNDEFINED)
    }

    #[wasm_bindgen(js_name = unlockGallery)]
    pub fn unlock_gallery(&mut self, id: &str) -> bool {
        self.store.unlock_gallery(id)
    }

    #[wasm_bindgen(js_name = currentPassage)]
    pub fn current_passage(&self) -> String {
        self.store.current_passage().to_string()
    }

    #[wasm_bindgen(js_name = displayMessage)]
    pub fn display_message(
        &mut self,
        screen_id: &str,
        text: &str,
        is_incoming: bool,
        app: &str,
    ) -> Result<(), JsValue> {
        let app = App::from_name(app).ok_or_else(|| to_js(format!("unknown app {}", app)))?;
        let message = if is_incoming {
            Message::incoming(app, text)
        } else {
            Message::outgoing(app, text)
        };
        self.chat.display_message(screen_id, &message).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = showTypingIndicator)]
    pub fn show_typing_indicator(&self, screen_id: &str, show: bool) -> Result<(), JsValue> {
        self.chat.show_typing_indicator(screen_id, show).map_err(to_js)
    }

    #[wasm_bindgen(js_name = showScreen)]
    pub fn show_screen(&mut self, screen_id: &str) -> Result<(), JsValue> {
        self.screens.show_screen(screen_id).map_err(to_js)
    }

    pub fn pulse(&self, selector: &str) -> Result<(), JsValue> {
        self.screens.pulse(selector).map_err(to_js)
    }

    #[wasm_bindgen(js_name = showNotificationDot)]
    pub fn show_notification_dot(&self, app: &str, show: bool) -> Result<(), JsValue> {
        let app = App::from_name(app).ok_or_else(|| to_js(format!("unknown app {}", app)))?;
        self.screens.show_notification_dot(app, show).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.settings.reduced_motion = reduced;
        self.chat.set_pacing(self.settings.effective_pacing());
        self.screens.set_pulse_ms(self.settings.effective_pulse_ms());
        self.settings.save(self.store.storage_mut());
    }

    /// Cancel pending chat messages and highlights
    pub fn teardown(&self) {
        self.chat.teardown();
        self.screens.teardown();
    }
}
