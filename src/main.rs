//! Between entry point
//!
//! The web build starts from `between::web::start`; natively this runs a
//! short scripted session against in-memory storage and an in-memory page.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Between (native) starting...");
    log::info!("Native mode has no browser - serve the wasm build for the real game");

    if let Err(e) = demo_session() {
        log::error!("Demo session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_session() -> Result<(), Box<dyn std::error::Error>> {
    use std::rc::Rc;

    use between::consts::{AUTOSAVE_SLOT, SPLASH_SCREEN};
    use between::persistence::GameStateStore;
    use between::platform::MemoryStore;
    use between::settings::Settings;
    use between::state::Variable;
    use between::ui::{App, ChatView, ManualScheduler, MemoryDom, Message, ScreenManager};

    let storage = MemoryStore::new();
    let settings = Settings::load(&storage);
    let mut store = GameStateStore::new(storage);
    let restored = store.initialize()?;
    println!("Autosave restored: {}", restored);

    let dom = Rc::new(MemoryDom::with_elements([
        "#splash-screen",
        "#messenger-screen",
        "#messenger-screen .chat-messages",
        "#messenger-screen .typing-indicator",
        ".app[data-app='messenger'] .notification-dot",
    ]));
    let scheduler = Rc::new(ManualScheduler::new());
    let mut chat = ChatView::new(
        Rc::clone(&dom),
        Rc::clone(&scheduler),
        settings.effective_pacing(),
        7,
    );
    let mut screens = ScreenManager::new(
        Rc::clone(&dom),
        Rc::clone(&scheduler),
        settings.effective_pulse_ms(),
    )
    .with_active(SPLASH_SCREEN);

    screens.show_notification_dot(App::Messenger, true)?;
    screens.show_screen("messenger-screen")?;
    chat.show_typing_indicator("messenger-screen", true)?;
    let first = Message::incoming(App::Messenger, "You up?");
    chat.display_message("messenger-screen", &first)?;
    scheduler.run_all();
    chat.show_typing_indicator("messenger-screen", false)?;
    let reply = Message::outgoing(App::Messenger, "Yeah. Why?");
    chat.display_message("messenger-screen", &reply)?;
    scheduler.run_all();

    if let Some(window) = dom.element("#messenger-screen .chat-messages") {
        for bubble in &window.children {
            println!("[{}] {}", bubble.classes.join(" "), bubble.text);
        }
    }

    // Decision point
    store.set_variable(Variable::Trust(75));
    store.set_variable(Variable::CurrentPassage("LateNightReply".to_string()));
    store.save(AUTOSAVE_SLOT)?;

    store.set_variable(Variable::Trust(10));
    store.load(AUTOSAVE_SLOT)?;
    println!(
        "Resumed at {} with trust {}",
        store.current_passage(),
        store.state().trust
    );

    Ok(())
}
