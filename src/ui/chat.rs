//! Chat simulation
//!
//! Messages appear in a phone-style chat window after a pacing delay,
//! as if the other person were typing.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::dom::Dom;
use super::timer::{Scheduler, TimerSet};
use crate::error::UiError;
use crate::settings::Pacing;

/// In-game apps that host chats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum App {
    Messenger,
    MakeLove,
}

impl App {
    pub fn as_str(&self) -> &'static str {
        match self {
            App::Messenger => "messenger",
            App::MakeLove => "makelove",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "messenger" => Some(App::Messenger),
            "makelove" => Some(App::MakeLove),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the other person
    Incoming,
    /// From the player
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub direction: Direction,
    pub app: App,
}

impl Message {
    pub fn incoming(app: App, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Incoming,
            app,
        }
    }

    pub fn outgoing(app: App, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Outgoing,
            app,
        }
    }

    /// CSS classes for the message bubble
    pub fn classes(&self) -> Vec<String> {
        let dir = self.direction.as_str();
        vec![
            "chat-bubble".to_string(),
            dir.to_string(),
            format!("{}-{}", self.app.as_str(), dir),
        ]
    }
}

/// Selector for a chat screen's message list
pub fn messages_selector(screen_id: &str) -> String {
    format!("#{} .chat-messages", screen_id)
}

/// Selector for a chat screen's typing indicator
pub fn typing_selector(screen_id: &str) -> String {
    format!("#{} .typing-indicator", screen_id)
}

/// Renders chat messages into chat screens
pub struct ChatView<D: Dom + 'static, T: Scheduler> {
    dom: Rc<D>,
    timers: TimerSet<T>,
    pacing: Pacing,
    rng: Pcg32,
}

impl<D: Dom + 'static, T: Scheduler> ChatView<D, T> {
    pub fn new(dom: Rc<D>, scheduler: T, pacing: Pacing, seed: u64) -> Self {
        Self {
            dom,
            timers: TimerSet::new(scheduler),
            pacing,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_pacing(&mut self, pacing: Pacing) {
        self.pacing = pacing;
    }

    /// Queue a message for display in a chat screen.
    ///
    /// Returns the delay (ms) before it appears. Each message draws its own
    /// delay, so a quick reply can land before a slow one.
    pub fn display_message(&mut self, screen_id: &str, message: &Message) -> Result<u32, UiError> {
        let container = messages_selector(screen_id);
        if !self.dom.exists(&container) {
            log::warn!("Chat window not found: {}", container);
            return Err(UiError::MissingTarget(container));
        }

        let delay = self.pacing.delay_ms(&mut self.rng);
        let dom = Rc::clone(&self.dom);
        let text = message.text.clone();
        let classes = message.classes();

        self.timers.schedule(delay, move || {
            let shown = dom
                .append_text(&container, &text, &classes)
                .and_then(|()| dom.scroll_to_bottom(&container));
            if let Err(e) = shown {
                log::warn!("Dropped chat message: {}", e);
            }
        })?;
        Ok(delay)
    }

    pub fn show_typing_indicator(&self, screen_id: &str, show: bool) -> Result<(), UiError> {
        let selector = typing_selector(screen_id);
        self.dom.set_shown(&selector, show).inspect_err(|e| {
            log::warn!("Typing indicator not updated: {}", e);
        })
    }

    /// Messages queued but not yet shown
    pub fn pending(&self) -> usize {
        self.timers.outstanding()
    }

    /// Drop every queued message (view is going away)
    pub fn teardown(&self) {
        self.timers.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::dom::MemoryDom;
    use crate::ui::timer::ManualScheduler;

    const SCREEN: &str = "messenger-screen";

    type Chat = ChatView<MemoryDom, Rc<ManualScheduler>>;

    fn view(pacing: Pacing) -> (Rc<MemoryDom>, Rc<ManualScheduler>, Chat) {
        let dom = Rc::new(MemoryDom::with_elements([
            "#messenger-screen .chat-messages",
            "#messenger-screen .typing-indicator",
        ]));
        let scheduler = Rc::new(ManualScheduler::new());
        let chat = ChatView::new(Rc::clone(&dom), Rc::clone(&scheduler), pacing, 42);
        (dom, scheduler, chat)
    }

    #[test]
    fn test_message_classes() {
        let msg = Message::incoming(App::MakeLove, "hey");
        assert_eq!(msg.classes(), ["chat-bubble", "incoming", "makelove-incoming"]);
        let msg = Message::outgoing(App::Messenger, "hi");
        assert_eq!(msg.classes(), ["chat-bubble", "outgoing", "messenger-outgoing"]);
    }

    #[test]
    fn test_app_names() {
        for app in [App::Messenger, App::MakeLove] {
            assert_eq!(App::from_name(app.as_str()), Some(app));
        }
        assert_eq!(App::from_name("tinder"), None);
    }

    #[test]
    fn test_message_appears_after_pacing_delay() {
        let (dom, scheduler, mut chat) = view(Pacing::default());
        let delay = chat
            .display_message(SCREEN, &Message::incoming(App::Messenger, "Are you awake?"))
            .unwrap();
        assert!((500..=1500).contains(&delay));

        let container = "#messenger-screen .chat-messages";
        scheduler.advance(499);
        assert!(dom.element(container).unwrap().children.is_empty());
        assert_eq!(chat.pending(), 1);

        scheduler.advance(1001);
        let el = dom.element(container).unwrap();
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.children[0].text, "Are you awake?");
        assert!(el.scrolled_to_bottom);
        assert_eq!(chat.pending(), 0);
    }

    #[test]
    fn test_fixed_pacing_preserves_order() {
        let pacing = Pacing {
            min_ms: 200,
            jitter_ms: 0,
        };
        let (dom, scheduler, mut chat) = view(pacing);
        chat.display_message(SCREEN, &Message::incoming(App::Messenger, "one"))
            .unwrap();
        chat.display_message(SCREEN, &Message::outgoing(App::Messenger, "two"))
            .unwrap();
        scheduler.advance(200);

        let texts: Vec<_> = dom
            .element("#messenger-screen .chat-messages")
            .unwrap()
            .children
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn test_missing_chat_window_is_noop() {
        let (_dom, scheduler, mut chat) = view(Pacing::default());
        let err = chat
            .display_message("ghost-screen", &Message::incoming(App::Messenger, "boo"))
            .unwrap_err();
        assert_eq!(err, UiError::MissingTarget("#ghost-screen .chat-messages".into()));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_typing_indicator() {
        let (dom, _scheduler, chat) = view(Pacing::default());
        let selector = "#messenger-screen .typing-indicator";
        chat.show_typing_indicator(SCREEN, true).unwrap();
        assert_eq!(dom.is_shown(selector), Some(true));
        chat.show_typing_indicator(SCREEN, false).unwrap();
        assert_eq!(dom.is_shown(selector), Some(false));
        assert!(chat.show_typing_indicator("ghost-screen", true).is_err());
    }

    #[test]
    fn test_teardown_cancels_pending_messages() {
        let (dom, scheduler, mut chat) = view(Pacing::default());
        chat.display_message(SCREEN, &Message::incoming(App::Messenger, "late"))
            .unwrap();
        drop(chat);

        scheduler.run_all();
        assert!(dom
            .element("#messenger-screen .chat-messages")
            .unwrap()
            .children
            .is_empty());
    }
}
