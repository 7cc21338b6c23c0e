//! Presentation layer
//!
//! - `dom`: selector-addressed page access (browser or in-memory)
//! - `timer`: delayed effects with cancel-on-teardown
//! - `chat`: paced chat message rendering
//! - `screens`: screen switching, pulse highlight, notification dots

pub mod chat;
pub mod dom;
pub mod screens;
pub mod timer;

pub use chat::{App, ChatView, Direction, Message};
#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
pub use dom::{Dom, MemoryDom};
pub use screens::ScreenManager;
#[cfg(target_arch = "wasm32")]
pub use timer::BrowserScheduler;
pub use timer::{ManualScheduler, Scheduler, TimerId, TimerSet};
