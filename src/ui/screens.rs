//! Screen transitions and small UI effects

use std::rc::Rc;

use super::chat::App;
use super::dom::Dom;
use super::timer::{Scheduler, TimerSet};
use crate::consts::{PULSE_CLASS, SAVE_WARNING};
use crate::error::UiError;

/// Selector for an app icon's notification dot
pub fn notification_dot_selector(app: App) -> String {
    format!(".app[data-app='{}'] .notification-dot", app.as_str())
}

/// Tracks which full-screen view is active and switches between them
pub struct ScreenManager<D: Dom + 'static, T: Scheduler> {
    dom: Rc<D>,
    timers: TimerSet<T>,
    active: Option<String>,
    pulse_ms: u32,
}

impl<D: Dom + 'static, T: Scheduler> ScreenManager<D, T> {
    pub fn new(dom: Rc<D>, scheduler: T, pulse_ms: u32) -> Self {
        Self {
            dom,
            timers: TimerSet::new(scheduler),
            active: None,
            pulse_ms,
        }
    }

    /// Treat an already-visible screen as active without touching it
    pub fn with_active(mut self, screen_id: &str) -> Self {
        self.active = Some(screen_id.to_string());
        self
    }

    pub fn active_screen(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Hide the active screen and show another.
    ///
    /// If the target does not exist nothing changes.
    pub fn show_screen(&mut self, screen_id: &str) -> Result<(), UiError> {
        let next = format!("#{}", screen_id);
        if !self.dom.exists(&next) {
            log::error!("Screen with ID \"{}\" not found", screen_id);
            return Err(UiError::MissingTarget(next));
        }

        log::info!("Switching to screen: {}", screen_id);
        if let Some(prev) = self.active.take() {
            if prev != screen_id {
                if let Err(e) = self.dom.set_shown(&format!("#{}", prev), false) {
                    log::warn!("Could not hide {}: {}", prev, e);
                }
            }
        }
        self.dom.set_shown(&next, true)?;
        self.active = Some(screen_id.to_string());
        Ok(())
    }

    /// Briefly highlight an element. Re-triggering restarts the effect.
    pub fn pulse(&self, selector: &str) -> Result<(), UiError> {
        if self.pulse_ms == 0 {
            return Ok(());
        }
        self.dom.add_class(selector, PULSE_CLASS).inspect_err(|e| {
            log::warn!("Pulse skipped: {}", e);
        })?;

        let dom = Rc::clone(&self.dom);
        let selector = selector.to_string();
        self.timers.schedule(self.pulse_ms, move || {
            // The element may have been removed meanwhile
            let _ = dom.remove_class(&selector, PULSE_CLASS);
        })?;
        Ok(())
    }

    pub fn set_pulse_ms(&mut self, pulse_ms: u32) {
        self.pulse_ms = pulse_ms;
    }

    pub fn show_notification_dot(&self, app: App, show: bool) -> Result<(), UiError> {
        let selector = notification_dot_selector(app);
        self.dom.set_shown(&selector, show).inspect_err(|e| {
            log::warn!("Notification dot not updated: {}", e);
        })
    }

    /// Show or clear the "progress not saved" warning. Pages without the
    /// warning element are left alone.
    pub fn show_save_warning(&self, failed: bool) {
        if !self.dom.exists(SAVE_WARNING) {
            if failed {
                log::warn!("Progress not saved and no {} element to say so", SAVE_WARNING);
            }
            return;
        }
        if let Err(e) = self.dom.set_shown(SAVE_WARNING, failed) {
            log::warn!("Save warning not updated: {}", e);
        }
    }

    /// Cancel pending effects (view is going away)
    pub fn teardown(&self) {
        self.timers.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPLASH_SCREEN;
    use crate::ui::dom::MemoryDom;
    use crate::ui::timer::ManualScheduler;

    type Screens = ScreenManager<MemoryDom, Rc<ManualScheduler>>;

    fn manager() -> (Rc<MemoryDom>, Rc<ManualScheduler>, Screens) {
        let dom = Rc::new(MemoryDom::with_elements([
            "#splash-screen",
            "#save-warning",
            "#home-screen",
            "#messenger-screen",
            "#phone",
            ".app[data-app='messenger'] .notification-dot",
        ]));
        let scheduler = Rc::new(ManualScheduler::new());
        let screens = ScreenManager::new(Rc::clone(&dom), Rc::clone(&scheduler), 1500)
            .with_active(SPLASH_SCREEN);
        (dom, scheduler, screens)
    }

    #[test]
    fn test_show_screen_hides_previous() {
        let (dom, _scheduler, mut screens) = manager();
        screens.show_screen("home-screen").unwrap();
        assert_eq!(dom.is_shown("#splash-screen"), Some(false));
        assert_eq!(dom.is_shown("#home-screen"), Some(true));
        assert_eq!(screens.active_screen(), Some("home-screen"));

        screens.show_screen("messenger-screen").unwrap();
        assert_eq!(dom.is_shown("#home-screen"), Some(false));
        assert_eq!(dom.is_shown("#messenger-screen"), Some(true));
    }

    #[test]
    fn test_show_same_screen_keeps_it_visible() {
        let (dom, _scheduler, mut screens) = manager();
        screens.show_screen("home-screen").unwrap();
        screens.show_screen("home-screen").unwrap();
        assert_eq!(dom.is_shown("#home-screen"), Some(true));
    }

    #[test]
    fn test_missing_screen_is_noop() {
        let (dom, _scheduler, mut screens) = manager();
        screens.show_screen("home-screen").unwrap();

        let err = screens.show_screen("credits-screen").unwrap_err();
        assert_eq!(err, UiError::MissingTarget("#credits-screen".into()));
        assert_eq!(screens.active_screen(), Some("home-screen"));
        assert_eq!(dom.is_shown("#home-screen"), Some(true));
    }

    #[test]
    fn test_pulse_removes_class_after_duration() {
        let (dom, scheduler, screens) = manager();
        screens.pulse("#phone").unwrap();
        assert!(dom.element("#phone").unwrap().classes.contains(PULSE_CLASS));

        scheduler.advance(1499);
        assert!(dom.element("#phone").unwrap().classes.contains(PULSE_CLASS));
        scheduler.advance(1);
        assert!(!dom.element("#phone").unwrap().classes.contains(PULSE_CLASS));
    }

    #[test]
    fn test_pulse_missing_element() {
        let (_dom, scheduler, screens) = manager();
        assert!(screens.pulse("#nothing").is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_pulse_disabled() {
        let (dom, scheduler, mut screens) = manager();
        screens.set_pulse_ms(0);
        screens.pulse("#phone").unwrap();
        assert!(dom.element("#phone").unwrap().classes.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_notification_dot() {
        let (dom, _scheduler, screens) = manager();
        screens.show_notification_dot(App::Messenger, true).unwrap();
        assert_eq!(
            dom.is_shown(".app[data-app='messenger'] .notification-dot"),
            Some(true)
        );
        assert!(screens.show_notification_dot(App::MakeLove, true).is_err());
    }

    #[test]
    fn test_save_warning() {
        let (dom, _scheduler, screens) = manager();
        screens.show_save_warning(true);
        assert_eq!(dom.is_shown("#save-warning"), Some(true));
        screens.show_save_warning(false);
        assert_eq!(dom.is_shown("#save-warning"), Some(false));
    }

    #[test]
    fn test_save_warning_without_element() {
        let dom = Rc::new(MemoryDom::with_elements(["#splash-screen"]));
        let screens = ScreenManager::new(Rc::clone(&dom), ManualScheduler::new(), 1500);
        screens.show_save_warning(true);
        assert!(!dom.exists("#save-warning"));
    }

    #[test]
    fn test_teardown_cancels_pulse() {
        let (dom, scheduler, screens) = manager();
        screens.pulse("#phone").unwrap();
        screens.teardown();
        scheduler.run_all();
        // Class stays: the removal never ran
        assert!(dom.element("#phone").unwrap().classes.contains(PULSE_CLASS));
    }
}
