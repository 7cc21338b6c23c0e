//! Delayed UI effects
//!
//! Timing is a lower bound only: a task runs no earlier than its delay.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::UiError;

/// Opaque handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub i32);

/// Runs callbacks after a delay on the UI thread
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Result<TimerId, UiError>;

    /// Cancel a pending task. Unknown or already-run ids are ignored.
    fn cancel(&self, id: TimerId);
}

struct Pending {
    id: TimerId,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

/// Virtual clock scheduler, advanced explicitly
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: Cell<u64>,
    next_id: Cell<i32>,
    queue: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward, running every task that falls due in
    /// (due time, scheduling order). Tasks may schedule further tasks.
    /// Returns the number of tasks run.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms.get() + ms;
        let mut ran = 0;

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let earliest = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due_ms <= target)
                    .min_by_key(|(_, p)| (p.due_ms, p.id))
                    .map(|(i, _)| i);
                earliest.map(|i| queue.remove(i))
            };
            let Some(pending) = next else { break };

            self.now_ms.set(pending.due_ms.max(self.now_ms.get()));
            (pending.task)();
            ran += 1;
        }

        self.now_ms.set(target);
        ran
    }

    /// Run everything queued, however far in the future
    pub fn run_all(&self) -> usize {
        let last = self.queue.borrow().iter().map(|p| p.due_ms).max();
        match last {
            Some(due) => self.advance(due.saturating_sub(self.now_ms.get())),
            None => 0,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Result<TimerId, UiError> {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push(Pending {
            id,
            due_ms: self.now_ms.get() + u64::from(delay_ms),
            task,
        });
        Ok(id)
    }

    fn cancel(&self, id: TimerId) {
        self.queue.borrow_mut().retain(|p| p.id != id);
    }
}

impl<T: Scheduler + ?Sized> Scheduler for Rc<T> {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Result<TimerId, UiError> {
        (**self).schedule(delay_ms, task)
    }

    fn cancel(&self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// `window.setTimeout` scheduler (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct BrowserScheduler {
    window: web_sys::Window,
}

#[cfg(target_arch = "wasm32")]
impl BrowserScheduler {
    pub fn from_window() -> Result<Self, UiError> {
        let window = web_sys::window().ok_or_else(|| UiError::Platform("no window".to_string()))?;
        Ok(Self { window })
    }
}

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Result<TimerId, UiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let callback = Closure::once_into_js(move || task());
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            )
            .map(TimerId)
            .map_err(|e| UiError::Platform(format!("{:?}", e)))
    }

    fn cancel(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}

/// Tracks a component's outstanding timers so they can be cancelled
/// when the component goes away
pub struct TimerSet<T: Scheduler> {
    scheduler: T,
    outstanding: Rc<RefCell<Vec<TimerId>>>,
}

impl<T: Scheduler> TimerSet<T> {
    pub fn new(scheduler: T) -> Self {
        Self {
            scheduler,
            outstanding: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn schedule(
        &self,
        delay_ms: u32,
        task: impl FnOnce() + 'static,
    ) -> Result<TimerId, UiError> {
        // The id is only known after scheduling; a task never runs
        // synchronously inside `schedule`, so it is set before firing.
        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let outstanding = Rc::clone(&self.outstanding);
        let fired_id = Rc::clone(&own_id);

        let id = self.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if let Some(id) = fired_id.get() {
                    outstanding.borrow_mut().retain(|t| *t != id);
                }
                task();
            }),
        )?;

        own_id.set(Some(id));
        self.outstanding.borrow_mut().push(id);
        Ok(id)
    }

    /// Timers scheduled but not yet run or cancelled
    pub fn outstanding(&self) -> usize {
        self.outstanding.borrow().len()
    }

    pub fn cancel_all(&self) {
        let ids: Vec<TimerId> = self.outstanding.borrow_mut().drain(..).collect();
        if !ids.is_empty() {
            log::debug!("Cancelling {} pending UI effects", ids.len());
        }
        for id in ids {
            self.scheduler.cancel(id);
        }
    }
}

impl<T: Scheduler> Drop for TimerSet<T> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
