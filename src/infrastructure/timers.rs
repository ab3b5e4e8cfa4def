use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Trailing-edge debounce: bursts of `trigger` collapse into one call of the
/// action `delay_ms` after the last trigger.
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    // A fired timeout stays here until the next trigger; it must not be
    // dropped from inside its own callback.
    timeout: Rc<RefCell<Option<Timeout>>>,
    armed: Rc<Cell<bool>>,
    action: Rc<dyn Fn()>,
}

impl Debouncer {
    pub fn new(delay_ms: u32, action: impl Fn() + 'static) -> Self {
        Self {
            delay_ms,
            timeout: Rc::new(RefCell::new(None)),
            armed: Rc::new(Cell::new(false)),
            action: Rc::new(action),
        }
    }

    pub fn trigger(&self) {
        let action = Rc::clone(&self.action);
        let armed = Rc::clone(&self.armed);
        self.armed.set(true);
        let timeout = Timeout::new(self.delay_ms, move || {
            armed.set(false);
            action();
        });
        // Replacing the handle cancels the previous timeout.
        *self.timeout.borrow_mut() = Some(timeout);
    }

    pub fn is_pending(&self) -> bool {
        self.armed.get()
    }

    pub fn cancel(&self) {
        self.armed.set(false);
        if let Some(timeout) = self.timeout.borrow_mut().take() {
            timeout.cancel();
        }
    }
}
