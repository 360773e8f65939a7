//! Debounced callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Runs the last callback it was given once `delay_ms` passes without a
/// new call.
///
/// Clones share the pending timer. At most one timer is pending; dropping
/// a [`Timeout`] clears it, so replacing the slot cancels the previous call.
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Schedule `callback`, cancelling whatever was scheduled before.
    pub fn call<F>(&self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let timeout = Timeout::new(self.delay_ms, callback);
        // The fired timer stays in the slot until the next call replaces it.
        self.pending.replace(Some(timeout));
    }

    /// Drop the pending callback, if any.
    pub fn cancel(&self) {
        self.pending.replace(None);
    }
}
