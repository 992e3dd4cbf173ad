use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Trailing-edge debounce: scheduling replaces any pending call, so only the
/// most recent closure fires once calls stop arriving for `delay_ms`.
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

    pub fn schedule(&self, callback: impl FnOnce() + 'static) {
        // Dropping the previous Timeout cancels it.
        let pending = Rc::clone(&self.pending);
        let cleanup = Rc::clone(&self.pending);
        let timeout = Timeout::new(self.delay_ms, move || {
            cleanup.borrow_mut().take();
            callback();
        });
        *pending.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn rapid_schedules_collapse_to_the_last_call() {
        let debouncer = Debouncer::new(10);
        let fired = Rc::new(Cell::new(0u32));

        let first = Rc::clone(&fired);
        debouncer.schedule(move || first.set(first.get() + 1));
        let second = Rc::clone(&fired);
        debouncer.schedule(move || second.set(second.get() + 10));
        assert!(debouncer.is_pending());

        TimeoutFuture::new(50).await;
        // only the replacement fired, exactly once
        assert_eq!(fired.get(), 10);
        assert!(!debouncer.is_pending());
    }

    #[wasm_bindgen_test]
    async fn schedule_after_firing_runs_again() {
        let debouncer = Debouncer::new(10);
        let fired = Rc::new(Cell::new(0u32));

        let first = Rc::clone(&fired);
        debouncer.schedule(move || first.set(first.get() + 1));
        TimeoutFuture::new(50).await;
        assert_eq!(fired.get(), 1);

        let second = Rc::clone(&fired);
        debouncer.schedule(move || second.set(second.get() + 1));
        TimeoutFuture::new(50).await;
        assert_eq!(fired.get(), 2);
    }

    #[wasm_bindgen_test]
    async fn cancel_drops_the_pending_call() {
        let debouncer = Debouncer::new(10);
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        debouncer.schedule(move || flag.set(true));
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        TimeoutFuture::new(50).await;
        assert!(!fired.get());
    }
}
