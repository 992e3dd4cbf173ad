//! Best-effort live notification channel. The dashboard must stay fully
//! usable when nothing ever arrives here; consumers only react by
//! invalidating their accumulated collection.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub mod socket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    SessionCreated,
    SessionUpdated,
}

/// Parses a raw channel message on its `type` discriminator. Anything
/// malformed or unrecognized is dropped silently; the connection stays
/// usable.
pub fn parse_event(raw: &str) -> Option<LiveEvent> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            log::debug!("dropping malformed live message");
            return None;
        }
    };
    match value.get("type").and_then(|kind| kind.as_str()) {
        Some("session_created") => Some(LiveEvent::SessionCreated),
        Some("session_updated") => Some(LiveEvent::SessionUpdated),
        other => {
            log::debug!("dropping live message with type {:?}", other);
            None
        }
    }
}

/// Single-callback fan-out between the socket adapter and interested view
/// models. Events are not buffered: notifying with zero subscribers is a
/// no-op, and late subscribers simply wait for the next event.
#[derive(Clone, Default)]
pub struct NotificationHub {
    subscribers: Rc<RefCell<Vec<Rc<dyn Fn(LiveEvent)>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(LiveEvent) + 'static) {
        self.subscribers.borrow_mut().push(Rc::new(handler));
    }

    pub fn notify(&self, event: LiveEvent) {
        let handlers: Vec<Rc<dyn Fn(LiveEvent)>> = self.subscribers.borrow().clone();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}
