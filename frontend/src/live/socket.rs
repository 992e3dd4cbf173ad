//! WebSocket adapter feeding the notification hub. Connection lifecycle
//! (reconnect, backoff) lives entirely here; consumers never see it.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::{parse_event, NotificationHub};
use crate::config;

const RECONNECT_BASE_MS: u32 = 1_000;
const RECONNECT_MAX_SHIFT: u32 = 5; // caps the delay at 32s

/// Resolves the live endpoint and keeps a connection alive for the rest of
/// the page's lifetime. Failures only delay the next attempt.
pub fn start(hub: NotificationHub) {
    wasm_bindgen_futures::spawn_local(async move {
        let url = config::await_live_url().await;
        connect(Rc::new(url), hub, Rc::new(Cell::new(0)));
    });
}

fn connect(url: Rc<String>, hub: NotificationHub, attempts: Rc<Cell<u32>>) {
    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(err) => {
            log::debug!("live socket connect failed: {:?}", err);
            schedule_reconnect(url, hub, attempts);
            return;
        }
    };

    {
        let attempts = Rc::clone(&attempts);
        let onopen = Closure::<dyn FnMut()>::new(move || {
            log::debug!("live socket connected");
            attempts.set(0);
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let hub = hub.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                if let Some(live_event) = parse_event(&text) {
                    hub.notify(live_event);
                }
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    {
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            log::debug!("live socket closed (code {})", event.code());
            schedule_reconnect(Rc::clone(&url), hub.clone(), Rc::clone(&attempts));
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }
}

fn schedule_reconnect(url: Rc<String>, hub: NotificationHub, attempts: Rc<Cell<u32>>) {
    let attempt = attempts.get();
    attempts.set(attempt.saturating_add(1));
    let delay = RECONNECT_BASE_MS << attempt.min(RECONNECT_MAX_SHIFT);
    Timeout::new(delay, move || connect(url, hub, attempts)).forget();
}
