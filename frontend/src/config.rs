use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub live_url: Option<String>,
}

static API_BASE_URL: OnceLock<String> = OnceLock::new();
static LIVE_URL: OnceLock<String> = OnceLock::new();

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

fn read_global_key(global: &str, key: &str) -> Option<String> {
    let w = window()?;
    let any = js_sys::Reflect::get(&w, &global.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let obj = js_sys::Object::from(any);
    js_sys::Reflect::get(&obj, &key.into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| v.as_string())
}

// Deploys may inject either window.__PITCHLAB_ENV (env.js) or
// window.__PITCHLAB_CONFIG; env.js wins.
fn snapshot_from_globals(key: &str) -> Option<String> {
    read_global_key("__PITCHLAB_ENV", &key.to_uppercase())
        .or_else(|| read_global_key("__PITCHLAB_CONFIG", key))
}

async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let resp = reqwest::get("./config.json").await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

pub async fn await_api_base_url() -> String {
    if let Some(cached) = API_BASE_URL.get() {
        return cached.clone();
    }
    if let Some(existing) = snapshot_from_globals("api_base_url") {
        let _ = API_BASE_URL.set(existing.clone());
        return existing;
    }
    if let Some(cfg) = fetch_runtime_config().await {
        if let Some(live) = cfg.live_url {
            let _ = LIVE_URL.set(live);
        }
        if let Some(url) = cfg.api_base_url {
            let _ = API_BASE_URL.set(url.clone());
            return url;
        }
    }
    let _ = API_BASE_URL.set(DEFAULT_API_BASE_URL.to_string());
    DEFAULT_API_BASE_URL.to_string()
}

/// WebSocket endpoint for live session notifications. Defaults to the API
/// base with the scheme swapped to ws(s) and `/live` appended.
pub async fn await_live_url() -> String {
    if let Some(cached) = LIVE_URL.get() {
        return cached.clone();
    }
    if let Some(existing) = snapshot_from_globals("live_url") {
        let _ = LIVE_URL.set(existing.clone());
        return existing;
    }
    let derived = derive_live_url(&await_api_base_url().await);
    let _ = LIVE_URL.set(derived.clone());
    derived
}

pub fn derive_live_url(api_base: &str) -> String {
    let swapped = if let Some(rest) = api_base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = api_base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        api_base.to_string()
    };
    format!("{}/live", swapped.trim_end_matches('/'))
}

pub async fn init() {
    let _ = await_api_base_url().await;
}
