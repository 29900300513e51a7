//! Browser loading of the state file.
//!
//! `index.html?state=runs/cramped_room.json` fetches that URL; without the
//! parameter `/stateschema.json` is used.

#![cfg(target_arch = "wasm32")]

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use kitchen::config::DEFAULT_STATE_URL;
use kitchen::loader::{StateReceived, StateSource};
use kitchen::StateFile;

/// Shared slot bridging the async fetch into the ECS world.
#[derive(Resource, Default, Clone)]
pub struct WebStateBuffer(pub Arc<Mutex<Option<Result<String, String>>>>);

/// `?state=...` from the page URL, or the default state URL.
pub fn state_url() -> String {
    query_state_url().unwrap_or_else(|| DEFAULT_STATE_URL.to_string())
}

fn query_state_url() -> Option<String> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let url = params.get("state")?;
    if url.trim().is_empty() {
        None
    } else {
        Some(url)
    }
}

/// Startup system: start fetching the state JSON.
pub fn begin_web_state_load(source: Res<StateSource>, buffer: Res<WebStateBuffer>) {
    let url = source.0.clone();
    let slot = buffer.0.clone();
    info!("Fetching kitchen state from {url}");

    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_text(&url).await;
        if let Ok(mut guard) = slot.lock() {
            *guard = Some(result);
        }
    });
}

/// Hand a finished fetch to the loader as a `StateReceived` event.
pub fn poll_web_state_load(
    source: Res<StateSource>,
    buffer: Res<WebStateBuffer>,
    mut received: EventWriter<StateReceived>,
) {
    let Ok(mut slot) = buffer.0.lock() else {
        return;
    };
    let Some(result) = slot.take() else {
        return;
    };

    let parsed = result
        .map_err(|e| format!("could not fetch '{}': {e}", source.0))
        .and_then(|json| {
            StateFile::from_json(&json).map_err(|e| format!("could not parse '{}': {e}", source.0))
        });
    received.send(StateReceived(parsed));
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
    let response_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch failed: {e:?}"))?;

    let response: web_sys::Response = response_value
        .dyn_into()
        .map_err(|_| "fetch did not return a Response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let text = response
        .text()
        .map_err(|e| format!("response.text() failed: {e:?}"))?;
    JsFuture::from(text)
        .await
        .map_err(|e| format!("reading body failed: {e:?}"))?
        .as_string()
        .ok_or_else(|| "body was not text".to_string())
}
