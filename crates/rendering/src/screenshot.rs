use bevy::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
#[cfg(not(target_arch = "wasm32"))]
use kitchen::playback::FramePlayer;

use crate::status::StatusMessage;

pub const SCREENSHOT_KEY: KeyCode = KeyCode::F12;
pub const SCREENSHOT_DIR: &str = "screenshots";

pub struct ScreenshotPlugin;

impl Plugin for ScreenshotPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, capture_on_key);
    }
}

/// `screenshots/kitchen_t<timestep>_<unix seconds>.png`.
pub fn screenshot_path(timestep: Option<u64>, unix_secs: u64) -> String {
    match timestep {
        Some(t) => format!("{SCREENSHOT_DIR}/kitchen_t{t}_{unix_secs}.png"),
        None => format!("{SCREENSHOT_DIR}/kitchen_layout_{unix_secs}.png"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn capture_on_key(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    player: Res<FramePlayer>,
    mut status: ResMut<StatusMessage>,
) {
    if !keyboard.just_pressed(SCREENSHOT_KEY) {
        return;
    }
    if let Err(err) = std::fs::create_dir_all(SCREENSHOT_DIR) {
        warn!("Cannot create {SCREENSHOT_DIR}: {err}");
        status.set(format!("Screenshot failed: {err}"), true);
        return;
    }

    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let path = screenshot_path(player.current().map(|f| f.timestep), secs);

    info!("Saving screenshot to {path}");
    status.set(format!("Screenshot saved: {path}"), false);
    commands
        .spawn(Screenshot::primary_window())
        .observe(save_to_disk(path));
}

#[cfg(target_arch = "wasm32")]
fn capture_on_key(keyboard: Res<ButtonInput<KeyCode>>, mut status: ResMut<StatusMessage>) {
    if keyboard.just_pressed(SCREENSHOT_KEY) {
        status.set("Screenshots are not supported in the browser", true);
    }
}
