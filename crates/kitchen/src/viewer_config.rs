use bevy::prelude::*;

use crate::config::{DEFAULT_PLAYBACK_FPS, DEFAULT_SMOOTHING_SPEED, DEFAULT_STATE_PATH};

/// Default `tracing` filter: our logs at info, noisy GPU crates quieter.
pub const DEFAULT_LOG_FILTER: &str = "info,wgpu=error,naga=warn";

/// Runtime viewer settings, built by the app from its command line.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// State file (native) or URL (web) to load on startup.
    pub state_path: String,
    /// Draw only the static layout even if the file carries frames.
    pub static_only: bool,
    /// Recorded frames advanced per second at 1x speed.
    pub playback_fps: f32,
    /// Playback speed multiplier.
    pub speed: f32,
    pub looping: bool,
    pub start_paused: bool,
    /// Exponential smoothing speed for dynamic markers.
    pub smoothing_speed: f32,
    /// When set, numbered PNGs of the replay are written here.
    pub record_dir: Option<String>,
    pub log_filter: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            state_path: DEFAULT_STATE_PATH.to_string(),
            static_only: false,
            playback_fps: DEFAULT_PLAYBACK_FPS,
            speed: 1.0,
            looping: false,
            start_paused: false,
            smoothing_speed: DEFAULT_SMOOTHING_SPEED,
            record_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
