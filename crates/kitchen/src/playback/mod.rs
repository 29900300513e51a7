//! Replay playback: frame-index advancement and the viewer's scene mode.

pub mod player;
pub mod plugin;
pub mod viewer;

pub use player::{FrameChanged, FramePlayer};
pub use plugin::PlaybackPlugin;
pub use viewer::SceneMode;
