use bevy::prelude::*;

/// What the viewer is showing.
///
/// - `Static`: the tile grid only; no markers, no playback controls.
/// - `Replay`: the tile grid plus animated markers driven by `FramePlayer`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    #[default]
    Static,
    Replay,
}

impl SceneMode {
    pub fn label(self) -> &'static str {
        match self {
            SceneMode::Static => "Static layout",
            SceneMode::Replay => "Replay",
        }
    }
}
