//! Bevy plugin that registers playback resources and systems.

use bevy::prelude::*;

use super::player::{advance_playback, FrameChanged, FramePlayer};
use super::viewer::SceneMode;
use crate::viewer_config::ViewerConfig;
use crate::KitchenSet;

/// Plugin that advances `FramePlayer` every `Update` and announces
/// `FrameChanged`.
///
/// The player is configured from `ViewerConfig` at build time, so the app
/// must insert its config before adding this plugin (the default is used
/// otherwise).
pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<ViewerConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(FramePlayer::new(
            config.playback_fps,
            config.speed,
            config.looping,
        ))
        .init_resource::<SceneMode>()
        .add_event::<FrameChanged>()
        .add_systems(Update, advance_playback.in_set(KitchenSet::Playback));
    }
}
