//! Getting a state file into the world.
//!
//! Sources push a decoded `StateFile` (or an error message) as a
//! `StateReceived` event: the native startup system reads it from disk, the
//! web build fetches it asynchronously. `install_received_state` then
//! validates it, publishes the `LoadedLayout` and hands the frames to the
//! `FramePlayer`.

use bevy::prelude::*;

use crate::error::VizError;
use crate::frame::Frame;
use crate::layout::StaticLayout;
use crate::playback::{FramePlayer, SceneMode};
use crate::state_file::StateFile;
use crate::viewer_config::ViewerConfig;

/// Where the state file comes from: a filesystem path or, on the web, a URL.
#[derive(Resource, Debug, Clone)]
pub struct StateSource(pub String);

/// Progress of the initial state load, shown by the loading overlay.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready {
        frames: usize,
        width: usize,
        height: usize,
    },
    Failed(String),
}

/// The validated static grid currently on screen.
#[derive(Resource, Debug, Clone)]
pub struct LoadedLayout(pub StaticLayout);

/// A decoded state file (or the reason it could not be read).
#[derive(Event, Debug, Clone)]
pub struct StateReceived(pub Result<StateFile, String>);

/// Validate a state file and split it into layout and frames.
///
/// Frame problems (out-of-order timesteps, markers off the grid) are logged
/// and tolerated; only a broken grid is fatal.
pub fn prepare_state(file: StateFile) -> Result<(StaticLayout, Vec<Frame>), VizError> {
    match file.validate() {
        Ok(layout) => Ok((layout, file.frames)),
        Err(err @ VizError::InvalidFrame { .. }) => {
            warn!("State file validation warning: {}", err);
            let layout = file.layout()?;
            Ok((layout, file.frames))
        }
        Err(err) => Err(err),
    }
}

/// Startup system: read the state file named by `StateSource` from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_state_from_disk(
    source: Option<Res<StateSource>>,
    mut received: EventWriter<StateReceived>,
) {
    let Some(source) = source else {
        return;
    };
    info!("Loading kitchen state from '{}'", source.0);
    let result = crate::state_file::load_path(&source.0)
        .map_err(|e| format!("could not read '{}': {}", source.0, e));
    received.send(StateReceived(result));
}

/// System: install any received state file into the world.
pub fn install_received_state(
    mut commands: Commands,
    mut received: EventReader<StateReceived>,
    config: Res<ViewerConfig>,
    mut player: ResMut<FramePlayer>,
    mut mode: ResMut<SceneMode>,
    mut status: ResMut<LoadStatus>,
) {
    for StateReceived(result) in received.read() {
        let prepared = result
            .clone()
            .and_then(|file| prepare_state(file).map_err(|e| e.to_string()));

        let (layout, frames) = match prepared {
            Ok(prepared) => prepared,
            Err(msg) => {
                error!("Failed to load kitchen state: {}", msg);
                *status = LoadStatus::Failed(msg);
                continue;
            }
        };

        let frame_count = frames.len();
        if config.static_only || frames.is_empty() {
            player.clear();
            *mode = SceneMode::Static;
        } else {
            player.load(frames);
            player.set_paused(config.start_paused);
            *mode = SceneMode::Replay;
        }

        info!(
            "Kitchen state loaded: {}x{} grid, {} frames ({})",
            layout.width(),
            layout.height(),
            frame_count,
            mode.label(),
        );

        *status = LoadStatus::Ready {
            frames: frame_count,
            width: layout.width(),
            height: layout.height(),
        };
        commands.insert_resource(LoadedLayout(layout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PlayerState;
    use crate::state_file::{GridRow, StaticInfo};

    fn file_with_player_at(position: [i32; 2]) -> StateFile {
        StateFile {
            static_info: StaticInfo {
                width: 3,
                height: 3,
                grid: ["XPX", "O S", "XDX"]
                    .iter()
                    .map(|r| GridRow::Text(r.to_string()))
                    .collect(),
            },
            frames: vec![Frame {
                players: vec![PlayerState {
                    position,
                    orientation: [0, 1],
                    held_object: None,
                }],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn prepare_accepts_valid_file() {
        let (layout, frames) = prepare_state(file_with_player_at([1, 1])).unwrap();
        assert_eq!(layout.width(), 3);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn prepare_tolerates_bad_frames() {
        let (layout, frames) = prepare_state(file_with_player_at([5, 5])).unwrap();
        assert_eq!(layout.height(), 3);
        assert_eq!(frames[0].players[0].position, [5, 5]);
    }

    #[test]
    fn prepare_rejects_bad_grid() {
        let mut file = file_with_player_at([1, 1]);
        file.static_info.width = 4;
        let err = prepare_state(file).unwrap_err();
        assert!(matches!(err, VizError::InvalidLayout(_)));
    }
}
