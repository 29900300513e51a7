use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod frame;
pub mod interpolation;
pub mod layout;
pub mod loader;
pub mod playback;
pub mod state_file;
pub mod viewer_config;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "test_harness"))]
pub mod test_harness;

pub use error::VizError;
pub use frame::Frame;
pub use layout::{StaticLayout, TileKind};
pub use state_file::StateFile;
pub use viewer_config::ViewerConfig;

/// Ordering of the headless kitchen systems within `Update`.
///
/// Renderers that react to a new layout or frame should run after
/// `KitchenSet::Playback`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum KitchenSet {
    /// Installing freshly received state files.
    Loading,
    /// Advancing the frame player and announcing `FrameChanged`.
    Playback,
}

pub struct KitchenPlugin;

impl Plugin for KitchenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerConfig>()
            .init_resource::<loader::LoadStatus>()
            .add_event::<loader::StateReceived>()
            .configure_sets(Update, (KitchenSet::Loading, KitchenSet::Playback).chain())
            .add_systems(
                Update,
                loader::install_received_state.in_set(KitchenSet::Loading),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Startup, loader::load_state_from_disk);

        app.add_plugins(playback::PlaybackPlugin);
    }
}
