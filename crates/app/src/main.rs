use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;

use kitchen::loader::StateSource;
use kitchen::ViewerConfig;

#[cfg(not(target_arch = "wasm32"))]
mod cli;
#[cfg(not(target_arch = "wasm32"))]
mod record_replay;
#[cfg(target_arch = "wasm32")]
mod web_state;

/// Dark and slightly see-through, so a page or desktop behind the canvas
/// tints the background.
const CLEAR_COLOR: Color = Color::srgba(0.06, 0.06, 0.08, 0.85);

#[cfg(not(target_arch = "wasm32"))]
fn viewer_config() -> ViewerConfig {
    use clap::Parser;
    cli::Cli::parse().into_config()
}

#[cfg(target_arch = "wasm32")]
fn viewer_config() -> ViewerConfig {
    ViewerConfig {
        state_path: web_state::state_url(),
        ..Default::default()
    }
}

fn main() {
    let config = viewer_config();
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Kitchen Viewer".to_string(),
                    resolution: (1280.0, 720.0).into(),
                    present_mode: PresentMode::AutoVsync,
                    fit_canvas_to_parent: true,
                    transparent: true,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: config.log_filter.clone(),
                level: Level::INFO,
                ..default()
            }),
    )
    .insert_resource(ClearColor(CLEAR_COLOR))
    .insert_resource(StateSource(config.state_path.clone()))
    .insert_resource(config.clone())
    .add_plugins((
        kitchen::KitchenPlugin,
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ));

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(dir) = &config.record_dir {
        if let Err(err) = std::fs::create_dir_all(dir) {
            error!("Cannot create recording directory '{dir}': {err}");
            std::process::exit(1);
        }
        info!("Recording replay frames to '{dir}'");
        app.insert_resource(record_replay::ReplayRecordState::new(dir.clone()))
            .add_systems(
                Last,
                record_replay::drive_replay_recording,
            );
    }

    #[cfg(target_arch = "wasm32")]
    app.init_resource::<web_state::WebStateBuffer>()
        .add_systems(Startup, web_state::begin_web_state_load)
        .add_systems(
            Update,
            web_state::poll_web_state_load.before(kitchen::KitchenSet::Loading),
        );

    app.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_colour_is_dark_and_translucent() {
        let srgba = CLEAR_COLOR.to_srgba();
        assert!(srgba.alpha < 1.0);
        assert!(srgba.alpha > 0.0);
        assert!(srgba.red < 0.1 && srgba.green < 0.1 && srgba.blue < 0.1);
    }
}
