use bevy::prelude::*;

use kitchen::config::{AMBIENT_INTENSITY, DIRECTIONAL_INTENSITY, DIRECTIONAL_POSITION};
use kitchen::KitchenSet;

pub mod camera;
pub mod egui_input_guard;
pub mod grid_render;
pub mod markers;
pub mod palette;
pub mod screenshot;
pub mod status;
pub mod viewport;

pub use status::StatusMessage;

/// Ambient brightness for an intensity of 1.0.
const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 500.0;
/// Directional illuminance (lux) for an intensity of 1.0.
const DIRECTIONAL_LUX_PER_UNIT: f32 = 10_000.0;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<camera::CameraDrag>()
            .init_resource::<StatusMessage>()
            .init_resource::<palette::MaterialPalette>()
            .init_resource::<markers::MarkerMeshes>()
            .init_resource::<grid_render::TileMesh>()
            .add_systems(Startup, (camera::setup_camera, setup_lighting));

        // Camera controls
        app.add_systems(
            Update,
            (
                camera::frame_layout.after(KitchenSet::Loading),
                camera::camera_keyboard,
                camera::camera_mouse_drag,
                camera::camera_zoom,
            )
                .before(camera::apply_orbit_camera),
        )
        .add_systems(Update, camera::apply_orbit_camera);

        // Scene
        app.add_systems(
            Update,
            (
                grid_render::spawn_static_grid,
                markers::clear_markers_in_static_mode,
                markers::sync_markers,
                markers::interpolate_markers,
            )
                .chain()
                .after(KitchenSet::Playback),
        );

        app.add_systems(
            Update,
            (
                viewport::cap_pixel_ratio,
                viewport::log_window_resize,
                status::tick_status_message,
            ),
        );

        app.add_plugins(screenshot::ScreenshotPlugin);
    }
}

fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_INTENSITY * AMBIENT_BRIGHTNESS_PER_UNIT,
    });

    let [x, y, z] = DIRECTIONAL_POSITION;
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: DIRECTIONAL_INTENSITY * DIRECTIONAL_LUX_PER_UNIT,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
