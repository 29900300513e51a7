use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use kitchen::config::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_OFFSET_BACK, CAMERA_OFFSET_HEIGHT,
};
use kitchen::loader::LoadedLayout;

use crate::egui_input_guard::{egui_wants_keyboard, egui_wants_pointer};

/// Focus travel per second at the default distance, in tiles.
const PAN_SPEED: f32 = 6.0;
const ROTATE_SPEED: f32 = 1.5;
const ZOOM_SPEED: f32 = 0.1;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 60.0;
const MIN_PITCH: f32 = 5.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Drag pan in world units per pixel, at distance 1.
const DRAG_PAN_SCALE: f32 = 0.0015;
/// How far past the grid edge the focus may wander, in tiles.
const FOCUS_MARGIN: f32 = 2.0;

/// Camera orbiting a focus point on the floor plane.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    /// Radians about +Y; 0 puts the camera on the +Z side of the focus.
    pub yaw: f32,
    /// Elevation above the floor plane, radians.
    pub pitch: f32,
    pub distance: f32,
    /// Allowed focus rectangle (min, max) on XZ; unbounded until a layout loads.
    pub bounds: Option<(Vec2, Vec2)>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::framing(Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// The default view: raised `CAMERA_OFFSET_HEIGHT` and pulled back
    /// `CAMERA_OFFSET_BACK` from `focus`.
    pub fn framing(focus: Vec3) -> Self {
        Self {
            focus,
            yaw: 0.0,
            pitch: CAMERA_OFFSET_HEIGHT.atan2(CAMERA_OFFSET_BACK),
            distance: Vec2::new(CAMERA_OFFSET_HEIGHT, CAMERA_OFFSET_BACK).length(),
            bounds: None,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.focus + Vec3::new(x, y, z)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }

    /// Move the focus by `(right, back)` in camera-relative ground axes.
    pub fn pan(&mut self, right: f32, back: f32) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.focus.x += right * cos_yaw + back * sin_yaw;
        self.focus.z += -right * sin_yaw + back * cos_yaw;
        self.clamp_focus();
    }

    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Scale the distance; `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn clamp_focus(&mut self) {
        if let Some((min, max)) = self.bounds {
            self.focus.x = self.focus.x.clamp(min.x, max.x);
            self.focus.z = self.focus.z.clamp(min.y, max.y);
        }
    }
}

#[derive(Resource, Default)]
pub struct CameraDrag {
    pub orbiting: bool,
    pub panning: bool,
    pub last_pos: Vec2,
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        orbit.transform(),
    ));
    commands.insert_resource(orbit);
}

/// Re-frame the camera on the grid centre whenever a layout is installed.
pub fn frame_layout(layout: Option<Res<LoadedLayout>>, mut orbit: ResMut<OrbitCamera>) {
    let Some(layout) = layout else {
        return;
    };
    if !layout.is_changed() {
        return;
    }
    let mut framed = OrbitCamera::framing(layout.0.center());
    framed.bounds = Some((
        Vec2::splat(-FOCUS_MARGIN),
        Vec2::new(
            layout.0.width() as f32 + FOCUS_MARGIN,
            layout.0.height() as f32 + FOCUS_MARGIN,
        ),
    ));
    *orbit = framed;
}

/// Write `OrbitCamera` into the camera transform when it changes.
pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = orbit.transform();
}

/// WASD pans, Q/E rotate.
pub fn camera_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut contexts: EguiContexts,
    mut orbit: ResMut<OrbitCamera>,
) {
    if egui_wants_keyboard(&mut contexts) {
        return;
    }
    let dt = time.delta_secs();

    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        dir.x += 1.0;
    }
    if dir != Vec2::ZERO {
        let step = dir.normalize() * PAN_SPEED * dt * orbit.distance / CAMERA_OFFSET_BACK;
        orbit.pan(step.x, step.y);
    }

    let mut spin = 0.0;
    if keys.pressed(KeyCode::KeyQ) {
        spin -= 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        spin += 1.0;
    }
    if spin != 0.0 {
        orbit.orbit(spin * ROTATE_SPEED * dt, 0.0);
    }
}

/// Left drag orbits; right or middle drag pans.
pub fn camera_mouse_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut contexts: EguiContexts,
    mut drag: ResMut<CameraDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(pos) = window.cursor_position() else {
        return;
    };

    if buttons.just_released(MouseButton::Left) {
        drag.orbiting = false;
    }
    if buttons.just_released(MouseButton::Right) || buttons.just_released(MouseButton::Middle) {
        drag.panning = false;
    }

    // Only start a drag outside egui; one already in progress keeps going.
    let starting =
        buttons.any_just_pressed([MouseButton::Left, MouseButton::Right, MouseButton::Middle]);
    if starting && !egui_wants_pointer(&mut contexts) {
        if buttons.just_pressed(MouseButton::Left) {
            drag.orbiting = true;
        } else {
            drag.panning = true;
        }
        drag.last_pos = pos;
        return;
    }

    if !drag.orbiting && !drag.panning {
        return;
    }
    let delta = pos - drag.last_pos;
    drag.last_pos = pos;
    if delta == Vec2::ZERO {
        return;
    }

    if drag.orbiting {
        orbit.orbit(-delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
    } else {
        let scale = orbit.distance * DRAG_PAN_SCALE;
        orbit.pan(-delta.x * scale, -delta.y * scale);
    }
}

/// Scroll wheel zoom.
pub fn camera_zoom(
    mut scroll_evts: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut orbit: ResMut<OrbitCamera>,
) {
    if egui_wants_pointer(&mut contexts) {
        scroll_evts.clear();
        return;
    }
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        orbit.zoom(1.0 - dy * ZOOM_SPEED);
    }
}
