//! Window resize and pixel-ratio handling.

use bevy::prelude::*;
use bevy::window::WindowResized;

use kitchen::config::MAX_PIXEL_RATIO;

/// The override to apply for an OS scale factor, if it needs capping.
pub fn capped_scale_factor(base: f32) -> Option<f32> {
    (base > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}

/// Keep the effective pixel ratio at or below `MAX_PIXEL_RATIO`. Runs for
/// new windows and whenever the OS reports a different scale factor.
pub fn cap_pixel_ratio(mut windows: Query<&mut Window, Changed<Window>>) {
    for mut window in &mut windows {
        let base = window.resolution.base_scale_factor();
        let wanted = capped_scale_factor(base);
        if window.resolution.scale_factor_override() != wanted {
            if let Some(cap) = wanted {
                info!("Capping pixel ratio {base:.2} to {cap:.2}");
            }
            window.resolution.set_scale_factor_override(wanted);
        }
    }
}

pub fn log_window_resize(mut resized: EventReader<WindowResized>) {
    if let Some(event) = resized.read().last() {
        debug!("Viewport resized to {:.0}x{:.0}", event.width, event.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dense_displays_are_capped() {
        assert_eq!(capped_scale_factor(1.0), None);
        assert_eq!(capped_scale_factor(2.0), None);
        assert_eq!(capped_scale_factor(3.0), Some(2.0));
    }

    #[test]
    fn dense_window_gets_override() {
        let mut app = App::new();
        app.add_systems(Update, cap_pixel_ratio);
        let mut window = Window::default();
        window.resolution.set_scale_factor(3.0);
        let entity = app.world_mut().spawn(window).id();
        app.update();

        let window = app.world().get::<Window>(entity).expect("window");
        assert_eq!(window.resolution.scale_factor_override(), Some(2.0));
        assert_eq!(window.resolution.scale_factor(), 2.0);
    }
}
