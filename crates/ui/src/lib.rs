use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod loading_screen;
pub mod replay_hud;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_kitchen_theme)
            .add_plugins(replay_hud::ReplayHudPlugin)
            .add_plugins(loading_screen::LoadingScreenPlugin);
    }
}
