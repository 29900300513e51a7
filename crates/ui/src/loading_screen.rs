//! Loading overlay while the state file is fetched, and an error window if
//! it cannot be loaded.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use kitchen::loader::{LoadStatus, StateSource};

use crate::theme;

#[derive(Resource)]
pub struct LoadingAnimation {
    /// Dots currently shown, cycling 1 -> 2 -> 3 -> 1.
    pub dots: usize,
    pub timer: Timer,
}

impl Default for LoadingAnimation {
    fn default() -> Self {
        Self {
            dots: 1,
            timer: Timer::from_seconds(0.4, TimerMode::Repeating),
        }
    }
}

impl LoadingAnimation {
    pub fn advance(&mut self, delta: std::time::Duration) {
        self.timer.tick(delta);
        if self.timer.just_finished() {
            self.dots = self.dots % 3 + 1;
        }
    }

    pub fn text(&self) -> String {
        format!("Loading kitchen{}", ".".repeat(self.dots))
    }
}

pub struct LoadingScreenPlugin;

impl Plugin for LoadingScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingAnimation>()
            .add_systems(Update, loading_screen_ui);
    }
}

fn loading_screen_ui(
    mut contexts: EguiContexts,
    status: Res<LoadStatus>,
    source: Option<Res<StateSource>>,
    time: Res<Time>,
    mut animation: ResMut<LoadingAnimation>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    match &*status {
        LoadStatus::Ready { .. } => {}
        LoadStatus::Loading => {
            animation.advance(time.delta());
            loading_overlay(ctx, &animation.text());
        }
        LoadStatus::Failed(message) => {
            let path = source.as_ref().map(|s| s.0.as_str()).unwrap_or("state file");
            egui::Window::new("Could not load kitchen")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .default_width(360.0)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(message).color(theme::TEXT_ERROR));
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(format!(
                            "Check that {path} exists and contains staticInfo and frames."
                        ))
                        .color(theme::TEXT_MUTED),
                    );
                });
        }
    }
}

fn loading_overlay(ctx: &mut egui::Context, text: &str) {
    let screen_rect = ctx.screen_rect();

    egui::Area::new(egui::Id::new("loading_overlay"))
        .fixed_pos(screen_rect.min)
        .order(egui::Order::Foreground)
        .interactable(true)
        .show(ctx, |ui| {
            ui.painter().rect_filled(
                screen_rect,
                egui::CornerRadius::ZERO,
                egui::Color32::from_black_alpha(160),
            );
            ui.allocate_rect(screen_rect, egui::Sense::click_and_drag());
        });

    egui::Window::new("loading_window")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new(text)
                    .size(theme::FONT_HEADING)
                    .color(theme::TEXT_HEADING),
            );
            ui.add_space(12.0);
        });
}
