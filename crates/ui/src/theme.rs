use bevy_egui::{egui, EguiContexts};

pub const FONT_HEADING: f32 = 20.0;
pub const TEXT_HEADING: egui::Color32 = egui::Color32::from_rgb(235, 235, 245);
pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_rgb(150, 155, 170);
pub const TEXT_ERROR: egui::Color32 = egui::Color32::from_rgb(240, 110, 100);
pub const TEXT_OK: egui::Color32 = egui::Color32::from_rgb(130, 210, 140);

pub fn apply_kitchen_theme(mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let mut style = (*ctx.style()).clone();

    let panel = egui::Color32::from_rgba_unmultiplied(26, 26, 30, 235);
    let inactive = egui::Color32::from_rgb(48, 50, 58);
    let hover = egui::Color32::from_rgb(68, 74, 90);
    let active = egui::Color32::from_rgb(255, 140, 0);

    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = active;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = active;

    style.visuals.window_fill = panel;
    style.visuals.panel_fill = panel;
    style.visuals.selection.bg_fill = active;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, active);

    let rounding = egui::CornerRadius::same(4);
    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.inactive.corner_radius = rounding;
    style.visuals.widgets.hovered.corner_radius = rounding;
    style.visuals.widgets.active.corner_radius = rounding;

    ctx.set_style(style);
}
