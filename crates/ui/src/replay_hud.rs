//! Top panel with playback controls, frame info and layout statistics.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use kitchen::layout::{StaticLayout, TileKind};
use kitchen::loader::{LoadedLayout, StateSource};
use kitchen::playback::{FramePlayer, SceneMode};
use rendering::egui_input_guard::egui_wants_keyboard;
use rendering::StatusMessage;

use crate::theme;

pub const SPEED_PRESETS: [f32; 4] = [0.5, 1.0, 2.0, 4.0];

pub struct ReplayHudPlugin;

impl Plugin for ReplayHudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (playback_keybinds, replay_hud_ui).chain());
    }
}

/// Playback shortcuts understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackKey {
    TogglePause,
    StepBack,
    StepForward,
    First,
    Last,
}

impl PlaybackKey {
    pub const BINDINGS: [(KeyCode, PlaybackKey); 5] = [
        (KeyCode::Space, PlaybackKey::TogglePause),
        (KeyCode::ArrowLeft, PlaybackKey::StepBack),
        (KeyCode::ArrowRight, PlaybackKey::StepForward),
        (KeyCode::Home, PlaybackKey::First),
        (KeyCode::End, PlaybackKey::Last),
    ];

    pub fn apply(self, player: &mut FramePlayer) {
        match self {
            PlaybackKey::TogglePause => {
                // A finished run restarts instead of toggling a pause that
                // would not move anything.
                if player.is_finished() {
                    player.seek(0);
                    player.set_paused(false);
                } else {
                    player.toggle_pause();
                }
            }
            PlaybackKey::StepBack => {
                player.set_paused(true);
                player.step_back();
            }
            PlaybackKey::StepForward => {
                player.set_paused(true);
                player.step_forward();
            }
            PlaybackKey::First => player.seek(0),
            PlaybackKey::Last => player.seek(player.len().saturating_sub(1)),
        }
    }
}

fn playback_keybinds(
    keys: Res<ButtonInput<KeyCode>>,
    mode: Res<SceneMode>,
    mut contexts: EguiContexts,
    mut player: ResMut<FramePlayer>,
) {
    if *mode != SceneMode::Replay || egui_wants_keyboard(&mut contexts) {
        return;
    }
    for (code, action) in PlaybackKey::BINDINGS {
        if keys.just_pressed(code) {
            action.apply(&mut player);
        }
    }
}

/// "Frame 3 / 40".
pub fn frame_label(player: &FramePlayer) -> String {
    if player.is_empty() {
        return "Frame - / -".to_string();
    }
    format!("Frame {} / {}", player.index() + 1, player.len())
}

/// Non-floor tile kinds with their counts, in order of first appearance.
pub fn tile_counts(layout: &StaticLayout) -> Vec<(TileKind, usize)> {
    let mut counts: Vec<(TileKind, usize)> = Vec::new();
    for (_, _, kind) in layout.iter() {
        if kind == TileKind::Floor {
            continue;
        }
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
}

fn speed_label(speed: f32) -> String {
    if speed.fract() == 0.0 {
        format!("{speed:.0}x")
    } else {
        format!("{speed}x")
    }
}

fn replay_hud_ui(
    mut contexts: EguiContexts,
    mode: Res<SceneMode>,
    mut player: ResMut<FramePlayer>,
    layout: Option<Res<LoadedLayout>>,
    source: Option<Res<StateSource>>,
    status: Res<StatusMessage>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Some(layout) = layout else {
        return;
    };

    egui::TopBottomPanel::top("replay_hud").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.strong(mode.label());
            if let Some(source) = &source {
                ui.label(egui::RichText::new(&source.0).color(theme::TEXT_MUTED));
            }
            ui.separator();

            match *mode {
                SceneMode::Static => static_summary(ui, &layout.0),
                SceneMode::Replay => playback_controls(ui, &mut player),
            }

            #[cfg(target_arch = "wasm32")]
            if ui.button("Reload").clicked() {
                if let Some(window) = web_sys::window() {
                    if let Err(err) = window.location().reload() {
                        warn!("Page reload failed: {err:?}");
                    }
                }
            }
        });

        if *mode == SceneMode::Replay {
            frame_details(ui, &mut player);
        }

        if status.active() {
            let color = if status.is_error {
                theme::TEXT_ERROR
            } else {
                theme::TEXT_OK
            };
            ui.label(egui::RichText::new(&status.text).color(color));
        }

        ui.small(
            "Camera: left drag orbit, right drag pan, wheel zoom, WASD pan, Q/E rotate. \
             Playback: Space, Left/Right, Home/End. F12 screenshot.",
        );
    });
}

fn static_summary(ui: &mut egui::Ui, layout: &StaticLayout) {
    ui.label(format!("Grid {} x {}", layout.width(), layout.height()));
    for (kind, count) in tile_counts(layout) {
        ui.label(format!("{}: {count}", kind.label()));
    }
}

fn playback_controls(ui: &mut egui::Ui, player: &mut FramePlayer) {
    let play_label = if player.is_finished() {
        "Replay"
    } else if player.is_paused() {
        "Play"
    } else {
        "Pause"
    };
    if ui.button(play_label).clicked() {
        PlaybackKey::TogglePause.apply(player);
    }
    if ui.button("<").on_hover_text("Step back").clicked() {
        PlaybackKey::StepBack.apply(player);
    }
    if ui.button(">").on_hover_text("Step forward").clicked() {
        PlaybackKey::StepForward.apply(player);
    }

    ui.separator();
    for speed in SPEED_PRESETS {
        let selected = (player.speed() - speed).abs() < f32::EPSILON;
        if ui.selectable_label(selected, speed_label(speed)).clicked() {
            player.set_speed(speed);
        }
    }

    ui.separator();
    let mut looping = player.is_looping();
    if ui.checkbox(&mut looping, "Loop").changed() {
        player.set_looping(looping);
    }
}

fn frame_details(ui: &mut egui::Ui, player: &mut FramePlayer) {
    ui.horizontal(|ui| {
        let last = player.len().saturating_sub(1);
        let mut index = player.index();
        let slider = egui::Slider::new(&mut index, 0..=last).show_value(false);
        if ui.add(slider).changed() {
            player.seek(index);
        }

        ui.add(
            egui::ProgressBar::new(player.progress())
                .desired_width(180.0)
                .show_percentage(),
        );

        ui.label(frame_label(player));
        if let Some(frame) = player.current() {
            ui.label(format!("Timestep: {}", frame.timestep));
            ui.label(format!("Score: {}", frame.score));
        }
        if player.is_finished() {
            ui.label(egui::RichText::new("Finished").color(theme::TEXT_MUTED));
        }
    });
}
