use bevy::prelude::*;

/// Seconds a status message stays on screen.
pub const STATUS_SECONDS: f32 = 3.0;

/// A short-lived note for the HUD ("Screenshot saved: ...").
#[derive(Resource, Default, Debug)]
pub struct StatusMessage {
    pub text: String,
    pub timer: f32,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>, is_error: bool) {
        self.text = text.into();
        self.timer = STATUS_SECONDS;
        self.is_error = is_error;
    }

    pub fn active(&self) -> bool {
        self.timer > 0.0
    }
}

pub fn tick_status_message(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.active() {
        status.timer -= time.delta_secs();
    }
}
