//! Keeps camera and playback shortcuts from reacting to input that egui is
//! already consuming (dragging the frame slider, typing in a panel).

use bevy_egui::EguiContexts;

/// `true` while the pointer is over an egui area or egui is mid-interaction.
/// Before the primary context exists nothing can be captured, so `false`.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
}

/// `true` while an egui widget has keyboard focus.
#[inline]
pub fn egui_wants_keyboard(contexts: &mut EguiContexts) -> bool {
    contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_keyboard_input())
}
