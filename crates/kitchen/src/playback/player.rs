//! Frame player: advances through recorded frames at a fixed rate.
//!
//! Wall-clock time is accumulated (scaled by the speed multiplier) and the
//! frame index steps once per `1 / fps` seconds. Any index change, whether
//! from playback, stepping or seeking, is announced once through
//! `FrameChanged` so renderers only reconcile markers when needed.

use bevy::prelude::*;

use crate::config::DEFAULT_PLAYBACK_FPS;
use crate::frame::Frame;

/// Emitted whenever the displayed frame index changes (including the first
/// frame after a load).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameChanged {
    pub index: usize,
}

/// Resource that drives replay playback.
#[derive(Resource, Debug)]
pub struct FramePlayer {
    frames: Vec<Frame>,
    /// Index of the frame currently displayed.
    index: usize,
    /// Scaled seconds not yet consumed by a frame step.
    accumulator: f32,
    fps: f32,
    speed: f32,
    paused: bool,
    looping: bool,
    /// Last index announced through `FrameChanged`.
    announced: Option<usize>,
    finish_reported: bool,
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYBACK_FPS, 1.0, false)
    }
}

impl FramePlayer {
    pub fn new(fps: f32, speed: f32, looping: bool) -> Self {
        Self {
            frames: Vec::new(),
            index: 0,
            accumulator: 0.0,
            fps,
            speed,
            paused: false,
            looping,
            announced: None,
            finish_reported: false,
        }
    }

    /// Load a frame sequence and start playing from the first frame.
    pub fn load(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        self.index = 0;
        self.accumulator = 0.0;
        self.paused = false;
        self.announced = None;
        self.finish_reported = false;
    }

    /// Drop all frames (static mode).
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    pub fn is_loaded(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if looping {
            self.finish_reported = false;
        }
    }

    /// Whether a non-looping playback has reached its last frame.
    /// An empty player counts as finished.
    pub fn is_finished(&self) -> bool {
        if self.frames.is_empty() {
            return true;
        }
        !self.looping && self.index + 1 >= self.frames.len()
    }

    /// Fraction of the sequence shown so far, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        match self.frames.len() {
            0 => 0.0,
            1 => 1.0,
            n => self.index as f32 / (n - 1) as f32,
        }
    }

    /// Advance playback by `dt` wall-clock seconds. Returns the number of
    /// frame steps taken. Runs in constant time however large `dt * speed`
    /// is.
    pub fn advance(&mut self, dt: f32) -> usize {
        if self.paused || self.fps <= 0.0 || self.is_finished() {
            return 0;
        }

        let step = 1.0 / self.fps;
        self.accumulator += dt * self.speed;
        if !self.accumulator.is_finite() {
            self.accumulator = 0.0;
            return 0;
        }
        if self.accumulator < step {
            return 0;
        }

        let due = (self.accumulator / step).floor();
        let len = self.frames.len();
        let steps = if self.looping {
            // Float-to-int `as` saturates, so huge backlogs stay in range.
            self.index = (self.index + (due % len as f32) as usize) % len;
            self.accumulator -= due * step;
            due as usize
        } else {
            let taken = (due as usize).min(len - 1 - self.index);
            self.index += taken;
            self.accumulator -= taken as f32 * step;
            taken
        };

        if self.is_finished() || !(0.0..step).contains(&self.accumulator) {
            self.accumulator = 0.0;
        }
        steps
    }

    /// Jump to `index` (clamped to the last frame) and restart the step timer.
    pub fn seek(&mut self, index: usize) {
        if self.frames.is_empty() {
            return;
        }
        self.index = index.min(self.frames.len() - 1);
        self.accumulator = 0.0;
        if !self.is_finished() {
            self.finish_reported = false;
        }
    }

    pub fn step_forward(&mut self) {
        self.seek(self.index + 1);
    }

    pub fn step_back(&mut self) {
        self.seek(self.index.saturating_sub(1));
    }

    /// Returns the current index if it has not been announced yet.
    pub fn take_unannounced(&mut self) -> Option<usize> {
        if self.frames.is_empty() || self.announced == Some(self.index) {
            return None;
        }
        self.announced = Some(self.index);
        Some(self.index)
    }

    /// Returns `true` exactly once per playback run when it finishes.
    pub fn take_finish_report(&mut self) -> bool {
        if self.is_loaded() && self.is_finished() && !self.finish_reported {
            self.finish_reported = true;
            true
        } else {
            false
        }
    }
}

/// System: advance playback by the frame delta and announce index changes.
pub fn advance_playback(
    time: Res<Time>,
    mut player: ResMut<FramePlayer>,
    mut changed: EventWriter<FrameChanged>,
) {
    if !player.is_loaded() {
        return;
    }

    player.advance(time.delta_secs());

    if let Some(index) = player.take_unannounced() {
        changed.send(FrameChanged { index });
    }

    if player.take_finish_report() {
        info!(
            "Playback finished at frame {} of {}",
            player.index() + 1,
            player.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<Frame> {
        (0..n)
            .map(|t| Frame {
                timestep: t as u64,
                ..Default::default()
            })
            .collect()
    }

    fn player(n: usize) -> FramePlayer {
        let mut player = FramePlayer::new(4.0, 1.0, false);
        player.load(frames(n));
        player
    }

    #[test]
    fn advances_one_frame_per_step() {
        let mut p = player(5);
        assert_eq!(p.advance(0.125), 0);
        assert_eq!(p.index(), 0);
        assert_eq!(p.advance(0.125), 1);
        assert_eq!(p.index(), 1);
        assert_eq!(p.current().map(|f| f.timestep), Some(1));
    }

    #[test]
    fn large_dt_takes_several_steps() {
        let mut p = player(10);
        assert_eq!(p.advance(1.0), 4);
        assert_eq!(p.index(), 4);
    }

    #[test]
    fn speed_scales_time() {
        let mut p = player(10);
        p.set_speed(2.0);
        assert_eq!(p.advance(0.5), 4);
        p.set_speed(0.5);
        assert_eq!(p.advance(0.25), 0);
        assert_eq!(p.advance(0.25), 1);
    }

    #[test]
    fn stops_at_last_frame_without_loop() {
        let mut p = player(3);
        assert_eq!(p.advance(10.0), 2);
        assert_eq!(p.index(), 2);
        assert!(p.is_finished());
        assert_eq!(p.advance(1.0), 0);
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn loops_back_to_start() {
        let mut p = player(3);
        p.set_looping(true);
        assert_eq!(p.advance(0.75), 3);
        assert_eq!(p.index(), 0);
        assert!(!p.is_finished());
    }

    #[test]
    fn huge_speed_while_looping_returns_promptly() {
        let mut p = FramePlayer::new(5.0, 1e30, true);
        p.load(frames(3));
        let steps = p.advance(0.016);
        assert!(steps > 0);
        assert!(p.index() < 3);
        assert!(!p.is_finished());
        // Stays usable afterwards at a normal speed.
        p.set_speed(1.0);
        p.seek(0);
        assert_eq!(p.advance(0.2), 1);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn overflowing_time_is_dropped() {
        let mut p = FramePlayer::new(5.0, f32::MAX, true);
        p.load(frames(3));
        assert_eq!(p.advance(10.0), 0);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn looping_backlog_wraps_by_sequence_length() {
        let mut p = player(3);
        p.set_looping(true);
        // 7 steps from frame 0 over 3 frames lands on frame 1.
        assert_eq!(p.advance(1.75), 7);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn paused_player_does_not_move() {
        let mut p = player(3);
        p.toggle_pause();
        assert!(p.is_paused());
        assert_eq!(p.advance(5.0), 0);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn zero_fps_is_inert() {
        let mut p = player(3);
        p.set_fps(0.0);
        assert_eq!(p.advance(5.0), 0);
    }

    #[test]
    fn seek_clamps_and_resets_accumulator() {
        let mut p = player(4);
        p.advance(0.2);
        p.seek(99);
        assert_eq!(p.index(), 3);
        p.seek(1);
        // Accumulated 0.2s was discarded, so a short tick does not step.
        assert_eq!(p.advance(0.125), 0);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn step_back_saturates() {
        let mut p = player(3);
        p.step_back();
        assert_eq!(p.index(), 0);
        p.step_forward();
        p.step_forward();
        p.step_forward();
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn progress_edges() {
        let empty = FramePlayer::default();
        assert_eq!(empty.progress(), 0.0);
        assert!(empty.is_finished());

        let single = player(1);
        assert_eq!(single.progress(), 1.0);

        let mut p = player(5);
        p.seek(2);
        assert_eq!(p.progress(), 0.5);
    }

    #[test]
    fn announces_each_index_once() {
        let mut p = player(3);
        assert_eq!(p.take_unannounced(), Some(0));
        assert_eq!(p.take_unannounced(), None);
        p.step_forward();
        assert_eq!(p.take_unannounced(), Some(1));
        assert_eq!(p.take_unannounced(), None);
    }

    #[test]
    fn reload_announces_first_frame_again() {
        let mut p = player(3);
        assert_eq!(p.take_unannounced(), Some(0));
        p.load(frames(2));
        assert_eq!(p.take_unannounced(), Some(0));
    }

    #[test]
    fn finish_reported_once() {
        let mut p = player(2);
        assert!(!p.take_finish_report());
        p.advance(1.0);
        assert!(p.take_finish_report());
        assert!(!p.take_finish_report());
        p.seek(0);
        p.advance(1.0);
        assert!(p.take_finish_report());
    }
}
