//! Replay frame capture for replay-to-video workflows.
//!
//! `kitchenviz --state run.json --record out/` writes `out/frame_00001.png`
//! and onwards, then exits once playback has finished. A looping player never
//! finishes, so recording keeps looping switched off.

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};

use kitchen::loader::LoadStatus;
use kitchen::playback::FramePlayer;

/// What the recorder does on a rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStep {
    Wait,
    Capture(String),
    Exit,
}

#[derive(Resource, Debug)]
pub struct ReplayRecordState {
    pub output_dir: String,
    /// Rendered frames since startup.
    pub frame_count: u32,
    /// Last written PNG number (1-based in filenames).
    pub capture_index: u32,
    /// Capture every Nth rendered frame.
    pub capture_interval: u32,
    pub warmup_frames: u32,
    /// Frames kept rendering after playback finishes, so markers settle.
    pub cooldown_frames: u32,
    /// Give up if nothing has loaded after this many frames.
    pub start_timeout_frames: u32,
    pub done_at_frame: Option<u32>,
}

impl ReplayRecordState {
    pub fn new(output_dir: String) -> Self {
        Self {
            output_dir,
            frame_count: 0,
            capture_index: 0,
            capture_interval: 2,
            warmup_frames: 10,
            cooldown_frames: 30,
            start_timeout_frames: 600,
            done_at_frame: None,
        }
    }

    /// Advance one rendered frame. `ready` is whether a state file has been
    /// installed; `playing` and `finished` describe the frame player.
    pub fn step(&mut self, ready: bool, playing: bool, finished: bool) -> RecordStep {
        self.frame_count += 1;
        if self.frame_count < self.warmup_frames {
            return RecordStep::Wait;
        }

        if !ready {
            if self.frame_count >= self.warmup_frames + self.start_timeout_frames {
                warn!(
                    "Recording timed out waiting for the state file after {} frames",
                    self.frame_count
                );
                return RecordStep::Exit;
            }
            return RecordStep::Wait;
        }

        // A static layout is one picture.
        if !playing && self.capture_index > 0 {
            return RecordStep::Exit;
        }

        if playing && finished && self.done_at_frame.is_none() {
            self.done_at_frame = Some(self.frame_count);
            info!("Recording: playback finished at frame {}", self.frame_count);
        }
        if let Some(done) = self.done_at_frame {
            if self.frame_count >= done + self.cooldown_frames {
                info!(
                    "Recording complete: {} frames written to '{}'",
                    self.capture_index, self.output_dir
                );
                return RecordStep::Exit;
            }
        }

        let interval = self.capture_interval.max(1);
        if (self.frame_count - self.warmup_frames) % interval != 0 {
            return RecordStep::Wait;
        }
        self.capture_index += 1;
        RecordStep::Capture(format!(
            "{}/frame_{:05}.png",
            self.output_dir, self.capture_index
        ))
    }
}

pub fn drive_replay_recording(
    mut commands: Commands,
    mut state: ResMut<ReplayRecordState>,
    status: Res<LoadStatus>,
    mut player: ResMut<FramePlayer>,
    mut exit: EventWriter<AppExit>,
) {
    if player.is_looping() {
        warn!("Looping is disabled while recording");
        player.set_looping(false);
    }
    if let LoadStatus::Failed(message) = &*status {
        error!("Recording aborted: {message}");
        exit.send(AppExit::error());
        return;
    }
    let ready = matches!(*status, LoadStatus::Ready { .. });

    match state.step(ready, player.is_loaded(), player.is_finished()) {
        RecordStep::Wait => {}
        RecordStep::Capture(path) => {
            commands
                .spawn(Screenshot::primary_window())
                .observe(save_to_disk(path));
        }
        RecordStep::Exit => {
            exit.send(AppExit::Success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen::Frame;

    fn recorder() -> ReplayRecordState {
        let mut state = ReplayRecordState::new("out".to_string());
        state.warmup_frames = 2;
        state.cooldown_frames = 3;
        state.start_timeout_frames = 5;
        state
    }

    #[test]
    fn waits_through_warmup_then_captures_every_interval() {
        let mut state = recorder();
        assert_eq!(state.step(true, true, false), RecordStep::Wait);
        assert_eq!(
            state.step(true, true, false),
            RecordStep::Capture("out/frame_00001.png".to_string())
        );
        assert_eq!(state.step(true, true, false), RecordStep::Wait);
        assert_eq!(
            state.step(true, true, false),
            RecordStep::Capture("out/frame_00002.png".to_string())
        );
    }

    #[test]
    fn exits_after_cooldown_once_finished() {
        let mut state = recorder();
        state.step(true, true, false);
        state.step(true, true, false);
        let mut steps = Vec::new();
        for _ in 0..4 {
            steps.push(state.step(true, true, true));
        }
        assert_eq!(steps.last(), Some(&RecordStep::Exit));
        assert!(!steps[..3].contains(&RecordStep::Exit));
    }

    #[test]
    fn gives_up_when_nothing_loads() {
        let mut state = recorder();
        let mut last = RecordStep::Wait;
        for _ in 0..7 {
            last = state.step(false, false, true);
        }
        assert_eq!(last, RecordStep::Exit);
    }

    #[test]
    fn static_layout_is_a_single_capture() {
        let mut state = recorder();
        state.step(true, false, true);
        assert!(matches!(state.step(true, false, true), RecordStep::Capture(_)));
        assert_eq!(state.step(true, false, true), RecordStep::Exit);
    }

    #[test]
    fn recording_turns_looping_off_so_playback_can_finish() {
        let mut app = App::new();
        let mut player = FramePlayer::new(5.0, 1.0, true);
        player.load(vec![Frame::default(); 3]);
        app.insert_resource(player)
            .insert_resource(LoadStatus::Loading)
            .insert_resource(ReplayRecordState::new("out".to_string()))
            .add_systems(Update, drive_replay_recording);
        app.update();

        let mut player = app.world_mut().resource_mut::<FramePlayer>();
        assert!(!player.is_looping());
        player.seek(2);
        assert!(player.is_finished());
    }
}
