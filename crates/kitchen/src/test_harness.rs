//! # TestKitchen: headless test harness for the kitchen viewer
//!
//! Wraps `bevy::app::App` + `KitchenPlugin` with a fixed, manually advanced
//! clock so playback can be driven deterministically without a window.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::frame::{Frame, HeldObject, ObjectState, PlayerState};
use crate::loader::{LoadStatus, LoadedLayout, StateReceived};
use crate::playback::{FrameChanged, FramePlayer, SceneMode};
use crate::state_file::{GridRow, StateFile, StaticInfo};
use crate::viewer_config::ViewerConfig;
use crate::KitchenPlugin;

/// Wall-clock seconds each `update()` advances. Exactly representable, so
/// frame-step boundaries are hit exactly.
pub const TICK_SECONDS: f32 = 0.125;

/// Every `FrameChanged` index seen so far, in order.
#[derive(Resource, Default)]
pub struct ObservedFrameChanges(pub Vec<usize>);

fn observe_frame_changes(
    mut events: EventReader<FrameChanged>,
    mut observed: ResMut<ObservedFrameChanges>,
) {
    for event in events.read() {
        observed.0.push(event.index);
    }
}

/// A headless Bevy App wrapping `KitchenPlugin` for integration testing.
pub struct TestKitchen {
    app: App,
}

impl Default for TestKitchen {
    fn default() -> Self {
        Self::new()
    }
}

impl TestKitchen {
    /// Harness with the default config, except 4 frames per second so that
    /// two ticks make one frame step.
    pub fn new() -> Self {
        Self::with_config(ViewerConfig {
            playback_fps: 4.0,
            ..Default::default()
        })
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f32(TICK_SECONDS),
        ));
        app.insert_resource(config);
        app.add_plugins(KitchenPlugin);
        app.init_resource::<ObservedFrameChanges>();
        app.add_systems(Update, observe_frame_changes.after(crate::KitchenSet::Playback));

        // Run one update so Startup systems execute (no StateSource, so nothing loads).
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Deliver a state file as if a loader had just decoded it.
    pub fn receive(mut self, file: StateFile) -> Self {
        self.app.world_mut().send_event(StateReceived(Ok(file)));
        self.app.update();
        self
    }

    /// Deliver a load failure.
    pub fn receive_error(mut self, msg: &str) -> Self {
        self.app
            .world_mut()
            .send_event(StateReceived(Err(msg.to_string())));
        self.app.update();
        self
    }

    pub fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    pub fn player_mut(&mut self) -> Mut<'_, FramePlayer> {
        self.app.world_mut().resource_mut::<FramePlayer>()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn player(&self) -> &FramePlayer {
        self.app.world().resource::<FramePlayer>()
    }

    pub fn status(&self) -> &LoadStatus {
        self.app.world().resource::<LoadStatus>()
    }

    pub fn mode(&self) -> SceneMode {
        *self.app.world().resource::<SceneMode>()
    }

    pub fn layout(&self) -> Option<&LoadedLayout> {
        self.app.world().get_resource::<LoadedLayout>()
    }

    pub fn frame_changes(&self) -> &[usize] {
        &self.app.world().resource::<ObservedFrameChanges>().0
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The classic 5x4 "cramped room" layout with no frames.
pub fn cramped_room() -> StateFile {
    StateFile {
        static_info: StaticInfo {
            width: 5,
            height: 4,
            grid: ["XXPXX", "O  2O", "X1  X", "XDXSX"]
                .iter()
                .map(|r| GridRow::Text(r.to_string()))
                .collect(),
        },
        frames: Vec::new(),
    }
}

/// `cramped_room` with `n` frames: player 0 paces between (1, 2) and (1, 1),
/// player 1 stands at (3, 1) facing the pot, and from frame 2 onwards a soup
/// cooks in the pot while player 0 carries an onion.
pub fn cramped_room_replay(n: usize) -> StateFile {
    let mut file = cramped_room();
    file.frames = (0..n)
        .map(|t| {
            let y = if t % 2 == 0 { 2 } else { 1 };
            let carrying = t >= 2;
            Frame {
                timestep: t as u64,
                score: if t >= 4 { 20 } else { 0 },
                players: vec![
                    PlayerState {
                        position: [1, y],
                        orientation: if y == 1 { [0, -1] } else { [0, 1] },
                        held_object: carrying.then(|| HeldObject {
                            name: "onion".to_string(),
                            ingredients: Vec::new(),
                            is_ready: false,
                        }),
                    },
                    PlayerState {
                        position: [3, 1],
                        orientation: [-1, 0],
                        held_object: None,
                    },
                ],
                objects: if carrying {
                    vec![ObjectState {
                        name: "soup".to_string(),
                        position: [2, 0],
                        ingredients: vec!["onion".to_string(); 3],
                        cooking_tick: t as i32 - 2,
                        cook_time: 20,
                        is_ready: false,
                    }]
                } else {
                    Vec::new()
                },
            }
        })
        .collect();
    file
}
