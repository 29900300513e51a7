//! Integration tests for the kitchen viewer using the `TestKitchen` harness.
//!
//! These tests spin up a headless Bevy App with `KitchenPlugin` and verify
//! loading, mode selection and playback across the systems working together.


use crate::loader::LoadStatus;
use crate::playback::SceneMode;
use crate::test_harness::{cramped_room, cramped_room_replay, TestKitchen};
use crate::viewer_config::ViewerConfig;

// ===========================================================================
// 1. Loading
// ===========================================================================

#[test]
fn starts_in_loading_state() {
    let kitchen = TestKitchen::new();
    assert_eq!(*kitchen.status(), LoadStatus::Loading);
    assert!(kitchen.layout().is_none());
    assert_eq!(kitchen.mode(), SceneMode::Static);
}

#[test]
fn layout_only_file_enters_static_mode() {
    let kitchen = TestKitchen::new().receive(cramped_room());
    assert_eq!(
        *kitchen.status(),
        LoadStatus::Ready {
            frames: 0,
            width: 5,
            height: 4
        }
    );
    assert_eq!(kitchen.mode(), SceneMode::Static);
    assert!(!kitchen.player().is_loaded());
    let layout = kitchen.layout().expect("layout should be installed");
    assert_eq!(layout.0.blocks().count(), 14);
    assert!(kitchen.frame_changes().is_empty());
}

#[test]
fn replay_file_enters_replay_mode() {
    let kitchen = TestKitchen::new().receive(cramped_room_replay(6));
    assert_eq!(kitchen.mode(), SceneMode::Replay);
    assert_eq!(kitchen.player().len(), 6);
    assert_eq!(kitchen.frame_changes(), &[0]);
}

#[test]
fn static_only_config_ignores_frames() {
    let kitchen = TestKitchen::with_config(ViewerConfig {
        static_only: true,
        ..Default::default()
    })
    .receive(cramped_room_replay(6));
    assert_eq!(kitchen.mode(), SceneMode::Static);
    assert!(!kitchen.player().is_loaded());
    assert!(matches!(
        kitchen.status(),
        LoadStatus::Ready { frames: 6, .. }
    ));
}

#[test]
fn load_failure_is_reported() {
    let kitchen = TestKitchen::new().receive_error("could not read 'missing.json'");
    match kitchen.status() {
        LoadStatus::Failed(msg) => assert!(msg.contains("missing.json"), "got: {msg}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(kitchen.layout().is_none());
}

#[test]
fn broken_grid_is_reported_as_failure() {
    let mut file = cramped_room();
    file.static_info.height = 7;
    let kitchen = TestKitchen::new().receive(file);
    assert!(matches!(kitchen.status(), LoadStatus::Failed(_)));
}

#[test]
fn out_of_grid_frames_still_play() {
    let mut file = cramped_room_replay(3);
    file.frames[1].players[1].position = [40, 40];
    let kitchen = TestKitchen::new().receive(file);
    assert_eq!(kitchen.mode(), SceneMode::Replay);
    assert_eq!(kitchen.player().len(), 3);
}

#[test]
fn reload_replaces_previous_state() {
    let kitchen = TestKitchen::new()
        .receive(cramped_room_replay(6))
        .receive(cramped_room());
    assert_eq!(kitchen.mode(), SceneMode::Static);
    assert!(!kitchen.player().is_loaded());
}
