/// World units per grid cell.
pub const TILE_SIZE: f32 = 1.0;
/// Edge length of the cube drawn for every non-floor tile.
pub const BLOCK_SIZE: f32 = 0.8;
/// Y of a tile cube's centre (cube rests on the floor).
pub const BLOCK_CENTER_Y: f32 = BLOCK_SIZE / 2.0;
/// Floor plane sits slightly below y = 0 so grid lines stay visible.
pub const FLOOR_Y: f32 = -0.01;

/// Default replay rate in recorded frames per second.
pub const DEFAULT_PLAYBACK_FPS: f32 = 5.0;
/// Exponential smoothing speed for markers (higher = snappier).
pub const DEFAULT_SMOOTHING_SPEED: f32 = 12.0;
/// Distance / angle below which interpolation snaps to its target.
pub const SNAP_EPSILON: f32 = 0.001;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
/// Initial camera offset from the grid centre: 8 up, 10 back.
pub const CAMERA_OFFSET_HEIGHT: f32 = 8.0;
pub const CAMERA_OFFSET_BACK: f32 = 10.0;

/// Highest device pixel ratio the renderer will use.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub const AMBIENT_INTENSITY: f32 = 0.6;
pub const DIRECTIONAL_INTENSITY: f32 = 0.8;
pub const DIRECTIONAL_POSITION: [f32; 3] = [5.0, 10.0, 5.0];

/// Height of a player marker's centre above the floor.
pub const PLAYER_MARKER_Y: f32 = 0.45;
/// Height of a carried item above its player's centre.
pub const HELD_ITEM_LIFT: f32 = 0.2;
/// Forward offset of a carried item from its player's centre.
pub const HELD_ITEM_REACH: f32 = 0.35;
/// Top surface of a block tile; items on a block rest here.
pub const COUNTER_TOP_Y: f32 = BLOCK_SIZE;

/// Default state file read on startup.
pub const DEFAULT_STATE_PATH: &str = "stateschema.json";
/// Default state URL on the web build.
pub const DEFAULT_STATE_URL: &str = "/stateschema.json";
