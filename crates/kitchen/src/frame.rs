//! Recorded game-state snapshots.
//!
//! A `Frame` is already-computed game state: the viewer never derives scores
//! or cooking progress itself, it only maps what the recorder wrote onto
//! markers in the scene.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::layout::StaticLayout;

/// One recorded snapshot of the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default)]
    pub timestep: u64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub objects: Vec<ObjectState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub position: [i32; 2],
    /// Facing direction as a grid step, e.g. `[0, -1]` faces up the rows.
    #[serde(default = "default_orientation")]
    pub orientation: [i32; 2],
    #[serde(default)]
    pub held_object: Option<HeldObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeldObject {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub is_ready: bool,
}

/// An item resting somewhere on the map (counter, pot, serving window).
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectState {
    pub name: String,
    pub position: [i32; 2],
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Ticks spent cooking, `-1` when the pot has not started.
    #[serde(default = "default_cooking_tick")]
    pub cooking_tick: i32,
    #[serde(default = "default_cook_time")]
    pub cook_time: i32,
    #[serde(default)]
    pub is_ready: bool,
}

fn default_orientation() -> [i32; 2] {
    [0, 1]
}

fn default_cooking_tick() -> i32 {
    -1
}

fn default_cook_time() -> i32 {
    20
}

/// Broad item category, used to pick a marker shape and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Onion,
    Tomato,
    Dish,
    Soup,
    Other,
}

impl ItemKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "onion" => ItemKind::Onion,
            "tomato" => ItemKind::Tomato,
            "dish" | "plate" => ItemKind::Dish,
            "soup" => ItemKind::Soup,
            _ => ItemKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Onion => "Onion",
            ItemKind::Tomato => "Tomato",
            ItemKind::Dish => "Dish",
            ItemKind::Soup => "Soup",
            ItemKind::Other => "Item",
        }
    }

    pub fn color_hex(self) -> u32 {
        match self {
            ItemKind::Onion => 0xf5e6a8,
            ItemKind::Tomato => 0xd32f2f,
            ItemKind::Dish => 0xf0f0f0,
            ItemKind::Soup => 0xc77d2e,
            ItemKind::Other => 0xff00ff,
        }
    }

    /// Marker radius in world units.
    pub fn marker_radius(self) -> f32 {
        match self {
            ItemKind::Onion | ItemKind::Tomato => 0.12,
            ItemKind::Dish => 0.2,
            ItemKind::Soup => 0.22,
            ItemKind::Other => 0.1,
        }
    }
}

/// Cooking state of a soup, derived from the recorded fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoupStatus {
    Idle,
    Cooking { progress: f32 },
    Ready,
}

impl ObjectState {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_name(&self.name)
    }

    pub fn soup_status(&self) -> SoupStatus {
        if self.is_ready {
            SoupStatus::Ready
        } else if self.cooking_tick < 0 {
            SoupStatus::Idle
        } else {
            let progress = if self.cook_time > 0 {
                (self.cooking_tick as f32 / self.cook_time as f32).clamp(0.0, 1.0)
            } else {
                1.0
            };
            SoupStatus::Cooking { progress }
        }
    }
}

impl HeldObject {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_name(&self.name)
    }
}

/// Yaw (radians about +Y) that turns a marker's forward (-Z) toward grid
/// direction `(dx, dy)`. Grid rows map to world Z.
pub fn orientation_yaw(orientation: [i32; 2]) -> f32 {
    let [dx, dy] = orientation;
    if dx == 0 && dy == 0 {
        return 0.0;
    }
    (-(dx as f32)).atan2(-(dy as f32))
}

impl Frame {
    /// Check every player and object sits inside the grid.
    pub fn validate(&self, index: usize, layout: &StaticLayout) -> Result<(), VizError> {
        for (i, player) in self.players.iter().enumerate() {
            let [x, y] = player.position;
            if !layout.in_bounds(x, y) {
                return Err(VizError::InvalidFrame {
                    index,
                    reason: format!("player {i} at ({x}, {y}) is outside the grid"),
                });
            }
        }
        for object in &self.objects {
            let [x, y] = object.position;
            if !layout.in_bounds(x, y) {
                return Err(VizError::InvalidFrame {
                    index,
                    reason: format!("{} at ({x}, {y}) is outside the grid", object.name),
                });
            }
        }
        Ok(())
    }
}
