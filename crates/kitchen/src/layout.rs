//! Static kitchen layout: the fixed tile grid that never changes across frames.
//!
//! Grid coordinates are `(x, y)` with `y` growing "down" the rows of the
//! state file. In world space a cell maps to `(x, height, y)` on the XZ plane.

use bevy::prelude::*;

use crate::config::TILE_SIZE;
use crate::error::VizError;

/// One tile of the static grid, decoded from its single-character symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Floor,
    Counter,
    Pot,
    OnionDispenser,
    TomatoDispenser,
    DishDispenser,
    ServingStation,
    /// Player spawn marker (`'1'`..`'9'`); drawn as plain floor.
    PlayerStart(u8),
    Unknown(char),
}

impl TileKind {
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => TileKind::Floor,
            'X' => TileKind::Counter,
            'P' => TileKind::Pot,
            'O' => TileKind::OnionDispenser,
            'T' => TileKind::TomatoDispenser,
            'D' => TileKind::DishDispenser,
            'S' => TileKind::ServingStation,
            '1'..='9' => TileKind::PlayerStart(c as u8 - b'0'),
            other => TileKind::Unknown(other),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TileKind::Floor => ' ',
            TileKind::Counter => 'X',
            TileKind::Pot => 'P',
            TileKind::OnionDispenser => 'O',
            TileKind::TomatoDispenser => 'T',
            TileKind::DishDispenser => 'D',
            TileKind::ServingStation => 'S',
            TileKind::PlayerStart(n) => (b'0' + n) as char,
            TileKind::Unknown(c) => c,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TileKind::Floor => "Floor",
            TileKind::Counter => "Counter",
            TileKind::Pot => "Pot",
            TileKind::OnionDispenser => "Onion Dispenser",
            TileKind::TomatoDispenser => "Tomato Dispenser",
            TileKind::DishDispenser => "Dish Dispenser",
            TileKind::ServingStation => "Serving Station",
            TileKind::PlayerStart(_) => "Player Start",
            TileKind::Unknown(_) => "Unknown",
        }
    }

    /// Whether this tile is drawn as a cube.
    pub fn has_block(self) -> bool {
        !matches!(self, TileKind::Floor | TileKind::PlayerStart(_))
    }

    /// Cube colour as `0xRRGGBB`, or `None` for tiles without a cube.
    pub fn color_hex(self) -> Option<u32> {
        match self {
            TileKind::Floor | TileKind::PlayerStart(_) => None,
            TileKind::Counter => Some(0x8b4513),
            TileKind::Pot => Some(0xff4444),
            TileKind::OnionDispenser => Some(0xffaa00),
            TileKind::TomatoDispenser => Some(0xe53935),
            TileKind::DishDispenser => Some(0x4444ff),
            TileKind::ServingStation => Some(0x44ff44),
            TileKind::Unknown(_) => Some(0x888888),
        }
    }
}

/// Validated rectangular tile grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLayout {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl StaticLayout {
    /// Build a layout from `height` rows of exactly `width` symbols each.
    pub fn from_rows<R, I>(width: usize, height: usize, rows: R) -> Result<Self, VizError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = char>,
    {
        if width == 0 || height == 0 {
            return Err(VizError::InvalidLayout(format!(
                "grid must be non-empty, got {width}x{height}"
            )));
        }

        if width.checked_mul(height).is_none() {
            return Err(VizError::InvalidLayout(format!(
                "grid of {width}x{height} cells is too large"
            )));
        }

        // Sized by the rows actually present, never by the header.
        let mut tiles = Vec::new();
        let mut row_count = 0;
        for (y, row) in rows.into_iter().enumerate() {
            if y >= height {
                return Err(VizError::InvalidLayout(format!(
                    "expected {height} rows, found more"
                )));
            }
            let before = tiles.len();
            tiles.extend(row.into_iter().take(width.saturating_add(1)).map(TileKind::from_char));
            let cells = tiles.len() - before;
            if cells != width {
                return Err(VizError::InvalidLayout(format!(
                    "row {y} has {cells} cells, expected {width}"
                )));
            }
            row_count += 1;
        }

        if row_count != height {
            return Err(VizError::InvalidLayout(format!(
                "expected {height} rows, found {row_count}"
            )));
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<TileKind> {
        if x < self.width && y < self.height {
            Some(self.tiles[y * self.width + x])
        } else {
            None
        }
    }

    /// All cells as `(x, y, kind)`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, kind)| (i % self.width, i / self.width, *kind))
    }

    /// Only the cells that are drawn as cubes.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        self.iter().filter(|(_, _, kind)| kind.has_block())
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|k| **k == kind).count()
    }

    /// Number of grid-line divisions (the grid helper is square).
    pub fn grid_divisions(&self) -> usize {
        self.width.max(self.height)
    }

    /// World-space centre of the grid on the floor plane.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.width as f32 - 1.0) / 2.0 * TILE_SIZE,
            0.0,
            (self.height as f32 - 1.0) / 2.0 * TILE_SIZE,
        )
    }
}

/// Map grid cell `(x, y)` to a world position at height `y_world`.
pub fn cell_to_world(x: f32, y: f32, y_world: f32) -> Vec3 {
    Vec3::new(x * TILE_SIZE, y_world, y * TILE_SIZE)
}
