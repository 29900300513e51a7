//! Colours and cached materials shared by the grid and marker renderers.

use bevy::prelude::*;
use bevy::utils::HashMap;

use kitchen::frame::{ItemKind, SoupStatus};
use kitchen::layout::TileKind;

pub const FLOOR_COLOR: u32 = 0x1a1a1a;
pub const GRID_CENTER_LINE_COLOR: u32 = 0x444444;
pub const GRID_LINE_COLOR: u32 = 0x222222;
pub const SOUP_READY_COLOR: u32 = 0x43a047;
pub const SOUP_COOKING_START_COLOR: u32 = 0x9e9e9e;
pub const SOUP_COOKING_END_COLOR: u32 = 0xff8c00;
pub const NOSE_COLOR: u32 = 0x111111;

/// Player colours, cycled by player index.
pub const PLAYER_COLORS: [u32; 4] = [0x2196f3, 0x4caf50, 0xff9800, 0x9c27b0];

/// `0xRRGGBB` as an sRGB colour.
pub fn hex_color(hex: u32) -> Color {
    Color::srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub fn player_color(index: usize) -> Color {
    hex_color(PLAYER_COLORS[index % PLAYER_COLORS.len()])
}

/// Soup colour by cooking state. Cooking soups blend from grey toward orange.
pub fn soup_color(status: SoupStatus) -> Color {
    match status {
        SoupStatus::Idle => hex_color(ItemKind::Soup.color_hex()),
        SoupStatus::Cooking { progress } => {
            let t = progress.clamp(0.0, 1.0);
            let from = hex_color(SOUP_COOKING_START_COLOR).to_srgba();
            let to = hex_color(SOUP_COOKING_END_COLOR).to_srgba();
            Color::srgb(
                from.red + (to.red - from.red) * t,
                from.green + (to.green - from.green) * t,
                from.blue + (to.blue - from.blue) * t,
            )
        }
        SoupStatus::Ready => hex_color(SOUP_READY_COLOR),
    }
}

/// Soup look quantised to tenths, so materials can be cached and swapped
/// only when the visible colour actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoupStage {
    Idle,
    Cooking(u8),
    Ready,
}

impl SoupStage {
    pub fn from_status(status: SoupStatus) -> Self {
        match status {
            SoupStatus::Idle => SoupStage::Idle,
            SoupStatus::Cooking { progress } => {
                SoupStage::Cooking((progress.clamp(0.0, 1.0) * 10.0).round() as u8)
            }
            SoupStatus::Ready => SoupStage::Ready,
        }
    }

    pub fn color(self) -> Color {
        match self {
            SoupStage::Idle => soup_color(SoupStatus::Idle),
            SoupStage::Cooking(tenths) => soup_color(SoupStatus::Cooking {
                progress: tenths as f32 / 10.0,
            }),
            SoupStage::Ready => soup_color(SoupStatus::Ready),
        }
    }
}

/// Material cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swatch {
    Tile(TileKind),
    Player(usize),
    Nose,
    Item(ItemKind),
    Soup(SoupStage),
}

impl Swatch {
    pub fn color(self) -> Color {
        match self {
            Swatch::Tile(kind) => hex_color(kind.color_hex().unwrap_or(FLOOR_COLOR)),
            Swatch::Player(index) => player_color(index),
            Swatch::Nose => hex_color(NOSE_COLOR),
            Swatch::Item(kind) => hex_color(kind.color_hex()),
            Swatch::Soup(stage) => stage.color(),
        }
    }
}

/// One `StandardMaterial` per swatch, created on first use.
#[derive(Resource, Default)]
pub struct MaterialPalette {
    materials: HashMap<Swatch, Handle<StandardMaterial>>,
}

impl MaterialPalette {
    pub fn get(
        &mut self,
        swatch: Swatch,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        self.materials
            .entry(swatch)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: swatch.color(),
                    perceptual_roughness: 0.8,
                    ..default()
                })
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
