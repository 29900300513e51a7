//! Static kitchen geometry: floor, grid lines and one cube per block tile.
//!
//! Rebuilt from scratch whenever `LoadedLayout` changes.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;

use kitchen::config::{BLOCK_CENTER_Y, BLOCK_SIZE, FLOOR_Y, TILE_SIZE};
use kitchen::layout::{cell_to_world, StaticLayout, TileKind};
use kitchen::loader::LoadedLayout;

use crate::palette::{
    hex_color, MaterialPalette, Swatch, FLOOR_COLOR, GRID_CENTER_LINE_COLOR, GRID_LINE_COLOR,
};

/// Everything spawned for the current layout; despawned on reload.
#[derive(Component)]
pub struct StaticGridEntity;

/// A block tile cube.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub x: usize,
    pub z: usize,
    pub label: &'static str,
}

/// Shared cube mesh for block tiles.
#[derive(Resource)]
pub struct TileMesh(pub Handle<Mesh>);

impl FromWorld for TileMesh {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        TileMesh(meshes.add(Cuboid::new(BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE)))
    }
}

/// Line endpoints and colours for a square grid of `size` units with
/// `divisions` cells per side, centred on the origin in the XZ plane.
/// The middle line in each direction gets `center_color`.
pub fn grid_line_vertices(
    size: f32,
    divisions: usize,
    center_color: [f32; 4],
    line_color: [f32; 4],
) -> (Vec<[f32; 3]>, Vec<[f32; 4]>) {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;
    let center = divisions / 2;

    let mut positions = Vec::with_capacity((divisions + 1) * 4);
    let mut colors = Vec::with_capacity((divisions + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == center { center_color } else { line_color };
        positions.extend_from_slice(&[
            [-half, 0.0, k],
            [half, 0.0, k],
            [k, 0.0, -half],
            [k, 0.0, half],
        ]);
        colors.extend_from_slice(&[color; 4]);
    }
    (positions, colors)
}

fn linear(hex: u32) -> [f32; 4] {
    let c = LinearRgba::from(hex_color(hex));
    [c.red, c.green, c.blue, c.alpha]
}

fn grid_lines_mesh(layout: &StaticLayout) -> Mesh {
    let divisions = layout.grid_divisions();
    let (positions, colors) = grid_line_vertices(
        divisions as f32 * TILE_SIZE,
        divisions,
        linear(GRID_CENTER_LINE_COLOR),
        linear(GRID_LINE_COLOR),
    );
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
}

pub fn spawn_static_grid(
    mut commands: Commands,
    layout: Option<Res<LoadedLayout>>,
    existing: Query<Entity, With<StaticGridEntity>>,
    tile_mesh: Res<TileMesh>,
    mut palette: ResMut<MaterialPalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(layout) = layout else {
        return;
    };
    if !layout.is_changed() {
        return;
    }
    let layout = &layout.0;

    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }

    let center = layout.center();

    commands.spawn((
        Mesh3d(meshes.add(grid_lines_mesh(layout))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(center),
        StaticGridEntity,
    ));

    let floor_size = Vec2::new(
        layout.width() as f32 * TILE_SIZE,
        layout.height() as f32 * TILE_SIZE,
    );
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(floor_size.x, floor_size.y))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_color(FLOOR_COLOR),
            double_sided: true,
            cull_mode: None,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_translation(Vec3::new(center.x, FLOOR_Y, center.z)),
        StaticGridEntity,
    ));

    let mut blocks = 0usize;
    for (x, z, kind) in layout.blocks() {
        commands.spawn((
            Mesh3d(tile_mesh.0.clone()),
            MeshMaterial3d(palette.get(Swatch::Tile(kind), &mut materials)),
            Transform::from_translation(cell_to_world(x as f32, z as f32, BLOCK_CENTER_Y)),
            Tile {
                kind,
                x,
                z,
                label: kind.label(),
            },
            StaticGridEntity,
        ));
        blocks += 1;
    }

    info!(
        "Built {}x{} kitchen: {} block tiles",
        layout.width(),
        layout.height(),
        blocks
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen::test_harness::cramped_room;

    fn grid_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>();
        app.init_resource::<MaterialPalette>()
            .init_resource::<TileMesh>()
            .add_systems(Update, spawn_static_grid);
        app
    }

    fn install(app: &mut App, layout: StaticLayout) {
        app.insert_resource(LoadedLayout(layout));
        app.update();
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, F>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn grid_lines_cover_every_division() {
        let (positions, colors) = grid_line_vertices(4.0, 4, [1.0; 4], [0.0; 4]);
        assert_eq!(positions.len(), 20);
        assert_eq!(colors.len(), 20);
        assert_eq!(positions[0], [-2.0, 0.0, -2.0]);
        // Line index 2 of 0..=4 is the centre line.
        assert_eq!(colors[8], [1.0; 4]);
        assert_eq!(colors[0], [0.0; 4]);
    }

    #[test]
    fn spawns_one_cube_per_block() {
        let mut app = grid_app();
        install(&mut app, cramped_room().layout().expect("layout"));

        assert_eq!(count::<With<Tile>>(&mut app), 14);
        // Blocks plus the floor and the grid lines.
        assert_eq!(count::<With<StaticGridEntity>>(&mut app), 16);

        let pots: Vec<Tile> = app
            .world_mut()
            .query::<&Tile>()
            .iter(app.world())
            .filter(|t| t.kind == TileKind::Pot)
            .cloned()
            .collect();
        assert_eq!(pots.len(), 1);
        assert_eq!((pots[0].x, pots[0].z), (2, 0));
    }

    #[test]
    fn tile_materials_are_cached_per_kind() {
        let mut app = grid_app();
        install(&mut app, cramped_room().layout().expect("layout"));
        // Counter, pot, onion, dish and serving station.
        assert_eq!(app.world().resource::<MaterialPalette>().len(), 5);
    }

    #[test]
    fn reload_replaces_previous_grid() {
        let mut app = grid_app();
        install(&mut app, cramped_room().layout().expect("layout"));
        let small = StaticLayout::from_rows(2, 1, ["XP".chars()]).expect("layout");
        install(&mut app, small);

        assert_eq!(count::<With<Tile>>(&mut app), 2);
        assert_eq!(count::<With<StaticGridEntity>>(&mut app), 4);
    }

    #[test]
    fn unchanged_layout_is_not_rebuilt() {
        let mut app = grid_app();
        install(&mut app, cramped_room().layout().expect("layout"));
        let before: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<Tile>>()
            .iter(app.world())
            .collect();
        app.update();
        let after: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<Tile>>()
            .iter(app.world())
            .collect();
        assert_eq!(before, after);
    }
}
