//! Dynamic markers for players and items in replay mode.
//!
//! Each `FrameChanged` reconciles the current frame against the live markers
//! by `DynamicKey`: unknown keys are spawned directly at their target, known
//! keys just get a new `MotionTarget`, and keys missing from the frame are
//! despawned. `interpolate_markers` then eases every marker toward its target
//! each render frame, so motion between recorded frames looks continuous.

use bevy::prelude::*;
use bevy::utils::{HashMap, HashSet};

use kitchen::config::{
    COUNTER_TOP_Y, HELD_ITEM_LIFT, HELD_ITEM_REACH, PLAYER_MARKER_Y, SNAP_EPSILON,
};
use kitchen::frame::{orientation_yaw, Frame, ItemKind, SoupStatus};
use kitchen::interpolation::{exp_lerp_factor, step_toward, step_yaw};
use kitchen::layout::{cell_to_world, StaticLayout};
use kitchen::loader::LoadedLayout;
use kitchen::playback::{FrameChanged, FramePlayer, SceneMode};
use kitchen::ViewerConfig;

use crate::palette::{MaterialPalette, SoupStage, Swatch};

const PLAYER_RADIUS: f32 = 0.25;
const PLAYER_BODY_LENGTH: f32 = 0.4;
const NOSE_SIZE: Vec3 = Vec3::new(0.12, 0.12, 0.2);
const DISH_HEIGHT: f32 = 0.05;
const SOUP_HEIGHT: f32 = 0.18;

/// Identity of a marker across frames.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicKey {
    Player(usize),
    /// An item resting on the map, keyed by its cell.
    Item { x: i32, y: i32 },
    /// The item carried by player `n`.
    Held(usize),
}

/// Where a marker is heading.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MotionTarget {
    pub translation: Vec3,
    pub yaw: f32,
}

impl MotionTarget {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation)
            .with_rotation(Quat::from_rotation_y(self.yaw))
    }
}

/// What a marker currently looks like; a change swaps mesh and material.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerLook {
    Player(usize),
    Item(ItemKind),
    Soup(SoupStage),
}

impl MarkerLook {
    fn for_item(kind: ItemKind, soup: SoupStatus) -> Self {
        match kind {
            ItemKind::Soup => MarkerLook::Soup(SoupStage::from_status(soup)),
            other => MarkerLook::Item(other),
        }
    }

    fn swatch(self) -> Swatch {
        match self {
            MarkerLook::Player(index) => Swatch::Player(index),
            MarkerLook::Item(kind) => Swatch::Item(kind),
            MarkerLook::Soup(stage) => Swatch::Soup(stage),
        }
    }

    fn shape(self) -> MarkerShape {
        match self {
            MarkerLook::Player(_) => MarkerShape::Player,
            MarkerLook::Item(kind) => MarkerShape::Item(kind),
            MarkerLook::Soup(_) => MarkerShape::Item(ItemKind::Soup),
        }
    }

    /// Distance from the marker's centre down to whatever it rests on.
    fn half_height(self) -> f32 {
        match self.shape() {
            MarkerShape::Player => PLAYER_MARKER_Y,
            MarkerShape::Item(ItemKind::Dish) => DISH_HEIGHT / 2.0,
            MarkerShape::Item(ItemKind::Soup) => SOUP_HEIGHT / 2.0,
            MarkerShape::Item(kind) => kind.marker_radius(),
            MarkerShape::Nose => NOSE_SIZE.y / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MarkerShape {
    Player,
    Nose,
    Item(ItemKind),
}

impl MarkerShape {
    fn mesh(self) -> Mesh {
        match self {
            MarkerShape::Player => Capsule3d::new(PLAYER_RADIUS, PLAYER_BODY_LENGTH).into(),
            MarkerShape::Nose => Cuboid::from_size(NOSE_SIZE).into(),
            MarkerShape::Item(ItemKind::Dish) => {
                Cylinder::new(ItemKind::Dish.marker_radius(), DISH_HEIGHT).into()
            }
            MarkerShape::Item(ItemKind::Soup) => {
                Cylinder::new(ItemKind::Soup.marker_radius(), SOUP_HEIGHT).into()
            }
            MarkerShape::Item(kind) => Sphere::new(kind.marker_radius()).into(),
        }
    }
}

/// Marker meshes, one per shape, created on first use.
#[derive(Resource, Default)]
pub struct MarkerMeshes {
    meshes: HashMap<MarkerShape, Handle<Mesh>>,
}

impl MarkerMeshes {
    fn get(&mut self, shape: MarkerShape, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        self.meshes
            .entry(shape)
            .or_insert_with(|| meshes.add(shape.mesh()))
            .clone()
    }
}

/// Desired state of one marker for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpec {
    pub key: DynamicKey,
    pub target: MotionTarget,
    pub look: MarkerLook,
}

/// Every marker `frame` calls for. Items resting on a block tile sit on its
/// top; anything else sits on the floor. A second item on an occupied cell
/// is dropped.
pub fn marker_specs(frame: &Frame, layout: Option<&StaticLayout>) -> Vec<MarkerSpec> {
    let mut specs = Vec::with_capacity(frame.players.len() * 2 + frame.objects.len());

    for (index, player) in frame.players.iter().enumerate() {
        let [x, y] = player.position;
        let yaw = orientation_yaw(player.orientation);
        let body = cell_to_world(x as f32, y as f32, PLAYER_MARKER_Y);
        specs.push(MarkerSpec {
            key: DynamicKey::Player(index),
            target: MotionTarget {
                translation: body,
                yaw,
            },
            look: MarkerLook::Player(index),
        });

        if let Some(held) = &player.held_object {
            let soup = if held.is_ready {
                SoupStatus::Ready
            } else {
                SoupStatus::Idle
            };
            let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
            specs.push(MarkerSpec {
                key: DynamicKey::Held(index),
                target: MotionTarget {
                    translation: body + Vec3::Y * HELD_ITEM_LIFT + forward * HELD_ITEM_REACH,
                    yaw,
                },
                look: MarkerLook::for_item(held.kind(), soup),
            });
        }
    }

    let mut occupied = HashSet::new();
    for object in &frame.objects {
        let [x, y] = object.position;
        if !occupied.insert((x, y)) {
            continue;
        }
        let look = MarkerLook::for_item(object.kind(), object.soup_status());
        let on_block = x >= 0
            && y >= 0
            && layout
                .and_then(|l| l.get(x as usize, y as usize))
                .is_some_and(|kind| kind.has_block());
        let surface = if on_block { COUNTER_TOP_Y } else { 0.0 };
        specs.push(MarkerSpec {
            key: DynamicKey::Item { x, y },
            target: MotionTarget {
                translation: cell_to_world(x as f32, y as f32, surface + look.half_height()),
                yaw: 0.0,
            },
            look,
        });
    }

    specs
}

fn spawn_marker(
    commands: &mut Commands,
    spec: &MarkerSpec,
    marker_meshes: &mut MarkerMeshes,
    palette: &mut MaterialPalette,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut entity = commands.spawn((
        Mesh3d(marker_meshes.get(spec.look.shape(), meshes)),
        MeshMaterial3d(palette.get(spec.look.swatch(), materials)),
        spec.target.transform(),
        spec.key,
        spec.target,
        spec.look,
    ));
    if matches!(spec.look, MarkerLook::Player(_)) {
        let nose_mesh = marker_meshes.get(MarkerShape::Nose, meshes);
        let nose_material = palette.get(Swatch::Nose, materials);
        entity.with_children(|parent| {
            parent.spawn((
                Mesh3d(nose_mesh),
                MeshMaterial3d(nose_material),
                Transform::from_xyz(0.0, 0.1, -PLAYER_RADIUS - NOSE_SIZE.z / 2.0 + 0.05),
            ));
        });
    }
}

/// Reconcile markers with the current frame whenever the index changes.
#[allow(clippy::too_many_arguments)]
pub fn sync_markers(
    mut commands: Commands,
    mut changed: EventReader<FrameChanged>,
    player: Res<FramePlayer>,
    layout: Option<Res<LoadedLayout>>,
    mut markers: Query<(
        Entity,
        &DynamicKey,
        &mut MotionTarget,
        &mut MarkerLook,
        &mut Mesh3d,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
    mut marker_meshes: ResMut<MarkerMeshes>,
    mut palette: ResMut<MaterialPalette>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if changed.read().last().is_none() {
        return;
    }
    let Some(frame) = player.current() else {
        return;
    };
    let specs = marker_specs(frame, layout.as_deref().map(|l| &l.0));

    let mut live: HashMap<DynamicKey, Entity> = HashMap::new();
    for (entity, key, ..) in &markers {
        live.insert(*key, entity);
    }

    for spec in &specs {
        match live.remove(&spec.key) {
            Some(entity) => {
                let Ok((_, _, mut target, mut look, mut mesh, mut material)) =
                    markers.get_mut(entity)
                else {
                    continue;
                };
                *target = spec.target;
                if *look != spec.look {
                    if look.shape() != spec.look.shape() {
                        mesh.0 = marker_meshes.get(spec.look.shape(), &mut meshes);
                    }
                    material.0 = palette.get(spec.look.swatch(), &mut materials);
                    *look = spec.look;
                }
            }
            None => spawn_marker(
                &mut commands,
                spec,
                &mut marker_meshes,
                &mut palette,
                &mut meshes,
                &mut materials,
            ),
        }
    }

    for entity in live.into_values() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Static mode shows no markers.
pub fn clear_markers_in_static_mode(
    mut commands: Commands,
    mode: Res<SceneMode>,
    markers: Query<Entity, With<DynamicKey>>,
) {
    if !mode.is_changed() || *mode != SceneMode::Static {
        return;
    }
    for entity in &markers {
        commands.entity(entity).despawn_recursive();
    }
}

/// Ease every marker toward its `MotionTarget`.
pub fn interpolate_markers(
    time: Res<Time>,
    config: Res<ViewerConfig>,
    mut markers: Query<(&MotionTarget, &mut Transform), With<DynamicKey>>,
) {
    let t = exp_lerp_factor(config.smoothing_speed, time.delta_secs());
    if t <= 0.0 {
        return;
    }
    for (target, mut transform) in &mut markers {
        let translation = step_toward(transform.translation, target.translation, t, SNAP_EPSILON);
        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        let next_yaw = step_yaw(yaw, target.yaw, t, SNAP_EPSILON);
        if translation != transform.translation || next_yaw != yaw {
            transform.translation = translation;
            transform.rotation = Quat::from_rotation_y(next_yaw);
        }
    }
}
