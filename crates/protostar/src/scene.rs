//! The demo level: a closed room whose walls all become floors.
//!
//! The puzzle chain runs through it: four seeds scattered on different
//! surfaces, a sapling, a telescope aimed at a target high on a wall, and a
//! cabinet that opens when the telescope lines up.

use std::f32::consts::FRAC_PI_2;

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use protostar_gravity::{
    GravityBody, carry::initial_carryable_body, puzzle::SaplingPuzzle, puzzle::Telescope,
    puzzle::TelescopeConfig,
};

use crate::{
    camera::FollowCamera,
    carry::Carrier,
    input::{PlayerAction, default_player_input_map},
    launch_params::LaunchParams,
    physics::{BodyGravity, GameLayer, GravityZoneTrigger, WorldGravity},
    player::{Player, PlayerController, default_ground_layers},
    puzzle::{CabinetDoor, Sapling, Seed, SeedDetectionZone, TelescopeMount},
};

/// Half the inner size of the room.
const ROOM_HALF_EXTENT: f32 = 12.0;

/// Wall thickness.
const WALL_THICKNESS: f32 = 1.0;

/// Player capsule radius.
const PLAYER_RADIUS: f32 = 0.5;

/// Player capsule segment length; total height is this plus two radii.
const PLAYER_SEGMENT: f32 = 1.0;

/// Seed sphere radius.
const SEED_RADIUS: f32 = 0.25;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.1)))
            .add_systems(Startup, setup_scene);
    }
}

/// Shared material handles for the level.
struct Palette {
    stone: Handle<StandardMaterial>,
    zone: Handle<StandardMaterial>,
    seed: Handle<StandardMaterial>,
    plant: Handle<StandardMaterial>,
    wood: Handle<StandardMaterial>,
    brass: Handle<StandardMaterial>,
    target: Handle<StandardMaterial>,
}

impl Palette {
    fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            stone: materials.add(StandardMaterial {
                base_color: Color::srgb(0.45, 0.45, 0.5),
                perceptual_roughness: 0.9,
                ..default()
            }),
            zone: materials.add(StandardMaterial {
                base_color: Color::srgba(0.3, 0.6, 1.0, 0.15),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            }),
            seed: materials.add(Color::srgb(0.6, 0.4, 0.2)),
            plant: materials.add(Color::srgb(0.2, 0.7, 0.25)),
            wood: materials.add(Color::srgb(0.4, 0.25, 0.15)),
            brass: materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.65, 0.3),
                metallic: 0.8,
                ..default()
            }),
            target: materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.1, 0.1),
                emissive: LinearRgba::rgb(2.0, 0.1, 0.1),
                ..default()
            }),
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    gravity: Res<WorldGravity>,
    params: Option<Res<LaunchParams>>,
) {
    let palette = Palette::new(&mut materials);
    let params = params.as_deref().cloned().unwrap_or_default();
    let field = Some(&gravity.0);

    spawn_room(&mut commands, &mut meshes, &palette);
    spawn_zones(&mut commands, &mut meshes, &palette);

    // Player.
    let player_start = Vec3::new(0.0, 2.0, 4.0);
    commands.spawn((
        Name::new("Player"),
        Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_SEGMENT))),
        MeshMaterial3d(palette.brass.clone()),
        Transform::from_translation(player_start),
        RigidBody::Dynamic,
        Collider::capsule(PLAYER_RADIUS, PLAYER_SEGMENT),
        LockedAxes::ROTATION_LOCKED,
        CollisionLayers::new(
            GameLayer::Player,
            [
                GameLayer::Ground,
                GameLayer::Carryable,
                GameLayer::Interactable,
                GameLayer::Trigger,
            ],
        ),
        Player,
        PlayerController::from_params(&params.locomotion_params())
            .with_ground_layers(default_ground_layers()),
        BodyGravity(GravityBody::from_field(field)),
        Carrier::default(),
        default_player_input_map(),
        ActionState::<PlayerAction>::default(),
    ));

    // Seeds, each resting on a different surface under its own gravity.
    let seed_mesh = meshes.add(Sphere::new(SEED_RADIUS));
    let floor = -ROOM_HALF_EXTENT + SEED_RADIUS;
    let seeds = [
        (Vec3::new(-6.0, floor, -3.0), Quat::IDENTITY),
        (Vec3::new(7.0, floor, 6.0), Quat::IDENTITY),
        // Resting against the +X wall.
        (Vec3::new(-floor, 3.0, -6.0), Quat::from_rotation_z(FRAC_PI_2)),
        // Resting on the ceiling.
        (Vec3::new(-4.0, -floor, 5.0), Quat::from_rotation_x(2.0 * FRAC_PI_2)),
    ];
    for (index, (position, rotation)) in seeds.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Seed {index}")),
            Mesh3d(seed_mesh.clone()),
            MeshMaterial3d(palette.seed.clone()),
            Transform::from_translation(position).with_rotation(rotation),
            RigidBody::Dynamic,
            Collider::sphere(SEED_RADIUS),
            CollisionLayers::new(GameLayer::Carryable, LayerMask::ALL),
            Seed,
            BodyGravity(initial_carryable_body(field, rotation)),
        ));
    }

    let floor_y = -ROOM_HALF_EXTENT;
    let sapling = spawn_sapling(
        &mut commands,
        &mut meshes,
        &palette,
        Vec3::new(-4.0, floor_y, -6.0),
    );

    // Telescope target, high on the -Z wall.
    let target = commands
        .spawn((
            Name::new("Telescope target"),
            Mesh3d(meshes.add(Sphere::new(0.6))),
            MeshMaterial3d(palette.target.clone()),
            Transform::from_xyz(6.0, 6.0, -ROOM_HALF_EXTENT + 0.7),
        ))
        .id();

    let telescope = spawn_telescope(
        &mut commands,
        &mut meshes,
        &palette,
        Vec3::new(4.0, floor_y, 2.0),
        sapling,
        target,
    );

    spawn_cabinet(
        &mut commands,
        &mut meshes,
        &palette,
        Vec3::new(ROOM_HALF_EXTENT - 1.5, floor_y, 8.0),
        telescope,
    );

    // Lighting.
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Camera.
    commands.spawn((
        Camera3d::default(),
        FollowCamera::default(),
        Transform::from_translation(player_start + Vec3::new(0.0, 2.5, 6.0))
            .looking_at(player_start, Vec3::Y),
    ));

    tracing::info!(
        "Scene setup complete - WASD to move, Space to jump, G to rotate gravity, \
         E to pick up, F to interact, F3 for debug"
    );
}

fn spawn_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        CollisionLayers::new(GameLayer::Ground, LayerMask::ALL),
    ));
}

/// Six walls enclosing a cube, plus a ledge to stand on mid-air.
fn spawn_room(commands: &mut Commands, meshes: &mut Assets<Mesh>, palette: &Palette) {
    let span = 2.0 * (ROOM_HALF_EXTENT + WALL_THICKNESS);
    let offset = ROOM_HALF_EXTENT + WALL_THICKNESS / 2.0;

    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        let size = Vec3::splat(span) * (Vec3::ONE - axis) + axis * WALL_THICKNESS;
        for sign in [-1.0, 1.0] {
            spawn_box(commands, meshes, palette.stone.clone(), size, axis * offset * sign);
        }
    }

    spawn_box(
        commands,
        meshes,
        palette.stone.clone(),
        Vec3::new(6.0, 0.5, 4.0),
        Vec3::new(-5.0, -2.0, 6.0),
    );
}

/// Sensors that reorient gravity when the player walks into them.
fn spawn_zones(commands: &mut Commands, meshes: &mut Assets<Mesh>, palette: &Palette) {
    let zone_size = Vec3::new(3.0, 3.0, 3.0);
    let zone_mesh = meshes.add(Cuboid::new(zone_size.x, zone_size.y, zone_size.z));
    let near_floor = -ROOM_HALF_EXTENT + zone_size.y / 2.0;
    let near_wall = ROOM_HALF_EXTENT - zone_size.x / 2.0;

    let zones = [
        // Near the +X wall on the floor: tipped so its own down points at the wall.
        (
            "Wall zone",
            Transform::from_xyz(near_wall - 2.0, near_floor, -2.0)
                .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
            GravityZoneTrigger::default(),
        ),
        // On the +X wall: restores floor gravity.
        (
            "Floor zone",
            Transform::from_xyz(near_wall, 4.0, -2.0),
            GravityZoneTrigger {
                use_own_orientation: false,
                direction: Vec3::NEG_Y,
                trigger_on_exit: false,
            },
        ),
        // Walking out of this one flips gravity toward the ceiling.
        (
            "Ceiling zone",
            Transform::from_xyz(-near_wall + 2.0, near_floor, 8.0),
            GravityZoneTrigger {
                use_own_orientation: false,
                direction: Vec3::Y,
                trigger_on_exit: true,
            },
        ),
    ];

    for (name, transform, trigger) in zones {
        commands.spawn((
            Name::new(name),
            Mesh3d(zone_mesh.clone()),
            MeshMaterial3d(palette.zone.clone()),
            transform,
            RigidBody::Static,
            Collider::cuboid(zone_size.x, zone_size.y, zone_size.z),
            CollisionLayers::new(GameLayer::Trigger, [GameLayer::Player]),
            trigger,
        ));
    }
}

fn spawn_sapling(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    base: Vec3,
) -> Entity {
    let sapling_model = commands
        .spawn((
            Mesh3d(meshes.add(Cone {
                radius: 0.3,
                height: 0.8,
            })),
            MeshMaterial3d(palette.plant.clone()),
            Transform::from_translation(base + Vec3::Y * 0.4),
        ))
        .id();
    let tree_model = commands
        .spawn((
            Mesh3d(meshes.add(Cone {
                radius: 1.5,
                height: 5.0,
            })),
            MeshMaterial3d(palette.plant.clone()),
            Transform::from_translation(base + Vec3::Y * 2.5),
            Visibility::Hidden,
        ))
        .id();

    let sapling = commands
        .spawn((
            Name::new("Sapling"),
            Transform::from_translation(base + Vec3::Y * 0.5),
            RigidBody::Static,
            Collider::cylinder(0.4, 1.0),
            CollisionLayers::new(GameLayer::Interactable, LayerMask::ALL),
            Sapling {
                puzzle: SaplingPuzzle::default(),
                sapling_model,
                tree_model,
            },
        ))
        .id();

    commands.spawn((
        Name::new("Seed detection zone"),
        Transform::from_translation(base + Vec3::Y * 0.5),
        RigidBody::Static,
        Collider::cylinder(2.5, 1.5),
        CollisionLayers::new(GameLayer::Trigger, [GameLayer::Carryable]),
        SeedDetectionZone { sapling },
    ));

    sapling
}

fn spawn_telescope(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    base: Vec3,
    sapling: Entity,
    target: Entity,
) -> Entity {
    let mount_rotation = Quat::IDENTITY;
    let head = commands
        .spawn((
            Name::new("Telescope head"),
            Mesh3d(meshes.add(Cylinder::new(0.15, 1.2))),
            MeshMaterial3d(palette.brass.clone()),
            Transform::from_translation(base + Vec3::Y * 1.6).with_rotation(mount_rotation),
        ))
        .id();
    let light = commands
        .spawn((
            Name::new("Telescope light"),
            PointLight {
                color: Color::srgb(1.0, 0.9, 0.5),
                intensity: 200_000.0,
                range: 8.0,
                ..default()
            },
            Transform::from_translation(base + Vec3::Y * 2.4),
            Visibility::Hidden,
        ))
        .id();

    commands
        .spawn((
            Name::new("Telescope"),
            Mesh3d(meshes.add(Cylinder::new(0.3, 1.2))),
            MeshMaterial3d(palette.wood.clone()),
            Transform::from_translation(base + Vec3::Y * 0.6).with_rotation(mount_rotation),
            RigidBody::Static,
            Collider::cylinder(0.3, 1.2),
            CollisionLayers::new(GameLayer::Interactable, LayerMask::ALL),
            TelescopeMount {
                telescope: Telescope::new(TelescopeConfig::default()),
                sapling,
                target,
                head,
                light,
            },
        ))
        .id()
}

fn spawn_cabinet(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &Palette,
    base: Vec3,
    telescope: Entity,
) {
    let body_size = Vec3::new(1.5, 2.5, 1.0);
    let center = base + Vec3::Y * body_size.y / 2.0;

    let closed_model = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(0.1, body_size.y, body_size.z))),
            MeshMaterial3d(palette.wood.clone()),
            Transform::from_translation(center - Vec3::X * (body_size.x / 2.0 + 0.05)),
        ))
        .id();
    let open_model = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(body_size.z, body_size.y, 0.1))),
            MeshMaterial3d(palette.wood.clone()),
            Transform::from_translation(
                center + Vec3::new(-body_size.x / 2.0 - body_size.z / 2.0, 0.0, body_size.z / 2.0),
            ),
            Visibility::Hidden,
        ))
        .id();
    let book = commands
        .spawn((
            Name::new("Book"),
            Mesh3d(meshes.add(Cuboid::new(0.3, 0.4, 0.1))),
            MeshMaterial3d(palette.target.clone()),
            Transform::from_translation(center - Vec3::X * 0.3),
            Visibility::Hidden,
        ))
        .id();

    commands.spawn((
        Name::new("Cabinet"),
        Mesh3d(meshes.add(Cuboid::new(body_size.x, body_size.y, body_size.z))),
        MeshMaterial3d(palette.wood.clone()),
        Transform::from_translation(center),
        RigidBody::Static,
        Collider::cuboid(body_size.x, body_size.y, body_size.z),
        CollisionLayers::new(GameLayer::Interactable, LayerMask::ALL),
        CabinetDoor {
            cabinet: Default::default(),
            telescope,
            closed_model,
            open_model,
            book,
        },
    ));
}
