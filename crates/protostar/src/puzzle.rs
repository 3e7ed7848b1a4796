//! Puzzle chain wiring: seeds, sapling, telescope and cabinet.
//!
//! The state machines live in `protostar_gravity::puzzle`; this module feeds
//! them collision and input events and mirrors their state onto visuals.

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use protostar_gravity::puzzle::{
    Cabinet, CabinetInteraction, SaplingInteraction, SaplingPuzzle, Telescope,
    TelescopeInteraction,
};

use crate::{
    carry::{Carrier, Carryable},
    focus::Focused,
    input::PlayerAction,
    physics::cast_interaction_ray,
    player::Player,
};

pub struct PuzzlePlugin;

impl Plugin for PuzzlePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EffectRequested>()
            .add_message::<DemoFinished>()
            .add_systems(
                Update,
                (
                    track_seeds,
                    interact,
                    aim_telescopes,
                    update_cabinets,
                    play_effects,
                    finish_demo,
                )
                    .chain(),
            );
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Fire-and-forget request to play a one-shot effect at a world position.
#[derive(Message, Debug, Clone)]
pub struct EffectRequested {
    pub effect: &'static str,
    pub position: Vec3,
}

/// The player finished the demo.
#[derive(Message, Debug, Clone, Copy)]
pub struct DemoFinished;

// ============================================================================
// Components
// ============================================================================

/// A seed that can be carried to the sapling.
#[derive(Component, Default)]
#[require(Carryable)]
pub struct Seed;

/// The sapling and the models it swaps between.
#[derive(Component)]
pub struct Sapling {
    pub puzzle: SaplingPuzzle<Entity>,
    pub sapling_model: Entity,
    pub tree_model: Entity,
}

/// Sensor volume that counts seeds for a sapling.
#[derive(Component)]
#[require(Sensor, CollisionEventsEnabled)]
pub struct SeedDetectionZone {
    pub sapling: Entity,
}

/// A telescope, the puzzle that unlocks it and the entities it drives.
#[derive(Component)]
pub struct TelescopeMount {
    pub telescope: Telescope,
    /// Sapling that must be grown first.
    pub sapling: Entity,
    /// What the telescope should be aimed at.
    pub target: Entity,
    /// Rotating head; its position is the eye point.
    pub head: Entity,
    /// Shown while the telescope is aligned.
    pub light: Entity,
}

/// A cabinet that opens when its telescope lights up.
#[derive(Component)]
pub struct CabinetDoor {
    pub cabinet: Cabinet,
    pub telescope: Entity,
    pub closed_model: Entity,
    pub open_model: Entity,
    pub book: Entity,
}

/// Run condition: some telescope is being looked through.
pub fn telescope_in_use(mounts: Query<&TelescopeMount>) -> bool {
    mounts.iter().any(|mount| mount.telescope.is_viewing())
}

fn set_visible(visibility: &mut Query<&mut Visibility>, entity: Entity, visible: bool) {
    if let Ok(mut visibility) = visibility.get_mut(entity) {
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Count seeds entering and leaving sapling detection zones.
fn track_seeds(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    zones: Query<&SeedDetectionZone>,
    seeds: Query<(), With<Seed>>,
    mut saplings: Query<&mut Sapling>,
) {
    let edges = started
        .read()
        .map(|event| (true, event.collider1, event.collider2))
        .chain(
            ended
                .read()
                .map(|event| (false, event.collider1, event.collider2)),
        );

    for (entered, a, b) in edges {
        let (zone, seed) = if seeds.contains(b) {
            (a, b)
        } else if seeds.contains(a) {
            (b, a)
        } else {
            continue;
        };
        let Ok(zone) = zones.get(zone) else {
            continue;
        };
        let Ok(mut sapling) = saplings.get_mut(zone.sapling) else {
            continue;
        };

        if entered {
            sapling.puzzle.seed_entered(seed);
        } else {
            sapling.puzzle.seed_left(seed);
        }
    }
}

/// Use whatever is in front of the player.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn interact(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    player_query: Query<
        (
            Entity,
            &ActionState<PlayerAction>,
            &Transform,
            Option<&Carrier>,
        ),
        With<Player>,
    >,
    mut saplings: Query<&mut Sapling>,
    mut telescopes: Query<&mut TelescopeMount>,
    cabinets: Query<&CabinetDoor>,
    mut visibility: Query<&mut Visibility>,
    mut focused: ResMut<Focused>,
    mut demo_finished: MessageWriter<DemoFinished>,
) {
    let Ok((player, action_state, transform, carrier)) = player_query.single() else {
        return;
    };
    if !action_state.just_pressed(&PlayerAction::Interact) {
        return;
    }
    if carrier.is_some_and(|carrier| carrier.carrying.is_some()) {
        tracing::debug!("Hands full, cannot interact");
        return;
    }

    // An engaged telescope is released before anything else is considered.
    if let Some(mut mount) = telescopes
        .iter_mut()
        .find(|mount| mount.telescope.is_viewing())
    {
        mount.telescope.interact(true);
        tracing::info!("Stopped looking through the telescope");
        return;
    }

    let Some(target) = cast_interaction_ray(&spatial_query, player, transform) else {
        return;
    };

    if let Ok(mut sapling) = saplings.get_mut(target) {
        match sapling.puzzle.interact() {
            SaplingInteraction::Grown { consumed } => {
                for seed in consumed {
                    commands.entity(seed).despawn();
                }
                set_visible(&mut visibility, sapling.sapling_model, false);
                set_visible(&mut visibility, sapling.tree_model, true);
                // The highlight moves to the model that is now visible.
                focused.set_changed();
            }
            SaplingInteraction::AlreadyGrown => {
                tracing::debug!("The tree has already grown");
            }
            SaplingInteraction::NeedSeeds { have, need } => {
                tracing::info!("The sapling needs {need} seeds ({have} placed)");
            }
        }
        return;
    }

    if let Ok(mut mount) = telescopes.get_mut(target) {
        let unlocked = saplings
            .get(mount.sapling)
            .is_ok_and(|sapling| sapling.puzzle.is_grown());
        if mount.telescope.interact(unlocked) == TelescopeInteraction::Entered {
            tracing::info!("Looking through the telescope");
        }
        return;
    }

    if let Ok(door) = cabinets.get(target)
        && door.cabinet.interact() == CabinetInteraction::EndDemo
    {
        demo_finished.write(DemoFinished);
    }
}

/// Steer active telescopes and recompute their lights.
#[allow(clippy::type_complexity)]
fn aim_telescopes(
    time: Res<Time>,
    action_query: Query<&ActionState<PlayerAction>, With<Player>>,
    mut mounts: Query<(&mut TelescopeMount, &GlobalTransform)>,
    mut heads: Query<&mut Transform, Without<TelescopeMount>>,
    positions: Query<&GlobalTransform, Without<TelescopeMount>>,
    mut visibility: Query<&mut Visibility>,
) {
    let aim_input = action_query
        .single()
        .map_or(Vec2::ZERO, |action_state| {
            action_state.clamped_axis_pair(&PlayerAction::Aim)
        });
    let dt = time.delta_secs();

    for (mut mount, mount_transform) in &mut mounts {
        if !mount.telescope.is_viewing() {
            continue;
        }
        let mount_rotation = mount_transform.rotation();
        mount.telescope.aim(aim_input, dt);

        if let Ok(mut head) = heads.get_mut(mount.head) {
            head.rotation = mount_rotation * mount.telescope.local_rotation();
        }

        let (Ok(eye), Ok(target)) = (positions.get(mount.head), positions.get(mount.target))
        else {
            continue;
        };
        let aim = mount.telescope.aim_direction(mount_rotation);
        let light_on = mount
            .telescope
            .update_alignment(aim, target.translation() - eye.translation());
        set_visible(&mut visibility, mount.light, light_on);
    }
}

/// Open cabinets on the first rising edge of their telescope light.
fn update_cabinets(
    mut cabinets: Query<(&mut CabinetDoor, &GlobalTransform)>,
    telescopes: Query<&TelescopeMount>,
    mut visibility: Query<&mut Visibility>,
    mut effects: MessageWriter<EffectRequested>,
) {
    for (mut door, transform) in &mut cabinets {
        let light_on = telescopes
            .get(door.telescope)
            .is_ok_and(|mount| mount.telescope.is_light_on());
        if !door.cabinet.observe_light(light_on) {
            continue;
        }

        set_visible(&mut visibility, door.closed_model, false);
        set_visible(&mut visibility, door.open_model, true);
        set_visible(&mut visibility, door.book, true);
        effects.write(EffectRequested {
            effect: "cabinet_open",
            position: transform.translation(),
        });
    }
}

/// Effects are only logged; there is no audio backend.
fn play_effects(mut effects: MessageReader<EffectRequested>) {
    for effect in effects.read() {
        tracing::info!("Effect '{}' at {}", effect.effect, effect.position);
    }
}

fn finish_demo(mut finished: MessageReader<DemoFinished>, mut exit: MessageWriter<AppExit>) {
    if finished.read().next().is_some() {
        tracing::info!("Demo complete, thanks for playing");
        exit.write(AppExit::Success);
    }
}
