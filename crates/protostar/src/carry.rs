//! Picking up, carrying and putting down objects.
//!
//! A carried object turns kinematic, loses its colliders and follows a hold
//! point above the carrier. Every frame its gravity override is set to the
//! carrier's gravity direction, so it falls the same way once dropped.

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use protostar_gravity::carry::{
    DEFAULT_DROP_DISTANCE, DEFAULT_HOLD_HEIGHT, drop_position, hold_position, sync_carried_gravity,
};

use crate::{
    input::PlayerAction,
    physics::{BodyGravity, WorldGravity, cast_interaction_ray, gravity::field},
    player::Player,
};

pub struct CarryPlugin;

impl Plugin for CarryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (pickup_or_drop, follow_hold_point, sync_carried_gravity_system).chain(),
        );
    }
}

/// Marker for objects the player can pick up.
#[derive(Component, Default)]
#[require(BodyGravity)]
pub struct Carryable;

/// Present on an object while it is held.
#[derive(Component, Debug)]
pub struct Carried {
    pub carrier: Entity,
}

/// Carrying state and tunables of an entity that can hold one object.
#[derive(Component, Debug)]
pub struct Carrier {
    pub carrying: Option<Entity>,
    /// Height of the hold point above the carrier's centre.
    pub hold_height: f32,
    /// Distance in front of the carrier at which objects are put down.
    pub drop_distance: f32,
}

impl Default for Carrier {
    fn default() -> Self {
        Self {
            carrying: None,
            hold_height: DEFAULT_HOLD_HEIGHT,
            drop_distance: DEFAULT_DROP_DISTANCE,
        }
    }
}

/// Pick up the object in front of the player, or put down the held one.
fn pickup_or_drop(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    mut player_query: Query<
        (Entity, &ActionState<PlayerAction>, &Transform, &mut Carrier),
        With<Player>,
    >,
    carryables: Query<(), With<Carryable>>,
    mut carried_query: Query<(&mut Transform, &mut LinearVelocity), (With<Carried>, Without<Player>)>,
) {
    let Ok((player, action_state, player_transform, mut carrier)) = player_query.single_mut()
    else {
        return;
    };
    if !action_state.just_pressed(&PlayerAction::Pickup) {
        return;
    }

    if let Some(held) = carrier.carrying.take() {
        let position = drop_position(
            player_transform.translation,
            player_transform.rotation,
            carrier.drop_distance,
        );
        if let Ok((mut transform, mut velocity)) = carried_query.get_mut(held) {
            transform.translation = position;
            velocity.0 = Vec3::ZERO;
        }
        commands
            .entity(held)
            .remove::<(Carried, ColliderDisabled)>()
            .insert((RigidBody::Dynamic, Position(position)));
        tracing::info!("Dropped {held} at {position}");
        return;
    }

    let Some(target) = cast_interaction_ray(&spatial_query, player, player_transform) else {
        tracing::debug!("Nothing in reach to pick up");
        return;
    };
    if !carryables.contains(target) {
        return;
    }

    carrier.carrying = Some(target);
    commands.entity(target).insert((
        Carried { carrier: player },
        RigidBody::Kinematic,
        ColliderDisabled,
        LinearVelocity::ZERO,
    ));
    tracing::info!("Picked up {target}");
}

/// Keep held objects at their carrier's hold point.
fn follow_hold_point(
    gravity: Option<Res<WorldGravity>>,
    carriers: Query<(&Transform, &Carrier, &BodyGravity), Without<Carried>>,
    mut carried: Query<(&Carried, &mut Transform)>,
) {
    let field = field(gravity.as_ref());

    for (held, mut transform) in &mut carried {
        let Ok((carrier_transform, carrier, body)) = carriers.get(held.carrier) else {
            continue;
        };
        transform.translation = hold_position(
            carrier_transform.translation,
            body.up(field),
            carrier.hold_height,
        );
        transform.rotation = carrier_transform.rotation;
    }
}

/// Copy each carrier's gravity direction onto the object it holds.
fn sync_carried_gravity_system(
    gravity: Option<Res<WorldGravity>>,
    carriers: Query<&BodyGravity, Without<Carried>>,
    mut carried: Query<(&Carried, &mut BodyGravity)>,
) {
    let field = field(gravity.as_ref());

    for (held, mut body) in &mut carried {
        let Ok(carrier_body) = carriers.get(held.carrier) else {
            continue;
        };
        sync_carried_gravity(&mut body.0, &carrier_body.0, field);
    }
}
