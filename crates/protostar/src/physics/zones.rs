//! Gravity zones: sensors that retarget world gravity when the player crosses them.

use avian3d::prelude::*;
use bevy::prelude::*;
use protostar_gravity::{GravityZone, ZoneDirection, ZoneEdge};

use super::WorldGravity;
use crate::player::Player;

/// Trigger volume that retargets the world gravity field.
///
/// Fires once per crossing on the configured edge; standing inside does nothing.
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
#[require(Sensor, CollisionEventsEnabled)]
pub struct GravityZoneTrigger {
    /// Use the zone's own down axis instead of `direction`.
    pub use_own_orientation: bool,
    /// World-space direction used when `use_own_orientation` is off.
    pub direction: Vec3,
    /// Fire when the player leaves instead of when it enters.
    pub trigger_on_exit: bool,
}

impl Default for GravityZoneTrigger {
    fn default() -> Self {
        Self {
            use_own_orientation: true,
            direction: Vec3::NEG_Y,
            trigger_on_exit: false,
        }
    }
}

impl GravityZoneTrigger {
    pub fn zone(&self) -> GravityZone {
        GravityZone {
            source: if self.use_own_orientation {
                ZoneDirection::OwnOrientation
            } else {
                ZoneDirection::Explicit(self.direction)
            },
            fire_on: if self.trigger_on_exit {
                ZoneEdge::Exit
            } else {
                ZoneEdge::Enter
            },
        }
    }
}

/// Turn sensor enter/exit edges between a zone and the player into field commands.
pub fn handle_zone_collisions(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    zones: Query<(&GravityZoneTrigger, &GlobalTransform)>,
    players: Query<(), With<Player>>,
    mut gravity: ResMut<WorldGravity>,
) {
    let edges = started
        .read()
        .map(|event| (ZoneEdge::Enter, event.collider1, event.collider2))
        .chain(
            ended
                .read()
                .map(|event| (ZoneEdge::Exit, event.collider1, event.collider2)),
        );

    for (edge, a, b) in edges {
        let zone_entity = if players.contains(b) {
            a
        } else if players.contains(a) {
            b
        } else {
            continue;
        };
        let Ok((trigger, transform)) = zones.get(zone_entity) else {
            continue;
        };

        if let Some(direction) = trigger.zone().resolve(edge, transform.rotation()) {
            tracing::info!("Gravity zone {zone_entity} ({edge:?}) sets gravity to {direction}");
            gravity.set_direction(direction);
        }
    }
}
