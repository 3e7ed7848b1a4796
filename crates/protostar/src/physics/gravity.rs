//! Reorientable world gravity.
//!
//! [`WorldGravity`] owns the single [`GravityField`]. The field advances exactly
//! once per fixed tick, then every dynamic [`BodyGravity`] integrates its
//! acceleration into `LinearVelocity` before Avian steps.

use avian3d::prelude::*;
use bevy::color::palettes::css::{ORANGE, YELLOW};
use bevy::prelude::*;
use protostar_gravity::{GravityBody, GravityField};

use crate::{constants::GRAVITY_ARROW_LENGTH, player::Player};

/// The world's gravity field.
#[derive(Resource, Deref, DerefMut, Default)]
pub struct WorldGravity(pub GravityField);

/// Per-entity gravity, following [`WorldGravity`] unless overridden.
#[derive(Component, Deref, DerefMut, Default, Clone, Debug)]
pub struct BodyGravity(pub GravityBody);

/// Ordering of the gravity systems within `FixedPreUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GravitySystems {
    /// Step the field's direction transition.
    AdvanceField,
    /// Integrate gravity into body velocities.
    ApplyBodies,
}

/// Register the per-tick gravity systems: the field advances once, then bodies
/// integrate the advanced field.
pub fn add_gravity_systems(app: &mut App) {
    app.configure_sets(
        FixedPreUpdate,
        (GravitySystems::AdvanceField, GravitySystems::ApplyBodies).chain(),
    )
    .add_systems(
        FixedPreUpdate,
        (
            advance_gravity_field.in_set(GravitySystems::AdvanceField),
            apply_body_gravity.in_set(GravitySystems::ApplyBodies),
        ),
    );
}

/// Borrow the field out of an optional resource.
pub fn field<'a>(gravity: Option<&'a Res<WorldGravity>>) -> Option<&'a GravityField> {
    gravity.map(|gravity| &gravity.0)
}

/// Advance the field's transition by one fixed tick.
pub fn advance_gravity_field(time: Res<Time>, mut gravity: ResMut<WorldGravity>) {
    let was_settled = gravity.is_settled();
    gravity.advance(time.delta_secs());
    if !was_settled && gravity.is_settled() {
        tracing::info!("Gravity settled at {}", gravity.direction());
    }
}

/// Apply gravitational acceleration: v += g * dt.
///
/// Kinematic and static bodies are skipped, so held objects float.
pub fn apply_body_gravity(
    time: Res<Time>,
    gravity: Option<Res<WorldGravity>>,
    mut query: Query<(&BodyGravity, &RigidBody, &mut LinearVelocity)>,
) {
    let dt = time.delta_secs();
    let field = field(gravity.as_ref());

    for (body, rigid_body, mut velocity) in &mut query {
        if !rigid_body.is_dynamic() {
            continue;
        }
        velocity.0 += body.acceleration(field) * dt;
    }
}

/// Draw the current and target gravity directions at the player.
pub fn draw_gravity_arrow(
    mut gizmos: Gizmos,
    gravity: Res<WorldGravity>,
    player: Query<&Transform, With<Player>>,
) {
    let origin = player
        .single()
        .map_or(Vec3::ZERO, |transform| transform.translation);

    gizmos.arrow(
        origin,
        origin + gravity.direction() * GRAVITY_ARROW_LENGTH,
        YELLOW,
    );
    if !gravity.is_settled() {
        gizmos.arrow(
            origin,
            origin + gravity.target() * GRAVITY_ARROW_LENGTH,
            ORANGE.with_alpha(0.5),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const DT: f32 = 0.02;

    /// App with only the gravity systems and a fixed-length tick.
    fn gravity_app() -> App {
        let mut app = App::new();
        add_gravity_systems(&mut app);

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(DT));
        app.insert_resource(time)
            .insert_resource(WorldGravity::default());
        app
    }

    fn run_tick(app: &mut App) {
        app.world_mut().run_schedule(FixedPreUpdate);
    }

    #[test]
    fn test_bodies_read_field_after_it_advances() {
        let mut app = gravity_app();
        app.world_mut()
            .resource_mut::<WorldGravity>()
            .set_direction(Vec3::X);

        let body = GravityBody::default();
        let magnitude = body.magnitude();
        let dynamic = app
            .world_mut()
            .spawn((BodyGravity(body), RigidBody::Dynamic, LinearVelocity::ZERO))
            .id();
        let kinematic = app
            .world_mut()
            .spawn((
                BodyGravity::default(),
                RigidBody::Kinematic,
                LinearVelocity::ZERO,
            ))
            .id();

        run_tick(&mut app);

        let gravity = app.world().resource::<WorldGravity>();
        assert!((gravity.progress() - DT).abs() < 1e-6);
        let advanced = gravity.direction();
        assert!((advanced - Vec3::NEG_Y).length() > 1e-3);

        let velocity = app.world().get::<LinearVelocity>(dynamic).map(|v| v.0);
        let expected = advanced * magnitude * DT;
        let Some(velocity) = velocity else {
            panic!("dynamic body lost its velocity");
        };
        assert!((velocity - expected).length() < 1e-6);
        // The pre-advance direction would give a measurably different result.
        assert!((velocity - Vec3::NEG_Y * magnitude * DT).length() > 1e-4);

        assert_eq!(
            app.world().get::<LinearVelocity>(kinematic).map(|v| v.0),
            Some(Vec3::ZERO)
        );
    }

    #[test]
    fn test_field_advances_once_per_tick() {
        let mut app = gravity_app();
        app.world_mut()
            .resource_mut::<WorldGravity>()
            .set_direction(Vec3::X);

        for ticks in [1.0, 2.0, 3.0] {
            run_tick(&mut app);
            let progress = app.world().resource::<WorldGravity>().progress();
            assert!((progress - ticks * DT).abs() < 1e-5);
        }
    }
}
