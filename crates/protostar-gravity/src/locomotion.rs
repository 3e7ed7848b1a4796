//! Gravity-relative locomotion math.
//!
//! Pure functions that can be tested in isolation without Bevy dependencies.
//! The app calls [`step_locomotion`] once per fixed tick and
//! [`ground_probe_center`] once per rendered frame.

use glam::{Quat, Vec2, Vec3};

use crate::direction::{PROJECTION_EPSILON, look_rotation, project_on_plane};

/// Tunables for a gravity-aligned walker.
#[derive(Clone, Debug)]
pub struct LocomotionParams {
    /// Forward/backward speed (m/s).
    pub move_speed: f32,
    /// Turn rate about the gravity axis (degrees/s).
    pub turn_speed: f32,
    /// Jump impulse per unit mass (m/s).
    pub jump_force: f32,
    /// Radius of the ground probe sphere.
    pub ground_probe_radius: f32,
    /// Distance from the body centre to its feet along gravity.
    pub half_extent: f32,
    /// Fraction of the remaining alignment covered per second.
    pub align_rate: f32,
    /// Up-vector differences below this angle (degrees) are left alone.
    pub align_epsilon_degrees: f32,
}

impl Default for LocomotionParams {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_speed: 100.0,
            jump_force: 5.0,
            ground_probe_radius: 0.3,
            half_extent: 1.0,
            align_rate: 2.0,
            align_epsilon_degrees: 0.1,
        }
    }
}

/// Input consumed by one locomotion tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocomotionInput {
    /// `x` turns (positive = right), `y` moves (positive = forward).
    pub movement: Vec2,
    /// A jump press edge was seen since the last tick.
    pub jump: bool,
}

/// Result of one locomotion tick.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionStep {
    /// New orientation after turning and alignment.
    pub rotation: Quat,
    /// Position change to apply this tick.
    pub position_delta: Vec3,
    /// Velocity change from a jump, if one happened.
    pub jump_impulse: Option<Vec3>,
}

/// Rotate about `up` by the turn input.
///
/// Zero input returns `rotation` untouched so no drift accumulates at rest.
pub fn turn_rotation(rotation: Quat, up: Vec3, turn_input: f32, turn_speed: f32, dt: f32) -> Quat {
    if turn_input == 0.0 {
        return rotation;
    }
    // Positive input turns clockwise seen from above, i.e. negative about up.
    let angle = -(turn_input * turn_speed * dt).to_radians();
    (Quat::from_axis_angle(up, angle) * rotation).normalize()
}

/// Orientation with `up` as its up axis that keeps the current heading.
///
/// Uses the forward axis projected onto the plane perpendicular to `up`. When
/// forward is nearly parallel to `up`, the projected right axis is used
/// instead. Returns `None` when both projections are degenerate.
pub fn alignment_target(rotation: Quat, up: Vec3) -> Option<Quat> {
    let forward = project_on_plane(rotation * Vec3::NEG_Z, up);
    if forward.length_squared() > PROJECTION_EPSILON {
        return look_rotation(forward, up);
    }

    let right = project_on_plane(rotation * Vec3::X, up);
    if right.length_squared() > PROJECTION_EPSILON {
        return look_rotation(up.cross(right), up);
    }

    None
}

/// Ease `rotation` toward [`alignment_target`] by `min(1, rate * dt)`.
pub fn align_rotation(rotation: Quat, up: Vec3, params: &LocomotionParams, dt: f32) -> Quat {
    let current_up = rotation * Vec3::Y;
    if current_up.angle_between(up).to_degrees() <= params.align_epsilon_degrees {
        return rotation;
    }
    let Some(target) = alignment_target(rotation, up) else {
        return rotation;
    };
    let t = (params.align_rate * dt).clamp(0.0, 1.0);
    rotation.slerp(target, t).normalize()
}

/// Position change along the body's own forward axis.
#[inline]
pub fn move_delta(rotation: Quat, forward_input: f32, move_speed: f32, dt: f32) -> Vec3 {
    rotation * Vec3::NEG_Z * (forward_input * move_speed * dt)
}

/// Centre of the ground probe sphere: offset from `position` along gravity.
#[inline]
pub fn ground_probe_center(position: Vec3, gravity_direction: Vec3, half_extent: f32) -> Vec3 {
    position + gravity_direction * half_extent
}

/// Jump velocity change along `up`, only when grounded.
#[inline]
pub fn jump_impulse(up: Vec3, jump_force: f32, grounded: bool, jump_pressed: bool) -> Option<Vec3> {
    (grounded && jump_pressed).then_some(up * jump_force)
}

/// Run one locomotion tick: turn, align, move, jump.
///
/// Turning runs before alignment; the reverse order would let alignment
/// overwrite the turn.
pub fn step_locomotion(
    params: &LocomotionParams,
    input: &LocomotionInput,
    rotation: Quat,
    up: Vec3,
    grounded: bool,
    dt: f32,
) -> LocomotionStep {
    let turned = turn_rotation(rotation, up, input.movement.x, params.turn_speed, dt);
    let aligned = align_rotation(turned, up, params, dt);
    let position_delta = move_delta(aligned, input.movement.y, params.move_speed, dt);

    LocomotionStep {
        rotation: aligned,
        position_delta,
        jump_impulse: jump_impulse(up, params.jump_force, grounded, input.jump),
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::{body::GravityBody, field::GravityField};

    const EPS: f32 = 1e-4;
    const DT: f32 = 1.0 / 50.0;

    #[test]
    fn test_zero_turn_input_is_identity() {
        let rotation = Quat::from_rotation_y(0.3);
        assert_eq!(turn_rotation(rotation, Vec3::Y, 0.0, 100.0, DT), rotation);
    }

    #[test]
    fn test_positive_turn_goes_right() {
        // Turning right by 90 degrees from facing -Z ends up facing +X.
        let rotation = turn_rotation(Quat::IDENTITY, Vec3::Y, 1.0, 90.0, 1.0);
        assert!((rotation * Vec3::NEG_Z - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_turn_about_sideways_gravity() {
        // Up is +X: turning keeps the body's up axis untouched.
        let rotation = alignment_target(Quat::IDENTITY, Vec3::X).unwrap();
        let turned = turn_rotation(rotation, Vec3::X, 0.5, 120.0, 1.0);
        assert!((turned * Vec3::Y - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_alignment_target_preserves_heading() {
        let target = alignment_target(Quat::IDENTITY, Vec3::X).unwrap();
        assert!((target * Vec3::Y - Vec3::X).length() < EPS);
        // Forward (-Z) is already perpendicular to +X, so it is preserved.
        assert!((target * Vec3::NEG_Z - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_alignment_falls_back_to_right_axis() {
        // Facing straight along the new up: forward projection is degenerate.
        let rotation = Quat::IDENTITY;
        let target = alignment_target(rotation, Vec3::NEG_Z).unwrap();
        assert!((target * Vec3::Y - Vec3::NEG_Z).length() < EPS);
        // Right (+X) is perpendicular to -Z, so it survives.
        assert!((target * Vec3::X - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_alignment_degenerate_both_axes() {
        // A zero-length up projects nothing away, but looking along a zero up
        // is undefined; the target builder must refuse rather than produce NaN.
        assert!(alignment_target(Quat::IDENTITY, Vec3::ZERO).is_none());
        let params = LocomotionParams::default();
        let rotation = Quat::from_rotation_x(0.4);
        let aligned = align_rotation(rotation, Vec3::ZERO, &params, DT);
        assert!(aligned.is_finite());
    }

    #[test]
    fn test_align_is_gradual_and_converges() {
        let params = LocomotionParams::default();
        let up = Vec3::X;
        let mut rotation = Quat::IDENTITY;

        let first = align_rotation(rotation, up, &params, DT);
        let first_error = (first * Vec3::Y).angle_between(up);
        assert!(first_error > 0.1, "alignment must not snap");
        assert!(first_error < FRAC_PI_2);

        for _ in 0..1000 {
            rotation = align_rotation(rotation, up, &params, DT);
        }
        assert!((rotation * Vec3::Y).angle_between(up).to_degrees() < 0.2);
    }

    #[test]
    fn test_align_skips_within_epsilon() {
        let params = LocomotionParams::default();
        let rotation = Quat::from_rotation_z(0.0005);
        assert_eq!(align_rotation(rotation, Vec3::Y, &params, DT), rotation);
    }

    #[test]
    fn test_move_delta_along_own_forward() {
        let rotation = Quat::from_rotation_y(FRAC_PI_2);
        let delta = move_delta(rotation, 1.0, 5.0, 0.1);
        // Facing -X after a quarter turn left.
        assert!((delta - Vec3::new(-0.5, 0.0, 0.0)).length() < EPS);
        assert_eq!(move_delta(rotation, 0.0, 5.0, 0.1), Vec3::ZERO);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        assert_eq!(jump_impulse(Vec3::Y, 5.0, true, true), Some(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(jump_impulse(Vec3::Y, 5.0, false, true), None);
        assert_eq!(jump_impulse(Vec3::Y, 5.0, true, false), None);
    }

    #[test]
    fn test_jump_goes_along_body_up_and_probe_along_direction() {
        let field = GravityField::default();
        let body = GravityBody::from_field(Some(&field));
        let params = LocomotionParams::default();
        let input = LocomotionInput {
            movement: Vec2::ZERO,
            jump: true,
        };

        let step = step_locomotion(&params, &input, Quat::IDENTITY, body.up(Some(&field)), true, DT);
        assert_eq!(step.jump_impulse, Some(Vec3::Y * params.jump_force));

        let probe = ground_probe_center(Vec3::new(1.0, 2.0, 3.0), body.direction(Some(&field)), 0.5);
        assert_eq!(probe - Vec3::new(1.0, 2.0, 3.0), body.direction(Some(&field)) * 0.5);
    }

    #[test]
    fn test_probe_follows_sideways_gravity() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::X);
        field.advance(0.5);
        let body = GravityBody::from_field(Some(&field));
        let direction = body.direction(Some(&field));
        let probe = ground_probe_center(Vec3::ZERO, direction, 1.0);
        assert_eq!(probe, direction);
        assert_ne!(probe, Vec3::NEG_Y);
    }

    #[test]
    fn test_step_turns_before_aligning() {
        let params = LocomotionParams {
            align_rate: 1000.0,
            ..Default::default()
        };
        let input = LocomotionInput {
            movement: Vec2::new(1.0, 0.0),
            jump: false,
        };
        // Already upright: alignment is a no-op and the turn must survive.
        let step = step_locomotion(&params, &input, Quat::IDENTITY, Vec3::Y, true, 0.5);
        let heading = step.rotation * Vec3::NEG_Z;
        assert!(heading.angle_between(Vec3::NEG_Z).to_degrees() > 45.0);
        assert!(step.jump_impulse.is_none());
    }
}
