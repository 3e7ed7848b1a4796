//! Unit-vector helpers shared by the field, bodies and locomotion.
//!
//! Conventions follow Bevy: local forward is `-Z`, right is `+X`, up is `+Y`.

use glam::{Mat3, Quat, Vec3};

use crate::error::{DirectionError, DirectionResult};

/// Gravity direction used whenever no field is reachable.
pub const DEFAULT_DOWN: Vec3 = Vec3::NEG_Y;

/// Squared length below which a vector has no usable direction.
const MIN_LENGTH_SQUARED: f32 = 1e-12;

/// Squared length below which a projected axis is treated as degenerate.
///
/// Matches the 0.01 squared-magnitude cutoff used for forward/right projection.
pub const PROJECTION_EPSILON: f32 = 0.01;

/// Normalize a vector for use as a gravity direction.
///
/// # Errors
///
/// Returns [`DirectionError::NonFinite`] for NaN/infinite components and
/// [`DirectionError::Zero`] for (near) zero-length input.
pub fn normalize_direction(v: Vec3) -> DirectionResult<Vec3> {
    if !v.is_finite() {
        return Err(DirectionError::NonFinite);
    }
    let length_squared = v.length_squared();
    if length_squared < MIN_LENGTH_SQUARED {
        return Err(DirectionError::Zero);
    }
    Ok(v / length_squared.sqrt())
}

/// Spherically interpolate between two unit vectors.
///
/// Moves at constant angular velocity and keeps the result unit length. For
/// antiparallel endpoints the rotation happens about an arbitrary axis
/// perpendicular to `from`.
pub fn slerp_direction(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    let arc = Quat::from_rotation_arc(from, to);
    (Quat::IDENTITY.slerp(arc, t) * from).normalize()
}

/// Remove the component of `v` along the unit `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Build a rotation whose local `-Z` faces `forward` and local `+Y` is as close
/// to `up` as possible.
///
/// Returns `None` when `forward` is zero or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let back = -forward.try_normalize()?;
    let right = up.cross(back).try_normalize()?;
    let orthogonal_up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, orthogonal_up, back)).normalize())
}

/// The local down axis (`-Y`) of an orientation, in world space.
#[inline]
pub fn local_down(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Y
}
