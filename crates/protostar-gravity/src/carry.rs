//! Objects that take on their carrier's gravity while held.

use glam::{Quat, Vec3};

use crate::{body::GravityBody, direction::local_down, field::GravityField};

/// Default distance in front of the carrier at which objects are put down.
pub const DEFAULT_DROP_DISTANCE: f32 = 2.0;

/// Default height of the hold point above the carrier's centre.
pub const DEFAULT_HOLD_HEIGHT: f32 = 1.5;

/// Gravity body for a freshly placed carryable: overridden to its own local down.
///
/// A degenerate rotation leaves the body following the field.
pub fn initial_carryable_body(field: Option<&GravityField>, rotation: Quat) -> GravityBody {
    GravityBody::with_override(field, local_down(rotation)).unwrap_or_else(|error| {
        tracing::warn!("Carryable rotation {rotation} has no usable down axis: {error}");
        GravityBody::from_field(field)
    })
}

/// Copy the carrier's current gravity direction onto a carried body.
///
/// Call once per frame while held. After release the last written override
/// simply stays in place. Returns the direction now stored on `carried`.
pub fn sync_carried_gravity(
    carried: &mut GravityBody,
    carrier: &GravityBody,
    field: Option<&GravityField>,
) -> Vec3 {
    carried.set_override_direction(carrier.direction(field));
    carried.direction(field)
}

/// Where a held object sits: above the carrier along its gravity up.
#[inline]
pub fn hold_position(carrier_position: Vec3, carrier_up: Vec3, hold_height: f32) -> Vec3 {
    carrier_position + carrier_up * hold_height
}

/// Where a released object is placed: in front of the carrier.
#[inline]
pub fn drop_position(carrier_position: Vec3, carrier_rotation: Quat, drop_distance: f32) -> Vec3 {
    carrier_position + carrier_rotation * Vec3::NEG_Z * drop_distance
}
