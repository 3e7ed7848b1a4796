//! Shared gameplay constants.

use bevy::prelude::*;

/// Fixed physics rate (Hz).
pub const FIXED_TIMESTEP_HZ: f64 = 50.0;

/// Axis the rotate-gravity action turns the field about.
pub const GRAVITY_ROTATE_AXIS: Vec3 = Vec3::X;

/// Angle of one rotate-gravity press (degrees).
pub const GRAVITY_ROTATE_DEGREES: f32 = 90.0;

/// Reach of the interaction and pickup ray (m).
pub const INTERACT_RANGE: f32 = 4.0;

/// Length of the debug gravity arrow (m).
pub const GRAVITY_ARROW_LENGTH: f32 = 3.0;
