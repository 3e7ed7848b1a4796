//! Reorientable gravity for gravity-puzzle games.
//!
//! A single [`GravityField`] owns the world's gravity direction and eases it
//! toward new targets over a fixed duration. [`GravityBody`] values read that
//! field (or their own override), [`locomotion`] keeps walkers upright relative
//! to it, [`GravityZone`] volumes retarget it, and [`carry`] lets held objects
//! share their carrier's gravity.
//!
//! Everything here is plain `glam` math so it can be tested without an engine.

pub mod body;
pub mod carry;
pub mod direction;
mod error;
pub mod field;
pub mod locomotion;
pub mod puzzle;
pub mod zone;

pub use body::{GravityBody, GravityMode};
pub use error::{DirectionError, DirectionResult};
pub use field::{GravityField, GravityFieldConfig};
pub use locomotion::{LocomotionInput, LocomotionParams, LocomotionStep};
pub use zone::{GravityZone, ZoneDirection, ZoneEdge};
