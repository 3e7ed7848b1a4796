//! Trigger volumes that reorient the global gravity field.

use glam::{Quat, Vec3};

use crate::direction::{local_down, normalize_direction};

/// Where a zone takes its gravity direction from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoneDirection {
    /// The zone's own local down axis (negated local up).
    OwnOrientation,
    /// A fixed world-space direction.
    Explicit(Vec3),
}

/// Which overlap edge fires the zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneEdge {
    #[default]
    Enter,
    Exit,
}

/// Configuration of one gravity zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityZone {
    pub source: ZoneDirection,
    pub fire_on: ZoneEdge,
}

impl Default for GravityZone {
    fn default() -> Self {
        Self {
            source: ZoneDirection::OwnOrientation,
            fire_on: ZoneEdge::Enter,
        }
    }
}

impl GravityZone {
    /// Direction this zone commands for a zone oriented by `zone_rotation`.
    ///
    /// `None` for an explicit vector that has no direction.
    pub fn direction(&self, zone_rotation: Quat) -> Option<Vec3> {
        match self.source {
            ZoneDirection::OwnOrientation => normalize_direction(local_down(zone_rotation)).ok(),
            ZoneDirection::Explicit(direction) => normalize_direction(direction).ok(),
        }
    }

    /// React to a discrete overlap edge.
    ///
    /// Returns the direction to hand to the field, or `None` if this edge is
    /// not the configured one.
    pub fn resolve(&self, edge: ZoneEdge, zone_rotation: Quat) -> Option<Vec3> {
        if edge != self.fire_on {
            return None;
        }
        self.direction(zone_rotation)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::field::GravityField;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_own_orientation_uses_negated_local_up() {
        let zone = GravityZone::default();
        // Tip the zone 90 degrees about X: local up becomes +Z.
        let rotation = Quat::from_rotation_x(FRAC_PI_2);
        let direction = zone.resolve(ZoneEdge::Enter, rotation).unwrap();

        assert!((direction - -(rotation * Vec3::Y)).length() < EPS);
        assert!((direction - Vec3::NEG_Z).length() < EPS);
        // Not the zone's forward or right axis.
        assert!(direction.angle_between(rotation * Vec3::NEG_Z) > 0.1);
        assert!(direction.angle_between(rotation * Vec3::X) > 0.1);
    }

    #[test]
    fn test_explicit_direction_is_normalized() {
        let zone = GravityZone {
            source: ZoneDirection::Explicit(Vec3::new(3.0, 0.0, 0.0)),
            fire_on: ZoneEdge::Enter,
        };
        assert_eq!(zone.resolve(ZoneEdge::Enter, Quat::IDENTITY), Some(Vec3::X));
    }

    #[test]
    fn test_zero_explicit_direction_does_not_fire() {
        let zone = GravityZone {
            source: ZoneDirection::Explicit(Vec3::ZERO),
            fire_on: ZoneEdge::Enter,
        };
        assert_eq!(zone.resolve(ZoneEdge::Enter, Quat::IDENTITY), None);
    }

    #[test]
    fn test_only_configured_edge_fires() {
        let on_exit = GravityZone {
            fire_on: ZoneEdge::Exit,
            ..Default::default()
        };
        assert_eq!(on_exit.resolve(ZoneEdge::Enter, Quat::IDENTITY), None);
        assert_eq!(on_exit.resolve(ZoneEdge::Exit, Quat::IDENTITY), Some(Vec3::NEG_Y));
    }

    #[test]
    fn test_zone_drives_field() {
        let mut field = GravityField::default();
        let zone = GravityZone::default();
        let rotation = Quat::from_rotation_z(FRAC_PI_2);

        if let Some(direction) = zone.resolve(ZoneEdge::Enter, rotation) {
            field.set_direction(direction);
        }
        assert!((field.target() - Vec3::X).length() < EPS);
    }
}
