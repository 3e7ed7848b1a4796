//! Global gravity field with smooth direction transitions.
//!
//! The field is a plain value owned by whoever drives the simulation (the app
//! stores it as a resource). Consumers pull [`GravityField::gravity`] or
//! [`GravityField::direction`]; the field never pushes forces itself.

use glam::{Quat, Vec3};

use crate::{
    direction::{DEFAULT_DOWN, normalize_direction, slerp_direction},
    error::{DirectionError, DirectionResult},
};

/// Standard gravitational acceleration (m/s^2).
pub const DEFAULT_STRENGTH: f32 = 9.81;

/// Default time for a full direction transition (seconds).
pub const DEFAULT_TRANSITION_DURATION: f32 = 1.0;

/// Initial configuration for a [`GravityField`].
#[derive(Clone, Debug)]
pub struct GravityFieldConfig {
    /// Initial direction; normalized on construction.
    pub direction: Vec3,
    /// Acceleration magnitude.
    pub strength: f32,
    /// Seconds a transition takes from start to target. Zero or less settles
    /// transitions immediately.
    pub transition_duration: f32,
}

impl Default for GravityFieldConfig {
    fn default() -> Self {
        Self {
            direction: DEFAULT_DOWN,
            strength: DEFAULT_STRENGTH,
            transition_duration: DEFAULT_TRANSITION_DURATION,
        }
    }
}

/// Reorientable uniform gravity.
#[derive(Clone, Debug)]
pub struct GravityField {
    current: Vec3,
    previous: Vec3,
    target: Vec3,
    /// In `[0, 1]`; `1.0` means settled.
    progress: f32,
    strength: f32,
    transition_duration: f32,
}

impl Default for GravityField {
    fn default() -> Self {
        Self::new(&GravityFieldConfig::default())
    }
}

impl GravityField {
    /// Create a settled field.
    ///
    /// An unusable configured direction falls back to [`DEFAULT_DOWN`], and an
    /// invalid strength falls back to [`DEFAULT_STRENGTH`].
    pub fn new(config: &GravityFieldConfig) -> Self {
        let direction = normalize_direction(config.direction).unwrap_or_else(|error| {
            tracing::warn!("Invalid initial gravity direction ({error}), using default down");
            DEFAULT_DOWN
        });
        let strength = if config.strength.is_finite() && config.strength >= 0.0 {
            config.strength
        } else {
            DEFAULT_STRENGTH
        };

        Self {
            current: direction,
            previous: direction,
            target: direction,
            progress: 1.0,
            strength,
            transition_duration: config.transition_duration,
        }
    }

    /// Instantaneous gravity vector (direction times strength).
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.current * self.strength
    }

    /// Current unit direction, interpolated mid-transition.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.current
    }

    /// Destination of the current (or last) transition.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Start point of the current (or last) transition.
    #[inline]
    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    /// Transition progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether no transition is in flight.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    #[inline]
    pub fn transition_duration(&self) -> f32 {
        self.transition_duration
    }

    /// Change the acceleration magnitude. Negative or non-finite values are ignored.
    pub fn set_strength(&mut self, strength: f32) {
        if strength.is_finite() && strength >= 0.0 {
            self.strength = strength;
        } else {
            tracing::warn!("Ignoring invalid gravity strength {strength}");
        }
    }

    /// Change how long a transition takes. Negative or non-finite values are ignored.
    ///
    /// A duration of zero settles every transition on the next [`Self::advance`].
    pub fn set_transition_duration(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds >= 0.0 {
            self.transition_duration = seconds;
        } else {
            tracing::warn!("Ignoring invalid gravity transition duration {seconds}");
        }
    }

    /// Start a transition toward `new_direction`.
    ///
    /// The transition restarts from the *current interpolated* direction, so a
    /// command issued mid-transition never snaps back to the old start.
    ///
    /// # Errors
    ///
    /// Rejects zero-length and non-finite input, leaving the field untouched.
    pub fn try_set_direction(&mut self, new_direction: Vec3) -> DirectionResult<()> {
        let target = normalize_direction(new_direction)?;
        self.previous = self.current;
        self.target = target;
        self.progress = 0.0;
        tracing::debug!(
            "Gravity transition from {:?} to {:?}",
            self.previous,
            self.target
        );
        Ok(())
    }

    /// Infallible form of [`Self::try_set_direction`]; bad input is logged and dropped.
    pub fn set_direction(&mut self, new_direction: Vec3) {
        if let Err(error) = self.try_set_direction(new_direction) {
            tracing::warn!("Ignoring gravity direction {new_direction}: {error}");
        }
    }

    /// Rotate the current direction about `axis` by `degrees` and transition to it.
    ///
    /// # Errors
    ///
    /// A degenerate axis or non-finite angle is rejected without side effects.
    pub fn try_rotate_around_axis(&mut self, axis: Vec3, degrees: f32) -> DirectionResult<()> {
        let axis = normalize_direction(axis)?;
        if !degrees.is_finite() {
            return Err(DirectionError::NonFinite);
        }
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        self.try_set_direction(rotation * self.current)
    }

    /// Infallible form of [`Self::try_rotate_around_axis`].
    pub fn rotate_around_axis(&mut self, axis: Vec3, degrees: f32) {
        if let Err(error) = self.try_rotate_around_axis(axis, degrees) {
            tracing::warn!("Ignoring gravity rotation about {axis} by {degrees}: {error}");
        }
    }

    /// Advance the in-flight transition by `dt` seconds.
    ///
    /// Call exactly once per physics tick, before any body reads the field.
    pub fn advance(&mut self, dt: f32) {
        if self.progress >= 1.0 || !dt.is_finite() || dt < 0.0 {
            return;
        }

        self.progress = if self.transition_duration > 0.0 {
            (self.progress + dt / self.transition_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.current = if self.progress >= 1.0 {
            self.target
        } else {
            slerp_direction(self.previous, self.target, self.progress)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;
    const DT: f32 = 1.0 / 60.0;

    fn settle(field: &mut GravityField) {
        for _ in 0..10_000 {
            if field.is_settled() {
                break;
            }
            field.advance(DT);
        }
    }

    #[test]
    fn test_default_field_points_down() {
        let field = GravityField::default();
        assert_eq!(field.direction(), Vec3::NEG_Y);
        assert!(field.is_settled());
        assert!((field.gravity() - Vec3::new(0.0, -9.81, 0.0)).length() < EPS);
    }

    #[test]
    fn test_invalid_initial_direction_falls_back_to_down() {
        let field = GravityField::new(&GravityFieldConfig {
            direction: Vec3::ZERO,
            ..Default::default()
        });
        assert_eq!(field.direction(), DEFAULT_DOWN);
    }

    #[test]
    fn test_transition_to_positive_x() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::X);
        assert_eq!(field.progress(), 0.0);
        assert_eq!(field.direction(), Vec3::NEG_Y);

        // Just over one second at 60 Hz covers the default duration.
        for _ in 0..61 {
            field.advance(DT);
        }
        assert!(field.is_settled());
        assert!((field.gravity() - Vec3::new(9.81, 0.0, 0.0)).length() < EPS);
        assert_eq!(field.direction(), field.target());
    }

    #[test]
    fn test_set_direction_normalizes() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(field.target(), Vec3::Z);
    }

    #[test]
    fn test_zero_and_nan_directions_are_no_ops() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::X);
        field.advance(0.25);
        let before = field.clone();

        assert_eq!(field.try_set_direction(Vec3::ZERO), Err(DirectionError::Zero));
        field.set_direction(Vec3::new(f32::NAN, 1.0, 0.0));

        assert_eq!(field.direction(), before.direction());
        assert_eq!(field.target(), before.target());
        assert_eq!(field.progress(), before.progress());
    }

    #[test]
    fn test_interrupt_restarts_from_interpolated_direction() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::X);
        field.advance(0.5);
        let mid = field.direction();
        assert!(mid.angle_between(Vec3::NEG_Y) > 0.1);

        field.set_direction(Vec3::Z);
        assert_eq!(field.previous(), mid);
        assert_eq!(field.direction(), mid);
        assert_eq!(field.progress(), 0.0);
    }

    #[test]
    fn test_rotate_around_axis_quarter_turn() {
        let mut field = GravityField::default();
        field.rotate_around_axis(Vec3::X, 90.0);
        // Rotating -Y by +90 degrees about +X gives -Z.
        assert!((field.target() - Vec3::NEG_Z).length() < EPS);
        settle(&mut field);
        assert!((field.direction() - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_rotate_around_degenerate_axis_is_rejected() {
        let mut field = GravityField::default();
        assert!(field.try_rotate_around_axis(Vec3::ZERO, 90.0).is_err());
        assert!(field.try_rotate_around_axis(Vec3::X, f32::NAN).is_err());
        assert!(field.is_settled());
        assert_eq!(field.target(), Vec3::NEG_Y);
    }

    #[test]
    fn test_zero_duration_settles_immediately() {
        let mut field = GravityField::new(&GravityFieldConfig {
            transition_duration: 0.0,
            ..Default::default()
        });
        field.set_direction(Vec3::X);
        field.advance(DT);
        assert!(field.is_settled());
        assert_eq!(field.direction(), Vec3::X);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut field = GravityField::default();
        field.set_direction(Vec3::X);
        field.advance(-1.0);
        field.advance(f32::NAN);
        assert_eq!(field.progress(), 0.0);
    }

    #[test]
    fn test_set_strength_rejects_invalid() {
        let mut field = GravityField::default();
        field.set_strength(-1.0);
        field.set_strength(f32::INFINITY);
        assert_eq!(field.strength(), DEFAULT_STRENGTH);
        field.set_strength(3.7);
        assert_eq!(field.strength(), 3.7);
    }

    #[test]
    fn test_set_transition_duration_rejects_invalid() {
        let mut field = GravityField::default();
        field.set_transition_duration(-0.5);
        field.set_transition_duration(f32::NAN);
        field.set_transition_duration(f32::INFINITY);
        assert_eq!(field.transition_duration(), DEFAULT_TRANSITION_DURATION);

        field.set_transition_duration(0.0);
        assert_eq!(field.transition_duration(), 0.0);
        field.set_direction(Vec3::X);
        field.advance(DT);
        assert!(field.is_settled());
        assert_eq!(field.direction(), Vec3::X);
    }

    #[test]
    fn test_negative_configured_duration_settles_immediately() {
        let mut field = GravityField::new(&GravityFieldConfig {
            transition_duration: -2.0,
            ..Default::default()
        });
        field.set_direction(Vec3::Z);
        field.advance(DT);
        assert!(field.is_settled());
        assert_eq!(field.direction(), Vec3::Z);
    }

    fn unit_vector() -> impl Strategy<Value = Vec3> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
            .prop_filter("non-degenerate", |(x, y, z)| {
                Vec3::new(*x, *y, *z).length_squared() > 0.01
            })
            .prop_map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    }

    proptest! {
        #[test]
        fn prop_transition_converges_to_target(a in unit_vector()) {
            let mut field = GravityField::default();
            field.set_direction(a);
            settle(&mut field);
            prop_assert!(field.is_settled());
            prop_assert!((field.direction() - a).length() < EPS);
        }

        #[test]
        fn prop_magnitude_is_invariant(a in unit_vector(), steps in 1usize..80) {
            let mut field = GravityField::default();
            field.set_direction(a);
            for _ in 0..steps {
                field.advance(DT);
                prop_assert!((field.gravity().length() - DEFAULT_STRENGTH).abs() < 1e-3);
                prop_assert!((field.direction().length() - 1.0).abs() < 1e-4);
            }
        }

        #[test]
        fn prop_interrupt_never_snaps(
            a in unit_vector(),
            b in unit_vector(),
            first_steps in 1usize..59,
        ) {
            let mut field = GravityField::default();
            field.set_direction(a);
            for _ in 0..first_steps {
                field.advance(DT);
            }
            let before = field.direction();
            field.set_direction(b);
            let limit = before.angle_between(b) + 1e-3;

            // Each step stays on the arc from the interpolated start to the new target.
            let mut last = before;
            while !field.is_settled() {
                field.advance(DT);
                let now = field.direction();
                prop_assert!(before.angle_between(now) <= limit);
                prop_assert!(now.angle_between(b) <= last.angle_between(b) + 1e-3);
                last = now;
            }
        }
    }
}
