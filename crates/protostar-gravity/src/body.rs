//! Per-actor gravity: either follow the global field or hold an override.

use glam::Vec3;

use crate::{
    direction::{DEFAULT_DOWN, normalize_direction},
    error::DirectionResult,
    field::{DEFAULT_STRENGTH, GravityField},
};

/// Which source drives a body's gravity direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GravityMode {
    /// Follow the global [`GravityField`].
    Field,
    /// Use this fixed unit direction and ignore the field.
    Override(Vec3),
}

/// Gravity state for one physics-driven actor or object.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityBody {
    mode: GravityMode,
    /// Captured once from the field; field transitions never change it.
    magnitude: f32,
}

impl Default for GravityBody {
    fn default() -> Self {
        Self {
            mode: GravityMode::Field,
            magnitude: DEFAULT_STRENGTH,
        }
    }
}

impl GravityBody {
    /// Field-driven body that captures the field's current strength.
    ///
    /// Falls back to [`DEFAULT_STRENGTH`] when no field is reachable.
    pub fn from_field(field: Option<&GravityField>) -> Self {
        Self {
            mode: GravityMode::Field,
            magnitude: field.map_or(DEFAULT_STRENGTH, GravityField::strength),
        }
    }

    /// Body that starts with an override direction.
    ///
    /// # Errors
    ///
    /// Rejects zero-length and non-finite directions.
    pub fn with_override(field: Option<&GravityField>, direction: Vec3) -> DirectionResult<Self> {
        let mut body = Self::from_field(field);
        body.try_set_override_direction(direction)?;
        Ok(body)
    }

    #[inline]
    pub fn mode(&self) -> GravityMode {
        self.mode
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    #[inline]
    pub fn has_override(&self) -> bool {
        matches!(self.mode, GravityMode::Override(_))
    }

    /// Switch to override mode with a normalized `direction`.
    ///
    /// # Errors
    ///
    /// Rejects zero-length and non-finite input; the previous mode is kept.
    pub fn try_set_override_direction(&mut self, direction: Vec3) -> DirectionResult<()> {
        self.mode = GravityMode::Override(normalize_direction(direction)?);
        Ok(())
    }

    /// Infallible form of [`Self::try_set_override_direction`].
    pub fn set_override_direction(&mut self, direction: Vec3) {
        if let Err(error) = self.try_set_override_direction(direction) {
            tracing::warn!("Ignoring override direction {direction}: {error}");
        }
    }

    /// Return to following the field.
    pub fn clear_override(&mut self) {
        self.mode = GravityMode::Field;
    }

    /// Effective gravity direction.
    ///
    /// A field-driven body without a reachable field reports [`DEFAULT_DOWN`].
    pub fn direction(&self, field: Option<&GravityField>) -> Vec3 {
        match self.mode {
            GravityMode::Override(direction) => direction,
            GravityMode::Field => field.map_or(DEFAULT_DOWN, GravityField::direction),
        }
    }

    /// Opposite of [`Self::direction`].
    #[inline]
    pub fn up(&self, field: Option<&GravityField>) -> Vec3 {
        -self.direction(field)
    }

    /// Mass-independent acceleration to apply each physics tick.
    #[inline]
    pub fn acceleration(&self, field: Option<&GravityField>) -> Vec3 {
        self.direction(field) * self.magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DirectionError, field::GravityFieldConfig};
    use proptest::prelude::*;

    #[test]
    fn test_field_mode_follows_field() {
        let mut field = GravityField::default();
        let body = GravityBody::from_field(Some(&field));
        assert_eq!(body.direction(Some(&field)), Vec3::NEG_Y);

        field.set_direction(Vec3::X);
        field.advance(0.5);
        assert_eq!(body.direction(Some(&field)), field.direction());
    }

    #[test]
    fn test_missing_field_degrades_to_default_down() {
        let body = GravityBody::from_field(None);
        assert_eq!(body.direction(None), DEFAULT_DOWN);
        assert_eq!(body.up(None), Vec3::Y);
        assert_eq!(body.magnitude(), DEFAULT_STRENGTH);
        assert!(body.acceleration(None).is_finite());
    }

    #[test]
    fn test_override_ignores_field_transitions() {
        let mut field = GravityField::default();
        let mut body = GravityBody::from_field(Some(&field));
        body.set_override_direction(Vec3::new(0.0, 0.0, 2.0));
        assert!(body.has_override());

        field.set_direction(Vec3::X);
        for _ in 0..120 {
            field.advance(1.0 / 60.0);
            assert_eq!(body.direction(Some(&field)), Vec3::Z);
        }
    }

    #[test]
    fn test_clear_override_returns_to_field() {
        let field = GravityField::default();
        let mut body = GravityBody::from_field(Some(&field));
        body.set_override_direction(Vec3::X);
        body.clear_override();
        assert_eq!(body.mode(), GravityMode::Field);
        assert_eq!(body.direction(Some(&field)), Vec3::NEG_Y);
    }

    #[test]
    fn test_bad_override_keeps_previous_mode() {
        let mut body = GravityBody::default();
        body.set_override_direction(Vec3::Z);
        body.set_override_direction(Vec3::ZERO);
        body.set_override_direction(Vec3::splat(f32::NAN));
        assert_eq!(body.mode(), GravityMode::Override(Vec3::Z));

        let mut field_body = GravityBody::default();
        assert!(field_body.try_set_override_direction(Vec3::ZERO).is_err());
        assert_eq!(field_body.mode(), GravityMode::Field);
    }

    #[test]
    fn test_with_override_normalizes_and_rejects_zero() {
        let body = GravityBody::with_override(None, Vec3::new(0.0, 0.0, -3.0))
            .unwrap_or_else(|error| panic!("valid override rejected: {error}"));
        let GravityMode::Override(direction) = body.mode() else {
            panic!("expected an override");
        };
        assert!((direction - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(body.magnitude(), DEFAULT_STRENGTH);

        assert_eq!(
            GravityBody::with_override(None, Vec3::ZERO),
            Err(DirectionError::Zero)
        );
    }

    #[test]
    fn test_magnitude_captured_at_creation() {
        let mut field = GravityField::new(&GravityFieldConfig {
            strength: 4.0,
            ..Default::default()
        });
        let body = GravityBody::from_field(Some(&field));
        field.set_strength(20.0);
        assert_eq!(body.magnitude(), 4.0);
        assert!((body.acceleration(Some(&field)) - Vec3::new(0.0, -4.0, 0.0)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_up_is_exact_antipode(
            x in -1.0f32..1.0,
            y in -1.0f32..1.0,
            z in -1.0f32..1.0,
            use_override: bool,
        ) {
            let mut field = GravityField::default();
            field.set_direction(Vec3::new(x, y, z));
            field.advance(0.3);

            let mut body = GravityBody::from_field(Some(&field));
            if use_override {
                body.set_override_direction(Vec3::new(z, x, y));
            }
            let direction = body.direction(Some(&field));
            prop_assert_eq!(body.up(Some(&field)), -direction);
            prop_assert_eq!(body.up(None), -body.direction(None));
        }
    }
}
