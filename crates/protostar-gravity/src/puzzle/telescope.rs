//! Telescope that must be aimed at a target once the sapling has grown.

use glam::{Quat, Vec2, Vec3};

/// Tunables for the telescope.
#[derive(Clone, Debug)]
pub struct TelescopeConfig {
    /// Aim speed (degrees/s).
    pub rotation_speed: f32,
    /// Maximum pitch above or below the horizon (degrees).
    pub vertical_limit: f32,
    /// Minimum dot product between aim and target direction to light up.
    /// `0.98` is roughly 11 degrees.
    pub alignment_threshold: f32,
    /// Targets further away than this never count as aligned.
    pub detection_range: f32,
}

impl Default for TelescopeConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 50.0,
            vertical_limit: 60.0,
            alignment_threshold: 0.98,
            detection_range: 1000.0,
        }
    }
}

/// Outcome of interacting with the telescope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelescopeInteraction {
    /// The prerequisite puzzle is not solved.
    Locked,
    /// Started looking through the telescope.
    Entered,
    /// Stopped looking through the telescope.
    Exited,
}

#[derive(Debug, Clone, Default)]
pub struct Telescope {
    pub config: TelescopeConfig,
    viewing: bool,
    /// Degrees, positive turns right.
    yaw: f32,
    /// Degrees, positive looks up.
    pitch: f32,
    light_on: bool,
}

impl Telescope {
    pub fn new(config: TelescopeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn is_viewing(&self) -> bool {
        self.viewing
    }

    pub fn is_light_on(&self) -> bool {
        self.light_on
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Toggle viewing, provided the prerequisite is met.
    pub fn interact(&mut self, prerequisite_met: bool) -> TelescopeInteraction {
        if !prerequisite_met {
            tracing::info!("The telescope is locked");
            return TelescopeInteraction::Locked;
        }
        self.viewing = !self.viewing;
        if self.viewing {
            TelescopeInteraction::Entered
        } else {
            TelescopeInteraction::Exited
        }
    }

    /// Apply aim input (`x` yaw, `y` pitch) while viewing.
    pub fn aim(&mut self, input: Vec2, dt: f32) {
        if !self.viewing {
            return;
        }
        let speed = self.config.rotation_speed * dt;
        self.yaw = (self.yaw + input.x * speed).rem_euclid(360.0);
        let limit = self.config.vertical_limit;
        self.pitch = (self.pitch + input.y * speed).clamp(-limit, limit);
    }

    /// Aim orientation relative to the telescope mount.
    pub fn local_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians()) * Quat::from_rotation_x(self.pitch.to_radians())
    }

    /// World aim direction for a mount oriented by `mount_rotation`.
    pub fn aim_direction(&self, mount_rotation: Quat) -> Vec3 {
        mount_rotation * self.local_rotation() * Vec3::NEG_Z
    }

    /// Recompute the light from the aim and the direction to the target.
    ///
    /// Only evaluated while viewing; the light keeps its last state otherwise.
    /// Returns the light state.
    pub fn update_alignment(&mut self, aim_direction: Vec3, to_target: Vec3) -> bool {
        if !self.viewing {
            return self.light_on;
        }
        let in_range = to_target.length() <= self.config.detection_range;
        let alignment = aim_direction
            .normalize_or_zero()
            .dot(to_target.normalize_or_zero());
        let light_on = in_range && alignment >= self.config.alignment_threshold;
        if light_on && !self.light_on {
            tracing::info!("Telescope aligned with target, light on");
        }
        self.light_on = light_on;
        light_on
    }
}
