//! Physics integration using Avian 3D.
//!
//! Avian's built-in gravity is disabled; every dynamic body with a
//! [`BodyGravity`] gets its acceleration from the world [`WorldGravity`] field
//! (or its own override) once per fixed tick. Gravity zones are Avian sensors
//! that retarget the field on enter/exit.

pub mod gravity;
pub mod zones;

use avian3d::debug_render::{PhysicsDebugPlugin, PhysicsGizmos};
use avian3d::prelude::*;
use bevy::color::palettes::css::LIME;
use bevy::gizmos::config::{GizmoConfig, GizmoConfigStore};
use bevy::prelude::*;
use protostar_gravity::GravityField;

use crate::{
    constants::{FIXED_TIMESTEP_HZ, INTERACT_RANGE},
    launch_params::LaunchParams,
};

pub use gravity::{BodyGravity, GravitySystems, WorldGravity};
pub use zones::GravityZoneTrigger;

/// Collision layers used by the game.
///
/// Spatial queries pick layers explicitly so sensors never count as ground or
/// block the interaction ray.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    /// Static level geometry.
    #[default]
    Ground,
    /// The player body.
    Player,
    /// Objects that can be picked up.
    Carryable,
    /// Puzzle pieces that respond to the interact action.
    Interactable,
    /// Gravity zones and other trigger volumes.
    Trigger,
}

/// Plugin for physics and gravity integration.
pub struct PhysicsIntegrationPlugin;

impl Plugin for PhysicsIntegrationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<LaunchParams>()
            .map(LaunchParams::field_config)
            .unwrap_or_default();

        // Disable default gravity - bodies read the reorientable field instead.
        app.add_plugins(PhysicsPlugins::default())
            .add_plugins(PhysicsDebugPlugin)
            .insert_resource(Gravity(Vec3::ZERO))
            .insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ))
            .insert_resource(WorldGravity(GravityField::new(&config)))
            .register_type::<GravityZoneTrigger>()
            .add_systems(Startup, configure_physics_debug_on_startup)
            .add_systems(
                Update,
                (
                    zones::handle_zone_collisions,
                    gravity::draw_gravity_arrow.run_if(crate::ui::debug_visible),
                ),
            );
        gravity::add_gravity_systems(app);
    }
}

/// Configure physics debug rendering on startup (disabled by default, user can toggle it on).
fn configure_physics_debug_on_startup(mut config_store: ResMut<GizmoConfigStore>) {
    let physics_gizmos = PhysicsGizmos {
        collider_color: Some(LIME.into()),
        ..Default::default()
    };

    // Negative depth bias draws colliders on top of geometry.
    let gizmo_config = GizmoConfig {
        enabled: false,
        depth_bias: -1.0,
        ..Default::default()
    };

    config_store.insert(gizmo_config, physics_gizmos);
}

/// Toggle physics debug visualization.
pub fn toggle_physics_debug(config_store: &mut GizmoConfigStore) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    tracing::info!("Physics debug visualization: {}", config.enabled);
}

/// Check if physics debug is currently enabled.
pub fn is_physics_debug_enabled(config_store: &GizmoConfigStore) -> bool {
    let (config, _) = config_store.config::<PhysicsGizmos>();
    config.enabled
}

/// Filter for spatial queries that should only see solid gameplay geometry.
pub fn solid_query_filter(exclude: Entity) -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask([
        GameLayer::Ground,
        GameLayer::Carryable,
        GameLayer::Interactable,
    ])
    .with_excluded_entities([exclude])
}

/// Entity straight ahead of `player` within interaction reach, if any.
pub fn cast_interaction_ray(
    spatial_query: &SpatialQuery,
    player: Entity,
    transform: &Transform,
) -> Option<Entity> {
    let direction = Dir3::new(transform.rotation * Vec3::NEG_Z).ok()?;
    spatial_query
        .cast_ray(
            transform.translation,
            direction,
            INTERACT_RANGE,
            true,
            &solid_query_filter(player),
        )
        .map(|hit| hit.entity)
}
