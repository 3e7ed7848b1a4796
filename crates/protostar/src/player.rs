//! Gravity-aligned player controller.
//!
//! Input is sampled every frame before the fixed loop and latched into
//! [`PlayerInput`]; the fixed tick turns, aligns, moves and jumps the player
//! relative to its [`BodyGravity`]. The ground probe runs once per frame.

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use protostar_gravity::{
    LocomotionInput, LocomotionParams,
    locomotion::{ground_probe_center, step_locomotion},
};

use crate::{
    constants::{GRAVITY_ROTATE_AXIS, GRAVITY_ROTATE_DEGREES},
    input::PlayerAction,
    physics::{BodyGravity, GameLayer, GravitySystems, WorldGravity, gravity::field},
    puzzle::telescope_in_use,
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DidFixedTimestepRunThisFrame>()
            .register_type::<PlayerController>()
            .add_systems(PreUpdate, clear_fixed_timestep_flag)
            .add_systems(
                FixedPreUpdate,
                (set_fixed_time_step_flag, move_player)
                    .chain()
                    .after(GravitySystems::ApplyBodies),
            )
            .add_systems(
                RunFixedMainLoop,
                (
                    player_input
                        .run_if(not(telescope_in_use))
                        .in_set(RunFixedMainLoopSystems::BeforeFixedMainLoop),
                    clear_input
                        .run_if(did_fixed_timestep_run_this_frame)
                        .in_set(RunFixedMainLoopSystems::AfterFixedMainLoop),
                ),
            )
            .add_systems(Update, (probe_ground, rotate_gravity_on_input));
    }
}

// ============================================================================
// Components
// ============================================================================

/// Marker for the player body.
#[derive(Component)]
#[require(PlayerInput, Grounded, BodyGravity)]
pub struct Player;

/// Tunables for the player, authored on the entity.
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct PlayerController {
    /// Walk speed (m/s).
    pub move_speed: f32,
    /// Turn rate (degrees/s).
    pub turn_speed: f32,
    /// Jump velocity change (m/s).
    pub jump_force: f32,
    /// Radius of the ground probe sphere.
    pub ground_probe_radius: f32,
    /// Distance from the body centre to the feet.
    pub half_extent: f32,
    /// Fraction of the remaining upright alignment covered per second.
    pub align_rate: f32,
    /// Raw layer bits the ground probe reacts to. Zero means every layer.
    pub ground_mask: u32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::from_params(&LocomotionParams::default())
    }
}

impl PlayerController {
    pub fn from_params(params: &LocomotionParams) -> Self {
        Self {
            move_speed: params.move_speed,
            turn_speed: params.turn_speed,
            jump_force: params.jump_force,
            ground_probe_radius: params.ground_probe_radius,
            half_extent: params.half_extent,
            align_rate: params.align_rate,
            ground_mask: 0,
        }
    }

    pub fn with_ground_layers(mut self, layers: impl Into<LayerMask>) -> Self {
        self.ground_mask = layers.into().0;
        self
    }

    pub fn params(&self) -> LocomotionParams {
        LocomotionParams {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
            jump_force: self.jump_force,
            ground_probe_radius: self.ground_probe_radius,
            half_extent: self.half_extent,
            align_rate: self.align_rate,
            ..Default::default()
        }
    }

    /// Layers the ground probe considers.
    pub fn ground_layers(&self) -> LayerMask {
        if self.ground_mask == 0 {
            LayerMask::ALL
        } else {
            LayerMask(self.ground_mask)
        }
    }
}

/// Input latched between fixed ticks.
#[derive(Component, Default, Debug)]
pub struct PlayerInput {
    /// `x` turns, `y` walks.
    pub movement: Vec2,
    /// Jump pressed since the last tick.
    pub jump: bool,
}

/// Result of the last ground probe.
#[derive(Component, Default, Debug)]
pub struct Grounded(pub bool);

// ============================================================================
// Input latching
// ============================================================================

#[derive(Resource, Default)]
pub struct DidFixedTimestepRunThisFrame(bool);

fn clear_fixed_timestep_flag(
    mut did_fixed_timestep_run_this_frame: ResMut<DidFixedTimestepRunThisFrame>,
) {
    did_fixed_timestep_run_this_frame.0 = false;
}

fn set_fixed_time_step_flag(
    mut did_fixed_timestep_run_this_frame: ResMut<DidFixedTimestepRunThisFrame>,
) {
    did_fixed_timestep_run_this_frame.0 = true;
}

fn did_fixed_timestep_run_this_frame(
    did_fixed_timestep_run_this_frame: Res<DidFixedTimestepRunThisFrame>,
) -> bool {
    did_fixed_timestep_run_this_frame.0
}

fn clear_input(mut query: Query<&mut PlayerInput>) {
    for mut input in &mut query {
        input.movement = Vec2::ZERO;
        input.jump = false;
    }
}

fn player_input(mut query: Query<(&ActionState<PlayerAction>, &mut PlayerInput), With<Player>>) {
    for (action_state, mut input) in &mut query {
        input.movement = action_state.clamped_axis_pair(&PlayerAction::Move);
        input.jump |= action_state.just_pressed(&PlayerAction::Jump);
    }
}

// ============================================================================
// Fixed tick
// ============================================================================

/// Turn, align, walk and jump relative to the player's gravity.
#[allow(clippy::type_complexity)]
fn move_player(
    time: Res<Time>,
    gravity: Option<Res<WorldGravity>>,
    mut query: Query<
        (
            &PlayerController,
            &mut PlayerInput,
            &BodyGravity,
            &Grounded,
            &mut Transform,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    let field = field(gravity.as_ref());

    for (controller, mut input, body, grounded, mut transform, mut velocity) in &mut query {
        let locomotion_input = LocomotionInput {
            movement: input.movement,
            jump: input.jump,
        };
        let step = step_locomotion(
            &controller.params(),
            &locomotion_input,
            transform.rotation,
            body.up(field),
            grounded.0,
            dt,
        );

        transform.rotation = step.rotation;
        transform.translation += step.position_delta;
        if let Some(impulse) = step.jump_impulse {
            velocity.0 += impulse;
            tracing::debug!("Jump with impulse {impulse}");
        }
        // One press, one jump, even if several ticks run this frame.
        input.jump = false;
    }
}

// ============================================================================
// Per frame
// ============================================================================

/// Sphere overlap just below the player's feet, along its gravity.
fn probe_ground(
    spatial_query: SpatialQuery,
    gravity: Option<Res<WorldGravity>>,
    mut query: Query<
        (
            Entity,
            &PlayerController,
            &BodyGravity,
            &Transform,
            &mut Grounded,
        ),
        With<Player>,
    >,
) {
    let field = field(gravity.as_ref());

    for (entity, controller, body, transform, mut grounded) in &mut query {
        let center = ground_probe_center(
            transform.translation,
            body.direction(field),
            controller.half_extent,
        );
        let filter = SpatialQueryFilter::from_mask(controller.ground_layers())
            .with_excluded_entities([entity]);
        let hits = spatial_query.shape_intersections(
            &Collider::sphere(controller.ground_probe_radius),
            center,
            Quat::IDENTITY,
            &filter,
        );

        let is_grounded = !hits.is_empty();
        if is_grounded != grounded.0 {
            tracing::debug!("Player grounded: {is_grounded}");
            grounded.0 = is_grounded;
        }
    }
}

/// Rotate world gravity a quarter turn on demand.
fn rotate_gravity_on_input(
    action_query: Query<&ActionState<PlayerAction>, With<Player>>,
    mut gravity: ResMut<WorldGravity>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&PlayerAction::RotateGravity) {
        gravity.rotate_around_axis(GRAVITY_ROTATE_AXIS, GRAVITY_ROTATE_DEGREES);
        tracing::info!("Rotating gravity toward {}", gravity.target());
    }
}

/// Layers that count as ground in the demo level.
pub fn default_ground_layers() -> LayerMask {
    LayerMask::from([
        GameLayer::Ground,
        GameLayer::Carryable,
        GameLayer::Interactable,
    ])
}
