//! Third-person camera that keeps the player's gravity as its up axis.
//!
//! While a telescope is in use the camera moves to the telescope head and
//! looks along its aim instead.

use bevy::prelude::*;

use crate::{
    physics::{BodyGravity, WorldGravity, gravity::field},
    player::Player,
    puzzle::TelescopeMount,
};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FollowCamera>()
            .add_systems(Update, follow_player_camera);
    }
}

/// Camera placement relative to the player.
#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct FollowCamera {
    /// Camera position offset in player-local space (x=right, y=up, z=back).
    pub camera_offset: Vec3,
    /// Look-at point above the player's centre, along its up axis.
    pub look_height: f32,
    /// Exponential smoothing rate (1/s).
    pub smoothing: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            camera_offset: Vec3::new(0.0, 2.5, 6.0),
            look_height: 1.0,
            smoothing: 8.0,
        }
    }
}

#[allow(clippy::type_complexity)]
fn follow_player_camera(
    time: Res<Time>,
    gravity: Option<Res<WorldGravity>>,
    player: Query<(&Transform, &BodyGravity), (With<Player>, Without<FollowCamera>)>,
    mounts: Query<(&TelescopeMount, &GlobalTransform)>,
    heads: Query<&GlobalTransform, Without<FollowCamera>>,
    mut camera: Query<(&FollowCamera, &mut Transform)>,
) {
    let Ok((follow, mut camera_transform)) = camera.single_mut() else {
        return;
    };

    // Telescope view.
    if let Some((mount, mount_transform)) = mounts
        .iter()
        .find(|(mount, _)| mount.telescope.is_viewing())
    {
        if let Ok(head) = heads.get(mount.head) {
            camera_transform.translation = head.translation();
        }
        camera_transform.rotation = mount_transform.rotation() * mount.telescope.local_rotation();
        return;
    }

    let Ok((player_transform, body)) = player.single() else {
        return;
    };
    let up = body.up(field(gravity.as_ref()));

    let desired = player_transform.translation + player_transform.rotation * follow.camera_offset;
    let t = 1.0 - (-follow.smoothing * time.delta_secs()).exp();
    camera_transform.translation = camera_transform.translation.lerp(desired, t);

    let look_target = player_transform.translation + up * follow.look_height;
    let look_direction = look_target - camera_transform.translation;
    if look_direction.length_squared() > f32::EPSILON {
        let target_rotation = Transform::default().looking_to(look_direction, up).rotation;
        camera_transform.rotation = camera_transform.rotation.slerp(target_rotation, t);
    }
}
