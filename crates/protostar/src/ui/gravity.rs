//! Gravity tab: field state, player status and field controls.

use bevy::ecs::system::SystemParam;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy_egui::egui;

use super::format_vec3;
use crate::{
    carry::Carrier,
    constants::{GRAVITY_ROTATE_AXIS, GRAVITY_ROTATE_DEGREES},
    focus::Focused,
    physics::{BodyGravity, WorldGravity, is_physics_debug_enabled, toggle_physics_debug},
    player::{Grounded, Player},
};

/// Resources for the gravity tab.
#[derive(SystemParam)]
pub(super) struct GravityParams<'w, 's> {
    pub gravity: ResMut<'w, WorldGravity>,
    pub config_store: ResMut<'w, GizmoConfigStore>,
    pub focused: Res<'w, Focused>,
    pub player_query: Query<
        'w,
        's,
        (
            &'static Transform,
            &'static BodyGravity,
            &'static Grounded,
            Option<&'static Carrier>,
        ),
        With<Player>,
    >,
}

/// Render the gravity tab content.
pub(super) fn render_gravity_tab(ui: &mut egui::Ui, params: &mut GravityParams) {
    let field = &params.gravity.0;
    ui.label(format!("Direction: {}", format_vec3(field.direction())));
    ui.label(format!("Target: {}", format_vec3(field.target())));
    ui.label(format!("Strength: {:.2} m/s²", field.strength()));
    ui.add(egui::ProgressBar::new(field.progress()).text(if field.is_settled() {
        "Settled"
    } else {
        "Transitioning"
    }));

    let mut duration = field.transition_duration();
    if ui
        .add(egui::Slider::new(&mut duration, 0.0..=5.0).text("Transition (s)"))
        .changed()
    {
        params.gravity.set_transition_duration(duration);
    }

    if ui.button("Rotate gravity (G)").clicked() {
        params
            .gravity
            .rotate_around_axis(GRAVITY_ROTATE_AXIS, GRAVITY_ROTATE_DEGREES);
    }

    ui.separator();

    if let Ok((transform, body, grounded, carrier)) = params.player_query.single() {
        let field = Some(&params.gravity.0);
        ui.label(format!("Player: {}", format_vec3(transform.translation)));
        ui.label(format!("Player down: {}", format_vec3(body.direction(field))));
        ui.label(if grounded.0 {
            "Status: Grounded"
        } else {
            "Status: Airborne"
        });
        let held = carrier.and_then(|carrier| carrier.carrying);
        ui.label(match held {
            Some(entity) => format!("Carrying: {entity}"),
            None => "Carrying: nothing".to_string(),
        });
        ui.label(match params.focused.0 {
            Some(entity) => format!("Focused: {entity}"),
            None => "Focused: nothing".to_string(),
        });
    }

    ui.separator();

    let mut physics_debug = is_physics_debug_enabled(&params.config_store);
    if ui.checkbox(&mut physics_debug, "Show colliders").changed() {
        toggle_physics_debug(&mut params.config_store);
    }
}
