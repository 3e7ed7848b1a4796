//! Debug overlay for the gravity field, the player and the puzzle chain.
//!
//! Toggled with F3. While visible, the world gravity arrow is drawn too.

mod gravity;
mod puzzle;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use leafwing_input_manager::prelude::*;

use crate::{input::PlayerAction, launch_params::LaunchParams};

/// Resource controlling whether the debug overlay is visible.
#[derive(Resource, Default)]
pub struct DebugVisible(pub bool);

/// Run condition: the debug overlay is shown.
pub fn debug_visible(visible: Option<Res<DebugVisible>>) -> bool {
    visible.is_some_and(|visible| visible.0)
}

/// Plugin for the debug overlay.
pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        let show_on_start = app
            .world()
            .get_resource::<LaunchParams>()
            .is_some_and(|params| params.debug);

        app.add_plugins(EguiPlugin::default())
            .insert_resource(DebugVisible(show_on_start))
            .init_resource::<DebugUiState>()
            .add_systems(Update, toggle_debug_visible)
            .add_systems(
                EguiPrimaryContextPass,
                debug_ui_system.run_if(debug_visible),
            );
    }
}

/// Which tab is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DebugTab {
    #[default]
    Gravity,
    Puzzle,
}

#[derive(Resource, Default)]
struct DebugUiState {
    selected_tab: DebugTab,
}

/// Toggle overlay visibility with F3.
fn toggle_debug_visible(
    action_query: Query<&ActionState<PlayerAction>>,
    mut visible: ResMut<DebugVisible>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&PlayerAction::ToggleDebug) {
        visible.0 = !visible.0;
    }
}

fn debug_ui_system(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<DebugUiState>,
    mut gravity_params: gravity::GravityParams,
    puzzle_params: puzzle::PuzzleParams,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (tab, label) in [(DebugTab::Gravity, "Gravity"), (DebugTab::Puzzle, "Puzzle")] {
                    if ui
                        .selectable_label(ui_state.selected_tab == tab, label)
                        .clicked()
                    {
                        ui_state.selected_tab = tab;
                    }
                }
            });
            ui.separator();

            match ui_state.selected_tab {
                DebugTab::Gravity => gravity::render_gravity_tab(ui, &mut gravity_params),
                DebugTab::Puzzle => puzzle::render_puzzle_tab(ui, &puzzle_params),
            }
        });

    Ok(())
}

/// Format a direction with two decimals per component.
fn format_vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}
