//! Input action definitions.
//!
//! Gameplay actions are declared with `leafwing-input-manager` so bindings
//! stay in one place. A single system mutes keyboard gameplay actions while
//! egui has keyboard focus.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

// ============================================================================
// Action enum
// ============================================================================

/// Actions for the player character.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum PlayerAction {
    /// WASD: turn on X, walk on Y.
    #[actionlike(DualAxis)]
    Move,
    /// Jump (Space).
    Jump,
    /// Rotate world gravity a quarter turn (G).
    RotateGravity,
    /// Pick up or put down an object (E).
    Pickup,
    /// Use whatever is in front of the player (F).
    Interact,
    /// Telescope aim (arrow keys).
    #[actionlike(DualAxis)]
    Aim,
    /// Toggle the debug overlay (F3).
    ToggleDebug,
}

/// Create the default input map for player actions.
pub fn default_player_input_map() -> InputMap<PlayerAction> {
    InputMap::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::RotateGravity, KeyCode::KeyG)
        .with(PlayerAction::Pickup, KeyCode::KeyE)
        .with(PlayerAction::Interact, KeyCode::KeyF)
        .with_dual_axis(PlayerAction::Aim, VirtualDPad::arrow_keys())
        .with(PlayerAction::ToggleDebug, KeyCode::F3)
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the action type and the input focus system.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<PlayerAction>::default())
            .add_systems(
                PreUpdate,
                manage_input_focus.after(InputManagerSystem::Update),
            );
    }
}

/// Everything except the debug toggle, muted while egui owns the keyboard.
const GAMEPLAY_ACTIONS: &[PlayerAction] = &[
    PlayerAction::Move,
    PlayerAction::Jump,
    PlayerAction::RotateGravity,
    PlayerAction::Pickup,
    PlayerAction::Interact,
    PlayerAction::Aim,
];

fn manage_input_focus(
    mut action_query: Query<&mut ActionState<PlayerAction>>,
    mut contexts: EguiContexts,
) {
    let egui_wants_kb = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_keyboard_input());

    for mut action_state in &mut action_query {
        action_state.enable_action(&PlayerAction::ToggleDebug);
        for action in GAMEPLAY_ACTIONS {
            if egui_wants_kb {
                action_state.disable_action(action);
            } else {
                action_state.enable_action(action);
            }
        }
    }
}
