//! Gravity-shifting puzzle demo using Bevy and Avian.
//!
//! The player walks on any surface of a closed room, rotating world gravity
//! at will or through trigger zones, and carries seeds to a sapling to unlock
//! a telescope and finally a cabinet.

mod camera;
mod carry;
mod constants;
mod focus;
mod input;
mod launch_params;
mod physics;
mod player;
mod puzzle;
mod scene;
mod ui;

use bevy::prelude::*;
use camera::CameraPlugin;
use carry::CarryPlugin;
use focus::FocusPlugin;
use input::InputPlugin;
use physics::PhysicsIntegrationPlugin;
use player::PlayerPlugin;
use puzzle::PuzzlePlugin;
use scene::ScenePlugin;
use ui::DebugUiPlugin;

/// Plugin for the main application.
///
/// Expects [`launch_params::LaunchParams`] to be inserted first; the physics
/// and UI plugins read it while building.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            InputPlugin,
            PhysicsIntegrationPlugin,
            PlayerPlugin,
            CarryPlugin,
            FocusPlugin,
            PuzzlePlugin,
            CameraPlugin,
            DebugUiPlugin,
            ScenePlugin,
        ));
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    tracing::info!("Launch parameters: {params:?}");

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "protostar".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params).add_plugins(AppPlugin).run();
}
