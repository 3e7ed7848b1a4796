//! Puzzle tab: progress through the seed, telescope and cabinet chain.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::egui;

use crate::puzzle::{CabinetDoor, Sapling, TelescopeMount};

#[derive(SystemParam)]
pub(super) struct PuzzleParams<'w, 's> {
    pub saplings: Query<'w, 's, &'static Sapling>,
    pub telescopes: Query<'w, 's, &'static TelescopeMount>,
    pub cabinets: Query<'w, 's, &'static CabinetDoor>,
}

pub(super) fn render_puzzle_tab(ui: &mut egui::Ui, params: &PuzzleParams) {
    for sapling in &params.saplings {
        let puzzle = &sapling.puzzle;
        if puzzle.is_grown() {
            ui.label("Sapling: grown");
        } else {
            ui.label(format!(
                "Sapling: {}/{} seeds",
                puzzle.seed_count(),
                puzzle.required_seeds()
            ));
        }
    }

    for mount in &params.telescopes {
        let telescope = &mount.telescope;
        ui.label(format!(
            "Telescope: yaw {:.1}°, pitch {:.1}°{}",
            telescope.yaw(),
            telescope.pitch(),
            if telescope.is_viewing() { " (viewing)" } else { "" }
        ));
        ui.label(if telescope.is_light_on() {
            "Light: on"
        } else {
            "Light: off"
        });
    }

    for door in &params.cabinets {
        ui.label(if door.cabinet.is_open() {
            "Cabinet: open"
        } else {
            "Cabinet: closed"
        });
    }
}
