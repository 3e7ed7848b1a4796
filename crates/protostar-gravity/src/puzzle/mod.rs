//! Puzzle chain of the demo level.
//!
//! Seeds grow the sapling, the grown sapling unlocks the telescope, and
//! aligning the telescope opens the cabinet.

mod cabinet;
mod sapling;
mod telescope;

pub use cabinet::{Cabinet, CabinetInteraction};
pub use sapling::{DEFAULT_REQUIRED_SEEDS, SaplingInteraction, SaplingPuzzle};
pub use telescope::{Telescope, TelescopeConfig, TelescopeInteraction};

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec2, Vec3};

    use super::*;

    #[test]
    fn test_full_chain() {
        let mut sapling = SaplingPuzzle::new(2);
        let mut telescope = Telescope::default();
        let mut cabinet = Cabinet::default();

        assert_eq!(telescope.interact(sapling.is_grown()), TelescopeInteraction::Locked);

        sapling.seed_entered(1u8);
        sapling.seed_entered(2u8);
        assert!(matches!(sapling.interact(), SaplingInteraction::Grown { .. }));

        assert_eq!(telescope.interact(sapling.is_grown()), TelescopeInteraction::Entered);
        // Target sits up and to the right; aim 90 degrees right first.
        let to_target = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..90 {
            telescope.aim(Vec2::new(1.0, 0.0), 1.0 / 50.0);
            let light = telescope.update_alignment(telescope.aim_direction(Quat::IDENTITY), to_target);
            cabinet.observe_light(light);
        }
        assert!(telescope.is_light_on());
        assert!(cabinet.is_open());
        assert_eq!(cabinet.interact(), CabinetInteraction::EndDemo);
    }
}
