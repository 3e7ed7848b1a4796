//! Launch parameter parsing for the game.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;
use protostar_gravity::{
    GravityFieldConfig, LocomotionParams,
    direction::DEFAULT_DOWN,
    field::{DEFAULT_STRENGTH, DEFAULT_TRANSITION_DURATION},
};

/// Launch parameters for the game.
#[derive(Resource, Debug, Clone)]
pub struct LaunchParams {
    /// Gravity acceleration magnitude (m/s^2).
    pub gravity_strength: f32,
    /// Seconds a gravity direction change takes.
    pub transition_duration: f32,
    /// Initial gravity direction.
    pub start_direction: Vec3,
    /// Player walk speed (m/s).
    pub move_speed: f32,
    /// Player turn speed (degrees/s).
    pub turn_speed: f32,
    /// Player jump impulse (m/s).
    pub jump_force: f32,
    /// Show the debug overlay on startup.
    pub debug: bool,
}

impl Default for LaunchParams {
    fn default() -> Self {
        let locomotion = LocomotionParams::default();
        Self {
            gravity_strength: DEFAULT_STRENGTH,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            start_direction: DEFAULT_DOWN,
            move_speed: locomotion.move_speed,
            turn_speed: locomotion.turn_speed,
            jump_force: locomotion.jump_force,
            debug: false,
        }
    }
}

impl LaunchParams {
    pub fn field_config(&self) -> GravityFieldConfig {
        GravityFieldConfig {
            direction: self.start_direction,
            strength: self.gravity_strength,
            transition_duration: self.transition_duration,
        }
    }

    pub fn locomotion_params(&self) -> LocomotionParams {
        LocomotionParams {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
            jump_force: self.jump_force,
            ..Default::default()
        }
    }
}

/// Parse an `x,y,z` triple.
#[cfg_attr(target_family = "wasm", allow(dead_code))]
fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid component '{part}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [x, y, z] = parts[..] else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    Ok(Vec3::new(x, y, z))
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Gravity-shifting puzzle demo")]
    struct CliArgs {
        /// Gravity acceleration magnitude (m/s^2).
        #[arg(long, default_value_t = DEFAULT_STRENGTH)]
        gravity_strength: f32,

        /// Seconds a gravity direction change takes.
        #[arg(long, default_value_t = DEFAULT_TRANSITION_DURATION)]
        transition_duration: f32,

        /// Initial gravity direction (format: x,y,z).
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        start_direction: Option<Vec3>,

        /// Player walk speed (m/s).
        #[arg(long)]
        move_speed: Option<f32>,

        /// Player turn speed (degrees/s).
        #[arg(long)]
        turn_speed: Option<f32>,

        /// Player jump impulse (m/s).
        #[arg(long)]
        jump_force: Option<f32>,

        /// Show the debug overlay on startup.
        #[arg(long)]
        debug: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        let defaults = LaunchParams::default();
        LaunchParams {
            gravity_strength: args.gravity_strength,
            transition_duration: args.transition_duration,
            start_direction: args.start_direction.unwrap_or(defaults.start_direction),
            move_speed: args.move_speed.unwrap_or(defaults.move_speed),
            turn_speed: args.turn_speed.unwrap_or(defaults.turn_speed),
            jump_force: args.jump_force.unwrap_or(defaults.jump_force),
            debug: args.debug,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,0,-1"), Ok(Vec3::new(1.0, 0.0, -1.0)));
        assert_eq!(parse_vec3(" 0.5 , 2 ,3 "), Ok(Vec3::new(0.5, 2.0, 3.0)));
    }

    #[test]
    fn test_parse_vec3_rejects_bad_input() {
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,3,4").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn test_defaults_match_core() {
        let params = LaunchParams::default();
        let config = params.field_config();
        assert_eq!(config.direction, Vec3::NEG_Y);
        assert_eq!(config.strength, DEFAULT_STRENGTH);
        assert_eq!(params.locomotion_params().move_speed, LocomotionParams::default().move_speed);
    }
}
