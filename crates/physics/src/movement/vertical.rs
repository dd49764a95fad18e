//! Vertical speed integration.
//!
//! Gravity, jumping, buoyancy and flying all reduce to one number: the
//! vertical speed the slide move starts with.

use super::config::SolverConfig;
use super::state::EnvironmentMode;

/// Vertical speed for one substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalIntegration {
    /// Vertical speed to move with (meters/second, positive = up).
    pub vertical_speed: f32,
    /// Whether the actor still counts as standing on floor.
    pub grounded: bool,
}

/// Integrate vertical speed over one substep.
///
/// # Arguments
///
/// * `config` - Solver configuration
/// * `environment` - Environment mode for this tick
/// * `vertical_speed` - Vertical speed carried over from the last substep
/// * `on_floor` - Whether the ground probe found walkable floor
/// * `center_height` - Height of the capsule center
/// * `vertical_intent` - Vertical part of the requested displacement for this substep
/// * `dt` - Substep length in seconds, must be positive
pub fn integrate_vertical(
    config: &SolverConfig,
    environment: EnvironmentMode,
    vertical_speed: f32,
    on_floor: bool,
    center_height: f32,
    vertical_intent: f32,
    dt: f32,
) -> VerticalIntegration {
    let intent_speed = vertical_intent / dt;

    match environment {
        EnvironmentMode::Flying => VerticalIntegration {
            vertical_speed: intent_speed,
            grounded: false,
        },
        EnvironmentMode::Submerged { water_level } => {
            let target = water_level - config.swim_depth;
            let buoyancy = ((target - center_height) * config.buoyancy_stiffness)
                .clamp(-config.max_buoyancy_speed, config.max_buoyancy_speed);
            VerticalIntegration {
                vertical_speed: buoyancy + intent_speed,
                grounded: false,
            }
        }
        EnvironmentMode::Normal if on_floor && vertical_intent > 0.0 => VerticalIntegration {
            vertical_speed: intent_speed,
            grounded: false,
        },
        EnvironmentMode::Normal if on_floor => VerticalIntegration {
            vertical_speed: 0.0,
            grounded: true,
        },
        EnvironmentMode::Normal => VerticalIntegration {
            vertical_speed: vertical_speed - config.gravity * dt,
            grounded: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_gravity_accumulates_when_airborne() {
        let config = SolverConfig::default();
        let mut speed = 0.0;
        for _ in 0..60 {
            speed = integrate_vertical(&config, EnvironmentMode::Normal, speed, false, 5.0, 0.0, DT)
                .vertical_speed;
        }
        assert!((speed + config.gravity).abs() < 1e-3, "speed={speed}");
    }

    #[test]
    fn test_grounded_speed_is_zero() {
        let config = SolverConfig::default();
        let result = integrate_vertical(&config, EnvironmentMode::Normal, -7.0, true, 0.9, 0.0, DT);
        assert_eq!(result.vertical_speed, 0.0);
        assert!(result.grounded);
    }

    #[test]
    fn test_jump_from_floor() {
        let config = SolverConfig::default();
        let result = integrate_vertical(&config, EnvironmentMode::Normal, 0.0, true, 0.9, 0.1, DT);
        assert!(!result.grounded);
        assert!((result.vertical_speed - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_upward_intent_ignored_in_air() {
        let config = SolverConfig::default();
        let result = integrate_vertical(&config, EnvironmentMode::Normal, 0.0, false, 5.0, 0.1, DT);
        assert!(!result.grounded);
        assert!(result.vertical_speed < 0.0);
    }

    #[test]
    fn test_flying_follows_intent() {
        let config = SolverConfig::default();
        let hover = integrate_vertical(&config, EnvironmentMode::Flying, -3.0, false, 5.0, 0.0, DT);
        assert_eq!(hover.vertical_speed, 0.0);

        let climb = integrate_vertical(&config, EnvironmentMode::Flying, 0.0, false, 5.0, 0.05, DT);
        assert!((climb.vertical_speed - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_buoyancy_pulls_toward_float_depth() {
        let config = SolverConfig::default();
        let water = EnvironmentMode::Submerged { water_level: 2.0 };
        let float_height = 2.0 - config.swim_depth;

        let deep = integrate_vertical(&config, water, 0.0, false, float_height - 1.0, 0.0, DT);
        assert!(deep.vertical_speed > 0.0);
        assert!(deep.vertical_speed <= config.max_buoyancy_speed);

        let high = integrate_vertical(&config, water, 0.0, false, float_height + 0.2, 0.0, DT);
        assert!(high.vertical_speed < 0.0);

        let resting = integrate_vertical(&config, water, 0.0, false, float_height, 0.0, DT);
        assert!(resting.vertical_speed.abs() < 1e-4);
    }
}
