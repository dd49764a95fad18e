//! Actor movement state and per-tick requests.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CapsuleExtents;

/// Environment the actor is moving through this tick.
///
/// Supplied by a world query outside the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum EnvironmentMode {
    /// On land: gravity, ground contact and step climbing.
    #[default]
    Normal,
    /// In water: buoyancy pulls toward a float depth, no step climbing.
    Submerged {
        /// Height of the water surface (meters).
        water_level: f32,
    },
    /// Levitating: no gravity, vertical motion follows the request.
    Flying,
}

impl EnvironmentMode {
    /// Whether small obstructions can be stepped over.
    #[inline]
    pub fn can_step(self) -> bool {
        !matches!(self, Self::Submerged { .. })
    }
}

/// Movement phase an actor ended its last tick in.
///
/// Recomputed every tick from the environment mode and contacts; it is never
/// an input to the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPhase {
    /// Airborne, vertical speed accumulating.
    #[default]
    Falling,
    /// Standing on walkable floor.
    Grounded,
    /// In water under buoyancy rules.
    Swimming,
    /// Levitating without gravity.
    Flying,
}

/// Persistent movement state of one actor.
///
/// Owned by the actor and threaded through every solve:
/// `(state, request) -> state'`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Center of the capsule in world space.
    pub position: Vec3,

    /// Collision capsule, fixed for the duration of a solve.
    pub extents: CapsuleExtents,

    /// Solver-owned vertical speed (meters/second, positive = up).
    pub vertical_speed: f32,

    /// Whether the actor is standing on walkable floor.
    pub grounded: bool,

    /// Rotation about the vertical axis (radians).
    pub yaw: f32,

    /// Phase the actor ended its last tick in.
    pub phase: MovementPhase,
}

impl ActorState {
    /// Create a new, airborne state at the given position.
    pub fn new(position: Vec3, extents: CapsuleExtents) -> Self {
        Self {
            position,
            extents,
            vertical_speed: 0.0,
            grounded: false,
            yaw: 0.0,
            phase: MovementPhase::Falling,
        }
    }
}

/// What an actor asks the solver for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    /// Desired displacement, already scaled by speed and elapsed time.
    ///
    /// The vertical component is intent only: a jump when grounded, a swim
    /// stroke in water, or the climb rate when flying.
    pub displacement: Vec3,

    /// Elapsed time in seconds.
    pub elapsed: f32,

    /// Rotation about the vertical axis (radians).
    pub yaw: f32,

    /// Environment mode for this tick.
    pub environment: EnvironmentMode,
}

impl MovementRequest {
    /// Create a request in the normal environment.
    pub fn new(displacement: Vec3, elapsed: f32) -> Self {
        Self {
            displacement,
            elapsed,
            yaw: 0.0,
            environment: EnvironmentMode::Normal,
        }
    }

    /// Set the environment mode.
    pub fn with_environment(mut self, environment: EnvironmentMode) -> Self {
        self.environment = environment;
        self
    }

    /// Set the yaw.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Whether the request can be resolved at all.
    ///
    /// Non-positive or non-finite time and non-finite displacement make the
    /// solve a no-op.
    pub fn is_valid(&self) -> bool {
        self.elapsed.is_finite() && self.elapsed > 0.0 && self.displacement.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validity() {
        assert!(MovementRequest::new(Vec3::X, 0.016).is_valid());
        assert!(!MovementRequest::new(Vec3::X, 0.0).is_valid());
        assert!(!MovementRequest::new(Vec3::X, -1.0).is_valid());
        assert!(!MovementRequest::new(Vec3::X, f32::NAN).is_valid());
        assert!(!MovementRequest::new(Vec3::new(f32::NAN, 0.0, 0.0), 0.016).is_valid());
    }

    #[test]
    fn test_environment_rules() {
        assert!(EnvironmentMode::Normal.can_step());
        assert!(!EnvironmentMode::Submerged { water_level: 0.0 }.can_step());
        assert!(EnvironmentMode::Flying.can_step());
    }}
