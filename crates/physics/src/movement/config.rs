//! Movement solver configuration.
//!
//! All solver parameters are grouped here for easy tuning.
//! Values use metric units (meters, seconds) and degrees for angles.

use serde::{Deserialize, Serialize};

/// Configuration for the actor movement solver.
///
/// Missing fields fall back to [`SolverConfig::default`] when deserializing,
/// so a config file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    // ========================================================================
    // Gravity
    // ========================================================================
    /// Gravity acceleration (meters/second²).
    pub gravity: f32,

    // ========================================================================
    // Slopes and Steps
    // ========================================================================
    /// Steepest surface angle from world-up still treated as floor (degrees).
    ///
    /// The threshold is inclusive: a surface at exactly this angle is floor.
    pub max_slope_angle: f32,

    /// Tallest discontinuity climbed automatically (meters).
    pub step_height: f32,

    /// How far below the feet a surface still counts as ground contact (meters).
    pub ground_probe_distance: f32,

    /// Snap grounded actors down onto lower floors within `step_height`.
    pub snap_to_ground: bool,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Maximum sweep iterations per substep.
    pub max_iterations: usize,

    /// Overbounce factor for velocity clipping (prevents sticking).
    pub overbounce: f32,

    // ========================================================================
    // Time
    // ========================================================================
    /// Longest time resolved in one pass; longer requests are substepped (seconds).
    pub max_substep: f32,

    /// Upper bound on substeps for a single request.
    pub max_substeps: u32,

    // ========================================================================
    // Swimming
    // ========================================================================
    /// Depth of the actor's center below the water surface when floating (meters).
    pub swim_depth: f32,

    /// Vertical speed per meter of depth error toward the float depth (1/second).
    pub buoyancy_stiffness: f32,

    /// Cap on buoyancy-driven vertical speed (meters/second).
    pub max_buoyancy_speed: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            // Gravity
            gravity: 9.81,

            // Slopes and steps
            max_slope_angle: 45.0,
            step_height: 0.4,        // Standard stair riser plus margin
            ground_probe_distance: 0.05,
            snap_to_ground: true,

            // Collision
            max_iterations: 8,
            overbounce: 1.001,

            // Time
            max_substep: 1.0 / 30.0,
            max_substeps: 8,

            // Swimming
            swim_depth: 0.6,
            buoyancy_stiffness: 4.0,
            max_buoyancy_speed: 2.0,
        }
    }
}
