//! Step climbing.
//!
//! When the horizontal part of a move is blocked by something low, the
//! actor is lifted by the step height, moved forward and set back down. The
//! step only counts if it lands on walkable floor.

use glam::Vec3;

use crate::collision::{BodyId, CapsuleExtents, CollisionQuery};

use super::config::SolverConfig;
use super::slope::classify;

/// Extra forward distance past the edge when stepping (meters).
const STEP_EDGE_MARGIN: f32 = 0.01;

/// Minimum horizontal progress for a step to count (meters).
const MIN_STEP_PROGRESS: f32 = 0.01;

/// Result of a successful step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepUp {
    /// Where the actor stands after the step.
    pub position: Vec3,
    /// Share of the remaining time the step used, in `[0, 1]`.
    pub time_fraction: f32,
}

/// Forward distance needed for the capsule's rounded bottom to rest on a
/// step top at a walkable angle instead of hanging on the edge.
fn edge_clearance(extents: &CapsuleExtents, max_slope_angle: f32) -> f32 {
    let sin_max = max_slope_angle.to_radians().sin().clamp(0.0, 1.0);
    extents.radius * (1.0 - sin_max) + STEP_EDGE_MARGIN
}

/// Try to climb over an obstruction in front of the actor.
///
/// Performs three sweeps: up by `step_height`, forward along the horizontal
/// velocity, then down by `step_height` plus the ground probe distance.
/// Returns `None` when any leg is blocked or the landing is not floor, in
/// which case the caller should slide instead.
pub fn try_step_up<Q: CollisionQuery + ?Sized>(
    world: &Q,
    extents: &CapsuleExtents,
    position: Vec3,
    horizontal_velocity: Vec3,
    time_remaining: f32,
    config: &SolverConfig,
    exclude: Option<BodyId>,
) -> Option<StepUp> {
    let horizontal = Vec3::new(horizontal_velocity.x, 0.0, horizontal_velocity.z);
    let requested = horizontal.length() * time_remaining;
    if config.step_height <= 0.0 || requested <= f32::EPSILON {
        return None;
    }
    let direction = horizontal.normalize_or_zero();

    // Step up
    let raised = position + Vec3::Y * config.step_height;
    if world.sweep(extents, position, raised, exclude).is_some() {
        return None;
    }

    // Step forward
    let forward = requested.max(edge_clearance(extents, config.max_slope_angle));
    let forward_target = raised + direction * forward;
    let advanced = match world.sweep(extents, raised, forward_target, exclude) {
        Some(contact) => contact.position,
        None => forward_target,
    };
    let progress = Vec3::new(advanced.x - raised.x, 0.0, advanced.z - raised.z).length();
    if progress <= MIN_STEP_PROGRESS {
        return None;
    }

    // Step down
    let lowered = advanced - Vec3::Y * (config.step_height + config.ground_probe_distance);
    let landing = world.sweep(extents, advanced, lowered, exclude)?;
    if !classify(landing.normal, config.max_slope_angle).is_walkable() {
        return None;
    }

    Some(StepUp {
        position: landing.position,
        time_fraction: (progress / requested).min(1.0),
    })
}
