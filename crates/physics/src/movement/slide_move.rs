//! Slide move algorithm for collision response.
//!
//! This implements the classic collide-and-slide stepping loop that lets an
//! actor move smoothly along walls, around corners and up small steps.

use glam::Vec3;

use crate::collision::{BodyId, CapsuleExtents, CollisionQuery};

use super::config::SolverConfig;
use super::slope::classify;
use super::step::try_step_up;

/// Maximum number of collision planes to track during slide move.
const MAX_CLIP_PLANES: usize = 5;

/// Remaining time below which the loop is done (seconds).
const TIME_EPSILON: f32 = 1.0e-6;

/// Squared speed below which the actor is considered stopped.
const MIN_SPEED_SQUARED: f32 = 1.0e-8;

/// Tolerance for "velocity drives into a plane".
const PLANE_EPSILON: f32 = 1.0e-3;

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface and
/// optionally adds a small "overbounce" to prevent sticking.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    // Calculate how much velocity is going into the surface
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Re-project a velocity onto a direction.
///
/// Used to slide along the crease between two planes. A zero direction
/// yields zero velocity.
pub fn project_velocity(velocity: Vec3, direction: Vec3) -> Vec3 {
    let direction = direction.normalize_or_zero();
    direction * velocity.dot(direction)
}

/// Inputs shared by every iteration of a slide move.
#[derive(Debug, Clone, Copy)]
pub struct SlideParams<'a> {
    /// Solver configuration.
    pub config: &'a SolverConfig,
    /// The moving capsule.
    pub extents: CapsuleExtents,
    /// The actor's own body, never collided with.
    pub exclude: Option<BodyId>,
    /// Whether obstructions may be stepped over.
    pub allow_step: bool,
}

/// What happened during a slide move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideOutcome {
    /// Stopped at the iteration cap with time left.
    pub exhausted: bool,
    /// Number of sweeps performed.
    pub iterations: usize,
}

/// Perform a slide move through the collision world.
///
/// Each iteration:
/// 1. Sweeps the capsule along the velocity for the remaining time
/// 2. Advances to the contact and spends the matching share of time
/// 3. On floor, drops falling speed and follows the floor plane
/// 4. On walls and steep slopes, tries to step up, otherwise clips the
///    velocity to slide along every plane hit so far
///
/// The loop is bounded by `max_iterations`; running out is a truncation that
/// keeps the best position found, not an error.
///
/// # Arguments
///
/// * `world` - The collision world to sweep through
/// * `position` - Current capsule center (will be updated)
/// * `velocity` - Current velocity (will be updated)
/// * `delta_time` - Time budget in seconds
/// * `params` - Shape, config and stepping rules
pub fn slide_move<Q: CollisionQuery + ?Sized>(
    world: &Q,
    position: &mut Vec3,
    velocity: &mut Vec3,
    delta_time: f32,
    params: &SlideParams<'_>,
) -> SlideOutcome {
    let config = params.config;
    let mut outcome = SlideOutcome::default();
    let mut time_remaining = delta_time;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    while outcome.iterations < config.max_iterations {
        if time_remaining <= TIME_EPSILON || velocity.length_squared() < MIN_SPEED_SQUARED {
            return outcome;
        }
        outcome.iterations += 1;

        let target = *position + *velocity * time_remaining;
        let Some(contact) = world.sweep(&params.extents, *position, target, params.exclude) else {
            *position = target;
            return outcome;
        };

        *position = contact.position;
        time_remaining -= time_remaining * contact.fraction;

        let normal = contact.normal;
        let class = classify(normal, config.max_slope_angle);

        if class.is_walkable() {
            if velocity.y < 0.0 {
                velocity.y = 0.0;
            }
            *velocity = follow_floor(*velocity, normal, config.overbounce);
            continue;
        }

        if params.allow_step && can_attempt_step(params, *position, contact.point, *velocity) {
            let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
            if let Some(step) = try_step_up(
                world,
                &params.extents,
                *position,
                horizontal,
                time_remaining,
                config,
                params.exclude,
            ) {
                log::trace!("stepped up {:.3}m", step.position.y - position.y);
                *position = step.position;
                time_remaining -= time_remaining * step.time_fraction;
                velocity.y = velocity.y.max(0.0);
                continue;
            }
        }

        let normal = steep_clip_normal(*velocity, normal, config.overbounce);

        // Remember the plane unless we've already seen it
        let known = planes[..num_planes].iter().any(|p| p.dot(normal) > 0.99);
        if !known && num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        match clip_against_planes(*velocity, normal, &planes[..num_planes], config.overbounce) {
            Some(clipped) => *velocity = clipped,
            None => {
                *velocity = Vec3::ZERO;
                return outcome;
            }
        }
    }

    outcome.exhausted =
        time_remaining > TIME_EPSILON && velocity.length_squared() >= MIN_SPEED_SQUARED;

    outcome
}

/// Whether the obstruction is low enough that stepping over it is worth a try.
fn can_attempt_step(params: &SlideParams<'_>, position: Vec3, contact_point: Vec3, velocity: Vec3) -> bool {
    let step_height = params.config.step_height;
    if step_height <= 0.0 || Vec3::new(velocity.x, 0.0, velocity.z).length_squared() < MIN_SPEED_SQUARED {
        return false;
    }
    let obstruction_height = contact_point.y - params.extents.feet_height(position);
    obstruction_height <= step_height
}

/// Redirect a velocity along a walkable floor plane.
///
/// The horizontal speed is preserved, so walking up a ramp neither slows the
/// actor down nor speeds it up.
fn follow_floor(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    if velocity.dot(normal) >= 0.0 {
        return velocity;
    }

    let horizontal_speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
    let clipped = clip_velocity(velocity, normal, overbounce);
    let clipped_speed = Vec3::new(clipped.x, 0.0, clipped.z).length();

    if horizontal_speed > 1.0e-4 && clipped_speed > 1.0e-4 {
        clipped * (horizontal_speed / clipped_speed)
    } else {
        clipped
    }
}

/// Normal to clip against for a surface too steep to stand on.
///
/// A clip that would lift the actor faster than it was already rising is
/// redone against the horizontal part of the normal, so steep slopes and
/// ledge edges block like walls instead of being climbed by sliding.
fn steep_clip_normal(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    if velocity.dot(normal) >= 0.0 {
        return normal;
    }
    let clipped = clip_velocity(velocity, normal, overbounce);
    if clipped.y <= velocity.y.max(0.0) + PLANE_EPSILON {
        return normal;
    }
    Vec3::new(normal.x, 0.0, normal.z).try_normalize().unwrap_or(normal)
}

/// Clip a velocity against the latest plane without driving into earlier ones.
///
/// Returns `None` when no direction is left (an acute corner).
fn clip_against_planes(velocity: Vec3, latest: Vec3, planes: &[Vec3], overbounce: f32) -> Option<Vec3> {
    let clipped = if velocity.dot(latest) < 0.0 {
        clip_velocity(velocity, latest, overbounce)
    } else {
        velocity
    };

    let Some(&other) = planes
        .iter()
        .find(|p| p.dot(latest) < 0.99 && clipped.dot(**p) < -PLANE_EPSILON)
    else {
        return Some(clipped);
    };

    // Slide along the crease of the two planes
    let crease = latest.cross(other);
    let slid = project_velocity(velocity, crease);
    if planes.iter().any(|p| slid.dot(*p) < -PLANE_EPSILON) {
        return None;
    }
    Some(slid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ContentFlags};
    use crate::test_support::PlaneWorld;

    const ACTOR: CapsuleExtents = CapsuleExtents::new(0.4, 0.9);

    fn params(config: &SolverConfig) -> SlideParams<'_> {
        SlideParams {
            config,
            extents: ACTOR,
            exclude: None,
            allow_step: true,
        }
    }

    #[test]
    fn test_clip_velocity_wall() {
        // Moving into a wall on the +X side
        let velocity = Vec3::new(10.0, 0.0, 5.0);
        let wall_normal = Vec3::new(-1.0, 0.0, 0.0);

        let clipped = clip_velocity(velocity, wall_normal, 1.0);

        // X component should be zeroed, Z unchanged
        assert!(clipped.x.abs() < 0.01);
        assert!((clipped.z - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_clip_velocity_overbounce_pushes_away() {
        let clipped = clip_velocity(Vec3::new(10.0, 0.0, 0.0), -Vec3::X, 1.001);
        assert!(clipped.x < 0.0, "overbounce should leave a small outward component");
        assert!(clipped.x > -0.02);
    }

    #[test]
    fn test_clip_velocity_slope() {
        // Falling onto a 45-degree slope slides along it
        let velocity = Vec3::new(0.0, -10.0, 0.0);
        let slope_normal = Vec3::new(0.0, 0.707, 0.707).normalize();

        let clipped = clip_velocity(velocity, slope_normal, 1.0);

        assert!(clipped.dot(slope_normal).abs() < 1e-4);
        assert!(clipped.y < 0.0);
        assert!(clipped.z > 0.0);
    }

    #[test]
    fn test_project_velocity() {
        let projected = project_velocity(Vec3::new(3.0, 4.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert!((projected - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-5);

        assert_eq!(project_velocity(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_follow_floor_preserves_horizontal_speed() {
        let angle = 30.0_f32.to_radians();
        let ramp_normal = Vec3::new(-angle.sin(), angle.cos(), 0.0);

        let result = follow_floor(Vec3::new(2.0, 0.0, 0.0), ramp_normal, 1.0);

        assert!((result.x - 2.0).abs() < 1e-4, "result={result:?}");
        assert!((result.y - 2.0 * angle.tan()).abs() < 1e-3, "result={result:?}");
    }

    #[test]
    fn test_slide_move_no_collision() {
        let world = PlaneWorld::new();
        let config = SolverConfig::default();

        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);

        let outcome = slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        assert!(!outcome.exhausted);
        assert_eq!(outcome.iterations, 1);
        assert!((position.x - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_slide_move_along_wall() {
        let world = PlaneWorld::new().with_plane(Vec3::new(5.0, 0.0, 0.0), -Vec3::X);
        let config = SolverConfig::default();

        let mut position = Vec3::new(0.0, 1.0, 0.0);
        let mut velocity = Vec3::new(10.0, 0.0, 5.0);

        slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        assert!(position.x <= 4.6 + 1e-4, "x={}", position.x);
        assert!(position.z > 4.9, "should keep sliding along the wall, z={}", position.z);
        assert!(velocity.x <= 0.0);
    }

    #[test]
    fn test_slide_move_lands_on_floor() {
        let world = PlaneWorld::new().with_floor(0.0);
        let config = SolverConfig::default();

        let mut position = Vec3::new(0.0, 2.0, 0.0);
        let mut velocity = Vec3::new(1.0, -10.0, 0.0);

        let outcome = slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        assert!(!outcome.exhausted);
        assert!((position.y - 0.9).abs() < 1e-4, "y={}", position.y);
        assert!(velocity.y.abs() < 1e-6);
        assert!(position.x > 0.9, "horizontal motion continues after landing");
    }

    #[test]
    fn test_slide_move_interior_corner() {
        let world = PlaneWorld::new()
            .with_floor(0.0)
            .with_plane(Vec3::new(5.0, 0.0, 0.0), -Vec3::X)
            .with_plane(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let config = SolverConfig::default();

        let mut position = Vec3::new(0.0, 0.9, 0.0);
        let mut velocity = Vec3::new(40.0, 0.0, 25.0);

        let outcome = slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        assert!(position.is_finite());
        assert!(velocity.is_finite());
        assert!(outcome.iterations <= config.max_iterations);
        assert!(position.x <= 4.6 + 1e-3, "x={}", position.x);
        assert!(position.z <= 4.6 + 1e-3, "z={}", position.z);
        assert!(position.x > 4.5 && position.z > 4.5, "should end in the corner: {position:?}");
    }

    #[test]
    fn test_slide_move_steep_slope_is_not_ground() {
        let angle = 60.0_f32.to_radians();
        let world = PlaneWorld::new().with_plane(Vec3::ZERO, Vec3::new(-angle.sin(), angle.cos(), 0.0));
        let config = SolverConfig::default();

        let mut position = Vec3::new(0.0, 2.0, 0.0);
        let mut velocity = Vec3::new(0.0, -5.0, 0.0);

        slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        // Slides down-slope, toward -X
        assert!(position.x < 0.0, "x={}", position.x);
        assert!(velocity.y < 0.0);
    }

    #[test]
    fn test_slide_move_does_not_climb_steep_slope() {
        let angle = 60.0_f32.to_radians();
        let normal = Vec3::new(-angle.sin(), angle.cos(), 0.0);
        let world = PlaneWorld::new().with_plane(Vec3::ZERO, normal);
        let config = SolverConfig::default();
        let params = SlideParams {
            allow_step: false,
            ..params(&config)
        };

        let start = normal * ACTOR.support_distance(normal);
        let mut position = start;
        let mut velocity = Vec3::new(2.0, 0.0, 0.0);

        slide_move(&world, &mut position, &mut velocity, 1.0, &params);

        assert!(position.y <= start.y + 1e-3, "climbed to y={}", position.y);
        assert!(position.x <= start.x + 1e-3, "x={}", position.x);
    }

    #[test]
    fn test_slide_move_iteration_cap() {
        let world = PlaneWorld::new()
            .with_plane(Vec3::new(1.0, 0.0, 0.0), -Vec3::X)
            .with_plane(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);
        let config = SolverConfig {
            max_iterations: 1,
            ..Default::default()
        };

        let mut position = Vec3::new(0.0, 1.0, 0.0);
        let mut velocity = Vec3::new(10.0, 0.0, 3.0);

        let outcome = slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        assert!(outcome.exhausted);
        assert_eq!(outcome.iterations, 1);
        assert!(position.x <= 0.6 + 1e-4);
    }

    #[test]
    fn test_slide_move_with_world_wall() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world.add_box(
            Vec3::new(5.5, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 10.0),
            ContentFlags::SOLID,
        );

        let config = SolverConfig::default();
        let mut position = Vec3::new(0.0, 0.95, 0.0);
        let mut velocity = Vec3::new(10.0, 0.0, 5.0);

        slide_move(&world, &mut position, &mut velocity, 1.0, &params(&config));

        // Wall face at x=5, actor radius 0.4
        assert!(position.x < 4.6 + 0.005, "x={}", position.x);
        assert!(position.z > 1.0, "should slide along the wall, z={}", position.z);
    }
}
