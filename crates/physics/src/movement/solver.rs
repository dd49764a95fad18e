//! Actor movement solver.
//!
//! This is the main entry point for actor movement. It takes a requested
//! displacement and resolves it against the collision world.

use glam::Vec3;

use crate::collision::{BodyId, CapsuleExtents, CollisionQuery, Contact};

use super::config::SolverConfig;
use super::slide_move::{slide_move, SlideParams};
use super::slope::{classify, SurfaceClass};
use super::state::{ActorState, EnvironmentMode, MovementPhase, MovementRequest};
use super::vertical::integrate_vertical;

/// Actor movement solver.
///
/// Stateless apart from its configuration: every call threads an
/// [`ActorState`] through `(state, request) -> state'`, so one solver can
/// serve any number of actors.
///
/// # Example
///
/// ```ignore
/// let solver = MovementSolver::new(SolverConfig::default());
/// let mut state = ActorState::new(spawn_position, CapsuleExtents::HUMANOID);
///
/// // Each tick:
/// let request = MovementRequest::new(velocity * dt, dt);
/// state = solver.move_actor(&world, &state, &request);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovementSolver {
    /// Solver configuration.
    pub config: SolverConfig,
}

impl MovementSolver {
    /// Create a new solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Resolve one movement request.
    ///
    /// Returns the input state unchanged when the request or state can't be
    /// resolved: non-positive or non-finite time, degenerate extents, or a
    /// non-finite displacement or position.
    pub fn move_actor<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        state: &ActorState,
        request: &MovementRequest,
    ) -> ActorState {
        self.move_body(world, state, request, None)
    }

    /// Resolve one movement request, ignoring the actor's own body.
    pub fn move_body<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        state: &ActorState,
        request: &MovementRequest,
        exclude: Option<BodyId>,
    ) -> ActorState {
        if !request.is_valid() || state.extents.is_degenerate() || !state.position.is_finite() {
            return *state;
        }

        let substeps = self.substep_count(request.elapsed);
        let dt = request.elapsed / substeps as f32;
        let displacement = request.displacement / substeps as f32;

        let mut next = *state;
        if request.yaw.is_finite() {
            next.yaw = request.yaw;
        }

        for _ in 0..substeps {
            self.solve_substep(world, &mut next, displacement, dt, request.environment, exclude);
        }

        next
    }

    /// Number of equal substeps a request of `elapsed` seconds is split into.
    pub fn substep_count(&self, elapsed: f32) -> u32 {
        let max_substeps = self.config.max_substeps.max(1);
        if !(self.config.max_substep > 0.0) || !(elapsed > self.config.max_substep) {
            return 1;
        }
        let count = (elapsed / self.config.max_substep).ceil();
        (count as u32).clamp(1, max_substeps)
    }

    /// Sweep down from `position` looking for something to stand on.
    pub fn probe_ground<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        position: Vec3,
        extents: &CapsuleExtents,
        distance: f32,
        exclude: Option<BodyId>,
    ) -> Option<(Contact, SurfaceClass)> {
        let contact = world.sweep(extents, position, position - Vec3::Y * distance, exclude)?;
        let class = classify(contact.normal, self.config.max_slope_angle);
        Some((contact, class))
    }

    // ========================================================================
    // Substep
    // ========================================================================

    fn solve_substep<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        state: &mut ActorState,
        displacement: Vec3,
        dt: f32,
        environment: EnvironmentMode,
        exclude: Option<BodyId>,
    ) {
        let config = &self.config;
        let extents = state.extents;
        let normal_mode = environment == EnvironmentMode::Normal;

        // Don't look for ground while rising
        let start_ground = if normal_mode && state.vertical_speed <= 0.0 {
            self.probe_ground(world, state.position, &extents, config.ground_probe_distance, exclude)
                .map(|(_, class)| class)
        } else {
            None
        };
        let on_floor = start_ground.is_some_and(SurfaceClass::is_walkable);
        let on_slope = start_ground == Some(SurfaceClass::Slope);

        let vertical = integrate_vertical(
            config,
            environment,
            state.vertical_speed,
            on_floor,
            state.position.y,
            displacement.y,
            dt,
        );

        // Too steep to stand on: input is dropped and the actor slides
        let horizontal = if normal_mode && on_slope {
            Vec3::ZERO
        } else {
            Vec3::new(displacement.x, 0.0, displacement.z) / dt
        };

        let mut velocity = horizontal + Vec3::Y * vertical.vertical_speed;
        let params = SlideParams {
            config,
            extents,
            exclude,
            allow_step: environment.can_step(),
        };
        let outcome = slide_move(world, &mut state.position, &mut velocity, dt, &params);
        if outcome.exhausted {
            log::trace!(
                "slide move stopped after {} sweeps at {:?}",
                outcome.iterations,
                state.position
            );
        }

        let mut grounded = false;
        if normal_mode && vertical.vertical_speed <= 0.0 {
            // Follow the floor down stairs if we were standing on it
            let reach = if vertical.grounded && config.snap_to_ground {
                config.step_height + config.ground_probe_distance
            } else {
                config.ground_probe_distance
            };
            if let Some((contact, class)) =
                self.probe_ground(world, state.position, &extents, reach, exclude)
            {
                if class.is_walkable() {
                    state.position = contact.position;
                    grounded = true;
                }
            }
        }

        state.vertical_speed = match environment {
            EnvironmentMode::Flying => vertical.vertical_speed,
            _ if grounded => 0.0,
            _ => velocity.y,
        };
        state.grounded = grounded;
        state.phase = match environment {
            EnvironmentMode::Flying => MovementPhase::Flying,
            EnvironmentMode::Submerged { .. } => MovementPhase::Swimming,
            EnvironmentMode::Normal if grounded => MovementPhase::Grounded,
            EnvironmentMode::Normal => MovementPhase::Falling,
        };
    }
}
