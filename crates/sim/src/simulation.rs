//! Actor world - the movement tick.
//!
//! This module owns the actors and resolves their movement against the
//! level. Every actor in a tick is solved against the same, unchanged
//! geometry; actor bodies are only moved once all actors are resolved.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_physics::{
    ActorState, CapsuleExtents, ContentFlags, MovementRequest, MovementSolver, SolverConfig,
};

use crate::actor::{Actor, ActorId};
use crate::environment::EnvironmentQuery;
use crate::error::SimError;
use crate::level::Level;

/// Gap left between a spawned actor's feet and the ground (meters).
const SPAWN_CLEARANCE: f32 = 0.01;

/// Actor world configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement solver configuration.
    pub solver: SolverConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            solver: SolverConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// The actor world.
///
/// Holds the level, the actors moving through it, and the solver that moves
/// them. Given the same level and the same displacements, every run
/// produces the same positions.
#[derive(Debug)]
pub struct ActorWorld {
    /// Current tick number.
    pub frame: u64,

    /// World configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All actors, in creation order.
    actors: Vec<Actor>,

    /// Movement solver shared by all actors.
    solver: MovementSolver,

    /// Next actor ID to assign.
    next_actor_id: ActorId,
}

impl ActorWorld {
    /// Create a new actor world with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let solver = MovementSolver::new(config.solver.clone());

        Self {
            frame: 0,
            config,
            level,
            actors: Vec::new(),
            solver,
            next_actor_id: 1,
        }
    }

    /// Create an actor world with default configuration and test arena.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Add an actor with its capsule centered at `position`.
    pub fn add_actor(&mut self, position: Vec3, extents: CapsuleExtents) -> Result<ActorId, SimError> {
        if extents.is_degenerate() {
            return Err(SimError::InvalidExtents {
                radius: extents.radius,
                half_height: extents.half_height,
            });
        }
        if !position.is_finite() {
            return Err(SimError::NonFinitePosition);
        }

        let id = self.next_actor_id;
        self.next_actor_id += 1;

        let body = self.level.collision.add_actor_body(position, extents);
        self.actors.push(Actor::new(id, body, position, extents));
        log::debug!("added actor {} at {:?} (body {})", id, position, body);
        Ok(id)
    }

    /// Add an actor standing on the ground below a level spawn point.
    pub fn spawn_actor(&mut self, spawn_index: usize, extents: CapsuleExtents) -> Result<ActorId, SimError> {
        let spawn = self
            .level
            .spawn_point(spawn_index % self.level.spawn_count().max(1))
            .copied()
            .unwrap_or_default();

        let position = self.ground_position(spawn.position, &extents);
        let id = self.add_actor(position, extents)?;
        if let Some(actor) = self.actor_mut(id) {
            actor.state.yaw = spawn.facing;
        }
        Ok(id)
    }

    /// Remove an actor and its body.
    pub fn remove_actor(&mut self, id: ActorId) -> Result<Actor, SimError> {
        let index = self.index_of(id)?;
        let actor = self.actors.remove(index);
        self.level.collision.remove_body(actor.body);
        log::debug!("removed actor {}", id);
        Ok(actor)
    }

    /// Get an actor by ID.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// All actors, in creation order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Switch an actor between walking and flying.
    pub fn set_flying(&mut self, id: ActorId, flying: bool) -> Result<(), SimError> {
        let actor = self.actor_mut(id).ok_or(SimError::UnknownActor(id))?;
        actor.flying = flying;
        log::debug!("actor {} flying={}", id, flying);
        Ok(())
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Resolve one actor's movement and move its body right away.
    ///
    /// Returns the actor's resolved position.
    pub fn resolve_movement(
        &mut self,
        id: ActorId,
        displacement: Vec3,
        elapsed: f32,
    ) -> Result<Vec3, SimError> {
        let index = self.index_of(id)?;
        let state = self.solve(&self.actors[index], displacement, elapsed);

        let actor = &mut self.actors[index];
        actor.state = state;
        self.level.collision.set_body_position(actor.body, state.position);
        Ok(state.position)
    }

    /// Advance the world by one tick.
    ///
    /// Actors not listed in `intents` still fall, float, and settle. When an
    /// actor is listed more than once the last displacement wins.
    ///
    /// # Arguments
    ///
    /// * `intents` - Desired displacement per actor for this tick
    pub fn step(&mut self, intents: &[(ActorId, Vec3)]) -> Result<(), SimError> {
        if let Some((id, _)) = intents.iter().find(|(id, _)| self.actor(*id).is_none()) {
            return Err(SimError::UnknownActor(*id));
        }

        let delta_time = self.config.delta_time();

        // Resolve everyone against the same world
        let resolved: Vec<ActorState> = self
            .actors
            .iter()
            .map(|actor| {
                let displacement = intents
                    .iter()
                    .rev()
                    .find(|(id, _)| *id == actor.id)
                    .map_or(Vec3::ZERO, |(_, d)| *d);
                self.solve(actor, displacement, delta_time)
            })
            .collect();

        // Then write back the bodies
        for (actor, state) in self.actors.iter_mut().zip(resolved) {
            actor.state = state;
            self.level.collision.set_body_position(actor.body, state.position);
        }

        self.frame += 1;
        Ok(())
    }

    /// Get the delta time for this world.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    fn solve(&self, actor: &Actor, displacement: Vec3, elapsed: f32) -> ActorState {
        let world = &self.level.collision;
        let environment = world.environment_at(actor.state.position, &actor.state.extents, actor.flying);
        let request = MovementRequest::new(displacement, elapsed)
            .with_yaw(actor.state.yaw)
            .with_environment(environment);
        self.solver.move_body(world, &actor.state, &request, Some(actor.body))
    }

    fn index_of(&self, id: ActorId) -> Result<usize, SimError> {
        self.actors
            .iter()
            .position(|a| a.id == id)
            .ok_or(SimError::UnknownActor(id))
    }

    /// Capsule center for an actor standing on the ground below `point`.
    ///
    /// Traces down from slightly above the point; with no ground in reach
    /// the point is used as-is.
    fn ground_position(&self, point: Vec3, extents: &CapsuleExtents) -> Vec3 {
        let origin = point + Vec3::new(0.0, 1.0, 0.0);
        let lift = Vec3::new(0.0, extents.half_height + SPAWN_CLEARANCE, 0.0);

        match self
            .level
            .collision
            .raycast(origin, Vec3::NEG_Y, 3.0, ContentFlags::MASK_STATIC_SOLID)
        {
            Some(hit) => hit.point + lift,
            None => point + lift,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
