//! Actor entity and state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_physics::{ActorState, BodyId, CapsuleExtents, MovementPhase};

/// Unique identifier for actors.
pub type ActorId = u32;

/// An actor in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique actor ID.
    pub id: ActorId,

    /// Movement state threaded through the solver.
    pub state: ActorState,

    /// The actor's body in the collision world.
    pub body: BodyId,

    /// Whether the actor levitates instead of walking.
    pub flying: bool,
}

impl Actor {
    /// Create a new actor at the given position.
    pub fn new(id: ActorId, body: BodyId, position: Vec3, extents: CapsuleExtents) -> Self {
        Self {
            id,
            state: ActorState::new(position, extents),
            body,
            flying: false,
        }
    }

    /// Get the actor's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Check if the actor is standing on walkable floor.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// Movement phase the actor ended its last tick in.
    #[inline]
    pub fn phase(&self) -> MovementPhase {
        self.state.phase
    }
}
