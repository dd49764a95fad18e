//! Stride Physics
//!
//! A kinematic movement solver for capsule-shaped actors, in the
//! collide-and-slide tradition of Quake-style character movement.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: Sweeps capsules through the world, returns contact information
//! - **Movement**: Uses collision sweeps to resolve actor movement requests
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **Narrow seams**: The solver only sees the [`CollisionQuery`] trait
//! 3. **Robustness**: Degenerate input is a no-op, never a panic or NaN

pub mod collision;
pub mod movement;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use collision::{
    BodyId, CapsuleExtents, CollisionQuery, CollisionWorld, Contact, ContentFlags, RayHit,
};
pub use movement::{
    ActorState, EnvironmentMode, MovementPhase, MovementRequest, MovementSolver, SolverConfig,
    SurfaceClass,
};
