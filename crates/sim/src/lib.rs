//! Stride Actor Simulation
//!
//! This crate moves actors through a level using the stride-physics solver:
//!
//! - Actor registry with collision bodies for actor-actor blocking
//! - Environment lookup (dry land, water volumes, flying)
//! - Level geometry with a test arena
//! - A deterministic tick that resolves every actor
//!
//! # Architecture
//!
//! Each tick, every actor's requested displacement is resolved against the
//! same, unchanged collision world. Actor bodies are moved afterwards, so
//! the order actors are listed in never changes the outcome.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Actor World                          │
//! │  ┌──────────────┐   ┌──────────┐   ┌─────────────────────┐  │
//! │  │ Displacements│──►│ Solver   │──►│ Actor states        │  │
//! │  └──────────────┘   │ (sweeps, │   │ (position, vertical │  │
//! │                     │  slopes) │   │  speed, phase)      │  │
//! │  ┌──────────────┐   └──────────┘   └─────────┬───────────┘  │
//! │  │ Environment  │────────▲                   │ write back   │
//! │  └──────────────┘                            ▼              │
//! │                                    ┌─────────────────────┐  │
//! │                                    │ Collision bodies    │  │
//! │                                    └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod actor;
pub mod environment;
pub mod error;
pub mod level;
pub mod simulation;

// Re-export main types
pub use actor::{Actor, ActorId};
pub use environment::EnvironmentQuery;
pub use error::SimError;
pub use level::{Level, SpawnPoint};
pub use simulation::{ActorWorld, SimulationConfig};

// Re-export physics types for convenience
pub use stride_physics::{
    ActorState, CapsuleExtents, CollisionWorld, ContentFlags, EnvironmentMode, MovementPhase,
    MovementRequest, MovementSolver, SolverConfig,
};
