//! Actor movement solver.
//!
//! This module resolves a requested displacement for a capsule-shaped actor
//! against the collision world:
//!
//! - Collide-and-slide along walls and into corners
//! - Walkable floor versus steep slopes, by surface angle
//! - Automatic step climbing and snapping down stairs
//! - Gravity, jumping, buoyancy and flying
//!
//! # Design
//!
//! The [`MovementSolver`] takes an [`ActorState`] and a [`MovementRequest`]
//! and returns the next state. It only reads the world through the
//! [`CollisionQuery`](crate::collision::CollisionQuery) trait and never
//! mutates it, so actors can be solved independently against the same world.

mod config;
mod slide_move;
mod slope;
mod solver;
mod state;
mod step;
mod vertical;

pub use config::SolverConfig;
pub use slide_move::{clip_velocity, project_velocity, slide_move, SlideOutcome, SlideParams};
pub use slope::{classify, slope_angle, SurfaceClass};
pub use solver::MovementSolver;
pub use state::{ActorState, EnvironmentMode, MovementPhase, MovementRequest};
pub use step::{try_step_up, StepUp};
pub use vertical::{integrate_vertical, VerticalIntegration};
