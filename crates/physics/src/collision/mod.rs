//! Collision detection for actor movement.
//!
//! This module provides the narrow query surface the movement solver needs
//! and a parry3d-backed world that implements it.
//!
//! # Key Types
//!
//! - [`CollisionQuery`]: The capability the solver consumes (capsule sweeps)
//! - [`CollisionWorld`]: The collision environment containing all geometry
//! - [`Contact`]: First blocking contact of a sweep
//! - [`CapsuleExtents`]: The actor's vertical capsule
//!
//! # Sweep Algorithm
//!
//! Sweeps move a capsule from a start point toward an end point and return:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - Where the shape came to rest
//! - The contact point and the surface normal at impact

mod flags;
mod query;
mod shape;
mod world;

pub use flags::ContentFlags;
pub use query::{BodyId, CollisionQuery, Contact};
pub use shape::CapsuleExtents;
pub use world::{CollisionBrush, CollisionWorld, RayHit};
