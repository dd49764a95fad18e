//! The collision query capability consumed by the movement solver.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::shape::CapsuleExtents;

/// Identifier of a body registered in a collision world.
pub type BodyId = u32;

/// First blocking contact of a sweep.
///
/// Produced per sweep and consumed immediately by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// How far along the sweep the shape got before impact.
    ///
    /// - `0.0` = blocked immediately at the start
    /// - `0.5` = blocked halfway through
    pub fraction: f32,

    /// Center of the shape where it came to rest.
    pub position: Vec3,

    /// Point of contact on the blocking surface (world space).
    pub point: Vec3,

    /// Unit normal of the blocking surface, pointing away from it.
    pub normal: Vec3,
}

impl Contact {
    /// Create a contact for a sweep from `from` to `to` blocked at `fraction`.
    pub fn new(from: Vec3, to: Vec3, fraction: f32, point: Vec3, normal: Vec3) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        Self {
            fraction,
            position: from + (to - from) * fraction,
            point,
            normal,
        }
    }
}

/// Narrow capability interface over a physics backend.
///
/// The solver only ever sweeps the actor's capsule through the world, so this
/// is the entire surface it depends on. Implementations must be read-only:
/// concurrent sweeps from several actors are allowed as long as the geometry
/// is not mutated while they run.
pub trait CollisionQuery {
    /// Sweep a capsule from `from` to `to` and report the nearest blocking
    /// surface, or `None` if the whole path is clear.
    ///
    /// `exclude` names the querying actor's own body, which must never block it.
    fn sweep(
        &self,
        shape: &CapsuleExtents,
        from: Vec3,
        to: Vec3,
        exclude: Option<BodyId>,
    ) -> Option<Contact>;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    fn sweep(
        &self,
        shape: &CapsuleExtents,
        from: Vec3,
        to: Vec3,
        exclude: Option<BodyId>,
    ) -> Option<Contact> {
        (**self).sweep(shape, from, to, exclude)
    }
}
