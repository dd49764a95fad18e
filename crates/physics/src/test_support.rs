//! Analytic geometry for solver tests.
//!
//! Infinite half-spaces swept against a capsule in closed form, so solver
//! tests don't depend on the narrow phase of the real world.

use glam::Vec3;

use crate::collision::{BodyId, CapsuleExtents, CollisionQuery, Contact};

/// A solid half-space: everything behind the plane along its normal is solid.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// Plane through `point` with the given outward normal.
    pub fn through(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            offset: normal.dot(point),
        }
    }
}

/// A world made only of half-spaces.
#[derive(Debug, Default)]
pub struct PlaneWorld {
    pub planes: Vec<Plane>,
}

impl PlaneWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal floor with its surface at `height`.
    pub fn with_floor(mut self, height: f32) -> Self {
        self.planes.push(Plane::through(Vec3::new(0.0, height, 0.0), Vec3::Y));
        self
    }

    /// Any plane through `point` facing `normal`.
    pub fn with_plane(mut self, point: Vec3, normal: Vec3) -> Self {
        self.planes.push(Plane::through(point, normal));
        self
    }
}

impl CollisionQuery for PlaneWorld {
    fn sweep(
        &self,
        shape: &CapsuleExtents,
        from: Vec3,
        to: Vec3,
        _exclude: Option<BodyId>,
    ) -> Option<Contact> {
        let delta = to - from;
        let mut best: Option<(f32, Plane)> = None;

        for plane in &self.planes {
            let approach = plane.normal.dot(delta);
            if approach >= 0.0 {
                continue;
            }
            let support = shape.support_distance(plane.normal);
            let separation = plane.normal.dot(from) - plane.offset - support;
            let t = (separation / -approach).max(0.0);
            if t >= 1.0 {
                continue;
            }
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, *plane));
            }
        }

        let (t, plane) = best?;
        let center = from + delta * t;
        let point = center - plane.normal * shape.support_distance(plane.normal);
        Some(Contact::new(from, to, t, point, plane.normal))
    }
}
