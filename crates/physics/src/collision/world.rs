//! Collision world containing all static geometry and actor bodies.
//!
//! The collision world stores all collidable geometry and answers capsule
//! sweeps through it. Narrow-phase tests are delegated to parry3d.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, PointQuery, Ray, RayCast};
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use super::query::{BodyId, CollisionQuery, Contact};
use super::shape::CapsuleExtents;

/// Penetration depth below which overlapping shapes are not considered blocked.
const PENETRATION_TOLERANCE: f32 = 0.001;

/// Gap left between a blocked sweep's resting position and the surface it hit.
const CONTACT_SKIN: f32 = 0.002;

/// Sweeps shorter than this are treated as "no movement".
const MIN_SWEEP_DISTANCE: f32 = 1.0e-5;

/// Bisection steps used to refine the impact fraction.
const BISECTION_STEPS: usize = 14;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: BodyId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, water, actor body, etc.).
    pub contents: ContentFlags,
    /// Capsule extents when this brush is an actor body.
    pub actor_extents: Option<CapsuleExtents>,
    /// Cached world-space bounds.
    bounds: (Vec3, Vec3),
}

impl CollisionBrush {
    fn new(
        id: BodyId,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
        actor_extents: Option<CapsuleExtents>,
    ) -> Self {
        let bounds = world_bounds(&shape, &transform);
        Self {
            id,
            shape,
            transform,
            contents,
            actor_extents,
            bounds,
        }
    }

    /// World-space position of the brush origin.
    pub fn position(&self) -> Vec3 {
        let t = &self.transform.translation.vector;
        Vec3::new(t.x, t.y, t.z)
    }
}

/// Result of a raycast through the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit.
    pub distance: f32,
    /// Hit point in world space.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Brush that was hit.
    pub body: BodyId,
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes (axis-aligned and oriented, for floors, walls, steps and ramps)
/// - Convex hull brushes
/// - Capsule actor bodies that move every tick
/// - Non-solid water volumes queried by the environment
///
/// # Thread Safety
///
/// Queries take `&self`, so the world can be shared across threads while no
/// one mutates it. Actor bodies are only moved between simulation steps.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    /// All brushes, in insertion order.
    brushes: Vec<CollisionBrush>,
    /// Next brush ID to assign.
    next_id: BodyId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> BodyId {
        self.add_oriented_box(center, half_extents, Vec3::ZERO, contents)
    }

    /// Add a rotated box to the world.
    ///
    /// `rotation` is an axis-angle vector (axis scaled by the angle in radians).
    /// A box rotated about Z or X makes a ramp.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Vec3,
        contents: ContentFlags,
    ) -> BodyId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(rotation.x, rotation.y, rotation.z),
        );
        self.push(shape, transform, contents, None)
    }

    /// Add a convex hull to the world.
    ///
    /// # Returns
    ///
    /// The brush ID, or `None` if the hull couldn't be computed.
    pub fn add_convex_hull(&mut self, points: &[Vec3], contents: ContentFlags) -> Option<BodyId> {
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push(shape, Isometry::identity(), contents, None))
    }

    /// Register an actor's capsule as a body other actors collide with.
    pub fn add_actor_body(&mut self, position: Vec3, extents: CapsuleExtents) -> BodyId {
        let shape = capsule_shape(&extents);
        self.push(shape, shape_transform(position), ContentFlags::ACTOR_BODY, Some(extents))
    }

    /// Move a body to a new center position.
    ///
    /// Returns `false` if no body has this ID.
    pub fn set_body_position(&mut self, id: BodyId, position: Vec3) -> bool {
        let Some(brush) = self.brushes.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        brush.transform.translation.vector = Vector::new(position.x, position.y, position.z);
        brush.bounds = world_bounds(&brush.shape, &brush.transform);
        true
    }

    /// World position of a body.
    pub fn body_position(&self, id: BodyId) -> Option<Vec3> {
        self.brush(id).map(CollisionBrush::position)
    }

    /// Capsule extents of an actor body.
    pub fn body_extents(&self, id: BodyId) -> Option<CapsuleExtents> {
        self.brush(id).and_then(|b| b.actor_extents)
    }

    /// Remove a body. Returns `false` if no body has this ID.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let before = self.brushes.len();
        self.brushes.retain(|b| b.id != id);
        self.brushes.len() != before
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep a capsule through the world, colliding only with `mask`.
    ///
    /// Only the stretches of the path where the capsule's bounds overlap a
    /// brush are sampled, at most one capsule radius apart, so thin geometry
    /// cannot be skipped however long the sweep is. The first blocked sample
    /// is refined by bisection and the resting position is pushed back out
    /// along the hit normal, so a blocked sweep never ends inside the brush
    /// it hit. Geometry the capsule is already stuck in at `from` only blocks
    /// the sweep if the overlap gets deeper, which lets a stuck actor move
    /// out of it.
    pub fn sweep_masked(
        &self,
        extents: &CapsuleExtents,
        from: Vec3,
        to: Vec3,
        mask: ContentFlags,
        exclude: Option<BodyId>,
    ) -> Option<Contact> {
        if extents.is_degenerate() {
            return None;
        }

        let delta = to - from;
        let distance = delta.length();
        // Also rejects NaN.
        if !(distance > MIN_SWEEP_DISTANCE && distance.is_finite()) {
            return None;
        }

        let shape = capsule_shape(extents);
        let (local_min, local_max) = extents.bounding_box();

        let candidates: Vec<Candidate<'_>> = self
            .brushes
            .iter()
            .filter(|b| mask.intersects(b.contents) && Some(b.id) != exclude)
            .filter_map(|brush| {
                let window = sweep_window(brush, local_min, local_max, from, delta)?;
                let start_depth = penetration(brush, &shape, from).map_or(0.0, |p| p.depth);
                Some(Candidate {
                    brush,
                    window,
                    allowed_depth: if start_depth > PENETRATION_TOLERANCE {
                        start_depth
                    } else {
                        0.0
                    },
                })
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        // Sample spacing as a share of the whole path
        let spacing = extents.radius.max(0.01) / distance;
        let blocked = |t: f32| blocking_penetration(&candidates, &shape, from + delta * t, t);

        for (enter, exit) in merged_windows(&candidates) {
            let samples = ((exit - enter) / spacing).ceil().max(1.0) as usize;
            let mut lo = enter;
            for i in 1..=samples {
                let t = enter + (exit - enter) * (i as f32 / samples as f32);
                if blocked(t).is_none() {
                    lo = t;
                    continue;
                }

                let mut hi = t;
                for _ in 0..BISECTION_STEPS {
                    let mid = (lo + hi) * 0.5;
                    if blocked(mid).is_some() {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }

                let (index, hit) = blocked(hi)?;
                let normal = if hit.normal.length_squared() > 0.5 {
                    hit.normal
                } else {
                    // Degenerate contact normal: oppose the horizontal motion.
                    let horizontal = Vec3::new(-delta.x, 0.0, -delta.z);
                    horizontal.try_normalize().unwrap_or(Vec3::Y)
                };

                // Undo any overlap gained on the way in, plus the skin
                let candidate = &candidates[index];
                let rest = from + delta * lo;
                let depth = penetration(candidate.brush, &shape, rest).map_or(0.0, |p| p.depth);
                let push_out = (depth - candidate.allowed_depth).max(0.0) + CONTACT_SKIN;

                return Some(Contact {
                    fraction: lo.clamp(0.0, 1.0),
                    position: rest + normal * push_out,
                    point: hit.point,
                    normal,
                });
            }
        }

        None
    }

    /// Perform a raycast through the world.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    /// * `max_distance` - Maximum trace distance
    /// * `mask` - Content flags to collide with
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        if !(max_distance > 0.0) {
            return None;
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, &CollisionBrush)> = None;
        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }
            if let Some(toi) = brush.shape.cast_ray(&brush.transform, &ray, max_distance, true) {
                if closest.map_or(true, |(best, _)| toi < best) {
                    closest = Some((toi, brush));
                }
            }
        }

        let (distance, brush) = closest?;
        let normal = brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            .map(|hit| Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z))
            .and_then(Vec3::try_normalize)
            .unwrap_or(-dir);

        Some(RayHit {
            distance,
            point: origin + dir * distance,
            normal,
            body: brush.id,
        })
    }

    /// Height of the water surface above `point`, if the point is inside a
    /// water volume.
    ///
    /// When volumes overlap the highest surface wins.
    pub fn water_surface_at(&self, point: Vec3) -> Option<f32> {
        let p = Point::new(point.x, point.y, point.z);
        self.brushes
            .iter()
            .filter(|b| b.contents.intersects(ContentFlags::WATER))
            .filter(|b| b.shape.contains_point(&b.transform, &p))
            .map(|b| b.bounds.1.y)
            .reduce(f32::max)
    }

    fn brush(&self, id: BodyId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|b| b.id == id)
    }

    fn push(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
        actor_extents: Option<CapsuleExtents>,
    ) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.brushes
            .push(CollisionBrush::new(id, shape, transform, contents, actor_extents));
        id
    }
}

impl CollisionQuery for CollisionWorld {
    fn sweep(
        &self,
        shape: &CapsuleExtents,
        from: Vec3,
        to: Vec3,
        exclude: Option<BodyId>,
    ) -> Option<Contact> {
        self.sweep_masked(shape, from, to, ContentFlags::MASK_ACTOR_SOLID, exclude)
    }
}

// ============================================================================
// Private helpers
// ============================================================================

/// Penetration of the swept capsule into one brush.
struct Penetration {
    depth: f32,
    point: Vec3,
    normal: Vec3,
}

/// A brush the sweep may run into.
struct Candidate<'a> {
    brush: &'a CollisionBrush,
    /// Path range `[enter, exit]` over which the bounds overlap.
    window: (f32, f32),
    /// Overlap the capsule was already stuck in at the start of the sweep.
    allowed_depth: f32,
}

fn penetration(brush: &CollisionBrush, shape: &SharedShape, center: Vec3) -> Option<Penetration> {
    let transform = shape_transform(center);
    let result = contact(
        &transform,
        shape.as_ref(),
        &brush.transform,
        brush.shape.as_ref(),
        0.0,
    )
    .ok()
    .flatten()?;

    // normal1 points out of the capsule, into the brush.
    let normal = -Vec3::new(result.normal1.x, result.normal1.y, result.normal1.z);
    Some(Penetration {
        depth: -result.dist,
        point: Vec3::new(result.point2.x, result.point2.y, result.point2.z),
        normal: normal.normalize_or_zero(),
    })
}

/// Range of `t` in `[0, 1]` over which a capsule centered at
/// `from + delta * t` has bounds overlapping the brush's bounds.
fn sweep_window(
    brush: &CollisionBrush,
    local_min: Vec3,
    local_max: Vec3,
    from: Vec3,
    delta: Vec3,
) -> Option<(f32, f32)> {
    let (bmin, bmax) = brush.bounds;
    let lower = (bmin - local_max).to_array();
    let upper = (bmax - local_min).to_array();
    let origin = from.to_array();
    let direction = delta.to_array();

    let mut enter = 0.0_f32;
    let mut exit = 1.0_f32;
    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d == 0.0 {
            if o < lower[axis] || o > upper[axis] {
                return None;
            }
            continue;
        }
        let a = (lower[axis] - o) / d;
        let b = (upper[axis] - o) / d;
        enter = enter.max(a.min(b));
        exit = exit.min(a.max(b));
        if enter > exit {
            return None;
        }
    }
    Some((enter, exit))
}

/// Union of the candidates' windows, in path order.
fn merged_windows(candidates: &[Candidate<'_>]) -> Vec<(f32, f32)> {
    let mut windows: Vec<(f32, f32)> = candidates.iter().map(|c| c.window).collect();
    windows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::with_capacity(windows.len());
    for (enter, exit) in windows {
        match merged.last_mut() {
            Some(last) if enter <= last.1 => last.1 = last.1.max(exit),
            _ => merged.push((enter, exit)),
        }
    }
    merged
}

/// Deepest brush the capsule at path position `t` penetrates past its allowance.
///
/// Returns the candidate's index along with the penetration.
fn blocking_penetration(
    candidates: &[Candidate<'_>],
    shape: &SharedShape,
    center: Vec3,
    t: f32,
) -> Option<(usize, Penetration)> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.window.0 <= t && t <= c.window.1)
        .filter_map(|(index, c)| {
            let pen = penetration(c.brush, shape, center)?;
            (pen.depth > c.allowed_depth + PENETRATION_TOLERANCE).then_some((index, pen))
        })
        .reduce(|deepest, hit| if hit.1.depth > deepest.1.depth { hit } else { deepest })
}

/// Create a parry3d shape for a capsule.
fn capsule_shape(extents: &CapsuleExtents) -> SharedShape {
    let cylinder_half_height = extents.cylinder_half_height();
    if cylinder_half_height > 0.0 {
        SharedShape::capsule_y(cylinder_half_height, extents.radius)
    } else {
        SharedShape::ball(extents.radius)
    }
}

/// Transform for a capsule centered at `position`.
fn shape_transform(position: Vec3) -> Isometry<Real> {
    Isometry::translation(position.x, position.y, position.z)
}

fn world_bounds(shape: &SharedShape, transform: &Isometry<Real>) -> (Vec3, Vec3) {
    let aabb = shape.compute_aabb(transform);
    (
        Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
        Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
    )
}

// ============================================================================
// Tests
// ============================================================================
