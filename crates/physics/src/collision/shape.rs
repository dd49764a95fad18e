//! Actor collision shape.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Half-extents of a vertical capsule (a cylinder with hemispherical caps).
///
/// The capsule is centered on the actor's position. `half_height` runs from
/// the center to the tip of a cap, so the total height is `2 * half_height`.
/// A capsule whose `half_height` is not larger than its `radius` is a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleExtents {
    /// Radius of the cylinder and both caps (meters).
    pub radius: f32,
    /// Distance from the center to the top of the upper cap (meters).
    pub half_height: f32,
}

impl CapsuleExtents {
    /// Typical humanoid actor: 0.8m wide, 1.8m tall.
    pub const HUMANOID: Self = Self {
        radius: 0.4,
        half_height: 0.9,
    };

    /// Create capsule extents.
    pub const fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
        }
    }

    /// Whether the shape has no volume (or contains non-finite values).
    ///
    /// The solver treats movement of a degenerate shape as a no-op.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite()
            && self.half_height.is_finite()
            && self.radius > 0.0
            && self.half_height > 0.0)
    }

    /// Half-height of the straight cylinder between the two cap centers.
    #[inline]
    pub fn cylinder_half_height(&self) -> f32 {
        (self.half_height - self.radius).max(0.0)
    }

    /// Vertical distance from the center to the lowest point of the shape.
    #[inline]
    pub fn bottom_offset(&self) -> f32 {
        self.half_height.max(self.radius)
    }

    /// Height of the actor's feet for a capsule centered at `center`.
    #[inline]
    pub fn feet_height(&self, center: Vec3) -> f32 {
        center.y - self.bottom_offset()
    }

    /// Distance from the center to the farthest point of the shape along `direction`.
    ///
    /// `direction` must be normalized.
    pub fn support_distance(&self, direction: Vec3) -> f32 {
        self.radius + self.cylinder_half_height() * direction.y.abs()
    }

    /// Bounding box of the shape relative to its center.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let half_height = self.bottom_offset();
        (
            Vec3::new(-self.radius, -half_height, -self.radius),
            Vec3::new(self.radius, half_height, self.radius),
        )
    }
}

impl Default for CapsuleExtents {
    fn default() -> Self {
        Self::HUMANOID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shapes() {
        assert!(!CapsuleExtents::HUMANOID.is_degenerate());
        assert!(CapsuleExtents::new(0.0, 1.0).is_degenerate());
        assert!(CapsuleExtents::new(0.5, 0.0).is_degenerate());
        assert!(CapsuleExtents::new(-0.5, 1.0).is_degenerate());
        assert!(CapsuleExtents::new(f32::NAN, 1.0).is_degenerate());
        assert!(CapsuleExtents::new(0.5, f32::INFINITY).is_degenerate());
    }

    #[test]
    fn test_sphere_like_capsule() {
        let sphere = CapsuleExtents::new(0.5, 0.3);
        assert_eq!(sphere.cylinder_half_height(), 0.0);
        assert_eq!(sphere.bottom_offset(), 0.5);
    }

    #[test]
    fn test_support_distance() {
        let capsule = CapsuleExtents::new(0.4, 0.9);
        assert!((capsule.support_distance(Vec3::Y) - 0.9).abs() < 1e-6);
        assert!((capsule.support_distance(Vec3::X) - 0.4).abs() < 1e-6);
        assert!((capsule.feet_height(Vec3::new(0.0, 0.9, 0.0))).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box() {
        let capsule = CapsuleExtents::new(0.5, 1.0);
        let (min, max) = capsule.bounding_box();
        assert_eq!(min, Vec3::new(-0.5, -1.0, -0.5));
        assert_eq!(max, Vec3::new(0.5, 1.0, 0.5));
    }
}
