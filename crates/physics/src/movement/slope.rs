//! Surface classification by slope.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Angular slack applied at the classification thresholds (degrees).
const ANGLE_EPSILON: f32 = 1.0e-3;

/// What kind of surface a contact normal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceClass {
    /// Walkable: the actor can stand on it.
    Floor,
    /// Too steep to stand on; the actor slides.
    Slope,
    /// Vertical, overhanging, or a ceiling.
    Wall,
}

impl SurfaceClass {
    /// Whether an actor touching this surface from above is grounded.
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Angle between a surface normal and world-up, in degrees.
///
/// The dot product is clamped so floating error on near-unit normals can't
/// leave the domain of `acos`. A zero-length normal reads as a wall (90°).
pub fn slope_angle(normal: Vec3) -> f32 {
    let normal = normal.normalize_or_zero();
    normal.dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Classify a surface normal against the walkable threshold.
///
/// A surface at exactly `max_slope_angle` is floor.
pub fn classify(normal: Vec3, max_slope_angle: f32) -> SurfaceClass {
    let angle = slope_angle(normal);
    if angle <= max_slope_angle + ANGLE_EPSILON {
        SurfaceClass::Floor
    } else if angle < 90.0 - ANGLE_EPSILON {
        SurfaceClass::Slope
    } else {
        SurfaceClass::Wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_at(degrees: f32) -> Vec3 {
        let radians = degrees.to_radians();
        Vec3::new(-radians.sin(), radians.cos(), 0.0)
    }

    #[test]
    fn test_flat_floor() {
        assert!(slope_angle(Vec3::Y).abs() < 1e-3);
        assert_eq!(classify(Vec3::Y, 45.0), SurfaceClass::Floor);
        assert!(SurfaceClass::Floor.is_walkable());
        assert!(!SurfaceClass::Slope.is_walkable());
    }

    #[test]
    fn test_wall_and_ceiling() {
        assert_eq!(classify(Vec3::X, 45.0), SurfaceClass::Wall);
        assert_eq!(classify(-Vec3::Y, 45.0), SurfaceClass::Wall);
        assert!((slope_angle(-Vec3::Y) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        for threshold in [30.0_f32, 45.0, 60.0] {
            assert_eq!(
                classify(normal_at(threshold), threshold),
                SurfaceClass::Floor,
                "surface at exactly {threshold} degrees should be floor"
            );
            assert_eq!(
                classify(normal_at(threshold + 1.0), threshold),
                SurfaceClass::Slope,
                "surface at {} degrees should be slope",
                threshold + 1.0
            );
        }
    }

    #[test]
    fn test_unnormalized_and_degenerate_normals() {
        // Slightly-off unit normals must not produce NaN
        let angle = slope_angle(Vec3::new(0.0, 1.000_001, 0.0));
        assert!(angle.is_finite());
        assert!(angle < 0.1);

        assert_eq!(classify(Vec3::new(0.0, 3.0, 0.0), 45.0), SurfaceClass::Floor);
        assert!((slope_angle(Vec3::ZERO) - 90.0).abs() < 1e-3);
        assert_eq!(classify(Vec3::ZERO, 45.0), SurfaceClass::Wall);
    }
}
