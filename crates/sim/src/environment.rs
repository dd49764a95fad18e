//! Environment mode lookup.
//!
//! The solver is told which environment an actor moves through; this module
//! answers that question from the level's water volumes.

use glam::Vec3;
use stride_physics::{CapsuleExtents, CollisionWorld, EnvironmentMode};

/// Anything that can tell which environment an actor is in.
pub trait EnvironmentQuery {
    /// Environment for a capsule centered at `position`.
    ///
    /// Flying actors are always [`EnvironmentMode::Flying`].
    fn environment_at(&self, position: Vec3, extents: &CapsuleExtents, flying: bool) -> EnvironmentMode;
}

impl EnvironmentQuery for CollisionWorld {
    fn environment_at(&self, position: Vec3, extents: &CapsuleExtents, flying: bool) -> EnvironmentMode {
        if flying {
            return EnvironmentMode::Flying;
        }

        // Swimming once the water reaches the capsule center
        let feet = Vec3::new(position.x, extents.feet_height(position), position.z);
        match self.water_surface_at(feet) {
            Some(water_level) if water_level - feet.y >= extents.half_height => {
                EnvironmentMode::Submerged { water_level }
            }
            _ => EnvironmentMode::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_physics::ContentFlags;

    const ACTOR: CapsuleExtents = CapsuleExtents::new(0.4, 0.9);

    fn pool() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        // Water surface at y=2
        world.add_box(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(5.0, 1.0, 5.0),
            ContentFlags::WATER,
        );
        world
    }

    #[test]
    fn test_dry_land_is_normal() {
        let world = pool();
        let mode = world.environment_at(Vec3::new(20.0, 0.9, 0.0), &ACTOR, false);
        assert_eq!(mode, EnvironmentMode::Normal);
    }

    #[test]
    fn test_deep_water_is_submerged() {
        let world = pool();
        match world.environment_at(Vec3::new(0.0, 1.0, 0.0), &ACTOR, false) {
            EnvironmentMode::Submerged { water_level } => assert!((water_level - 2.0).abs() < 1e-5),
            other => panic!("expected submerged, got {other:?}"),
        }
    }

    #[test]
    fn test_wading_is_normal() {
        let world = pool();
        // Feet at 1.5, only 0.5m of water
        let mode = world.environment_at(Vec3::new(0.0, 2.4, 0.0), &ACTOR, false);
        assert_eq!(mode, EnvironmentMode::Normal);
    }

    #[test]
    fn test_flying_overrides_water() {
        let world = pool();
        let mode = world.environment_at(Vec3::new(0.0, 1.0, 0.0), &ACTOR, true);
        assert_eq!(mode, EnvironmentMode::Flying);
    }
}
