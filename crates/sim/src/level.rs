//! Level geometry and spawn points.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_physics::{CollisionWorld, ContentFlags};

/// A level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for movement.
    pub collision: CollisionWorld,

    /// Actor spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A spawn point for actors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position on the ground in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Create a test level with walls, stairs, ramps and a pool.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 50.0;

        // North wall
        level.collision.add_box(
            Vec3::new(0.0, wall_height / 2.0, -arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // South wall
        level.collision.add_box(
            Vec3::new(0.0, wall_height / 2.0, arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ContentFlags::SOLID,
        );

        // East wall
        level.collision.add_box(
            Vec3::new(arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // West wall
        level.collision.add_box(
            Vec3::new(-arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ContentFlags::SOLID,
        );

        // Central pillar
        level.collision.add_box(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
            ContentFlags::SOLID,
        );

        // Stairs up to a landing at x=12..16, 1m high
        level.add_stairs(Vec3::new(10.0, 0.0, 0.0), 4, 0.25, 0.5, 2.0);
        level.collision.add_box(
            Vec3::new(14.0, 0.5, 0.0),
            Vec3::new(2.0, 0.5, 2.0),
            ContentFlags::SOLID,
        );

        // Walkable 30 degree wedge rising toward +X
        level.add_ramp(Vec3::new(-20.0, 0.0, 15.0), 6.0, 30.0, 2.0);

        // Steep slab, too steep to stand on
        level.collision.add_oriented_box(
            Vec3::new(20.0, 0.0, 15.0),
            Vec3::new(3.0, 0.25, 2.0),
            Vec3::new(0.0, 0.0, 60.0_f32.to_radians()),
            ContentFlags::SOLID,
        );

        // Pool, surface at y=2
        level.collision.add_box(
            Vec3::new(0.0, 0.75, -20.0),
            Vec3::new(5.0, 1.25, 5.0),
            ContentFlags::WATER,
        );

        // Spawn points
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, 0.0),
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 0.0, 0.0),
            facing: std::f32::consts::PI,
        });

        level
    }

    /// Add a flight of stairs climbing toward +X.
    ///
    /// Each step is a solid block from the floor at `base.y` up to its tread.
    pub fn add_stairs(&mut self, base: Vec3, steps: u32, rise: f32, run: f32, half_width: f32) {
        for i in 0..steps {
            let height = rise * (i + 1) as f32;
            let center = base + Vec3::new(run * (i as f32 + 0.5), height * 0.5, 0.0);
            self.collision.add_box(
                center,
                Vec3::new(run * 0.5, height * 0.5, half_width),
                ContentFlags::SOLID,
            );
        }
    }

    /// Add a wedge rising toward +X from `base` at the given angle.
    ///
    /// Returns `false` if the wedge is degenerate.
    pub fn add_ramp(&mut self, base: Vec3, length: f32, angle_degrees: f32, half_width: f32) -> bool {
        let height = length * angle_degrees.to_radians().tan();
        let points = [
            base + Vec3::new(0.0, 0.0, -half_width),
            base + Vec3::new(0.0, 0.0, half_width),
            base + Vec3::new(length, 0.0, -half_width),
            base + Vec3::new(length, 0.0, half_width),
            base + Vec3::new(length, height, -half_width),
            base + Vec3::new(length, height, half_width),
        ];
        self.collision.add_convex_hull(&points, ContentFlags::SOLID).is_some()
    }

    /// Get a spawn point.
    pub fn spawn_point(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of spawn points.
    pub fn spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
