//! Content flags for collision filtering.
//!
//! Every piece of geometry in the world carries a set of content flags.
//! Sweeps pass a mask and only collide with geometry whose contents
//! intersect it, so water volumes and triggers never block movement.

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume something is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, stairs, ramps.
    pub const SOLID: Self = Self(1 << 0);

    /// Water volume - switches actors into swimming.
    pub const WATER: Self = Self(1 << 1);

    /// Actor clip - invisible geometry that blocks actors only.
    pub const ACTOR_CLIP: Self = Self(1 << 2);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Actor body - the collision proxy of another actor.
    pub const ACTOR_BODY: Self = Self(1 << 4);

    /// Standard mask for actor movement sweeps.
    pub const MASK_ACTOR_SOLID: Self = Self(
        Self::SOLID.0 | Self::ACTOR_CLIP.0 | Self::ACTOR_BODY.0,
    );

    /// Mask for world-only queries (ignores other actors).
    pub const MASK_STATIC_SOLID: Self = Self(Self::SOLID.0 | Self::ACTOR_CLIP.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
