//! Errors returned by the actor registry.

use thiserror::Error;

use crate::actor::ActorId;

/// Errors that can occur when managing or moving actors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    #[error("invalid capsule extents: radius={radius}, half_height={half_height}")]
    InvalidExtents { radius: f32, half_height: f32 },

    #[error("actor position is not finite")]
    NonFinitePosition,
}
