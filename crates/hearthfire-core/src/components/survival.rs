//! Player-side components for the survival loop.

use hecs::Entity;

use super::common::{Ray, Vec3};

/// Marks the player-controlled entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub name: String,
}

/// Latest input snapshot supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    /// Aim ray from the camera, in world space.
    pub aim: Ray,
    pub interact_held: bool,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            aim: Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)),
            interact_held: false,
        }
    }
}

/// The fire whose warmth currently reaches the player, if any.
///
/// Set on entering a fire's sensing volume, cleared on leaving it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmthAssociation {
    pub fire: Option<Entity>,
}
