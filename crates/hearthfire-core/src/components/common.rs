//! Spatial components shared by every entity type.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

pub use hearthfire_logic::geometry::{Ray, Vec3, Volume};

/// How many `Parent` links a lookup follows before giving up.
pub const MAX_HIERARCHY_DEPTH: usize = 8;

/// World-space anchor of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Links a child entity (typically a collider) to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Role a collider plays in targeting and warmth association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    /// Blocks the aim ray without being a target.
    Obstacle,
    /// Body of a fuel source.
    FuelBody,
    /// Surface of a fire that accepts aimed deposits.
    FireDeposit,
    /// Larger trigger region that associates players with a fire's warmth.
    FireSensing,
}

/// Collision shape in the local space of the nearest positioned ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub volume: Volume,
    pub kind: ColliderKind,
}

impl Collider {
    pub fn new(volume: Volume, kind: ColliderKind) -> Self {
        Self { volume, kind }
    }
}

/// Walk up from `entity` (inclusive) to the first entity carrying `T`.
pub fn find_owner<T: hecs::Component>(world: &World, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    for _ in 0..=MAX_HIERARCHY_DEPTH {
        if world.get::<&T>(current).is_ok() {
            return Some(current);
        }
        current = world.get::<&Parent>(current).ok()?.0;
    }
    None
}

/// Position of `entity` or, failing that, of its nearest positioned ancestor.
pub fn world_position(world: &World, entity: Entity) -> Option<Vec3> {
    let anchor = find_owner::<Position>(world, entity)?;
    world.get::<&Position>(anchor).ok().map(|p| p.0)
}
