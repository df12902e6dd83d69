//! Respawn system - regrowth timers and removal of spent loose fuel

use hearthfire_logic::fuel::FuelSource;
use hecs::{Entity, World};

use crate::components::Parent;
use crate::events::{EventQueue, SimEvent};

/// Advance regrowth timers on collected harvestable sources.
pub fn respawn_system(world: &mut World, delta_seconds: f32, events: &mut EventQueue) {
    for (entity, source) in world.query_mut::<&mut FuelSource>() {
        if source.tick(delta_seconds) {
            events.push(SimEvent::FuelRespawned { source: entity });
        }
    }
}

/// Despawn collected loose items together with their child colliders.
/// Returns how many sources were removed.
pub fn despawn_spent_fuel(world: &mut World, events: &mut EventQueue) -> usize {
    let spent: Vec<Entity> = world
        .query::<&FuelSource>()
        .iter()
        .filter(|(_, source)| source.is_spent())
        .map(|(entity, _)| entity)
        .collect();
    if spent.is_empty() {
        return 0;
    }

    let children: Vec<Entity> = world
        .query::<&Parent>()
        .iter()
        .filter(|(_, parent)| spent.contains(&parent.0))
        .map(|(entity, _)| entity)
        .collect();
    for child in children {
        let _ = world.despawn(child);
    }

    for &source in &spent {
        let _ = world.despawn(source);
        events.push(SimEvent::FuelRemoved { source });
    }
    spent.len()
}
