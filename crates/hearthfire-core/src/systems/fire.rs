//! Fire system - burns fuel and forwards fire notifications

use hearthfire_logic::fire::{Fire, FireEvent};
use hecs::World;

use crate::events::{EventQueue, SimEvent};

/// Burn every lit fire for `delta_seconds`.
pub fn fire_system(world: &mut World, delta_seconds: f32) {
    for (_, fire) in world.query_mut::<&mut Fire>() {
        fire.tick(delta_seconds);
    }
}

/// Move each fire's pending notifications into the engine queue.
pub fn collect_fire_events(world: &mut World, events: &mut EventQueue) {
    for (entity, fire) in world.query_mut::<&mut Fire>() {
        events.extend(fire.take_events().into_iter().map(|event| match event {
            FireEvent::BurningChanged(burning) => SimEvent::FireBurningChanged {
                fire: entity,
                burning,
            },
            FireEvent::FuelChanged(percentage) => SimEvent::FireFuelChanged {
                fire: entity,
                percentage,
            },
        }));
    }
}

/// Number of fires currently burning.
pub fn burning_fire_count(world: &World) -> usize {
    world
        .query::<&Fire>()
        .iter()
        .filter(|(_, fire)| fire.is_burning())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthfire_logic::fire::FireParams;

    #[test]
    fn test_fire_system_burns_out() {
        let mut world = World::new();
        let entity = world.spawn((Fire::new(FireParams::default()),));
        world
            .query_one_mut::<&mut Fire>(entity)
            .unwrap()
            .add_fuel(10.0)
            .unwrap();
        assert_eq!(burning_fire_count(&world), 1);

        fire_system(&mut world, 1.0);
        fire_system(&mut world, 1.0);
        assert_eq!(burning_fire_count(&world), 0);

        let mut events = EventQueue::new();
        collect_fire_events(&mut world, &mut events);
        let burning: Vec<bool> = events
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::FireBurningChanged { fire, burning } => {
                    assert_eq!(fire, entity);
                    Some(burning)
                }
                _ => None,
            })
            .collect();
        assert_eq!(burning, vec![true, false]);
    }
}
