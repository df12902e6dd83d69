//! Thermal system - body temperature and health for every player

use std::collections::HashMap;

use hearthfire_logic::fire::Fire;
use hearthfire_logic::thermal::{FireReading, ThermalModel, ThermalTick};
use hecs::{Entity, World};

use crate::components::{Position, WarmthAssociation};
use crate::events::{EventQueue, SimEvent};

/// Advance every thermal model against its associated fire.
///
/// Must run after [`fire_system`](super::fire_system) so a fire that went
/// out this tick already gives no warmth.
pub fn thermal_system(world: &mut World, delta_seconds: f32, events: &mut EventQueue) {
    let readings: HashMap<Entity, FireReading> = world
        .query::<(&Fire, &Position)>()
        .iter()
        .map(|(entity, (fire, position))| {
            (
                entity,
                FireReading {
                    burning: fire.is_burning(),
                    position: position.0,
                },
            )
        })
        .collect();

    for (entity, (model, position, warmth)) in
        world.query_mut::<(&mut ThermalModel, &Position, Option<&WarmthAssociation>)>()
    {
        let reading = warmth
            .and_then(|w| w.fire)
            .and_then(|fire| readings.get(&fire).copied());

        if model.tick(delta_seconds, reading, position.0) == ThermalTick::Died {
            events.push(SimEvent::PlayerDied { player: entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthfire_logic::fire::FireParams;
    use hearthfire_logic::geometry::Vec3;
    use hearthfire_logic::thermal::ThermalParams;

    #[test]
    fn test_warmth_only_from_associated_fire() {
        let mut world = World::new();
        let fire = world.spawn((
            Fire::new(FireParams {
                start_lit: true,
                ..Default::default()
            }),
            Position(Vec3::ZERO),
        ));
        let warm = world.spawn((
            ThermalModel::default(),
            Position(Vec3::ZERO),
            WarmthAssociation { fire: Some(fire) },
        ));
        let cold = world.spawn((
            ThermalModel::default(),
            Position(Vec3::ZERO),
            WarmthAssociation::default(),
        ));

        let mut events = EventQueue::new();
        thermal_system(&mut world, 0.1, &mut events);

        let warm_temp = world.get::<&ThermalModel>(warm).unwrap().body_temperature();
        let cold_temp = world.get::<&ThermalModel>(cold).unwrap().body_temperature();
        assert!(warm_temp > 37.0);
        assert!(cold_temp < 37.0);
    }

    #[test]
    fn test_death_reported_once() {
        let mut world = World::new();
        let player = world.spawn((
            ThermalModel::new(ThermalParams {
                starting_temperature: 0.0,
                max_health: 1.0,
                ..Default::default()
            }),
            Position(Vec3::ZERO),
        ));

        let mut events = EventQueue::new();
        for _ in 0..10 {
            thermal_system(&mut world, 1.0, &mut events);
        }
        let deaths: Vec<_> = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::PlayerDied { .. }))
            .collect();
        assert_eq!(deaths, vec![SimEvent::PlayerDied { player }]);
    }
}
