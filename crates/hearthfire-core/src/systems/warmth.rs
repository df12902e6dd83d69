//! Warmth association - which fire's warmth reaches which player
//!
//! Association follows trigger enter/exit signals on fire sensing volumes.
//! Signals come either from the host's physics layer or from
//! [`TriggerTracker`], which derives them from player positions.

use std::collections::BTreeSet;

use hearthfire_logic::fire::Fire;
use hecs::{Entity, World};

use crate::components::{
    find_owner, world_position, Collider, ColliderKind, Player, Position, Volume,
    WarmthAssociation,
};
use crate::events::{EventQueue, SimEvent};

/// A player crossing the boundary of a trigger collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSignal {
    Enter { player: Entity, collider: Entity },
    Exit { player: Entity, collider: Entity },
}

/// Remembers which sensing colliders each player was inside last tick.
#[derive(Debug, Default)]
pub struct TriggerTracker {
    inside: BTreeSet<(Entity, Entity)>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff current containment against last tick. Exits come before enters
    /// so walking straight from one fire's warmth into another's ends
    /// associated with the new one.
    pub fn detect(&mut self, world: &World) -> Vec<TriggerSignal> {
        let sensors: Vec<(Entity, Volume)> = world
            .query::<&Collider>()
            .iter()
            .filter(|(_, collider)| collider.kind == ColliderKind::FireSensing)
            .filter_map(|(entity, collider)| {
                world_position(world, entity).map(|anchor| (entity, collider.volume.translated(anchor)))
            })
            .collect();

        let mut now = BTreeSet::new();
        for (player, (_, position)) in world.query::<(&Player, &Position)>().iter() {
            for (sensor, volume) in &sensors {
                if volume.contains(&position.0) {
                    now.insert((player, *sensor));
                }
            }
        }

        let mut signals: Vec<TriggerSignal> = self
            .inside
            .difference(&now)
            .map(|&(player, collider)| TriggerSignal::Exit { player, collider })
            .collect();
        signals.extend(
            now.difference(&self.inside)
                .map(|&(player, collider)| TriggerSignal::Enter { player, collider }),
        );

        self.inside = now;
        signals
    }

    pub fn clear(&mut self) {
        self.inside.clear();
    }
}

/// Update warmth associations from trigger signals.
///
/// The collider need not be the fire itself: the owning fire is found by
/// walking `Parent` links. Exiting a fire other than the associated one
/// leaves the association alone.
pub fn apply_trigger_signals(world: &mut World, signals: &[TriggerSignal], events: &mut EventQueue) {
    for signal in signals {
        let (player, collider, entering) = match *signal {
            TriggerSignal::Enter { player, collider } => (player, collider, true),
            TriggerSignal::Exit { player, collider } => (player, collider, false),
        };

        let Some(fire) = find_owner::<Fire>(world, collider) else {
            log::debug!("Trigger {:?} has no owning fire; ignored", collider);
            continue;
        };
        let Ok(warmth) = world.query_one_mut::<&mut WarmthAssociation>(player) else {
            continue;
        };

        if entering && warmth.fire != Some(fire) {
            warmth.fire = Some(fire);
            log::debug!("Player {:?} entered warmth of {:?}", player, fire);
            events.push(SimEvent::WarmthEntered { player, fire });
        } else if !entering && warmth.fire == Some(fire) {
            warmth.fire = None;
            log::debug!("Player {:?} left warmth of {:?}", player, fire);
            events.push(SimEvent::WarmthExited { player, fire });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Parent, Vec3};

    fn fire_with_sensor(world: &mut World, at: Vec3, radius: f32) -> (Entity, Entity) {
        let fire = world.spawn((Fire::default(), Position(at)));
        let sensor = world.spawn((
            Parent(fire),
            Collider::new(Volume::sphere(Vec3::ZERO, radius), ColliderKind::FireSensing),
        ));
        (fire, sensor)
    }

    fn player_at(world: &mut World, at: Vec3) -> Entity {
        world.spawn((Player::default(), Position(at), WarmthAssociation::default()))
    }

    fn associated(world: &World, player: Entity) -> Option<Entity> {
        world.get::<&WarmthAssociation>(player).unwrap().fire
    }

    #[test]
    fn test_enter_and_exit_via_child_collider() {
        let mut world = World::new();
        let (fire, sensor) = fire_with_sensor(&mut world, Vec3::ZERO, 5.0);
        let player = player_at(&mut world, Vec3::new(1.0, 0.0, 0.0));
        let mut events = EventQueue::new();

        apply_trigger_signals(
            &mut world,
            &[TriggerSignal::Enter { player, collider: sensor }],
            &mut events,
        );
        assert_eq!(associated(&world, player), Some(fire));

        apply_trigger_signals(
            &mut world,
            &[TriggerSignal::Exit { player, collider: sensor }],
            &mut events,
        );
        assert_eq!(associated(&world, player), None);
        assert_eq!(
            events.drain(),
            vec![
                SimEvent::WarmthEntered { player, fire },
                SimEvent::WarmthExited { player, fire },
            ]
        );
    }

    #[test]
    fn test_exit_of_other_fire_keeps_association() {
        let mut world = World::new();
        let (fire_a, sensor_a) = fire_with_sensor(&mut world, Vec3::ZERO, 5.0);
        let (_, sensor_b) = fire_with_sensor(&mut world, Vec3::new(8.0, 0.0, 0.0), 5.0);
        let player = player_at(&mut world, Vec3::new(4.0, 0.0, 0.0));
        let mut events = EventQueue::new();

        apply_trigger_signals(
            &mut world,
            &[
                TriggerSignal::Enter { player, collider: sensor_b },
                TriggerSignal::Enter { player, collider: sensor_a },
                TriggerSignal::Exit { player, collider: sensor_b },
            ],
            &mut events,
        );
        assert_eq!(associated(&world, player), Some(fire_a));
    }

    #[test]
    fn test_tracker_detects_crossings() {
        let mut world = World::new();
        let (fire, sensor) = fire_with_sensor(&mut world, Vec3::ZERO, 5.0);
        let player = player_at(&mut world, Vec3::new(10.0, 0.0, 0.0));
        let mut tracker = TriggerTracker::new();

        assert!(tracker.detect(&world).is_empty());

        world.get::<&mut Position>(player).unwrap().0 = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(
            tracker.detect(&world),
            vec![TriggerSignal::Enter { player, collider: sensor }]
        );
        assert!(tracker.detect(&world).is_empty());

        let mut events = EventQueue::new();
        apply_trigger_signals(
            &mut world,
            &[TriggerSignal::Enter { player, collider: sensor }],
            &mut events,
        );
        assert_eq!(associated(&world, player), Some(fire));

        world.get::<&mut Position>(player).unwrap().0 = Vec3::new(6.0, 0.0, 0.0);
        assert_eq!(
            tracker.detect(&world),
            vec![TriggerSignal::Exit { player, collider: sensor }]
        );
    }
}
