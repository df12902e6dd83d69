//! Interaction system - targeting and fuel transfer for every player
//!
//! Each tick a [`ColliderWorld`] snapshot answers the arbiter's geometry
//! queries, and [`WorldTargets`] hands it mutable access to fuel sources and
//! fires. The arbiter and carried fuel are lifted off the player entity for
//! the duration of its turn and put back afterwards.

use std::cmp::Ordering;
use std::collections::HashMap;

use hearthfire_logic::fire::Fire;
use hearthfire_logic::fuel::{CarriedFuel, FuelSource};
use hearthfire_logic::interaction::{
    InteractInput, InteractOutcome, InteractionArbiter, InteractionTargets, RayHit, SceneQuery,
};
use hearthfire_logic::thermal::ThermalModel;
use hecs::{Entity, World};

use crate::components::{
    find_owner, world_position, Collider, ColliderKind, Player, PlayerInput, Position, Ray, Volume,
};
use crate::events::{EventQueue, SimEvent};

/// World-space colliders with their owners resolved, built once per tick.
#[derive(Debug, Default)]
pub struct ColliderWorld {
    solids: Vec<(Entity, Volume, ColliderKind)>,
    sensors: Vec<(Entity, Volume)>,
    deposits: HashMap<Entity, Vec<Volume>>,
    fires: Vec<Entity>,
}

impl ColliderWorld {
    /// Snapshot every collider. Bodies of collected fuel are left out so
    /// the aim passes through harvested plants.
    pub fn build(world: &World) -> Self {
        let mut scene = Self::default();

        for (entity, collider) in world.query::<&Collider>().iter() {
            let Some(anchor) = world_position(world, entity) else {
                continue;
            };
            let volume = collider.volume.translated(anchor);

            match collider.kind {
                ColliderKind::Obstacle => scene.solids.push((entity, volume, collider.kind)),
                ColliderKind::FuelBody => {
                    let Some(source) = find_owner::<FuelSource>(world, entity) else {
                        continue;
                    };
                    let available = world
                        .get::<&FuelSource>(source)
                        .is_ok_and(|s| !s.is_collected());
                    if available {
                        scene.solids.push((source, volume, collider.kind));
                    }
                }
                ColliderKind::FireDeposit => {
                    if let Some(fire) = find_owner::<Fire>(world, entity) {
                        scene.solids.push((fire, volume, collider.kind));
                        scene.deposits.entry(fire).or_default().push(volume);
                    }
                }
                ColliderKind::FireSensing => {
                    if let Some(fire) = find_owner::<Fire>(world, entity) {
                        scene.sensors.push((fire, volume));
                    }
                }
            }
        }

        scene.fires = scene.deposits.keys().copied().collect();
        scene.fires.sort();
        scene
    }
}

fn nearest<T>(hits: impl Iterator<Item = (f32, T)>) -> Option<(f32, T)> {
    hits.min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
}

impl SceneQuery<Entity> for ColliderWorld {
    /// Solid colliders are hit first; sensing volumes are triggers and only
    /// report when nothing solid lies on the ray.
    fn raycast(&self, ray: &Ray, max_distance: f32) -> RayHit<Entity> {
        let solid = nearest(self.solids.iter().filter_map(|(owner, volume, kind)| {
            volume.ray_hit(ray, max_distance).map(|t| (t, (*owner, *kind)))
        }));
        if let Some((t, (owner, kind))) = solid {
            let point = ray.at(t);
            return match kind {
                ColliderKind::FuelBody => RayHit::Fuel { source: owner, point },
                ColliderKind::FireDeposit => RayHit::FireDepositSurface { fire: owner, point },
                ColliderKind::Obstacle | ColliderKind::FireSensing => RayHit::None,
            };
        }

        let sensed = nearest(
            self.sensors
                .iter()
                .filter_map(|(fire, volume)| volume.ray_hit(ray, max_distance).map(|t| (t, *fire))),
        );
        match sensed {
            Some((t, fire)) => RayHit::FireSensingSurface {
                fire,
                point: ray.at(t),
            },
            None => RayHit::None,
        }
    }

    fn fires(&self) -> &[Entity] {
        &self.fires
    }

    fn deposit_volumes(&self, fire: Entity) -> &[Volume] {
        self.deposits.get(&fire).map_or(&[], |v| v.as_slice())
    }
}

/// Mutable view of the world's fuel sources and fires.
pub struct WorldTargets<'w> {
    world: &'w mut World,
}

impl<'w> WorldTargets<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl InteractionTargets<Entity> for WorldTargets<'_> {
    fn fuel_source_mut(&mut self, source: Entity) -> Option<&mut FuelSource> {
        self.world.query_one_mut::<&mut FuelSource>(source).ok()
    }

    fn fire_mut(&mut self, fire: Entity) -> Option<&mut Fire> {
        self.world.query_one_mut::<&mut Fire>(fire).ok()
    }
}

/// Resolve targets and run interact commands for every player.
///
/// Dead players keep their prompt state updated but cannot act.
pub fn interaction_system(world: &mut World, delta_seconds: f32, events: &mut EventQueue) {
    let scene = ColliderWorld::build(world);

    let players: Vec<(Entity, PlayerInput, Position, bool)> = world
        .query::<(&Player, &PlayerInput, &Position, Option<&ThermalModel>)>()
        .iter()
        .map(|(entity, (_, input, position, thermal))| {
            (entity, *input, *position, thermal.is_some_and(|t| t.is_dead()))
        })
        .collect();

    for (player, input, position, dead) in players {
        let Ok(mut arbiter) = world.remove_one::<InteractionArbiter<Entity>>(player) else {
            continue;
        };
        let Ok(mut carried) = world.get::<&CarriedFuel>(player).map(|c| *c) else {
            let _ = world.insert_one(player, arbiter);
            continue;
        };

        let command = InteractInput {
            aim: input.aim,
            position: position.0,
            interact_held: input.interact_held && !dead,
        };
        let result = arbiter.tick(
            delta_seconds,
            &command,
            &scene,
            &mut WorldTargets::new(world),
            &mut carried,
        );

        match result {
            Ok(Some(InteractOutcome::Collected { source, amount })) => {
                events.push(SimEvent::FuelCollected { player, source, amount });
            }
            Ok(Some(InteractOutcome::Deposited { fire, amount })) => {
                events.push(SimEvent::FuelDeposited { player, fire, amount });
            }
            // Lighting is announced by the fire's own notification.
            Ok(Some(InteractOutcome::Lit { .. })) | Ok(None) | Err(_) => {}
        }
        for message in arbiter.take_messages() {
            events.push(SimEvent::Message {
                player,
                text: message.text,
                duration: message.duration,
            });
        }

        if let Ok(slot) = world.query_one_mut::<&mut CarriedFuel>(player) {
            *slot = carried;
        }
        let _ = world.insert_one(player, arbiter);
    }
}
