//! Entity builders for fires, players, fuel and scenery.
//!
//! Fires and harvestable plants are small hierarchies: a root entity owning
//! the state plus child collider entities linked by [`Parent`].

use hearthfire_logic::config::SimConfig;
use hearthfire_logic::fire::{Fire, FireParams};
use hearthfire_logic::fuel::{CarriedFuel, FuelKind, FuelSource};
use hearthfire_logic::interaction::InteractionArbiter;
use hearthfire_logic::thermal::ThermalModel;
use hecs::{Entity, World};

use crate::components::*;

/// Radius of a campfire's deposit sphere.
pub const DEPOSIT_RADIUS: f32 = 0.75;

/// Spawn a fire site with its deposit and warmth-sensing colliders.
pub fn spawn_campfire(world: &mut World, position: Vec3, params: FireParams, sensing_radius: f32) -> Entity {
    let fire = world.spawn((Fire::new(params), Position(position)));
    world.spawn((
        Parent(fire),
        Collider::new(Volume::sphere(Vec3::ZERO, DEPOSIT_RADIUS), ColliderKind::FireDeposit),
    ));
    world.spawn((
        Parent(fire),
        Collider::new(Volume::sphere(Vec3::ZERO, sensing_radius), ColliderKind::FireSensing),
    ));
    fire
}

/// Spawn a player with the thermal, carry and interaction settings of `config`.
pub fn spawn_player(world: &mut World, name: impl Into<String>, position: Vec3, config: &SimConfig) -> Entity {
    world.spawn((
        Player { name: name.into() },
        Position(position),
        PlayerInput::default(),
        ThermalModel::new(config.thermal),
        CarriedFuel::new(config.carry.max_carry),
        InteractionArbiter::<Entity>::new(config.interaction),
        WarmthAssociation::default(),
    ))
}

/// Spawn a fuel source. Harvestable plants get a child trunk/tuft collider;
/// loose items carry their collider on the root.
pub fn spawn_fuel_source(world: &mut World, position: Vec3, source: FuelSource) -> Entity {
    let kind = source.kind;
    if kind.is_harvestable() {
        let root = world.spawn((source, Position(position)));
        world.spawn((Parent(root), Collider::new(body_volume(kind), ColliderKind::FuelBody)));
        root
    } else {
        world.spawn((
            source,
            Position(position),
            Collider::new(body_volume(kind), ColliderKind::FuelBody),
        ))
    }
}

/// Spawn scenery that blocks the aim ray.
pub fn spawn_obstacle(world: &mut World, position: Vec3, volume: Volume) -> Entity {
    world.spawn((Position(position), Collider::new(volume, ColliderKind::Obstacle)))
}

fn body_volume(kind: FuelKind) -> Volume {
    match kind {
        FuelKind::Tree => Volume::cuboid(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.6, 4.0, 0.6)),
        FuelKind::Grass => Volume::sphere(Vec3::new(0.0, 0.2, 0.0), 0.4),
        FuelKind::Wood | FuelKind::Coal => Volume::sphere(Vec3::ZERO, 0.3),
        FuelKind::Stick | FuelKind::Paper => Volume::sphere(Vec3::ZERO, 0.2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campfire_hierarchy() {
        let mut world = World::new();
        let fire = spawn_campfire(&mut world, Vec3::ZERO, FireParams::default(), 10.0);
        let children: Vec<ColliderKind> = world
            .query::<(&Parent, &Collider)>()
            .iter()
            .filter(|(_, (parent, _))| parent.0 == fire)
            .map(|(_, (_, collider))| collider.kind)
            .collect();
        assert_eq!(children.len(), 2);
        assert!(children.contains(&ColliderKind::FireDeposit));
        assert!(children.contains(&ColliderKind::FireSensing));
    }

    #[test]
    fn test_player_components() {
        let mut world = World::new();
        let config = SimConfig::default();
        let player = spawn_player(&mut world, "Ash", Vec3::ZERO, &config);
        assert_eq!(world.get::<&Player>(player).unwrap().name, "Ash");
        assert_eq!(world.get::<&CarriedFuel>(player).unwrap().max_carry(), 100.0);
        assert!(world.get::<&InteractionArbiter<Entity>>(player).is_ok());
        assert_eq!(world.get::<&WarmthAssociation>(player).unwrap().fire, None);
    }

    #[test]
    fn test_harvestable_uses_child_collider() {
        let mut world = World::new();
        let tree = spawn_fuel_source(&mut world, Vec3::ZERO, FuelSource::of_kind(FuelKind::Tree));
        let stick = spawn_fuel_source(&mut world, Vec3::ZERO, FuelSource::of_kind(FuelKind::Stick));
        assert!(world.get::<&Collider>(tree).is_err());
        assert!(world.get::<&Collider>(stick).is_ok());
        assert_eq!(world.query::<&Collider>().iter().count(), 2);
    }
}
