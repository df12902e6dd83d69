//! Simulation engine - main entry point for running the simulation

use hearthfire_logic::config::SimConfig;
use hearthfire_logic::error::InteractError;
use hearthfire_logic::fire::{Fire, FireParams};
use hearthfire_logic::fuel::{CarriedFuel, FuelKind, FuelSource};
use hearthfire_logic::interaction::{InteractionArbiter, Prompt};
use hearthfire_logic::thermal::ThermalModel;
use hecs::{Entity, World};
use serde::Serialize;

use crate::components::*;
use crate::events::{EventQueue, SimEvent};
use crate::spawn;
use crate::systems::*;

/// Snapshot of a fire for the HUD and presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireStatus {
    pub fuel: f32,
    pub max_fuel: f32,
    pub percentage: f32,
    pub burning: bool,
    pub intensity: f32,
}

/// Snapshot of a player's survival state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStatus {
    pub health: f32,
    pub health_percentage: f32,
    pub body_temperature: f32,
    /// Position within the safe band; may leave `[0, 1]`.
    pub temperature_percentage: f32,
    pub carried_fuel: f32,
    pub max_carry: f32,
    pub dead: bool,
    pub warmth: Option<Entity>,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Simulation time in seconds since start
    sim_time: f64,
    config: SimConfig,
    events: EventQueue,
    /// Host-supplied trigger signals waiting for the next update
    pending_triggers: Vec<TriggerSignal>,
    triggers: TriggerTracker,
    auto_triggers: bool,
    time_scale: f32,
}

impl SimulationEngine {
    /// Create an empty simulation with default tunables
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            config,
            events: EventQueue::new(),
            pending_triggers: Vec::new(),
            triggers: TriggerTracker::new(),
            auto_triggers: true,
            time_scale: 1.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds.max(0.0) * self.time_scale;
        self.sim_time += dt as f64;

        // Warmth association from trigger crossings
        let mut signals = std::mem::take(&mut self.pending_triggers);
        if self.auto_triggers {
            signals.extend(self.triggers.detect(&self.world));
        }
        apply_trigger_signals(&mut self.world, &signals, &mut self.events);

        // Fires burn before anyone reads their burning flag
        fire_system(&mut self.world, dt);
        thermal_system(&mut self.world, dt, &mut self.events);
        respawn_system(&mut self.world, dt, &mut self.events);

        // Deposits land after this tick's decay
        interaction_system(&mut self.world, dt, &mut self.events);

        despawn_spent_fuel(&mut self.world, &mut self.events);
        collect_fire_events(&mut self.world, &mut self.events);
    }

    /// Take every event produced since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Campfire using the configured fire tunables; warmth reaches as far as
    /// the thermal influence radius.
    pub fn spawn_campfire(&mut self, position: Vec3) -> Entity {
        let radius = self.config.thermal.influence_radius;
        spawn::spawn_campfire(&mut self.world, position, self.config.fire, radius)
    }

    pub fn spawn_campfire_with(&mut self, position: Vec3, params: FireParams, sensing_radius: f32) -> Entity {
        spawn::spawn_campfire(&mut self.world, position, params, sensing_radius)
    }

    pub fn spawn_player(&mut self, name: impl Into<String>, position: Vec3) -> Entity {
        spawn::spawn_player(&mut self.world, name, position, &self.config)
    }

    /// Fuel source of `kind` with the configured regrowth time.
    pub fn spawn_fuel(&mut self, kind: FuelKind, position: Vec3) -> Entity {
        let source = self.config.fuel_sources.source(kind);
        spawn::spawn_fuel_source(&mut self.world, position, source)
    }

    pub fn spawn_fuel_source(&mut self, position: Vec3, source: FuelSource) -> Entity {
        spawn::spawn_fuel_source(&mut self.world, position, source)
    }

    pub fn spawn_obstacle(&mut self, position: Vec3, volume: Volume) -> Entity {
        spawn::spawn_obstacle(&mut self.world, position, volume)
    }

    /// Move an entity. Returns false if it has no position.
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> bool {
        match self.world.query_one_mut::<&mut Position>(entity) {
            Ok(slot) => {
                slot.0 = position;
                true
            }
            Err(_) => false,
        }
    }

    /// Replace a player's input snapshot. Returns false for non-players.
    pub fn set_input(&mut self, player: Entity, input: PlayerInput) -> bool {
        match self.world.query_one_mut::<&mut PlayerInput>(player) {
            Ok(slot) => {
                *slot = input;
                true
            }
            Err(_) => false,
        }
    }

    /// Queue a trigger-enter from the host's physics layer.
    pub fn trigger_enter(&mut self, player: Entity, collider: Entity) {
        self.pending_triggers.push(TriggerSignal::Enter { player, collider });
    }

    /// Queue a trigger-exit from the host's physics layer.
    pub fn trigger_exit(&mut self, player: Entity, collider: Entity) {
        self.pending_triggers.push(TriggerSignal::Exit { player, collider });
    }

    /// Derive trigger crossings from positions (on by default). Hosts that
    /// report their own triggers should turn this off.
    pub fn set_auto_triggers(&mut self, enabled: bool) {
        self.auto_triggers = enabled;
        if !enabled {
            self.triggers.clear();
        }
    }

    pub fn auto_triggers(&self) -> bool {
        self.auto_triggers
    }

    pub fn add_fuel(&mut self, fire: Entity, amount: f32) -> Result<f32, InteractError> {
        let fire = self
            .world
            .query_one_mut::<&mut Fire>(fire)
            .map_err(|_| InteractError::TargetMissing)?;
        Ok(fire.add_fuel(amount)?)
    }

    pub fn light(&mut self, fire: Entity) -> Result<(), InteractError> {
        let fire = self
            .world
            .query_one_mut::<&mut Fire>(fire)
            .map_err(|_| InteractError::TargetMissing)?;
        Ok(fire.light()?)
    }

    /// Returns false if `fire` is not a fire.
    pub fn extinguish(&mut self, fire: Entity) -> bool {
        match self.world.query_one_mut::<&mut Fire>(fire) {
            Ok(fire) => {
                fire.extinguish();
                true
            }
            Err(_) => false,
        }
    }

    /// Bring a player back: starting temperature, full health.
    pub fn reset_player(&mut self, player: Entity) -> bool {
        match self.world.query_one_mut::<&mut ThermalModel>(player) {
            Ok(model) => {
                model.reset();
                log::info!("Player {:?} reset", player);
                true
            }
            Err(_) => false,
        }
    }

    pub fn fire_status(&self, fire: Entity) -> Option<FireStatus> {
        let fire = self.world.get::<&Fire>(fire).ok()?;
        Some(FireStatus {
            fuel: fire.fuel(),
            max_fuel: fire.max_fuel(),
            percentage: fire.fuel_percentage(),
            burning: fire.is_burning(),
            intensity: fire.intensity(),
        })
    }

    pub fn player_status(&self, player: Entity) -> Option<PlayerStatus> {
        let mut query = self
            .world
            .query_one::<(&ThermalModel, &CarriedFuel, Option<&WarmthAssociation>)>(player)
            .ok()?;
        let (model, carried, warmth) = query.get()?;
        Some(PlayerStatus {
            health: model.health(),
            health_percentage: model.health_percentage(),
            body_temperature: model.body_temperature(),
            temperature_percentage: model.temperature_percentage(),
            carried_fuel: carried.amount(),
            max_carry: carried.max_carry(),
            dead: model.is_dead(),
            warmth: warmth.and_then(|w| w.fire),
        })
    }

    pub fn prompt(&self, player: Entity) -> Option<Prompt> {
        self.world
            .get::<&InteractionArbiter<Entity>>(player)
            .ok()
            .map(|arbiter| arbiter.prompt().clone())
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn fire_count(&self) -> usize {
        self.world.query::<&Fire>().iter().count()
    }

    pub fn burning_fire_count(&self) -> usize {
        burning_fire_count(&self.world)
    }

    pub fn player_count(&self) -> usize {
        self.world.query::<&Player>().iter().count()
    }

    pub fn fuel_source_count(&self) -> usize {
        self.world.query::<&FuelSource>().iter().count()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthfire_logic::error::FuelError;

    #[test]
    fn test_engine_creation() {
        let engine = SimulationEngine::new();
        assert_eq!(engine.fire_count(), 0);
        assert_eq!(engine.player_count(), 0);
        assert_eq!(engine.sim_time(), 0.0);
        assert!(engine.auto_triggers());
    }

    #[test]
    fn test_time_scale() {
        let mut engine = SimulationEngine::new();
        engine.set_time_scale(2.0);
        engine.update(1.0);
        assert!((engine.sim_time() - 2.0).abs() < 1e-6);

        engine.set_time_scale(-1.0);
        assert_eq!(engine.time_scale(), 0.0);
    }

    #[test]
    fn test_fire_controls() {
        let mut engine = SimulationEngine::new();
        let fire = engine.spawn_campfire(Vec3::ZERO);

        assert_eq!(engine.add_fuel(fire, 0.0), Err(InteractError::Fuel(FuelError::NonPositiveAmount)));
        assert_eq!(engine.add_fuel(fire, 30.0), Ok(30.0));
        assert!(engine.fire_status(fire).unwrap().burning);

        assert!(engine.extinguish(fire));
        assert!(!engine.fire_status(fire).unwrap().burning);
        assert_eq!(engine.light(fire), Ok(()));

        let player = engine.spawn_player("Ash", Vec3::ZERO);
        assert_eq!(engine.add_fuel(player, 5.0), Err(InteractError::TargetMissing));
        assert!(!engine.extinguish(player));
        assert!(engine.fire_status(player).is_none());
    }

    #[test]
    fn test_player_status_and_reset() {
        let mut engine = SimulationEngine::new();
        let player = engine.spawn_player("Ash", Vec3::ZERO);
        engine.update(1.0);

        let status = engine.player_status(player).unwrap();
        assert!(status.body_temperature < 37.0);
        assert_eq!(status.carried_fuel, 0.0);
        assert!(!status.dead);

        assert!(engine.reset_player(player));
        assert_eq!(engine.player_status(player).unwrap().body_temperature, 37.0);
        assert_eq!(engine.prompt(player), Some(Prompt::default()));
    }
}
