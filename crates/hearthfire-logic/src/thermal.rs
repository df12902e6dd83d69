//! Body temperature and health regulation.
//!
//! Body temperature relaxes toward a target that rises from the ambient
//! temperature toward the fire's warmth as the player closes in on a burning
//! fire. Convergence is itself faster near the fire. Health drains while the
//! body is colder than the safe band and regenerates only inside the band
//! *and* next to a burning fire. Reaching zero health is terminal until
//! [`ThermalModel::reset`].

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp01, lerp, Vec3};

/// Absolute limits for body temperature.
pub const MIN_BODY_TEMPERATURE: f32 = 0.0;
pub const MAX_BODY_TEMPERATURE: f32 = 50.0;

/// Per-player thermal constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalParams {
    pub ambient_temperature: f32,
    pub min_safe_temperature: f32,
    pub max_safe_temperature: f32,
    /// Temperature approached when standing in a burning fire.
    pub fire_target_temperature: f32,
    /// Distance at which fire warmth fades to nothing.
    pub influence_radius: f32,
    pub starting_temperature: f32,
    pub max_health: f32,
    /// Health per second regained while warm by a burning fire.
    pub regen_rate: f32,
    /// Health per second lost while cold.
    pub decay_rate: f32,
    /// Convergence rate (1/s) right at a burning fire.
    pub lerp_speed_near: f32,
    /// Convergence rate (1/s) away from any burning fire.
    pub lerp_speed_far: f32,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            ambient_temperature: 15.0,
            min_safe_temperature: 20.0,
            max_safe_temperature: 45.0,
            fire_target_temperature: 40.0,
            influence_radius: 10.0,
            starting_temperature: 37.0,
            max_health: 100.0,
            regen_rate: 5.0,
            decay_rate: 2.0,
            lerp_speed_near: 1.5,
            lerp_speed_far: 0.5,
        }
    }
}

/// What the model needs to know about the associated fire this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireReading {
    pub burning: bool,
    pub position: Vec3,
}

/// Result of one thermal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalTick {
    /// Player already dead; nothing changed.
    Frozen,
    Alive,
    /// Health reached zero on this tick. Reported exactly once.
    Died,
}

/// Temperature and health state for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalModel {
    params: ThermalParams,
    body_temperature: f32,
    health: f32,
    dead: bool,
}

impl ThermalModel {
    pub fn new(params: ThermalParams) -> Self {
        Self {
            params,
            body_temperature: params
                .starting_temperature
                .clamp(MIN_BODY_TEMPERATURE, MAX_BODY_TEMPERATURE),
            health: params.max_health.max(0.0),
            dead: false,
        }
    }

    pub fn params(&self) -> &ThermalParams {
        &self.params
    }

    pub fn body_temperature(&self) -> f32 {
        self.body_temperature
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Health as `[0, 1]`; zero when max health is non-positive.
    pub fn health_percentage(&self) -> f32 {
        if self.params.max_health <= 0.0 {
            return 0.0;
        }
        clamp01(self.health / self.params.max_health)
    }

    /// Position of body temperature within the safe band. Not clamped:
    /// below 0 is colder than safe, above 1 hotter than safe.
    pub fn temperature_percentage(&self) -> f32 {
        let band = self.params.max_safe_temperature - self.params.min_safe_temperature;
        if band <= 0.0 {
            return 0.0;
        }
        (self.body_temperature - self.params.min_safe_temperature) / band
    }

    /// Warmth factor `[0, 1]` from a fire: zero when unlit or absent.
    pub fn fire_influence(&self, fire: Option<FireReading>, player_position: Vec3) -> f32 {
        match fire {
            Some(reading) if reading.burning && self.params.influence_radius > 0.0 => {
                let distance = player_position.distance(&reading.position);
                clamp01(1.0 - distance / self.params.influence_radius)
            }
            _ => 0.0,
        }
    }

    /// Advance temperature then health by `dt` seconds.
    pub fn tick(&mut self, dt: f32, fire: Option<FireReading>, player_position: Vec3) -> ThermalTick {
        if self.dead {
            return ThermalTick::Frozen;
        }
        let dt = dt.max(0.0);
        let p = self.params;

        let influence = self.fire_influence(fire, player_position);
        let target = lerp(p.ambient_temperature, p.fire_target_temperature, influence);
        let rate = lerp(p.lerp_speed_far, p.lerp_speed_near, influence);
        self.body_temperature = lerp(self.body_temperature, target, clamp01(dt * rate))
            .clamp(MIN_BODY_TEMPERATURE, MAX_BODY_TEMPERATURE);

        let fire_burning = fire.is_some_and(|f| f.burning);
        let temp = self.body_temperature;
        if temp < p.min_safe_temperature {
            self.health -= p.decay_rate * dt;
        } else if temp > p.min_safe_temperature && temp < p.max_safe_temperature && fire_burning {
            self.health += p.regen_rate * dt;
        }
        self.health = self.health.clamp(0.0, p.max_health.max(0.0));

        log::trace!(
            "thermal tick: temp={:.2} target={:.2} influence={:.2} health={:.2}",
            self.body_temperature,
            target,
            influence,
            self.health
        );

        if self.health <= 0.0 {
            self.dead = true;
            log::info!("Player died of cold");
            return ThermalTick::Died;
        }
        ThermalTick::Alive
    }

    /// Restore starting temperature and full health, clearing death.
    pub fn reset(&mut self) {
        *self = Self::new(self.params);
    }
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self::new(ThermalParams::default())
    }
}
