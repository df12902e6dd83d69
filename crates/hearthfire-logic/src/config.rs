//! Simulation tunables, loadable from JSON.
//!
//! Every section defaults field by field, so a config file only needs the
//! values it overrides:
//!
//! ```json
//! { "fire": { "burn_rate": 2.5 }, "carry": { "max_carry": 60 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fire::FireParams;
use crate::fuel::{FuelKind, FuelSource, Respawn};
use crate::interaction::InteractionParams;
use crate::thermal::ThermalParams;

/// Player inventory limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarryParams {
    pub max_carry: f32,
}

impl Default for CarryParams {
    fn default() -> Self {
        Self { max_carry: 100.0 }
    }
}

/// Regrowth times for harvestable fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelSourceParams {
    pub tree_respawn_secs: f32,
    pub grass_respawn_secs: f32,
}

impl Default for FuelSourceParams {
    fn default() -> Self {
        Self {
            tree_respawn_secs: 300.0,
            grass_respawn_secs: 60.0,
        }
    }
}

impl FuelSourceParams {
    pub fn respawn_for(&self, kind: FuelKind) -> Respawn {
        match kind {
            FuelKind::Tree => Respawn::After(self.tree_respawn_secs),
            FuelKind::Grass => Respawn::After(self.grass_respawn_secs),
            _ => Respawn::Never,
        }
    }

    /// Source of `kind` with its default yield and the configured regrowth.
    pub fn source(&self, kind: FuelKind) -> FuelSource {
        FuelSource::new(kind, kind.default_value(), self.respawn_for(kind))
    }
}

/// Top-level configuration for a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub fire: FireParams,
    pub thermal: ThermalParams,
    pub carry: CarryParams,
    pub interaction: InteractionParams,
    pub fuel_sources: FuelSourceParams,
}

impl SimConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        match config.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(config),
        }
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section, returning all problems found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &'static str, reason: &str| {
            if !ok {
                errors.push(ConfigError::Invalid {
                    field,
                    reason: reason.to_string(),
                });
            }
        };

        let f = &self.fire;
        check(f.max_fuel > 0.0, "fire.max_fuel", "must be positive");
        check(f.burn_rate >= 0.0, "fire.burn_rate", "must not be negative");
        check(
            f.min_fuel_to_burn >= 0.0 && f.min_fuel_to_burn <= f.max_fuel,
            "fire.min_fuel_to_burn",
            "must lie within [0, max_fuel]",
        );
        check(f.initial_fuel >= 0.0, "fire.initial_fuel", "must not be negative");

        let t = &self.thermal;
        check(
            t.min_safe_temperature < t.max_safe_temperature,
            "thermal.min_safe_temperature",
            "must be below max_safe_temperature",
        );
        check(t.influence_radius > 0.0, "thermal.influence_radius", "must be positive");
        check(t.max_health > 0.0, "thermal.max_health", "must be positive");
        check(t.regen_rate >= 0.0, "thermal.regen_rate", "must not be negative");
        check(t.decay_rate >= 0.0, "thermal.decay_rate", "must not be negative");
        check(
            t.lerp_speed_near >= 0.0 && t.lerp_speed_far >= 0.0,
            "thermal.lerp_speed",
            "must not be negative",
        );

        check(self.carry.max_carry > 0.0, "carry.max_carry", "must be positive");

        let i = &self.interaction;
        check(
            i.max_interact_distance > 0.0,
            "interaction.max_interact_distance",
            "must be positive",
        );
        check(
            i.proximity_interact_radius >= 0.0,
            "interaction.proximity_interact_radius",
            "must not be negative",
        );
        check(
            i.deposit_tolerance >= 0.0,
            "interaction.deposit_tolerance",
            "must not be negative",
        );

        let s = &self.fuel_sources;
        check(
            s.tree_respawn_secs >= 0.0 && s.grass_respawn_secs >= 0.0,
            "fuel_sources.respawn_secs",
            "must not be negative",
        );

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.fire.max_fuel, 100.0);
        assert_eq!(config.thermal.ambient_temperature, 15.0);
        assert_eq!(config.interaction.proximity_interact_radius, 2.5);
        assert_eq!(config.carry.max_carry, 100.0);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config = SimConfig::from_json_str(
            r#"{ "fire": { "burn_rate": 2.5 }, "carry": { "max_carry": 60 } }"#,
        )
        .unwrap();
        assert_eq!(config.fire.burn_rate, 2.5);
        assert_eq!(config.fire.max_fuel, 100.0);
        assert_eq!(config.carry.max_carry, 60.0);
        assert_eq!(config.thermal, ThermalParams::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SimConfig::from_json_str("{}").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            SimConfig::from_json_str("{ fire: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = SimConfig::from_json_str(r#"{ "thermal": { "min_safe_temperature": 50 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "thermal.min_safe_temperature",
                ..
            }
        ));

        let mut config = SimConfig::default();
        config.fire.max_fuel = 0.0;
        config.carry.max_carry = -1.0;
        // min_fuel_to_burn now exceeds max_fuel as well
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = SimConfig::default().to_json_string().unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), SimConfig::default());
    }

    #[test]
    fn test_fuel_source_respawn_policy() {
        let params = FuelSourceParams {
            grass_respawn_secs: 10.0,
            ..Default::default()
        };
        assert_eq!(params.source(FuelKind::Grass).respawn, Respawn::After(10.0));
        assert_eq!(params.source(FuelKind::Coal).respawn, Respawn::Never);
        assert_eq!(params.source(FuelKind::Tree).fuel_value, 30.0);
    }
}
