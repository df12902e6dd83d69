//! Rejection types for fire, fuel, and interaction operations.
//!
//! Every rejection is recoverable: the operation that produced it left all
//! state untouched. The `Display` text doubles as the transient message shown
//! to the player.

/// Why `Fire::add_fuel` refused a deposit.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum FuelError {
    /// Deposit amount was zero, negative, or NaN.
    #[error("Nothing to add")]
    NonPositiveAmount,

    /// Fire is already at capacity.
    #[error("Fire cannot accept more fuel")]
    FireFull,
}

/// Why `Fire::light` refused to light.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LightError {
    /// Fire has lighting disabled.
    #[error("This fire cannot be lit")]
    CannotBeLit,

    /// Below the minimum fuel needed to start burning.
    #[error("Needs {required:.0} fuel to light ({fuel:.0} now)")]
    InsufficientFuel { fuel: f32, required: f32 },
}

/// Why a fuel source could not be collected.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CollectError {
    /// Source was already harvested and has not respawned.
    #[error("Already collected")]
    AlreadyCollected,

    /// Carried fuel is at capacity.
    #[error("Cannot carry more fuel")]
    CarryFull,
}

/// Why an interact command had no effect.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum InteractError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Fuel(#[from] FuelError),

    #[error(transparent)]
    Light(#[from] LightError),

    /// Target entity disappeared between resolution and action.
    #[error("Target is gone")]
    TargetMissing,
}

/// Configuration load/validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_read_as_player_text() {
        assert_eq!(FuelError::FireFull.to_string(), "Fire cannot accept more fuel");
        assert_eq!(CollectError::CarryFull.to_string(), "Cannot carry more fuel");
        let light = LightError::InsufficientFuel {
            fuel: 4.2,
            required: 10.0,
        };
        assert_eq!(light.to_string(), "Needs 10 fuel to light (4 now)");
    }

    #[test]
    fn test_interact_error_is_transparent() {
        let err: InteractError = FuelError::FireFull.into();
        assert_eq!(err.to_string(), FuelError::FireFull.to_string());
    }
}
