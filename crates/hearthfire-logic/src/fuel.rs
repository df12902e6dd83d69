//! Fuel bookkeeping: harvestable world sources and the player's carried stock.
//!
//! Sources are collected whole; the carrier only keeps what fits. Harvestable
//! plants (trees, grass) regrow after a respawn timer, loose items are gone
//! for good once picked up.

use serde::{Deserialize, Serialize};

use crate::error::{CollectError, FuelError};
use crate::fire::Fire;

/// Kinds of collectible fuel found in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelKind {
    Wood,
    Stick,
    Grass,
    Coal,
    Paper,
    Tree,
}

impl FuelKind {
    pub const ALL: [FuelKind; 6] = [
        FuelKind::Wood,
        FuelKind::Stick,
        FuelKind::Grass,
        FuelKind::Coal,
        FuelKind::Paper,
        FuelKind::Tree,
    ];

    /// Name shown in the collect prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            FuelKind::Wood => "Wood",
            FuelKind::Stick => "Stick",
            FuelKind::Grass => "Grass",
            FuelKind::Coal => "Coal",
            FuelKind::Paper => "Paper",
            FuelKind::Tree => "Tree",
        }
    }

    /// Fuel yielded by one collection.
    pub fn default_value(&self) -> f32 {
        match self {
            FuelKind::Wood => 25.0,
            FuelKind::Stick => 10.0,
            FuelKind::Grass => 5.0,
            FuelKind::Coal => 40.0,
            FuelKind::Paper => 3.0,
            FuelKind::Tree => 30.0,
        }
    }

    /// Harvestable plants regrow; loose items do not.
    pub fn is_harvestable(&self) -> bool {
        matches!(self, FuelKind::Tree | FuelKind::Grass)
    }

    /// Seconds until a harvested plant of this kind regrows.
    pub fn default_respawn(&self) -> Respawn {
        match self {
            FuelKind::Tree => Respawn::After(300.0),
            FuelKind::Grass => Respawn::After(60.0),
            _ => Respawn::Never,
        }
    }
}

/// What happens to a source after it has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Respawn {
    /// Loose item: removed from the world after collection.
    Never,
    /// Harvestable: collectible again after this many seconds.
    After(f32),
}

/// A world object holding a collectible amount of fuel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSource {
    pub kind: FuelKind,
    pub fuel_value: f32,
    pub respawn: Respawn,
    collected: bool,
    respawn_timer: f32,
}

impl FuelSource {
    pub fn new(kind: FuelKind, fuel_value: f32, respawn: Respawn) -> Self {
        Self {
            kind,
            fuel_value: fuel_value.max(0.0),
            respawn,
            collected: false,
            respawn_timer: 0.0,
        }
    }

    /// Source with the kind's default value and respawn policy.
    pub fn of_kind(kind: FuelKind) -> Self {
        Self::new(kind, kind.default_value(), kind.default_respawn())
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn respawn_timer(&self) -> f32 {
        self.respawn_timer
    }

    /// Collected and never coming back; the owner should remove it.
    pub fn is_spent(&self) -> bool {
        self.collected && self.respawn == Respawn::Never
    }

    /// Mark the source collected and hand out its full value.
    pub fn collect(&mut self) -> Result<f32, CollectError> {
        if self.collected {
            return Err(CollectError::AlreadyCollected);
        }
        self.collected = true;
        self.respawn_timer = 0.0;
        Ok(self.fuel_value)
    }

    /// Advance the respawn timer. Returns true on the tick the source regrows.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Respawn::After(respawn_time) = self.respawn else {
            return false;
        };
        if !self.collected {
            return false;
        }

        self.respawn_timer += dt.max(0.0);
        if self.respawn_timer >= respawn_time {
            self.collected = false;
            self.respawn_timer = 0.0;
            log::info!("{} has regrown", self.kind.display_name());
            return true;
        }
        false
    }
}

/// The player's single scalar fuel inventory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarriedFuel {
    amount: f32,
    max_carry: f32,
}

impl CarriedFuel {
    pub fn new(max_carry: f32) -> Self {
        Self {
            amount: 0.0,
            max_carry: max_carry.max(0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn max_carry(&self) -> f32 {
        self.max_carry
    }

    pub fn is_empty(&self) -> bool {
        self.amount <= 0.0
    }

    pub fn remaining_capacity(&self) -> f32 {
        (self.max_carry - self.amount).max(0.0)
    }

    /// How much of `fuel_value` would fit right now.
    pub fn transferable(&self, fuel_value: f32) -> f32 {
        fuel_value.min(self.remaining_capacity()).max(0.0)
    }

    /// Collect `source`, keeping only what fits. The source is marked
    /// collected either way; any unclaimed remainder is lost.
    pub fn collect_from(&mut self, source: &mut FuelSource) -> Result<f32, CollectError> {
        if source.is_collected() {
            return Err(CollectError::AlreadyCollected);
        }
        let transferable = self.transferable(source.fuel_value);
        if transferable <= 0.0 {
            return Err(CollectError::CarryFull);
        }

        source.collect()?;
        self.amount += transferable;
        Ok(transferable)
    }

    /// Pour everything carried into `fire`. On success the carrier is empty
    /// and the deposited amount is returned; on failure nothing changes.
    pub fn deposit_into(&mut self, fire: &mut Fire) -> Result<f32, FuelError> {
        let deposited = self.amount;
        fire.add_fuel(deposited)?;
        self.amount = 0.0;
        Ok(deposited)
    }
}

impl Default for CarriedFuel {
    fn default() -> Self {
        Self::new(100.0)
    }
}
