//! Component definitions for the ECS simulation.
//!
//! Components are plain data attached to entities. The survival state
//! machines themselves (`Fire`, `FuelSource`, `CarriedFuel`, `ThermalModel`,
//! `InteractionArbiter`) live in `hearthfire-logic` and are attached as-is.

mod common;
mod survival;

pub use common::*;
pub use survival::*;
