//! Hearthfire Core - survival simulation engine
//!
//! Fires burn down their fuel, players stay alive by staying warm, and fuel
//! gathered from the world keeps the fires going.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: fires, players, fuel sources, their child colliders, scenery
//! - **Components**: `Position`, `Collider`, `Parent`, plus the survival state
//!   machines from `hearthfire-logic` (`Fire`, `FuelSource`, `ThermalModel`, ...)
//! - **Systems**: per-tick passes over those components, run in a fixed order
//!   by [`engine::SimulationEngine::update`]
//!
//! # Example
//!
//! ```rust,no_run
//! use hearthfire_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new();
//! let fire = engine.spawn_campfire(Vec3::ZERO);
//! let player = engine.spawn_player("Ash", Vec3::new(2.0, 0.0, 0.0));
//! engine.add_fuel(fire, 40.0).ok();
//!
//! loop {
//!     engine.update(1.0 / 60.0);
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//!     let _status = engine.player_status(player);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod events;
pub mod spawn;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{FireStatus, PlayerStatus, SimulationEngine};
    pub use crate::events::SimEvent;
    pub use hearthfire_logic::config::SimConfig;
    pub use hearthfire_logic::fuel::FuelKind;
}
