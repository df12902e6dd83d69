//! Pure survival-economy logic for Hearthfire.
//!
//! Everything here works on plain data and returns plain results: no ECS,
//! no engine, no I/O. The `hearthfire-core` crate wires these types into a
//! hecs world; hosts can also drive them directly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | JSON-loadable tunables with validation |
//! | [`error`] | Rejection types whose text doubles as player messages |
//! | [`fire`] | Fuel/burn state machine with an event outbox |
//! | [`fuel`] | Fuel sources, respawn timers, the player's carried fuel |
//! | [`geometry`] | Vectors, rays, spheres and boxes |
//! | [`interaction`] | Target resolution, fuel transfer, prompts |
//! | [`thermal`] | Body temperature and health regulation |

pub mod config;
pub mod error;
pub mod fire;
pub mod fuel;
pub mod geometry;
pub mod interaction;
pub mod thermal;
