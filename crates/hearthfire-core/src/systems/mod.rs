//! Systems - logic that operates on components

mod fire;
mod interaction;
mod respawn;
mod thermal;
mod warmth;

pub use fire::*;
pub use interaction::*;
pub use respawn::*;
pub use thermal::*;
pub use warmth::*;
