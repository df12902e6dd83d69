//! Simulation events surfaced to the host.
//!
//! Systems push into an [`EventQueue`]; the host drains it after each update
//! to drive audio, lighting, and HUD updates.

use hecs::Entity;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    FireBurningChanged { fire: Entity, burning: bool },
    /// Fuel level changed; `percentage` is in `[0, 1]`.
    FireFuelChanged { fire: Entity, percentage: f32 },
    WarmthEntered { player: Entity, fire: Entity },
    WarmthExited { player: Entity, fire: Entity },
    PlayerDied { player: Entity },
    FuelCollected { player: Entity, source: Entity, amount: f32 },
    FuelDeposited { player: Entity, fire: Entity, amount: f32 },
    FuelRespawned { source: Entity },
    /// A collected loose item left the world.
    FuelRemoved { source: Entity },
    /// Transient HUD text for `player`.
    Message { player: Entity, text: String, duration: f32 },
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }
}

impl Extend<SimEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = SimEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}
