//! Fire fuel/burn state machine.
//!
//! A fire owns a finite fuel reserve and a burning flag. It burns fuel at a
//! fixed rate while lit and goes out on its own when the reserve hits zero.
//!
//! ```text
//!            light() / add_fuel() reaching min_fuel_to_burn
//!   Unlit ─────────────────────────────────────────────────▶ Burning
//!     ▲                                                        │
//!     └──────────── extinguish() / tick() draining to 0 ───────┘
//! ```
//!
//! Every change is recorded as a [`FireEvent`] in the fire's own outbox;
//! consumers (light, audio, UI) drain it with [`Fire::take_events`].

use serde::{Deserialize, Serialize};

use crate::error::{FuelError, LightError};
use crate::geometry::clamp01;

/// Tunables fixed per fire instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireParams {
    pub max_fuel: f32,
    /// Fuel consumed per second while burning.
    pub burn_rate: f32,
    /// Minimum fuel needed to start burning (not to keep burning).
    pub min_fuel_to_burn: f32,
    pub can_be_lit: bool,
    /// Start with `initial_fuel` and light immediately if allowed.
    pub start_lit: bool,
    pub initial_fuel: f32,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            max_fuel: 100.0,
            burn_rate: 5.0,
            min_fuel_to_burn: 10.0,
            can_be_lit: true,
            start_lit: false,
            initial_fuel: 50.0,
        }
    }
}

/// Notification emitted by a fire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireEvent {
    /// Burning flag flipped; carries the new value.
    BurningChanged(bool),
    /// Fuel level changed; carries the new fuel percentage `[0, 1]`.
    FuelChanged(f32),
}

/// Campfire state: fuel reserve plus burning flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fire {
    params: FireParams,
    fuel: f32,
    burning: bool,
    #[serde(skip)]
    events: Vec<FireEvent>,
}

impl Fire {
    /// New fire. Unlit and empty unless `params.start_lit` is set.
    pub fn new(params: FireParams) -> Self {
        let mut fire = Self {
            params,
            fuel: 0.0,
            burning: false,
            events: Vec::new(),
        };

        if params.start_lit {
            fire.fuel = params.initial_fuel.clamp(0.0, params.max_fuel.max(0.0));
            fire.burning = fire.lighting_permitted();
            fire.events.push(FireEvent::BurningChanged(fire.burning));
            fire.events.push(FireEvent::FuelChanged(fire.fuel_percentage()));
        }
        fire
    }

    pub fn params(&self) -> &FireParams {
        &self.params
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn max_fuel(&self) -> f32 {
        self.params.max_fuel
    }

    pub fn is_burning(&self) -> bool {
        self.burning
    }

    /// Fuel level as `[0, 1]`; zero for a fire with no capacity.
    pub fn fuel_percentage(&self) -> f32 {
        if self.params.max_fuel <= 0.0 {
            return 0.0;
        }
        clamp01(self.fuel / self.params.max_fuel)
    }

    /// Presentation scalar for light and audio; zero while unlit.
    pub fn intensity(&self) -> f32 {
        if self.burning {
            self.fuel_percentage()
        } else {
            0.0
        }
    }

    pub fn can_add_fuel(&self) -> bool {
        self.fuel < self.params.max_fuel
    }

    pub fn can_be_lit(&self) -> bool {
        self.params.can_be_lit
    }

    pub fn set_can_be_lit(&mut self, can_be_lit: bool) {
        self.params.can_be_lit = can_be_lit;
    }

    fn lighting_permitted(&self) -> bool {
        self.fuel > 0.0 && self.fuel >= self.params.min_fuel_to_burn && self.params.can_be_lit
    }

    /// Deposit fuel, clamped to capacity. Returns the amount actually stored.
    ///
    /// Lights the fire if it was unlit and the deposit makes lighting possible.
    pub fn add_fuel(&mut self, amount: f32) -> Result<f32, FuelError> {
        if amount.is_nan() || amount <= 0.0 {
            return Err(FuelError::NonPositiveAmount);
        }
        if !self.can_add_fuel() {
            return Err(FuelError::FireFull);
        }

        let before = self.fuel;
        self.fuel = (self.fuel + amount).min(self.params.max_fuel);
        self.events.push(FireEvent::FuelChanged(self.fuel_percentage()));

        if !self.burning && self.lighting_permitted() {
            self.set_burning(true);
        }
        Ok(self.fuel - before)
    }

    /// Light the fire. Succeeds iff there is enough fuel and lighting is allowed;
    /// succeeding on an already burning fire changes nothing.
    pub fn light(&mut self) -> Result<(), LightError> {
        if !self.params.can_be_lit {
            return Err(LightError::CannotBeLit);
        }
        if self.fuel <= 0.0 || self.fuel < self.params.min_fuel_to_burn {
            return Err(LightError::InsufficientFuel {
                fuel: self.fuel,
                required: self.params.min_fuel_to_burn,
            });
        }
        if !self.burning {
            self.set_burning(true);
        }
        Ok(())
    }

    /// Put the fire out. Idempotent: only the first call notifies.
    pub fn extinguish(&mut self) {
        if self.burning {
            self.set_burning(false);
        }
    }

    /// Burn fuel for `dt` seconds. Does nothing while unlit.
    pub fn tick(&mut self, dt: f32) {
        if !self.burning {
            return;
        }
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            self.extinguish();
            return;
        }
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        let before = self.fuel;
        self.fuel = (self.fuel - self.params.burn_rate * dt).max(0.0);
        if self.fuel != before {
            self.events.push(FireEvent::FuelChanged(self.fuel_percentage()));
        }

        if self.fuel <= 0.0 {
            self.extinguish();
        }
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<FireEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_burning(&mut self, burning: bool) {
        self.burning = burning;
        self.events.push(FireEvent::BurningChanged(burning));
        if burning {
            log::info!("Fire lit with {:.1} fuel", self.fuel);
        } else {
            log::info!("Fire extinguished");
        }
    }
}

impl Default for Fire {
    fn default() -> Self {
        Self::new(FireParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn burning_changes(events: &[FireEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match e {
                FireEvent::BurningChanged(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_fire_is_empty_and_unlit() {
        let mut fire = Fire::default();
        assert_eq!(fire.fuel(), 0.0);
        assert!(!fire.is_burning());
        assert!(fire.take_events().is_empty());
    }

    #[test]
    fn test_add_fuel_rejects_non_positive() {
        let mut fire = Fire::default();
        for amount in [0.0, -1.0, -0.001, f32::NAN] {
            assert_eq!(fire.add_fuel(amount), Err(FuelError::NonPositiveAmount));
            assert_eq!(fire.fuel(), 0.0);
        }
        assert!(fire.take_events().is_empty());
    }

    #[test]
    fn test_add_fuel_auto_lights_then_burns_out() {
        let mut fire = Fire::default();
        assert_eq!(fire.add_fuel(10.0), Ok(10.0));
        assert!(fire.is_burning());

        fire.tick(2.0);
        assert_eq!(fire.fuel(), 0.0);
        assert!(!fire.is_burning());

        let events = fire.take_events();
        assert_eq!(burning_changes(&events), vec![true, false]);
    }

    #[test]
    fn test_add_fuel_below_threshold_stays_unlit() {
        let mut fire = Fire::default();
        fire.add_fuel(9.99).unwrap();
        assert!(!fire.is_burning());
        assert!(fire.light().is_err());
    }

    #[test]
    fn test_add_fuel_clamps_and_rejects_when_full() {
        let mut fire = Fire::default();
        fire.add_fuel(80.0).unwrap();
        let stored = fire.add_fuel(50.0).unwrap();
        assert!((stored - 20.0).abs() < EPS);
        assert_eq!(fire.fuel(), 100.0);
        assert!(!fire.can_add_fuel());
        assert_eq!(fire.add_fuel(5.0), Err(FuelError::FireFull));
        assert_eq!(fire.fuel(), 100.0);
    }

    #[test]
    fn test_light_requires_threshold_and_permission() {
        let mut fire = Fire::new(FireParams {
            can_be_lit: false,
            ..Default::default()
        });
        fire.add_fuel(50.0).unwrap();
        assert!(!fire.is_burning());
        assert_eq!(fire.light(), Err(LightError::CannotBeLit));

        fire.set_can_be_lit(true);
        assert_eq!(fire.light(), Ok(()));
        assert!(fire.is_burning());
    }

    #[test]
    fn test_light_fails_just_below_threshold() {
        let mut fire = Fire::new(FireParams {
            can_be_lit: false,
            ..Default::default()
        });
        fire.add_fuel(10.0 - 1e-3).unwrap();
        fire.set_can_be_lit(true);
        assert!(matches!(
            fire.light(),
            Err(LightError::InsufficientFuel { .. })
        ));
        assert!(!fire.is_burning());
    }

    #[test]
    fn test_empty_fire_never_lights_even_with_zero_threshold() {
        let mut fire = Fire::new(FireParams {
            min_fuel_to_burn: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            fire.light(),
            Err(LightError::InsufficientFuel { .. })
        ));
        assert!(!fire.is_burning());
    }

    #[test]
    fn test_keeps_burning_below_min_fuel() {
        let mut fire = Fire::default();
        fire.add_fuel(12.0).unwrap();
        fire.tick(1.0); // 7 left, below the 10 needed to light
        assert!(fire.is_burning());
        assert!((fire.fuel() - 7.0).abs() < EPS);
    }

    #[test]
    fn test_extinguish_is_idempotent() {
        let mut fire = Fire::default();
        fire.add_fuel(50.0).unwrap();
        fire.take_events();

        fire.extinguish();
        fire.extinguish();
        assert!(!fire.is_burning());
        assert_eq!(fire.take_events(), vec![FireEvent::BurningChanged(false)]);
        assert!((fire.fuel() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_tick_is_monotonic_and_stops_at_zero() {
        let mut fire = Fire::default();
        fire.add_fuel(33.0).unwrap();
        let mut last = fire.fuel();
        for _ in 0..200 {
            fire.tick(0.05);
            assert!(fire.fuel() <= last);
            assert!(fire.fuel() >= 0.0);
            last = fire.fuel();
        }
        assert_eq!(fire.fuel(), 0.0);
        assert!(!fire.is_burning());
    }

    #[test]
    fn test_unlit_fire_does_not_burn() {
        let mut fire = Fire::new(FireParams {
            can_be_lit: false,
            ..Default::default()
        });
        fire.add_fuel(40.0).unwrap();
        fire.tick(5.0);
        assert!((fire.fuel() - 40.0).abs() < EPS);
    }

    #[test]
    fn test_tick_ignores_nan_dt() {
        let mut fire = Fire::default();
        fire.add_fuel(50.0).unwrap();
        fire.take_events();

        fire.tick(f32::NAN);
        assert_eq!(fire.fuel(), 50.0);
        assert!(fire.is_burning());
        assert!(fire.take_events().is_empty());
    }

    #[test]
    fn test_no_fuel_event_when_nothing_burns() {
        let mut fire = Fire::new(FireParams {
            burn_rate: 0.0,
            ..Default::default()
        });
        fire.add_fuel(20.0).unwrap();
        fire.take_events();

        fire.tick(1.0);
        assert!(fire.is_burning());
        assert_eq!(fire.fuel(), 20.0);
        assert!(fire.take_events().is_empty());
    }

    #[test]
    fn test_fuel_percentage() {
        let mut fire = Fire::default();
        fire.add_fuel(25.0).unwrap();
        assert!((fire.fuel_percentage() - 0.25).abs() < EPS);
        assert!((fire.intensity() - 0.25).abs() < EPS);

        let degenerate = Fire::new(FireParams {
            max_fuel: 0.0,
            ..Default::default()
        });
        assert_eq!(degenerate.fuel_percentage(), 0.0);
        assert!(!degenerate.can_add_fuel());
    }

    #[test]
    fn test_start_lit() {
        let mut fire = Fire::new(FireParams {
            start_lit: true,
            initial_fuel: 150.0,
            ..Default::default()
        });
        assert!(fire.is_burning());
        assert_eq!(fire.fuel(), 100.0);
        assert_eq!(
            fire.take_events(),
            vec![FireEvent::BurningChanged(true), FireEvent::FuelChanged(1.0)]
        );

        let weak = Fire::new(FireParams {
            start_lit: true,
            initial_fuel: 5.0,
            ..Default::default()
        });
        assert!(!weak.is_burning());
    }
}
