//! Interaction targeting and fuel-transfer arbitration.
//!
//! Each tick the arbiter works out what the player is addressing and, on a
//! fresh press of the interact key, moves fuel between a [`FuelSource`], the
//! player's [`CarriedFuel`], and a [`Fire`]:
//!
//! 1. **Pointed target**: the aim ray's first hit. Uncollected fuel wins. A
//!    fire counts only when the struck point lies on one of its deposit
//!    volumes, so aiming across the much larger warmth-sensing volume from
//!    the far side of a clearing does not register.
//! 2. **Proximity fallback**: the fire whose deposit volume is nearest to the
//!    player (surface distance) within `proximity_interact_radius`. Used for
//!    the deposit action only, never for the prompt.
//! 3. **Action**: collect the pointed fuel, else deposit into the pointed or
//!    fallback fire, else light an unlit fire when nothing is carried.
//! 4. **Prompt**: collect / add-fuel text, hidden for a short while after a
//!    transient message.
//!
//! The world is reached through two seams: [`SceneQuery`] (read-only
//! geometry) and [`InteractionTargets`] (mutable access to fuel and fires),
//! both keyed by an opaque handle `H`.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{CollectError, FuelError, InteractError};
use crate::fire::Fire;
use crate::fuel::{CarriedFuel, FuelSource};
use crate::geometry::{Ray, Vec3, Volume};

/// Targeting and prompt tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionParams {
    /// Aim ray length.
    pub max_interact_distance: f32,
    /// Surface distance within which a fire is reachable without aiming.
    pub proximity_interact_radius: f32,
    /// How far a struck point may sit from a deposit volume's boundary.
    pub deposit_tolerance: f32,
    /// Prompt stays hidden this long after a transient message.
    pub prompt_suppress_secs: f32,
    /// Display time requested for transient messages.
    pub message_duration_secs: f32,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            max_interact_distance: 3.0,
            proximity_interact_radius: 2.5,
            deposit_tolerance: 0.05,
            prompt_suppress_secs: 1.5,
            message_duration_secs: 1.5,
        }
    }
}

/// First surface struck by an aim ray, tagged by what owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit<H> {
    None,
    Fuel { source: H, point: Vec3 },
    FireDepositSurface { fire: H, point: Vec3 },
    FireSensingSurface { fire: H, point: Vec3 },
}

/// Read-only geometry collaborator.
pub trait SceneQuery<H> {
    /// First surface along `ray` within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f32) -> RayHit<H>;

    /// Fires that may serve as a proximity fallback.
    fn fires(&self) -> &[H];

    /// World-space deposit volumes of `fire`.
    fn deposit_volumes(&self, fire: H) -> &[Volume];
}

/// Mutable access to the objects an interaction can change.
pub trait InteractionTargets<H> {
    fn fuel_source_mut(&mut self, source: H) -> Option<&mut FuelSource>;
    fn fire_mut(&mut self, fire: H) -> Option<&mut Fire>;
}

/// Per-tick player input relevant to interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractInput {
    pub aim: Ray,
    pub position: Vec3,
    /// Interact key currently held; the press is detected on the rising edge.
    pub interact_held: bool,
}

/// What a successful interact command did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractOutcome<H> {
    Collected { source: H, amount: f32 },
    Deposited { fire: H, amount: f32 },
    Lit { fire: H },
}

/// Prompt line for the HUD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub visible: bool,
}

/// Short-lived confirmation or rejection text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientMessage {
    pub text: String,
    pub duration: f32,
}

/// Per-player targeting state. Recomputed every tick; never persisted.
#[derive(Debug, Clone)]
pub struct InteractionArbiter<H> {
    params: InteractionParams,
    pointed_fuel: Option<H>,
    pointed_fire: Option<H>,
    nearby_fire: Option<H>,
    key_down: bool,
    suppress_remaining: f32,
    prompt: Prompt,
    messages: Vec<TransientMessage>,
}

impl<H: Copy + PartialEq + Debug> InteractionArbiter<H> {
    pub fn new(params: InteractionParams) -> Self {
        Self {
            params,
            pointed_fuel: None,
            pointed_fire: None,
            nearby_fire: None,
            key_down: false,
            suppress_remaining: 0.0,
            prompt: Prompt::default(),
            messages: Vec::new(),
        }
    }

    pub fn params(&self) -> &InteractionParams {
        &self.params
    }

    pub fn pointed_fuel(&self) -> Option<H> {
        self.pointed_fuel
    }

    pub fn pointed_fire(&self) -> Option<H> {
        self.pointed_fire
    }

    pub fn nearby_fire(&self) -> Option<H> {
        self.nearby_fire
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// Drain transient messages requested since the last call.
    pub fn take_messages(&mut self) -> Vec<TransientMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Full per-tick pass: resolve, act on a fresh press, refresh the prompt.
    ///
    /// `Ok(None)` means no press this tick or nothing applicable.
    pub fn tick<S, T>(
        &mut self,
        dt: f32,
        input: &InteractInput,
        scene: &S,
        targets: &mut T,
        carried: &mut CarriedFuel,
    ) -> Result<Option<InteractOutcome<H>>, InteractError>
    where
        S: SceneQuery<H>,
        T: InteractionTargets<H>,
    {
        self.suppress_remaining = (self.suppress_remaining - dt.max(0.0)).max(0.0);

        self.resolve_pointed(scene, targets, &input.aim);
        self.resolve_nearby(scene, input.position);

        let result = if self.press(input.interact_held) {
            self.interact(targets, carried)
        } else {
            Ok(None)
        };

        self.refresh_prompt(targets, carried);
        result
    }

    /// Step 1: classify the aim ray's first hit.
    pub fn resolve_pointed<S, T>(&mut self, scene: &S, targets: &mut T, aim: &Ray)
    where
        S: SceneQuery<H>,
        T: InteractionTargets<H>,
    {
        self.pointed_fuel = None;
        self.pointed_fire = None;

        match scene.raycast(aim, self.params.max_interact_distance) {
            RayHit::Fuel { source, .. } => {
                let available = targets
                    .fuel_source_mut(source)
                    .is_some_and(|s| !s.is_collected());
                if available {
                    self.pointed_fuel = Some(source);
                }
            }
            RayHit::FireDepositSurface { fire, point } | RayHit::FireSensingSurface { fire, point } => {
                if self.on_deposit_surface(scene, fire, &point) {
                    self.pointed_fire = Some(fire);
                }
            }
            RayHit::None => {}
        }
    }

    fn on_deposit_surface<S: SceneQuery<H>>(&self, scene: &S, fire: H, point: &Vec3) -> bool {
        scene
            .deposit_volumes(fire)
            .iter()
            .any(|v| v.distance_to_boundary(point) <= self.params.deposit_tolerance)
    }

    /// Step 2: nearest fire by deposit-volume surface distance.
    pub fn resolve_nearby<S: SceneQuery<H>>(&mut self, scene: &S, position: Vec3) {
        let radius = self.params.proximity_interact_radius;
        self.nearby_fire = scene
            .fires()
            .iter()
            .filter_map(|&fire| {
                scene
                    .deposit_volumes(fire)
                    .iter()
                    .map(|v| v.distance_to(&position))
                    .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))))
                    .map(|d| (fire, d))
            })
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(fire, _)| fire);
    }

    /// Edge detector for the interact key. True only on the press tick.
    pub fn press(&mut self, held: bool) -> bool {
        let pressed = held && !self.key_down;
        self.key_down = held;
        pressed
    }

    /// Step 3: execute the interact command against the resolved targets.
    pub fn interact<T: InteractionTargets<H>>(
        &mut self,
        targets: &mut T,
        carried: &mut CarriedFuel,
    ) -> Result<Option<InteractOutcome<H>>, InteractError> {
        if let Some(source) = self.pointed_fuel {
            let result = self.collect(targets, carried, source);
            return self.report(result.map(Some));
        }

        let Some(fire) = self.pointed_fire.or(self.nearby_fire) else {
            return Ok(None);
        };

        let result = if !carried.is_empty() {
            self.deposit(targets, carried, fire).map(Some)
        } else {
            self.light(targets, fire)
        };
        self.report(result)
    }

    fn collect<T: InteractionTargets<H>>(
        &mut self,
        targets: &mut T,
        carried: &mut CarriedFuel,
        source_id: H,
    ) -> Result<InteractOutcome<H>, InteractError> {
        let source = targets
            .fuel_source_mut(source_id)
            .ok_or(InteractError::TargetMissing)?;
        if source.is_collected() {
            return Err(CollectError::AlreadyCollected.into());
        }

        let amount = carried.collect_from(source)?;
        self.pointed_fuel = None;
        self.push_message(format!("+{} fuel", format_amount(amount)));
        log::info!(
            "Collected {} fuel from {:?} (carrying {:.1})",
            amount,
            source_id,
            carried.amount()
        );
        Ok(InteractOutcome::Collected {
            source: source_id,
            amount,
        })
    }

    fn deposit<T: InteractionTargets<H>>(
        &mut self,
        targets: &mut T,
        carried: &mut CarriedFuel,
        fire_id: H,
    ) -> Result<InteractOutcome<H>, InteractError> {
        let fire = targets.fire_mut(fire_id).ok_or(InteractError::TargetMissing)?;
        let amount = carried.deposit_into(fire)?;

        self.pointed_fire = None;
        self.nearby_fire = None;
        self.push_message(format!("+{} fuel added", format_amount(amount)));
        log::info!("Deposited {} fuel into {:?}", amount, fire_id);
        Ok(InteractOutcome::Deposited {
            fire: fire_id,
            amount,
        })
    }

    fn light<T: InteractionTargets<H>>(
        &mut self,
        targets: &mut T,
        fire_id: H,
    ) -> Result<Option<InteractOutcome<H>>, InteractError> {
        let fire = targets.fire_mut(fire_id).ok_or(InteractError::TargetMissing)?;
        if fire.is_burning() {
            return Ok(None);
        }

        fire.light()?;
        self.push_message("Fire lit!".to_string());
        Ok(Some(InteractOutcome::Lit { fire: fire_id }))
    }

    fn report(
        &mut self,
        result: Result<Option<InteractOutcome<H>>, InteractError>,
    ) -> Result<Option<InteractOutcome<H>>, InteractError> {
        if let Err(err) = &result {
            log::debug!("Interaction rejected: {}", err);
            if !matches!(err, InteractError::TargetMissing | InteractError::Fuel(FuelError::NonPositiveAmount)) {
                self.push_message(err.to_string());
            }
        }
        result
    }

    fn push_message(&mut self, text: String) {
        self.messages.push(TransientMessage {
            text,
            duration: self.params.message_duration_secs,
        });
        self.suppress_remaining = self.params.prompt_suppress_secs;
    }

    /// Step 4: recompute the prompt from the aimed targets only.
    pub fn refresh_prompt<T: InteractionTargets<H>>(&mut self, targets: &mut T, carried: &CarriedFuel) {
        let text = if self.suppress_remaining > 0.0 {
            None
        } else if let Some(source) = self.pointed_fuel {
            targets
                .fuel_source_mut(source)
                .filter(|s| !s.is_collected())
                .map(|s| format!("Collect {} (E)", s.kind.display_name()))
        } else if let (Some(fire_id), false) = (self.pointed_fire, carried.is_empty()) {
            targets.fire_mut(fire_id).map(|fire| {
                if fire.is_burning() {
                    format!(
                        "Add fuel (E) - Fire {:.0}%",
                        fire.fuel_percentage() * 100.0
                    )
                } else {
                    format!(
                        "Add fuel (E) - Needs {:.0} fuel to light",
                        fire.params().min_fuel_to_burn
                    )
                }
            })
        } else {
            None
        };

        self.prompt = match text {
            Some(text) => Prompt {
                text,
                visible: true,
            },
            None => Prompt::default(),
        };
    }
}

impl<H: Copy + PartialEq + Debug> Default for InteractionArbiter<H> {
    fn default() -> Self {
        Self::new(InteractionParams::default())
    }
}

fn format_amount(amount: f32) -> String {
    if amount.fract().abs() < 0.05 {
        format!("{:.0}", amount)
    } else {
        format!("{:.1}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fire::FireParams;
    use crate::fuel::{FuelKind, Respawn};
    use std::collections::HashMap;

    const EPS: f32 = 1e-4;

    /// Hand-built scene: spheres tagged by role, brute-force raycast.
    #[derive(Default)]
    struct TestScene {
        fuel: Vec<(u32, Volume)>,
        deposit: HashMap<u32, Vec<Volume>>,
        sensing: Vec<(u32, Volume)>,
        fire_ids: Vec<u32>,
    }

    impl TestScene {
        fn add_fire(&mut self, id: u32, center: Vec3, deposit_radius: f32, sensing_radius: f32) {
            self.deposit
                .entry(id)
                .or_default()
                .push(Volume::sphere(center, deposit_radius));
            self.sensing.push((id, Volume::sphere(center, sensing_radius)));
            self.fire_ids.push(id);
        }
    }

    impl SceneQuery<u32> for TestScene {
        fn raycast(&self, ray: &Ray, max_distance: f32) -> RayHit<u32> {
            let mut best: Option<(f32, RayHit<u32>)> = None;
            let mut consider = |t: f32, hit: RayHit<u32>| {
                if best.as_ref().map_or(true, |(b, _)| t < *b) {
                    best = Some((t, hit));
                }
            };
            for (id, v) in &self.fuel {
                if let Some(t) = v.ray_hit(ray, max_distance) {
                    consider(t, RayHit::Fuel { source: *id, point: ray.at(t) });
                }
            }
            for (id, vols) in &self.deposit {
                for v in vols {
                    if let Some(t) = v.ray_hit(ray, max_distance) {
                        consider(t, RayHit::FireDepositSurface { fire: *id, point: ray.at(t) });
                    }
                }
            }
            for (id, v) in &self.sensing {
                if let Some(t) = v.ray_hit(ray, max_distance) {
                    consider(t, RayHit::FireSensingSurface { fire: *id, point: ray.at(t) });
                }
            }
            best.map_or(RayHit::None, |(_, hit)| hit)
        }

        fn fires(&self) -> &[u32] {
            &self.fire_ids
        }

        fn deposit_volumes(&self, fire: u32) -> &[Volume] {
            self.deposit.get(&fire).map_or(&[], |v| v.as_slice())
        }
    }

    #[derive(Default)]
    struct TestTargets {
        sources: HashMap<u32, FuelSource>,
        fires: HashMap<u32, Fire>,
    }

    impl InteractionTargets<u32> for TestTargets {
        fn fuel_source_mut(&mut self, source: u32) -> Option<&mut FuelSource> {
            self.sources.get_mut(&source)
        }

        fn fire_mut(&mut self, fire: u32) -> Option<&mut Fire> {
            self.fires.get_mut(&fire)
        }
    }

    const FIRE: u32 = 1;
    const WOOD: u32 = 10;

    fn campfire_world() -> (TestScene, TestTargets) {
        let mut scene = TestScene::default();
        scene.add_fire(FIRE, Vec3::ZERO, 0.75, 9.0);
        let mut targets = TestTargets::default();
        targets.fires.insert(FIRE, Fire::new(FireParams::default()));
        (scene, targets)
    }

    fn add_wood(scene: &mut TestScene, targets: &mut TestTargets, id: u32, at: Vec3, value: f32) {
        scene.fuel.push((id, Volume::sphere(at, 0.3)));
        targets
            .sources
            .insert(id, FuelSource::new(FuelKind::Wood, value, Respawn::Never));
    }

    fn input(position: Vec3, dir: Vec3, held: bool) -> InteractInput {
        InteractInput {
            aim: Ray::new(position, dir),
            position,
            interact_held: held,
        }
    }

    fn x() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn test_collect_pointed_fuel() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);

        let at = input(Vec3::new(18.0, 0.0, 0.0), x(), false);
        arbiter.tick(0.016, &at, &scene, &mut targets, &mut carried).unwrap();
        assert_eq!(arbiter.pointed_fuel(), Some(WOOD));
        assert_eq!(arbiter.prompt().text, "Collect Wood (E)");
        assert!(arbiter.prompt().visible);

        let press = input(Vec3::new(18.0, 0.0, 0.0), x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(
            outcome,
            Ok(Some(InteractOutcome::Collected { source: WOOD, amount: 25.0 }))
        );
        assert!((carried.amount() - 25.0).abs() < EPS);
        assert!(targets.sources[&WOOD].is_collected());

        let messages = arbiter.take_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "+25 fuel");
        assert!(!arbiter.prompt().visible);
    }

    #[test]
    fn test_press_is_edge_triggered() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        add_wood(&mut scene, &mut targets, WOOD + 1, Vec3::new(20.6, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);

        let held = input(Vec3::new(18.0, 0.0, 0.0), x(), true);
        arbiter.tick(0.016, &held, &scene, &mut targets, &mut carried).unwrap();
        scene.fuel.retain(|(id, _)| *id != WOOD);
        // Still held: the second log is now pointed but must not be taken.
        let again = arbiter.tick(0.016, &held, &scene, &mut targets, &mut carried);
        assert_eq!(again, Ok(None));
        assert!((carried.amount() - 25.0).abs() < EPS);
        assert!(!targets.sources[&(WOOD + 1)].is_collected());
    }

    #[test]
    fn test_partial_collect_when_nearly_full() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(30.0);
        let mut filler = FuelSource::new(FuelKind::Coal, 20.0, Respawn::Never);
        carried.collect_from(&mut filler).unwrap();

        let press = input(Vec3::new(18.0, 0.0, 0.0), x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(
            outcome,
            Ok(Some(InteractOutcome::Collected { source: WOOD, amount: 10.0 }))
        );
        assert!((carried.amount() - 30.0).abs() < EPS);
        assert!(targets.sources[&WOOD].is_collected());
    }

    #[test]
    fn test_collect_rejected_when_carry_full() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(20.0);
        let mut filler = FuelSource::new(FuelKind::Coal, 20.0, Respawn::Never);
        carried.collect_from(&mut filler).unwrap();

        let press = input(Vec3::new(18.0, 0.0, 0.0), x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(outcome, Err(InteractError::Collect(CollectError::CarryFull)));
        assert!(!targets.sources[&WOOD].is_collected());
        assert_eq!(arbiter.take_messages()[0].text, "Cannot carry more fuel");
    }

    #[test]
    fn test_deposit_into_aimed_fire() {
        let (scene, mut targets) = campfire_world();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let mut wood = FuelSource::new(FuelKind::Wood, 25.0, Respawn::Never);
        carried.collect_from(&mut wood).unwrap();

        // Standing 2 units out, aiming at the fire.
        let aim = input(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), false);
        arbiter.tick(0.016, &aim, &scene, &mut targets, &mut carried).unwrap();
        assert_eq!(arbiter.pointed_fire(), Some(FIRE));
        assert_eq!(arbiter.prompt().text, "Add fuel (E) - Needs 10 fuel to light");

        let press = InteractInput {
            interact_held: true,
            ..aim
        };
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(
            outcome,
            Ok(Some(InteractOutcome::Deposited { fire: FIRE, amount: 25.0 }))
        );
        assert!(carried.is_empty());
        assert!((targets.fires[&FIRE].fuel() - 25.0).abs() < EPS);
        assert!(targets.fires[&FIRE].is_burning());
        assert_eq!(arbiter.pointed_fire(), None);
        assert_eq!(arbiter.nearby_fire(), None);
        assert_eq!(arbiter.take_messages()[0].text, "+25 fuel added");
    }

    #[test]
    fn test_deposit_into_full_fire_keeps_carried() {
        let (scene, mut targets) = campfire_world();
        targets.fires.get_mut(&FIRE).unwrap().add_fuel(100.0).unwrap();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let mut wood = FuelSource::new(FuelKind::Wood, 25.0, Respawn::Never);
        carried.collect_from(&mut wood).unwrap();

        let press = input(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(outcome, Err(InteractError::Fuel(FuelError::FireFull)));
        assert!((carried.amount() - 25.0).abs() < EPS);
        assert_eq!(arbiter.take_messages()[0].text, "Fire cannot accept more fuel");
    }

    #[test]
    fn test_sensing_volume_is_not_a_target_but_fallback_deposits() {
        let mut scene = TestScene::default();
        // Deposit sphere r=0.75; sensing sphere r=9.75.
        scene.add_fire(FIRE, Vec3::ZERO, 0.75, 9.75);
        let mut targets = TestTargets::default();
        targets.fires.insert(FIRE, Fire::default());

        let mut arbiter = InteractionArbiter::new(InteractionParams {
            max_interact_distance: 10.0,
            ..Default::default()
        });
        let mut carried = CarriedFuel::new(100.0);
        let mut wood = FuelSource::new(FuelKind::Wood, 25.0, Respawn::Never);
        carried.collect_from(&mut wood).unwrap();

        // 1 unit from the deposit surface, aiming away: the ray strikes the
        // sensing boundary 8 units out.
        let position = Vec3::new(1.75, 0.0, 0.0);
        let away = input(position, x(), false);
        arbiter.tick(0.016, &away, &scene, &mut targets, &mut carried).unwrap();
        assert_eq!(arbiter.pointed_fire(), None);
        assert_eq!(arbiter.nearby_fire(), Some(FIRE));
        assert!(!arbiter.prompt().visible);

        let press = input(position, x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(
            outcome,
            Ok(Some(InteractOutcome::Deposited { fire: FIRE, amount: 25.0 }))
        );
        assert!(carried.is_empty());
    }

    #[test]
    fn test_fuel_takes_priority_over_fire() {
        let (mut scene, mut targets) = campfire_world();
        // Log lying between player and fire.
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(1.5, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let mut filler = FuelSource::new(FuelKind::Stick, 10.0, Respawn::Never);
        carried.collect_from(&mut filler).unwrap();

        let press = input(Vec3::new(2.5, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert!(matches!(outcome, Ok(Some(InteractOutcome::Collected { .. }))));
        assert_eq!(targets.fires[&FIRE].fuel(), 0.0);
        assert!((carried.amount() - 35.0).abs() < EPS);
    }

    #[test]
    fn test_collected_fuel_is_not_pointed() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        targets.sources.get_mut(&WOOD).unwrap().collect().unwrap();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);

        let press = input(Vec3::new(18.0, 0.0, 0.0), x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(outcome, Ok(None));
        assert_eq!(arbiter.pointed_fuel(), None);
        assert!(carried.is_empty());
    }

    #[test]
    fn test_nothing_in_range_is_silent() {
        let (scene, mut targets) = campfire_world();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);

        let press = input(Vec3::new(50.0, 0.0, 0.0), x(), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(outcome, Ok(None));
        assert!(arbiter.take_messages().is_empty());
    }

    #[test]
    fn test_light_with_empty_hands() {
        let (scene, mut targets) = campfire_world();
        let fire = targets.fires.get_mut(&FIRE).unwrap();
        fire.set_can_be_lit(false);
        fire.add_fuel(30.0).unwrap();
        fire.set_can_be_lit(true);

        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let press = input(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert_eq!(outcome, Ok(Some(InteractOutcome::Lit { fire: FIRE })));
        assert!(targets.fires[&FIRE].is_burning());
    }

    #[test]
    fn test_light_rejected_without_fuel() {
        let (scene, mut targets) = campfire_world();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let press = input(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), true);
        let outcome = arbiter.tick(0.016, &press, &scene, &mut targets, &mut carried);
        assert!(matches!(outcome, Err(InteractError::Light(_))));
        assert!(!targets.fires[&FIRE].is_burning());
    }

    #[test]
    fn test_prompt_suppressed_after_message_then_returns() {
        let (mut scene, mut targets) = campfire_world();
        add_wood(&mut scene, &mut targets, WOOD, Vec3::new(20.0, 0.0, 0.0), 25.0);
        add_wood(&mut scene, &mut targets, WOOD + 1, Vec3::new(20.6, 0.0, 0.0), 25.0);
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);

        let position = Vec3::new(18.0, 0.0, 0.0);
        arbiter
            .tick(0.1, &input(position, x(), true), &scene, &mut targets, &mut carried)
            .unwrap();
        scene.fuel.retain(|(id, _)| *id != WOOD);
        arbiter
            .tick(0.1, &input(position, x(), false), &scene, &mut targets, &mut carried)
            .unwrap();
        assert_eq!(arbiter.pointed_fuel(), Some(WOOD + 1));
        assert!(!arbiter.prompt().visible);

        for _ in 0..20 {
            arbiter
                .tick(0.1, &input(position, x(), false), &scene, &mut targets, &mut carried)
                .unwrap();
        }
        assert!(arbiter.prompt().visible);
        assert_eq!(arbiter.prompt().text, "Collect Wood (E)");
    }

    #[test]
    fn test_add_fuel_prompt_needs_carried_fuel() {
        let (scene, mut targets) = campfire_world();
        let mut arbiter = InteractionArbiter::default();
        let mut carried = CarriedFuel::new(100.0);
        let aim = input(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), false);
        arbiter.tick(0.016, &aim, &scene, &mut targets, &mut carried).unwrap();
        assert_eq!(arbiter.pointed_fire(), Some(FIRE));
        assert!(!arbiter.prompt().visible);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(25.0), "25");
        assert_eq!(format_amount(2.5), "2.5");
    }
}
