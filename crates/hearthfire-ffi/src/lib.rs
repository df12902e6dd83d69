//! C FFI bindings for the Hearthfire simulation engine
//!
//! This crate provides a C-compatible API for driving the fire, fuel and
//! warmth simulation from a game engine or any language with C FFI support.
//! Entities cross the boundary as opaque `uint64_t` ids; `0` means "none".
//!
//! # Basic Usage (C)
//! ```c
//! #include "hearthfire.h"
//!
//! HearthfireHandle sim = hearthfire_create();
//! uint64_t fire = hearthfire_spawn_campfire(sim, 0.0f, 0.0f, 0.0f);
//! uint64_t player = hearthfire_spawn_player(sim, "Ada", 0.0f, 0.0f, -2.0f);
//! hearthfire_add_fuel(sim, fire, 30.0f, NULL); // lights once past the minimum
//!
//! // Game loop
//! while (running) {
//!     HearthfireInput input = { 0.0f, 1.0f, -2.0f, 0.0f, 0.0f, 1.0f, e_pressed };
//!     hearthfire_set_input(sim, player, &input);
//!     hearthfire_update(sim, delta_time);
//!
//!     HearthfireEvent event;
//!     while (hearthfire_poll_event(sim, &event)) {
//!         // React to event.kind (see HEARTHFIRE_EVENT_* values)
//!     }
//!
//!     char prompt[128];
//!     if (hearthfire_get_prompt(sim, player, prompt, sizeof prompt)) {
//!         // Show prompt
//!     }
//! }
//!
//! hearthfire_destroy(sim);
//! ```

use std::collections::VecDeque;
use std::ffi::{c_char, CStr};

use hearthfire_core::prelude::*;
use hearthfire_logic::error::{CollectError, FuelError, InteractError, LightError};
use hecs::Entity;

/// Simulation plus the events not yet handed to the host.
pub struct HearthfireSim {
    engine: SimulationEngine,
    pending: VecDeque<SimEvent>,
}

/// Opaque handle to the simulation
pub type HearthfireHandle = *mut HearthfireSim;

// Result codes for commands
pub const HEARTHFIRE_OK: i32 = 0;
/// Handle is null or the entity is not of the expected type.
pub const HEARTHFIRE_ERR_INVALID: i32 = -1;
pub const HEARTHFIRE_ERR_NOTHING_TO_ADD: i32 = -2;
pub const HEARTHFIRE_ERR_FIRE_FULL: i32 = -3;
pub const HEARTHFIRE_ERR_CANNOT_BE_LIT: i32 = -4;
pub const HEARTHFIRE_ERR_INSUFFICIENT_FUEL: i32 = -5;
pub const HEARTHFIRE_ERR_ALREADY_COLLECTED: i32 = -6;
pub const HEARTHFIRE_ERR_CARRY_FULL: i32 = -7;

// Fuel kinds
pub const HEARTHFIRE_FUEL_WOOD: u8 = 0;
pub const HEARTHFIRE_FUEL_STICK: u8 = 1;
pub const HEARTHFIRE_FUEL_GRASS: u8 = 2;
pub const HEARTHFIRE_FUEL_COAL: u8 = 3;
pub const HEARTHFIRE_FUEL_PAPER: u8 = 4;
pub const HEARTHFIRE_FUEL_TREE: u8 = 5;

// Event kinds
pub const HEARTHFIRE_EVENT_FIRE_BURNING: u8 = 1;
pub const HEARTHFIRE_EVENT_FIRE_FUEL: u8 = 2;
pub const HEARTHFIRE_EVENT_WARMTH_ENTERED: u8 = 3;
pub const HEARTHFIRE_EVENT_WARMTH_EXITED: u8 = 4;
pub const HEARTHFIRE_EVENT_PLAYER_DIED: u8 = 5;
pub const HEARTHFIRE_EVENT_FUEL_COLLECTED: u8 = 6;
pub const HEARTHFIRE_EVENT_FUEL_DEPOSITED: u8 = 7;
pub const HEARTHFIRE_EVENT_FUEL_RESPAWNED: u8 = 8;
pub const HEARTHFIRE_EVENT_FUEL_REMOVED: u8 = 9;
pub const HEARTHFIRE_EVENT_MESSAGE: u8 = 10;

/// Bytes reserved for event text, including the terminating NUL.
pub const HEARTHFIRE_TEXT_CAPACITY: usize = 64;

/// Fire data returned to C
#[repr(C)]
pub struct HearthfireFire {
    pub fuel: f32,
    pub max_fuel: f32,
    /// Fuel as a fraction of capacity (0.0 - 1.0)
    pub percentage: f32,
    /// 1 if burning, 0 otherwise
    pub burning: u8,
    /// Flame strength (0.0 when out)
    pub intensity: f32,
}

/// Player data returned to C
#[repr(C)]
pub struct HearthfirePlayer {
    pub health: f32,
    pub health_percentage: f32,
    pub body_temperature: f32,
    /// Position within the safe band; below 0 is too cold, above 1 too hot
    pub temperature_percentage: f32,
    pub carried_fuel: f32,
    pub max_carry: f32,
    /// 1 if dead, 0 otherwise
    pub dead: u8,
    /// Fire whose warmth reaches the player, 0 if none
    pub warmth_fire: u64,
}

/// Per-frame input for a player
#[repr(C)]
pub struct HearthfireInput {
    pub origin_x: f32,
    pub origin_y: f32,
    pub origin_z: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub direction_z: f32,
    /// 1 while the interact key is held
    pub interact_held: u8,
}

/// Event returned to C
///
/// | kind | subject | target | value | flag |
/// |------|---------|--------|-------|------|
/// | FIRE_BURNING | fire | - | - | burning |
/// | FIRE_FUEL | fire | - | fuel fraction | - |
/// | WARMTH_ENTERED / EXITED | player | fire | - | - |
/// | PLAYER_DIED | player | - | - | - |
/// | FUEL_COLLECTED | player | source | amount | - |
/// | FUEL_DEPOSITED | player | fire | amount | - |
/// | FUEL_RESPAWNED / REMOVED | source | - | - | - |
/// | MESSAGE | player | - | duration | - |
#[repr(C)]
pub struct HearthfireEvent {
    pub kind: u8,
    pub subject: u64,
    pub target: u64,
    pub value: f32,
    pub flag: u8,
    /// NUL-terminated message text (MESSAGE events only)
    pub text: [c_char; HEARTHFIRE_TEXT_CAPACITY],
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

/// Create a new simulation with default tunables
///
/// Returns a handle that must be freed with `hearthfire_destroy`
#[no_mangle]
pub extern "C" fn hearthfire_create() -> HearthfireHandle {
    wrap(SimulationEngine::new())
}

/// Create a simulation from a JSON config string
///
/// Fields missing from the JSON take their defaults. Returns null if the
/// JSON is malformed or fails validation.
#[no_mangle]
pub extern "C" fn hearthfire_create_with_config(json: *const c_char) -> HearthfireHandle {
    if json.is_null() {
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(json) }.to_str() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Config is not valid UTF-8: {}", e);
            return std::ptr::null_mut();
        }
    };
    match SimConfig::from_json_str(json) {
        Ok(config) => wrap(SimulationEngine::with_config(config)),
        Err(e) => {
            log::warn!("Rejected config: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Destroy a simulation and free its memory
#[no_mangle]
pub extern "C" fn hearthfire_destroy(handle: HearthfireHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// ============================================================================
// Simulation Control
// ============================================================================

/// Update the simulation by delta_seconds (in real time)
///
/// Events produced by the update become available to `hearthfire_poll_event`.
#[no_mangle]
pub extern "C" fn hearthfire_update(handle: HearthfireHandle, delta_seconds: f32) {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return;
    };
    sim.engine.update(delta_seconds);
    sim.pending.extend(sim.engine.drain_events());
}

/// Set the time scale (1.0 = real-time, 10.0 = 10x speed)
#[no_mangle]
pub extern "C" fn hearthfire_set_time_scale(handle: HearthfireHandle, scale: f32) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.engine.set_time_scale(scale);
    }
}

/// Get current time scale
#[no_mangle]
pub extern "C" fn hearthfire_get_time_scale(handle: HearthfireHandle) -> f32 {
    match unsafe { handle.as_ref() } {
        Some(sim) => sim.engine.time_scale(),
        None => 0.0,
    }
}

/// Simulation time in seconds since creation
#[no_mangle]
pub extern "C" fn hearthfire_get_sim_time(handle: HearthfireHandle) -> f64 {
    match unsafe { handle.as_ref() } {
        Some(sim) => sim.engine.sim_time(),
        None => 0.0,
    }
}

/// Derive sensing-volume enter/exit from positions (on by default)
///
/// Hosts that report triggers from their own physics should pass false and
/// call `hearthfire_trigger_enter` / `hearthfire_trigger_exit` instead.
#[no_mangle]
pub extern "C" fn hearthfire_set_auto_triggers(handle: HearthfireHandle, enabled: bool) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.engine.set_auto_triggers(enabled);
    }
}

/// Report that `player` entered the collider `collider`
#[no_mangle]
pub extern "C" fn hearthfire_trigger_enter(handle: HearthfireHandle, player: u64, collider: u64) {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return;
    };
    if let (Some(player), Some(collider)) = (entity(player), entity(collider)) {
        sim.engine.trigger_enter(player, collider);
    }
}

/// Report that `player` left the collider `collider`
#[no_mangle]
pub extern "C" fn hearthfire_trigger_exit(handle: HearthfireHandle, player: u64, collider: u64) {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return;
    };
    if let (Some(player), Some(collider)) = (entity(player), entity(collider)) {
        sim.engine.trigger_exit(player, collider);
    }
}

// ============================================================================
// Spawning
// ============================================================================

/// Spawn an unlit campfire using the configured fire tunables
///
/// Returns the fire id, or 0 on a null handle
#[no_mangle]
pub extern "C" fn hearthfire_spawn_campfire(handle: HearthfireHandle, x: f32, y: f32, z: f32) -> u64 {
    match unsafe { handle.as_mut() } {
        Some(sim) => id(sim.engine.spawn_campfire(Vec3::new(x, y, z))),
        None => 0,
    }
}

/// Spawn a player. `name` may be null.
#[no_mangle]
pub extern "C" fn hearthfire_spawn_player(
    handle: HearthfireHandle,
    name: *const c_char,
    x: f32,
    y: f32,
    z: f32,
) -> u64 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    let name = if name.is_null() {
        "Player".to_string()
    } else {
        unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
    };
    id(sim.engine.spawn_player(name, Vec3::new(x, y, z)))
}

/// Spawn a fuel source (see HEARTHFIRE_FUEL_* values)
///
/// Returns 0 for an unknown kind
#[no_mangle]
pub extern "C" fn hearthfire_spawn_fuel(handle: HearthfireHandle, kind: u8, x: f32, y: f32, z: f32) -> u64 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    match FuelKind::ALL.get(kind as usize) {
        Some(&kind) => id(sim.engine.spawn_fuel(kind, Vec3::new(x, y, z))),
        None => {
            log::warn!("Unknown fuel kind {}", kind);
            0
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Move an entity. Returns false if it has no position.
#[no_mangle]
pub extern "C" fn hearthfire_set_position(handle: HearthfireHandle, entity_id: u64, x: f32, y: f32, z: f32) -> bool {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return false;
    };
    entity(entity_id).is_some_and(|e| sim.engine.set_position(e, Vec3::new(x, y, z)))
}

/// Replace a player's aim ray and interact key state
#[no_mangle]
pub extern "C" fn hearthfire_set_input(handle: HearthfireHandle, player: u64, input: *const HearthfireInput) -> bool {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return false;
    };
    let Some(input) = (unsafe { input.as_ref() }) else {
        return false;
    };
    let Some(player) = entity(player) else {
        return false;
    };

    let aim = Ray::new(
        Vec3::new(input.origin_x, input.origin_y, input.origin_z),
        Vec3::new(input.direction_x, input.direction_y, input.direction_z),
    );
    sim.engine.set_input(
        player,
        PlayerInput {
            aim,
            interact_held: input.interact_held != 0,
        },
    )
}

/// Add fuel to a fire directly
///
/// On success writes the amount actually accepted to `accepted` (may be null).
#[no_mangle]
pub extern "C" fn hearthfire_add_fuel(handle: HearthfireHandle, fire: u64, amount: f32, accepted: *mut f32) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return HEARTHFIRE_ERR_INVALID;
    };
    let Some(fire) = entity(fire) else {
        return HEARTHFIRE_ERR_INVALID;
    };
    match sim.engine.add_fuel(fire, amount) {
        Ok(added) => {
            if let Some(out) = unsafe { accepted.as_mut() } {
                *out = added;
            }
            HEARTHFIRE_OK
        }
        Err(e) => error_code(e),
    }
}

/// Try to light a fire. Lighting a fire that already burns succeeds.
#[no_mangle]
pub extern "C" fn hearthfire_light(handle: HearthfireHandle, fire: u64) -> i32 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return HEARTHFIRE_ERR_INVALID;
    };
    let Some(fire) = entity(fire) else {
        return HEARTHFIRE_ERR_INVALID;
    };
    match sim.engine.light(fire) {
        Ok(()) => HEARTHFIRE_OK,
        Err(e) => error_code(e),
    }
}

/// Put a fire out, keeping its fuel
#[no_mangle]
pub extern "C" fn hearthfire_extinguish(handle: HearthfireHandle, fire: u64) -> bool {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return false;
    };
    entity(fire).is_some_and(|fire| sim.engine.extinguish(fire))
}

/// Restore a player's starting temperature and full health
#[no_mangle]
pub extern "C" fn hearthfire_reset_player(handle: HearthfireHandle, player: u64) -> bool {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return false;
    };
    entity(player).is_some_and(|player| sim.engine.reset_player(player))
}

// ============================================================================
// Query Functions
// ============================================================================

/// Get fire data. Returns false if `fire` is not a fire.
#[no_mangle]
pub extern "C" fn hearthfire_get_fire(handle: HearthfireHandle, fire: u64, out: *mut HearthfireFire) -> bool {
    let (Some(sim), Some(out)) = (unsafe { handle.as_ref() }, unsafe { out.as_mut() }) else {
        return false;
    };
    let Some(status) = entity(fire).and_then(|fire| sim.engine.fire_status(fire)) else {
        return false;
    };

    out.fuel = status.fuel;
    out.max_fuel = status.max_fuel;
    out.percentage = status.percentage;
    out.burning = status.burning as u8;
    out.intensity = status.intensity;
    true
}

/// Get player data. Returns false if `player` is not a player.
#[no_mangle]
pub extern "C" fn hearthfire_get_player(handle: HearthfireHandle, player: u64, out: *mut HearthfirePlayer) -> bool {
    let (Some(sim), Some(out)) = (unsafe { handle.as_ref() }, unsafe { out.as_mut() }) else {
        return false;
    };
    let Some(status) = entity(player).and_then(|player| sim.engine.player_status(player)) else {
        return false;
    };

    out.health = status.health;
    out.health_percentage = status.health_percentage;
    out.body_temperature = status.body_temperature;
    out.temperature_percentage = status.temperature_percentage;
    out.carried_fuel = status.carried_fuel;
    out.max_carry = status.max_carry;
    out.dead = status.dead as u8;
    out.warmth_fire = status.warmth.map(id).unwrap_or(0);
    true
}

/// Copy the player's interaction prompt into `buffer`
///
/// Returns true if a prompt is showing. The text is truncated to fit and
/// always NUL-terminated; a hidden prompt writes an empty string.
#[no_mangle]
pub extern "C" fn hearthfire_get_prompt(
    handle: HearthfireHandle,
    player: u64,
    buffer: *mut c_char,
    capacity: usize,
) -> bool {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return false;
    };
    let prompt = entity(player).and_then(|player| sim.engine.prompt(player));
    match prompt {
        Some(prompt) if prompt.visible => {
            write_text(&prompt.text, buffer, capacity);
            true
        }
        _ => {
            write_text("", buffer, capacity);
            false
        }
    }
}

/// Pop the oldest pending event into `out`. Returns false when none remain.
#[no_mangle]
pub extern "C" fn hearthfire_poll_event(handle: HearthfireHandle, out: *mut HearthfireEvent) -> bool {
    let (Some(sim), Some(out)) = (unsafe { handle.as_mut() }, unsafe { out.as_mut() }) else {
        return false;
    };
    match sim.pending.pop_front() {
        Some(event) => {
            fill_event(&event, out);
            true
        }
        None => false,
    }
}

/// Number of fires in the world
#[no_mangle]
pub extern "C" fn hearthfire_fire_count(handle: HearthfireHandle) -> u32 {
    match unsafe { handle.as_ref() } {
        Some(sim) => sim.engine.fire_count() as u32,
        None => 0,
    }
}

/// Number of fires currently burning
#[no_mangle]
pub extern "C" fn hearthfire_burning_fire_count(handle: HearthfireHandle) -> u32 {
    match unsafe { handle.as_ref() } {
        Some(sim) => sim.engine.burning_fire_count() as u32,
        None => 0,
    }
}

/// Number of players in the world
#[no_mangle]
pub extern "C" fn hearthfire_player_count(handle: HearthfireHandle) -> u32 {
    match unsafe { handle.as_ref() } {
        Some(sim) => sim.engine.player_count() as u32,
        None => 0,
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn wrap(engine: SimulationEngine) -> HearthfireHandle {
    Box::into_raw(Box::new(HearthfireSim {
        engine,
        pending: VecDeque::new(),
    }))
}

fn id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

fn entity(id: u64) -> Option<Entity> {
    Entity::from_bits(id)
}

fn error_code(err: InteractError) -> i32 {
    match err {
        InteractError::TargetMissing => HEARTHFIRE_ERR_INVALID,
        InteractError::Fuel(FuelError::NonPositiveAmount) => HEARTHFIRE_ERR_NOTHING_TO_ADD,
        InteractError::Fuel(FuelError::FireFull) => HEARTHFIRE_ERR_FIRE_FULL,
        InteractError::Light(LightError::CannotBeLit) => HEARTHFIRE_ERR_CANNOT_BE_LIT,
        InteractError::Light(LightError::InsufficientFuel { .. }) => HEARTHFIRE_ERR_INSUFFICIENT_FUEL,
        InteractError::Collect(CollectError::AlreadyCollected) => HEARTHFIRE_ERR_ALREADY_COLLECTED,
        InteractError::Collect(CollectError::CarryFull) => HEARTHFIRE_ERR_CARRY_FULL,
    }
}

/// Copy `text` as a NUL-terminated string, cutting at a char boundary.
fn write_text(text: &str, buffer: *mut c_char, capacity: usize) {
    if buffer.is_null() || capacity == 0 {
        return;
    }
    let mut len = text.len().min(capacity - 1);
    while !text.is_char_boundary(len) {
        len -= 1;
    }

    let out = unsafe { std::slice::from_raw_parts_mut(buffer as *mut u8, capacity) };
    out[..len].copy_from_slice(&text.as_bytes()[..len]);
    out[len] = 0;
}

fn fill_event(event: &SimEvent, out: &mut HearthfireEvent) {
    out.subject = 0;
    out.target = 0;
    out.value = 0.0;
    out.flag = 0;
    write_text("", out.text.as_mut_ptr(), out.text.len());

    match event {
        SimEvent::FireBurningChanged { fire, burning } => {
            out.kind = HEARTHFIRE_EVENT_FIRE_BURNING;
            out.subject = id(*fire);
            out.flag = *burning as u8;
        }
        SimEvent::FireFuelChanged { fire, percentage } => {
            out.kind = HEARTHFIRE_EVENT_FIRE_FUEL;
            out.subject = id(*fire);
            out.value = *percentage;
        }
        SimEvent::WarmthEntered { player, fire } => {
            out.kind = HEARTHFIRE_EVENT_WARMTH_ENTERED;
            out.subject = id(*player);
            out.target = id(*fire);
        }
        SimEvent::WarmthExited { player, fire } => {
            out.kind = HEARTHFIRE_EVENT_WARMTH_EXITED;
            out.subject = id(*player);
            out.target = id(*fire);
        }
        SimEvent::PlayerDied { player } => {
            out.kind = HEARTHFIRE_EVENT_PLAYER_DIED;
            out.subject = id(*player);
        }
        SimEvent::FuelCollected { player, source, amount } => {
            out.kind = HEARTHFIRE_EVENT_FUEL_COLLECTED;
            out.subject = id(*player);
            out.target = id(*source);
            out.value = *amount;
        }
        SimEvent::FuelDeposited { player, fire, amount } => {
            out.kind = HEARTHFIRE_EVENT_FUEL_DEPOSITED;
            out.subject = id(*player);
            out.target = id(*fire);
            out.value = *amount;
        }
        SimEvent::FuelRespawned { source } => {
            out.kind = HEARTHFIRE_EVENT_FUEL_RESPAWNED;
            out.subject = id(*source);
        }
        SimEvent::FuelRemoved { source } => {
            out.kind = HEARTHFIRE_EVENT_FUEL_REMOVED;
            out.subject = id(*source);
        }
        SimEvent::Message { player, text, duration } => {
            out.kind = HEARTHFIRE_EVENT_MESSAGE;
            out.subject = id(*player);
            out.value = *duration;
            write_text(text, out.text.as_mut_ptr(), out.text.len());
        }
    }
}
