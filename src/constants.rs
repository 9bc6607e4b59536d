//! Centralized combat constants for the brawler core.
//!
//! These are the reference tuning values. `CombatSettings::default()` is built
//! from them, so a config file only needs to override what it changes.

// =====================================================
// Charge
// =====================================================

/// Charge gained per landed hit
pub const CHARGE_PER_HIT: f32 = 0.1;

/// Charge needed before combo recognition is active (10 landed hits)
pub const CHARGE_THRESHOLD: f32 = 1.0;

// =====================================================
// Combo window
// =====================================================

/// Seconds the next move has to arrive before the recorded sequence is dropped
pub const COMBO_WINDOW: f32 = 0.9;

// =====================================================
// Basic attacks (punch / kick)
// =====================================================

/// Flat damage of a landed punch or kick
pub const PUNCH_DAMAGE: f32 = 5.0;

/// Attack volume centre, relative to the fighter origin
pub const PUNCH_BOX_OFFSET: [f32; 3] = [1.0, 1.0, 0.0];

/// Attack volume half-extents
pub const PUNCH_BOX_HALF_EXTENTS: [f32; 3] = [1.0, 1.0, 0.5];

// =====================================================
// Special attack
// =====================================================

/// Sphere-cast radius used to find the special attack target
pub const SPECIAL_RADIUS: f32 = 2.0;

/// Sphere-cast distance
pub const SPECIAL_MAX_DISTANCE: f32 = 10.0;

/// Sphere-cast direction (fighters face +X)
pub const SPECIAL_DIRECTION: [f32; 3] = [1.0, 0.0, 0.0];

/// Seconds between two special attack ticks
pub const SPECIAL_TICK_INTERVAL: f32 = 0.2;

/// Damage of a single special attack tick
pub const SPECIAL_DAMAGE_PER_TICK: f32 = 3.0;

// =====================================================
// Collision layers
// =====================================================

/// Rapier group bit carried by player colliders
pub const PLAYER_LAYER: u32 = 0b01;

/// Rapier group bit carried by enemy hurtboxes
pub const ENEMY_LAYER: u32 = 0b10;
