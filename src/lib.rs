//! Brawler Combat Core Library
//!
//! Input-driven melee combat for a third-person brawler:
//! - Charge gate (hits fill a meter that arms combo recording)
//! - Combo library and exact-sequence recognizer with a rolling time window
//! - Finisher on jump, timed multi-tick special attack
//! - Combat controller tying input, hit queries and damage together
//! - Bevy/Rapier plugins and a keyboard-driven player for the demo binary

pub mod combat;
pub mod config;
pub mod constants;
pub mod controller;
pub mod logging;
pub mod player;

pub use combat::{
    ChargeGate, ComboDefinition, ComboEffect, ComboLibrary, ComboMatch, ComboRecognizer,
    MatchResult, MoveId, OverlapPolicy, SequenceEnd, TimedAttackPlan, TimedAttackScheduler,
};
pub use config::{CombatSettings, ConfigError};
pub use controller::{CombatController, CombatInput, ControllerEvent};
