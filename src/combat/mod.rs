//! Combo recognition, combo charge and timed special attacks.

use serde::{Deserialize, Serialize};

pub mod charge;
pub mod hitbox;
pub mod library;
pub mod recognizer;
pub mod sequencer;

pub use charge::{ChargeGate, ChargeObserver};
pub use hitbox::{DamageTargets, Health, HitQuery, HitResolver, HitShape, Hurtbox};
pub use library::{
    default_combos, ComboDefinition, ComboEffect, ComboLibrary, CompletionAction, LibraryError,
};
pub use recognizer::{ComboMatch, ComboRecognizer, MatchResult};
pub use sequencer::{
    OverlapPolicy, SequenceEnd, SequenceEvent, SequenceHandle, TimedAttackPlan,
    TimedAttackScheduler,
};

/// Discrete combat move fed to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveId {
    Punch = 0,
    Kick = 1,
}

impl MoveId {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(MoveId::Punch),
            1 => Some(MoveId::Kick),
            _ => None,
        }
    }
}
