//! Combo charge: the resource earned by landing hits.
//!
//! Charge only ever grows through `accumulate`. Once it reaches the threshold
//! the combo recognizer starts accepting moves.

use std::fmt;

use crate::constants::{CHARGE_PER_HIT, CHARGE_THRESHOLD};

/// Callback notified with the normalized charge after every accumulation
pub type ChargeObserver = Box<dyn FnMut(f32) + Send + Sync>;

pub struct ChargeGate {
    charge: f32,
    increment_per_hit: f32,
    threshold: f32,
    observers: Vec<ChargeObserver>,
}

impl ChargeGate {
    /// `threshold` must be positive; config validation guarantees it.
    pub fn new(increment_per_hit: f32, threshold: f32) -> Self {
        Self {
            charge: 0.0,
            increment_per_hit,
            threshold,
            observers: Vec::new(),
        }
    }

    /// Register an observer (UI meter, audio, animation)
    pub fn subscribe(&mut self, observer: impl FnMut(f32) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add charge and notify observers. Returns the new normalized value.
    pub fn accumulate(&mut self, amount: f32) -> f32 {
        if amount.is_finite() && amount > 0.0 {
            self.charge += amount;
        } else {
            tracing::debug!(amount, "ignoring non-positive charge amount");
        }

        let normalized = self.normalized_value();
        for observer in &mut self.observers {
            observer(normalized);
        }
        normalized
    }

    /// Accumulate the configured per-hit increment
    pub fn accumulate_hit(&mut self) -> f32 {
        self.accumulate(self.increment_per_hit)
    }

    /// True iff charge has reached the threshold, compared exactly
    pub fn is_ready(&self) -> bool {
        self.charge >= self.threshold
    }

    /// charge / threshold, not clamped
    pub fn normalized_value(&self) -> f32 {
        self.charge / self.threshold
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Drain charge back to zero. Only used when `reset_on_combo` is enabled.
    pub fn reset(&mut self) {
        self.charge = 0.0;
        for observer in &mut self.observers {
            observer(0.0);
        }
    }
}

impl Default for ChargeGate {
    fn default() -> Self {
        Self::new(CHARGE_PER_HIT, CHARGE_THRESHOLD)
    }
}

impl fmt::Debug for ChargeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChargeGate")
            .field("charge", &self.charge)
            .field("increment_per_hit", &self.increment_per_hit)
            .field("threshold", &self.threshold)
            .field("observers", &self.observers.len())
            .finish()
    }
}
