//! Timed multi-hit attacks.
//!
//! Each attack is an explicit task with its own countdown, advanced by a
//! driver clock that is independent of the frame tick. The first tick lands
//! on start, the rest every `interval` seconds.

use bevy::prelude::Entity;
use serde::{Deserialize, Serialize};

use super::hitbox::DamageTargets;

/// What to do when a special attack starts while another is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Run side by side
    #[default]
    Stack,
    /// Refuse the new attack
    RejectWhileActive,
    /// Cancel running attacks, then start the new one
    ReplaceActive,
}

/// Fraction of an interval forgiven when converting a duration to ticks
pub const TICK_ROUNDING_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedAttackPlan {
    pub ticks: u32,
    pub interval: f32,
    pub damage_per_tick: f32,
}

impl TimedAttackPlan {
    pub fn new(ticks: u32, interval: f32, damage_per_tick: f32) -> Self {
        Self {
            ticks,
            interval,
            damage_per_tick,
        }
    }

    /// `ticks = floor(total / interval + TICK_ROUNDING_TOLERANCE)`.
    ///
    /// The tolerance is intentional: a total that is a whole number of
    /// intervals in decimal (e.g. `0.6 / 0.2`) can land a hair under that
    /// count in f32, and must not lose its last tick. The trade-off is that a
    /// total within 1e-4 intervals below a boundary rounds up, so
    /// `from_duration(0.19999, 0.2, _)` gives one tick. Zero, negative or
    /// non-finite inputs give zero ticks.
    pub fn from_duration(total: f32, interval: f32, damage_per_tick: f32) -> Self {
        let ticks = if total.is_finite() && interval.is_finite() && interval > 0.0 && total > 0.0
        {
            (total / interval + TICK_ROUNDING_TOLERANCE).floor() as u32
        } else {
            0
        };
        Self::new(ticks, interval, damage_per_tick)
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceHandle(u64);

impl SequenceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEnd {
    Completed,
    TargetLost,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    Tick {
        handle: SequenceHandle,
        target: Entity,
        damage: f32,
        tick: u32,
    },
    Finished {
        handle: SequenceHandle,
        target: Entity,
        reason: SequenceEnd,
    },
}

#[derive(Debug, Clone)]
struct TimedAttack {
    handle: SequenceHandle,
    target: Entity,
    remaining_ticks: u32,
    ticks_applied: u32,
    interval: f32,
    damage_per_tick: f32,
    until_next_tick: f32,
}

impl TimedAttack {
    fn apply_tick(&mut self, targets: &mut impl DamageTargets) -> Option<SequenceEvent> {
        if !targets.apply_damage(self.target, self.damage_per_tick) {
            return None;
        }
        self.remaining_ticks -= 1;
        self.ticks_applied += 1;
        Some(SequenceEvent::Tick {
            handle: self.handle,
            target: self.target,
            damage: self.damage_per_tick,
            tick: self.ticks_applied,
        })
    }

    fn finished(&self, reason: SequenceEnd) -> SequenceEvent {
        SequenceEvent::Finished {
            handle: self.handle,
            target: self.target,
            reason,
        }
    }
}

#[derive(Debug, Default)]
pub struct TimedAttackScheduler {
    active: Vec<TimedAttack>,
    next_id: u64,
    policy: OverlapPolicy,
}

impl TimedAttackScheduler {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            active: Vec::new(),
            next_id: 0,
            policy,
        }
    }

    /// Start an attack. Silently returns `None` when there is no reachable
    /// target, the plan is empty, the overlap policy refuses it, or the first
    /// tick does not land. Running attacks are only replaced once the new
    /// first tick has landed. Events for replaced attacks, the immediate
    /// first tick and a `Finished` for one-tick plans are appended to
    /// `events`, in that order.
    pub fn start(
        &mut self,
        target: Option<Entity>,
        plan: TimedAttackPlan,
        targets: &mut impl DamageTargets,
        events: &mut Vec<SequenceEvent>,
    ) -> Option<SequenceHandle> {
        let target = target?;
        if plan.ticks == 0 || !targets.is_reachable(target) {
            tracing::debug!(?target, ticks = plan.ticks, "timed attack not started");
            return None;
        }

        if self.policy == OverlapPolicy::RejectWhileActive && !self.active.is_empty() {
            tracing::debug!(active = self.active.len(), "timed attack rejected");
            return None;
        }

        let handle = SequenceHandle(self.next_id);
        let mut attack = TimedAttack {
            handle,
            target,
            remaining_ticks: plan.ticks,
            ticks_applied: 0,
            interval: plan.interval,
            damage_per_tick: plan.damage_per_tick,
            until_next_tick: plan.interval,
        };

        let Some(first_tick) = attack.apply_tick(targets) else {
            tracing::debug!(?target, "first tick missed, timed attack not started");
            return None;
        };
        self.next_id += 1;

        if self.policy == OverlapPolicy::ReplaceActive {
            events.extend(self.cancel_all());
        }
        events.push(first_tick);

        if attack.remaining_ticks == 0 {
            events.push(attack.finished(SequenceEnd::Completed));
        } else {
            self.active.push(attack);
        }
        Some(handle)
    }

    /// Advance every running attack by `delta` seconds of its own clock
    pub fn advance(&mut self, delta: f32, targets: &mut impl DamageTargets) -> Vec<SequenceEvent> {
        let mut events = Vec::new();

        self.active.retain_mut(|attack| {
            attack.until_next_tick -= delta;

            while attack.until_next_tick <= 0.0 && attack.remaining_ticks > 0 {
                match attack.apply_tick(targets) {
                    Some(event) => events.push(event),
                    None => {
                        events.push(attack.finished(SequenceEnd::TargetLost));
                        return false;
                    }
                }
                attack.until_next_tick += attack.interval;
            }

            if attack.remaining_ticks == 0 {
                events.push(attack.finished(SequenceEnd::Completed));
                return false;
            }
            true
        });

        events
    }

    pub fn cancel(&mut self, handle: SequenceHandle) -> Option<SequenceEvent> {
        let pos = self.active.iter().position(|a| a.handle == handle)?;
        let attack = self.active.remove(pos);
        Some(attack.finished(SequenceEnd::Cancelled))
    }

    pub fn cancel_all(&mut self) -> Vec<SequenceEvent> {
        self.active
            .drain(..)
            .map(|attack| attack.finished(SequenceEnd::Cancelled))
            .collect()
    }

    pub fn is_active(&self, handle: SequenceHandle) -> bool {
        self.active.iter().any(|a| a.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
