//! Combat controller: orchestration layer.
//!
//! Owns the charge gate, the combo recognizer and the timed attack scheduler
//! of one fighter and wires them to the input stream:
//!
//!   Punch/Kick → hit query → damage → charge → record → combo effect
//!   Jump       → force reset → finisher effect
//!   Special    → sphere cast → timed attack
//!
//! Collaborators (hit geometry, health storage) are passed into each call, so
//! the controller runs the same inside the ECS plugin and in plain unit tests.
//! Everything observable is queued as `ControllerEvent`s.

use std::sync::Arc;

use bevy::prelude::*;

use crate::combat::{
    ChargeGate, ComboEffect, ComboLibrary, ComboMatch, ComboRecognizer, DamageTargets,
    HitQuery, HitResolver, HitShape, LibraryError, MatchResult, MoveId, SequenceEnd,
    SequenceEvent, SequenceHandle, TimedAttackPlan, TimedAttackScheduler,
};
use crate::config::{CombatSettings, ConfigError};

pub mod plugin;

pub use plugin::{CombatEvent, CombatInputEvent, CombatPlugin, Fighter};

/// Discrete input events, already mapped from devices
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatInput {
    Move(Vec2),
    Jump,
    Punch,
    Kick,
    Special,
}

/// Animation / audio triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatCue {
    Attack(MoveId),
    Finisher,
    SpecialAttack,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Forwarded to the locomotion collaborator untouched
    Locomotion(Vec2),
    Cue(CombatCue),
    HitLanded {
        target: Entity,
        mv: MoveId,
        damage: f32,
    },
    AttackMissed(MoveId),
    /// Normalized charge after an accumulation or reset
    ChargeChanged(f32),
    ComboCompleted(ComboMatch),
    FinisherTriggered(ComboMatch),
    SpecialAttackStarted {
        handle: SequenceHandle,
        target: Entity,
    },
    SpecialAttackMissed,
    SpecialAttackTick {
        handle: SequenceHandle,
        target: Entity,
        damage: f32,
        tick: u32,
    },
    SpecialAttackFinished {
        handle: SequenceHandle,
        target: Entity,
        reason: SequenceEnd,
    },
}

impl From<SequenceEvent> for ControllerEvent {
    fn from(event: SequenceEvent) -> Self {
        match event {
            SequenceEvent::Tick {
                handle,
                target,
                damage,
                tick,
            } => ControllerEvent::SpecialAttackTick {
                handle,
                target,
                damage,
                tick,
            },
            SequenceEvent::Finished {
                handle,
                target,
                reason,
            } => ControllerEvent::SpecialAttackFinished {
                handle,
                target,
                reason,
            },
        }
    }
}

#[derive(Debug)]
pub struct CombatController {
    settings: CombatSettings,
    charge: ChargeGate,
    recognizer: ComboRecognizer,
    attacks: TimedAttackScheduler,
    events: Vec<ControllerEvent>,
}

impl CombatController {
    /// Validate settings and build the library from `settings.combos`
    pub fn new(settings: CombatSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let library = Arc::new(settings.build_library()?);
        Ok(Self::with_library(settings, library))
    }

    /// Use an externally built library, e.g. one carrying completion callbacks
    pub fn with_library(settings: CombatSettings, library: Arc<ComboLibrary>) -> Self {
        let charge = ChargeGate::new(settings.charge.increment_per_hit, settings.charge.threshold);
        let recognizer = ComboRecognizer::new(library, settings.combo_window);
        let attacks = TimedAttackScheduler::new(settings.special.overlap);

        Self {
            settings,
            charge,
            recognizer,
            attacks,
            events: Vec::new(),
        }
    }

    /// Route one input. `origin` is the fighter's world position.
    pub fn handle_input(
        &mut self,
        input: CombatInput,
        origin: Vec3,
        resolver: &impl HitResolver,
        targets: &mut impl DamageTargets,
    ) -> Result<(), LibraryError> {
        match input {
            CombatInput::Move(axis) => {
                self.events.push(ControllerEvent::Locomotion(axis));
                Ok(())
            }
            CombatInput::Punch => self.attack(MoveId::Punch, origin, resolver, targets).map(|_| ()),
            CombatInput::Kick => self.attack(MoveId::Kick, origin, resolver, targets).map(|_| ()),
            CombatInput::Jump => self.finisher(origin, resolver, targets).map(|_| ()),
            CombatInput::Special => self.special_attack(origin, resolver, targets).map(|_| ()),
        }
    }

    /// Punch or kick. Only a landed hit charges and records the move;
    /// charge is accumulated before the record so the threshold-crossing hit
    /// is itself eligible.
    pub fn attack(
        &mut self,
        mv: MoveId,
        origin: Vec3,
        resolver: &impl HitResolver,
        targets: &mut impl DamageTargets,
    ) -> Result<MatchResult, LibraryError> {
        self.events.push(ControllerEvent::Cue(CombatCue::Attack(mv)));

        let query = self.punch_query(origin);
        let hit = resolver
            .query(&query)
            .into_iter()
            .find(|target| targets.is_reachable(*target));

        let damage = self.settings.punch.damage;
        let target = match hit {
            Some(target) if targets.apply_damage(target, damage) => target,
            _ => {
                self.events.push(ControllerEvent::AttackMissed(mv));
                return Ok(MatchResult::NoMatch);
            }
        };
        self.events
            .push(ControllerEvent::HitLanded { target, mv, damage });

        let normalized = self.charge.accumulate_hit();
        self.events.push(ControllerEvent::ChargeChanged(normalized));

        let result = self.recognizer.record(mv, &self.charge);
        if let MatchResult::Matched(combo) = &result {
            info!(title = %combo.title, index = combo.index, "combo completed");
            self.events.push(ControllerEvent::ComboCompleted(combo.clone()));

            if self.settings.charge.reset_on_combo {
                self.charge.reset();
                self.events.push(ControllerEvent::ChargeChanged(0.0));
            }
            self.apply_effect(combo.effect, origin, resolver, targets)?;
        }
        Ok(result)
    }

    /// Jump / reset input: clears the sequence and fires the finisher
    /// regardless of charge.
    pub fn finisher(
        &mut self,
        origin: Vec3,
        resolver: &impl HitResolver,
        targets: &mut impl DamageTargets,
    ) -> Result<ComboMatch, LibraryError> {
        let combo = self.recognizer.force_reset()?;
        info!(title = %combo.title, "finisher triggered");
        self.events.push(ControllerEvent::Cue(CombatCue::Finisher));
        self.events
            .push(ControllerEvent::FinisherTriggered(combo.clone()));

        self.apply_effect(combo.effect, origin, resolver, targets)?;
        Ok(combo)
    }

    /// Sphere-cast for a target and start the timed multi-hit attack on it.
    /// Its length is the finisher's window.
    pub fn special_attack(
        &mut self,
        origin: Vec3,
        resolver: &impl HitResolver,
        targets: &mut impl DamageTargets,
    ) -> Result<Option<SequenceHandle>, LibraryError> {
        self.events.push(ControllerEvent::Cue(CombatCue::SpecialAttack));

        let duration = self.recognizer.library().finisher()?.window;
        let special = &self.settings.special;
        let plan = TimedAttackPlan::from_duration(duration, special.interval, special.damage_per_tick);

        let target = resolver.first_hit(&self.special_query(origin));
        let mut started = Vec::new();
        let handle = self.attacks.start(target, plan, targets, &mut started);

        match (handle, target) {
            (Some(handle), Some(target)) => {
                info!(?target, ticks = plan.ticks, "special attack started");
                self.events
                    .push(ControllerEvent::SpecialAttackStarted { handle, target });
            }
            _ => self.events.push(ControllerEvent::SpecialAttackMissed),
        }
        self.events.extend(started.into_iter().map(ControllerEvent::from));
        Ok(handle)
    }

    fn apply_effect(
        &mut self,
        effect: ComboEffect,
        origin: Vec3,
        resolver: &impl HitResolver,
        targets: &mut impl DamageTargets,
    ) -> Result<(), LibraryError> {
        match effect {
            ComboEffect::None => Ok(()),
            ComboEffect::SpecialAttack => self.special_attack(origin, resolver, targets).map(|_| ()),
        }
    }

    /// Frame tick: drives the combo window
    pub fn tick(&mut self, delta: f32) {
        self.recognizer.tick(delta);
    }

    /// Timed attack clock, independent of the frame tick
    pub fn advance_timed_attacks(&mut self, delta: f32, targets: &mut impl DamageTargets) {
        let events = self.attacks.advance(delta, targets);
        self.events.extend(events.into_iter().map(ControllerEvent::from));
    }

    pub fn cancel_special_attack(&mut self, handle: SequenceHandle) -> bool {
        match self.attacks.cancel(handle) {
            Some(event) => {
                self.events.push(event.into());
                true
            }
            None => false,
        }
    }

    pub fn cancel_special_attacks(&mut self) {
        let events = self.attacks.cancel_all();
        self.events.extend(events.into_iter().map(ControllerEvent::from));
    }

    fn punch_query(&self, origin: Vec3) -> HitQuery {
        let punch = &self.settings.punch;
        HitQuery {
            origin: origin + Vec3::from_array(punch.offset),
            orientation: Quat::IDENTITY,
            shape: HitShape::Box {
                half_extents: Vec3::from_array(punch.half_extents),
            },
            layers: self.settings.enemy_layers,
        }
    }

    fn special_query(&self, origin: Vec3) -> HitQuery {
        let special = &self.settings.special;
        HitQuery {
            origin,
            orientation: Quat::IDENTITY,
            shape: HitShape::SphereCast {
                radius: special.radius,
                direction: Vec3::from_array(special.direction),
                max_distance: special.max_distance,
            },
            layers: self.settings.enemy_layers,
        }
    }

    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn charge(&self) -> &ChargeGate {
        &self.charge
    }

    /// For registering charge observers
    pub fn charge_mut(&mut self) -> &mut ChargeGate {
        &mut self.charge
    }

    pub fn recognizer(&self) -> &ComboRecognizer {
        &self.recognizer
    }

    pub fn recorded(&self) -> &[MoveId] {
        self.recognizer.recorded()
    }

    pub fn timed_attacks(&self) -> &TimedAttackScheduler {
        &self.attacks
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }
}
