//! End-to-end combat scenarios through the public API.
//!
//! The world is two in-memory collaborators: `Reach` answers hit queries,
//! `Dummies` stores health.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bevy::prelude::{Entity, Vec3};
use brawler_core::combat::{
    ChargeGate, ComboDefinition, ComboEffect, ComboLibrary, ComboRecognizer, DamageTargets,
    HitQuery, HitResolver, LibraryError, MatchResult, MoveId, OverlapPolicy, SequenceEnd,
    SequenceEvent, TimedAttackPlan, TimedAttackScheduler,
};
use brawler_core::config::CombatSettings;
use brawler_core::controller::{CombatController, CombatInput, ControllerEvent};

use MoveId::{Kick, Punch};

struct Reach(Vec<Entity>);

impl HitResolver for Reach {
    fn query(&self, _query: &HitQuery) -> Vec<Entity> {
        self.0.clone()
    }
}

#[derive(Default)]
struct Dummies {
    hp: HashMap<Entity, f32>,
}

impl Dummies {
    fn with(target: Entity, hp: f32) -> Self {
        Self {
            hp: HashMap::from([(target, hp)]),
        }
    }
}

impl DamageTargets for Dummies {
    fn is_reachable(&self, target: Entity) -> bool {
        self.hp.get(&target).is_some_and(|hp| *hp > 0.0)
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) -> bool {
        match self.hp.get_mut(&target) {
            Some(hp) if *hp > 0.0 => {
                *hp -= amount;
                true
            }
            _ => false,
        }
    }
}

fn armed_gate() -> ChargeGate {
    let mut gate = ChargeGate::new(0.1, 1.0);
    gate.accumulate(1.0);
    gate
}

fn count_ticks(events: &[ControllerEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ControllerEvent::SpecialAttackTick { .. }))
        .count()
}

// ============================================================
// Recognizer scenarios
// ============================================================

#[test]
fn nine_hits_keep_the_gate_closed_tenth_opens_it() {
    let library = Arc::new(ComboLibrary::new(brawler_core::combat::default_combos()).unwrap());
    let mut recognizer = ComboRecognizer::new(library, 0.9);
    let mut gate = ChargeGate::new(0.1, 1.0);

    for _ in 0..9 {
        gate.accumulate_hit();
        assert_eq!(recognizer.record(Punch, &gate), MatchResult::NoMatch);
    }
    assert!(recognizer.recorded().is_empty());

    gate.accumulate_hit();
    assert!(gate.is_ready());
    assert_eq!(
        recognizer.record(Punch, &gate),
        MatchResult::Partial { recorded: 1 }
    );
    assert_eq!(recognizer.recorded(), &[Punch]);
}

#[test]
fn lapsed_window_starts_a_fresh_sequence() {
    let library = Arc::new(
        ComboLibrary::new(vec![ComboDefinition::new("One-Two", 0.9, vec![Punch, Kick])]).unwrap(),
    );
    let mut recognizer = ComboRecognizer::new(library, 0.9);
    let gate = armed_gate();

    recognizer.record(Punch, &gate);
    recognizer.tick(1.0);
    let result = recognizer.record(Kick, &gate);

    assert!(result.matched().is_none());
    assert_eq!(recognizer.recorded(), &[Kick]);
}

#[test]
fn combos_match_exactly_not_by_suffix() {
    let library = Arc::new(ComboLibrary::new(brawler_core::combat::default_combos()).unwrap());
    let mut recognizer = ComboRecognizer::new(library, 0.9);
    let gate = armed_gate();

    // [Punch, Punch, Kick] ends with One-Two but only Super Hit is an exact match
    recognizer.record(Punch, &gate);
    recognizer.record(Punch, &gate);
    let combo = recognizer.record(Kick, &gate);
    assert_eq!(combo.matched().map(|m| m.index), Some(0));
    assert!(recognizer.recorded().is_empty());

    recognizer.record(Punch, &gate);
    let combo = recognizer.record(Kick, &gate);
    assert_eq!(combo.matched().map(|m| m.title.as_str()), Some("One-Two"));
}

#[test]
fn lowest_index_wins_on_duplicate_sequences() {
    let library = Arc::new(
        ComboLibrary::new(vec![
            ComboDefinition::new("Finisher", 2.0, vec![]),
            ComboDefinition::new("First", 0.9, vec![Kick, Kick]),
            ComboDefinition::new("Second", 0.9, vec![Kick, Kick]),
        ])
        .unwrap(),
    );
    let mut recognizer = ComboRecognizer::new(library, 0.9);
    let gate = armed_gate();

    recognizer.record(Kick, &gate);
    let combo = recognizer.record(Kick, &gate);
    assert_eq!(combo.matched().map(|m| m.index), Some(1));
}

#[test]
fn force_reset_ignores_charge() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let library = Arc::new(
        ComboLibrary::new(vec![ComboDefinition::new("Finisher", 2.0, vec![Punch])
            .on_complete(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })])
        .unwrap(),
    );
    let mut recognizer = ComboRecognizer::new(library, 0.9);

    let combo = recognizer.force_reset().unwrap();
    assert_eq!(combo.index, 0);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(recognizer.recorded().is_empty());
}

#[test]
fn charge_never_decreases_through_accumulate() {
    let mut gate = ChargeGate::new(0.1, 1.0);
    gate.accumulate(0.5);
    gate.accumulate(-0.3);
    gate.accumulate(f32::NAN);
    assert!((gate.charge() - 0.5).abs() < 1e-6);
}

// ============================================================
// Timed attack scenarios
// ============================================================

#[test]
fn timed_attack_stops_cleanly_when_target_dies() {
    let target = Entity::from_raw(7);
    // Three ticks of 3 damage bring it to zero
    let mut dummies = Dummies::with(target, 9.0);
    let mut scheduler = TimedAttackScheduler::default();
    let mut events = Vec::new();

    let handle = scheduler
        .start(
            Some(target),
            TimedAttackPlan::new(5, 0.2, 3.0),
            &mut dummies,
            &mut events,
        )
        .unwrap();

    for _ in 0..6 {
        events.extend(scheduler.advance(0.2, &mut dummies));
    }

    let ticks = events
        .iter()
        .filter(|e| matches!(e, SequenceEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 3);
    assert!(events.contains(&SequenceEvent::Finished {
        handle,
        target,
        reason: SequenceEnd::TargetLost,
    }));
    assert!(!scheduler.is_active(handle));
}

// ============================================================
// Controller scenarios
// ============================================================

#[test]
fn full_flow_from_charge_to_special_attack() {
    let dummy = Entity::from_raw(1);
    let reach = Reach(vec![dummy]);
    let mut dummies = Dummies::with(dummy, 1000.0);
    let mut ctrl = CombatController::new(CombatSettings::default()).unwrap();

    for _ in 0..9 {
        ctrl.handle_input(CombatInput::Punch, Vec3::ZERO, &reach, &mut dummies)
            .unwrap();
    }
    assert!(ctrl.recorded().is_empty());

    // The threshold-crossing hit is itself recorded
    ctrl.handle_input(CombatInput::Punch, Vec3::ZERO, &reach, &mut dummies)
        .unwrap();
    assert_eq!(ctrl.recorded(), &[Punch]);

    ctrl.handle_input(CombatInput::Punch, Vec3::ZERO, &reach, &mut dummies)
        .unwrap();
    ctrl.handle_input(CombatInput::Kick, Vec3::ZERO, &reach, &mut dummies)
        .unwrap();

    let events = ctrl.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        ControllerEvent::ComboCompleted(combo) if combo.effect == ComboEffect::SpecialAttack
    )));
    assert!(events
        .iter()
        .any(|e| matches!(e, ControllerEvent::SpecialAttackStarted { target, .. } if *target == dummy)));
    assert_eq!(count_ticks(&events), 1);

    for _ in 0..9 {
        ctrl.advance_timed_attacks(0.2, &mut dummies);
    }
    let events = ctrl.drain_events();
    assert_eq!(count_ticks(&events), 9);
    assert!(events.iter().any(|e| matches!(
        e,
        ControllerEvent::SpecialAttackFinished {
            reason: SequenceEnd::Completed,
            ..
        }
    )));

    // 12 melee hits of 5, 10 ticks of 3
    assert!((dummies.hp[&dummy] - 910.0).abs() < 1e-3);
    assert_eq!(ctrl.timed_attacks().active_count(), 0);
}

#[test]
fn jump_fires_finisher_without_charge() {
    let dummy = Entity::from_raw(1);
    let reach = Reach(vec![dummy]);
    let mut dummies = Dummies::with(dummy, 100.0);
    let mut ctrl = CombatController::new(CombatSettings::default()).unwrap();

    ctrl.handle_input(CombatInput::Jump, Vec3::ZERO, &reach, &mut dummies)
        .unwrap();

    let events = ctrl.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ControllerEvent::FinisherTriggered(combo) if combo.index == 0)));
    assert_eq!(ctrl.timed_attacks().active_count(), 1);
    assert_eq!(ctrl.charge().charge(), 0.0);
}

#[test]
fn special_without_target_is_a_miss() {
    let mut ctrl = CombatController::new(CombatSettings::default()).unwrap();
    let handle = ctrl
        .special_attack(Vec3::ZERO, &Reach(vec![]), &mut Dummies::default())
        .unwrap();

    assert!(handle.is_none());
    assert!(ctrl
        .drain_events()
        .contains(&ControllerEvent::SpecialAttackMissed));
}

#[test]
fn empty_library_reports_missing_finisher() {
    let mut ctrl = CombatController::with_library(
        CombatSettings::default(),
        Arc::new(ComboLibrary::default()),
    );
    let err = ctrl
        .handle_input(
            CombatInput::Jump,
            Vec3::ZERO,
            &Reach(vec![]),
            &mut Dummies::default(),
        )
        .unwrap_err();
    assert_eq!(err, LibraryError::NoDefaultCombo);
}

#[test]
fn replace_policy_cancels_the_running_attack() {
    let dummy = Entity::from_raw(1);
    let reach = Reach(vec![dummy]);
    let mut dummies = Dummies::with(dummy, 1000.0);
    let mut settings = CombatSettings::default();
    settings.special.overlap = OverlapPolicy::ReplaceActive;
    let mut ctrl = CombatController::new(settings).unwrap();

    let first = ctrl
        .special_attack(Vec3::ZERO, &reach, &mut dummies)
        .unwrap()
        .unwrap();
    let second = ctrl
        .special_attack(Vec3::ZERO, &reach, &mut dummies)
        .unwrap()
        .unwrap();

    assert_ne!(first, second);
    assert!(!ctrl.timed_attacks().is_active(first));
    assert!(ctrl.timed_attacks().is_active(second));
    assert!(ctrl.drain_events().contains(&ControllerEvent::SpecialAttackFinished {
        handle: first,
        target: dummy,
        reason: SequenceEnd::Cancelled,
    }));
}
