use std::sync::Arc;

use bevy::prelude::Entity;
use brawler_core::combat::{
    default_combos, ChargeGate, ComboLibrary, ComboRecognizer, DamageTargets, MoveId,
    TimedAttackPlan, TimedAttackScheduler,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct Immortal;

impl DamageTargets for Immortal {
    fn is_reachable(&self, _target: Entity) -> bool {
        true
    }

    fn apply_damage(&mut self, _target: Entity, _amount: f32) -> bool {
        true
    }
}

fn bench_recognizer(c: &mut Criterion) {
    let library = Arc::new(ComboLibrary::new(default_combos()).unwrap());
    let mut gate = ChargeGate::default();
    gate.accumulate(1.0);

    c.bench_function("record_super_hit", |b| {
        let mut recognizer = ComboRecognizer::new(library.clone(), 0.9);
        b.iter(|| {
            recognizer.record(black_box(MoveId::Punch), &gate);
            recognizer.record(black_box(MoveId::Punch), &gate);
            black_box(recognizer.record(black_box(MoveId::Kick), &gate));
        })
    });

    c.bench_function("record_gated", |b| {
        let closed = ChargeGate::default();
        let mut recognizer = ComboRecognizer::new(library.clone(), 0.9);
        b.iter(|| black_box(recognizer.record(black_box(MoveId::Punch), &closed)))
    });

    c.bench_function("tick_recording", |b| {
        let mut recognizer = ComboRecognizer::new(library.clone(), f32::MAX);
        recognizer.record(MoveId::Punch, &gate);
        b.iter(|| recognizer.tick(black_box(0.016)))
    });
}

fn bench_timed_attacks(c: &mut Criterion) {
    c.bench_function("advance_64_attacks", |b| {
        b.iter(|| {
            let mut scheduler = TimedAttackScheduler::default();
            let mut events = Vec::new();
            for i in 0..64 {
                scheduler.start(
                    Some(Entity::from_raw(i)),
                    TimedAttackPlan::new(10, 0.2, 3.0),
                    &mut Immortal,
                    &mut events,
                );
            }
            for _ in 0..10 {
                events.extend(scheduler.advance(black_box(0.2), &mut Immortal));
            }
            black_box(events.len())
        })
    });
}

criterion_group!(benches, bench_recognizer, bench_timed_attacks);
criterion_main!(benches);
