use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{CombatController, CombatInput, ControllerEvent};
use crate::combat::hitbox::{HealthTargets, RapierHitResolver};
use crate::combat::{Health, Hurtbox};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatInputEvent>()
            .add_event::<CombatEvent>()
            .add_systems(
                Update,
                (
                    process_combat_inputs,
                    tick_combo_windows,
                    advance_timed_attacks,
                    publish_controller_events,
                    despawn_defeated,
                )
                    .chain(),
            );
    }
}

/// A combat-capable entity
#[derive(Component, Debug)]
pub struct Fighter {
    pub controller: CombatController,
}

impl Fighter {
    pub fn new(controller: CombatController) -> Self {
        Self { controller }
    }
}

/// Input routed to one fighter
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatInputEvent {
    pub fighter: Entity,
    pub input: CombatInput,
}

/// Controller output, tagged with the fighter it came from
#[derive(Event, Debug, Clone)]
pub struct CombatEvent {
    pub fighter: Entity,
    pub event: ControllerEvent,
}

fn process_combat_inputs(
    mut inputs: EventReader<CombatInputEvent>,
    rapier: ReadDefaultRapierContext,
    hurtboxes: Query<&'static Hurtbox>,
    mut fighters: Query<(&mut Fighter, &GlobalTransform)>,
    mut health: Query<&'static mut Health>,
) {
    if inputs.is_empty() {
        return;
    }
    let context = rapier.single();

    for event in inputs.read() {
        let Ok((mut fighter, transform)) = fighters.get_mut(event.fighter) else {
            continue;
        };

        let resolver = RapierHitResolver::new(&context, &hurtboxes).excluding(event.fighter);
        let mut targets = HealthTargets::new(&mut health);
        if let Err(err) = fighter.controller.handle_input(
            event.input,
            transform.translation(),
            &resolver,
            &mut targets,
        ) {
            warn!(fighter = ?event.fighter, "combat input rejected: {err}");
        }
    }
}

/// Combo windows run on the frame (virtual) clock
fn tick_combo_windows(time: Res<Time>, mut fighters: Query<&mut Fighter>) {
    let dt = time.delta_secs();
    for mut fighter in &mut fighters {
        if fighter.controller.recognizer().is_recording() {
            fighter.controller.tick(dt);
        }
    }
}

/// Timed attacks run on wall-clock time, unaffected by pause or time scaling
fn advance_timed_attacks(
    time: Res<Time<Real>>,
    mut fighters: Query<&mut Fighter>,
    mut health: Query<&'static mut Health>,
) {
    let dt = time.delta_secs();
    for mut fighter in &mut fighters {
        if fighter.controller.timed_attacks().active_count() == 0 {
            continue;
        }
        let mut targets = HealthTargets::new(&mut health);
        fighter.controller.advance_timed_attacks(dt, &mut targets);
    }
}

fn publish_controller_events(
    mut fighters: Query<(Entity, &mut Fighter)>,
    mut writer: EventWriter<CombatEvent>,
) {
    for (entity, mut fighter) in &mut fighters {
        if !fighter.controller.has_events() {
            continue;
        }
        for event in fighter.controller.drain_events() {
            writer.send(CombatEvent {
                fighter: entity,
                event,
            });
        }
    }
}

/// Defeated targets stop resolving, which ends any timed attack on them
fn despawn_defeated(mut commands: Commands, query: Query<(Entity, &Health), Without<Fighter>>) {
    for (entity, health) in &query {
        if !health.is_alive() {
            debug!(?entity, "target defeated");
            commands.entity(entity).despawn_recursive();
        }
    }
}
