//! Player fighter, training dummy and keyboard input.
//!
//! Maps keys to `CombatInput` and spawns a minimal arena so the combat core
//! can be exercised in the demo binary.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::Health;
use crate::config::CombatSettings;
use crate::constants::{ENEMY_LAYER, PLAYER_LAYER};
use crate::controller::{
    CombatController, CombatEvent, CombatInput, CombatInputEvent, ControllerEvent, Fighter,
};

pub struct PlayerPlugin {
    pub settings: CombatSettings,
}

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ArenaSettings(self.settings.clone()))
            .add_systems(Startup, spawn_arena)
            .add_systems(Update, (read_keyboard_input, log_combat_events));
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ArenaSettings(pub CombatSettings);

/// Marker for the player entity
#[derive(Component, Debug)]
pub struct Player;

/// Marker for the training dummy
#[derive(Component, Debug)]
pub struct TrainingDummy;

const DUMMY_HEALTH: f32 = 500.0;

fn spawn_arena(mut commands: Commands, settings: Res<ArenaSettings>) {
    let controller = match CombatController::new(settings.0.clone()) {
        Ok(controller) => controller,
        Err(err) => {
            error!("Invalid combat settings, player not spawned: {err}");
            return;
        }
    };

    commands.spawn((
        Player,
        Fighter::new(controller),
        Transform::from_xyz(0.0, 0.0, 0.0),
        Collider::capsule_y(0.5, 0.4),
        CollisionGroups::new(Group::from_bits_truncate(PLAYER_LAYER), Group::ALL),
        Health::new(100.0),
    ));

    commands.spawn((
        TrainingDummy,
        Transform::from_xyz(1.5, 1.0, 0.0),
        Collider::cuboid(0.4, 1.0, 0.4),
        Sensor,
        CollisionGroups::new(Group::from_bits_truncate(ENEMY_LAYER), Group::ALL),
        Health::new(DUMMY_HEALTH),
    ));

    info!("Arena spawned: player + training dummy");
}

fn read_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    player: Query<Entity, With<Player>>,
    mut last_axis: Local<Vec2>,
    mut inputs: EventWriter<CombatInputEvent>,
) {
    let Ok(fighter) = player.get_single() else {
        return;
    };
    let mut send = |input| {
        inputs.send(CombatInputEvent { fighter, input });
    };

    let mut axis = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if axis != *last_axis {
        *last_axis = axis;
        send(CombatInput::Move(axis));
    }

    if keyboard.just_pressed(KeyCode::KeyJ) {
        send(CombatInput::Punch);
    }
    if keyboard.just_pressed(KeyCode::KeyK) {
        send(CombatInput::Kick);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        send(CombatInput::Jump);
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        send(CombatInput::Special);
    }
}

fn log_combat_events(mut events: EventReader<CombatEvent>) {
    for CombatEvent { fighter, event } in events.read() {
        match event {
            ControllerEvent::ChargeChanged(value) => {
                debug!(?fighter, "charge {:.0}%", value.min(1.0) * 100.0)
            }
            ControllerEvent::ComboCompleted(combo) => info!(?fighter, "combo: {}", combo.title),
            ControllerEvent::FinisherTriggered(combo) => {
                info!(?fighter, "finisher: {}", combo.title)
            }
            ControllerEvent::SpecialAttackFinished { target, reason, .. } => {
                info!(?fighter, ?target, ?reason, "special attack finished")
            }
            _ => {}
        }
    }
}
