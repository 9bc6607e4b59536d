use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use brawler_core::config::CombatSettings;
use brawler_core::controller::CombatPlugin;
use brawler_core::logging::LoggingPlugin;
use brawler_core::player::PlayerPlugin;

const CONFIG_PATH: &str = "config/combat.ron";

fn main() -> anyhow::Result<()> {
    let settings = CombatSettings::load(CONFIG_PATH)
        .with_context(|| format!("failed to load combat config from {CONFIG_PATH}"))?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Brawler - Combat Core".into(),
                        resolution: (1280., 720.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        // Logging
        .add_plugins(LoggingPlugin::default())
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Gameplay systems
        .add_plugins(CombatPlugin)
        .add_plugins(PlayerPlugin { settings })
        // Startup
        .add_systems(Startup, setup)
        .run();

    Ok(())
}

fn setup(mut commands: Commands) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.0, 12.0).looking_at(Vec3::new(1.0, 1.0, 0.0), Vec3::Y),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.5, 0.5, 0.0)),
    ));

    info!("Brawler combat core initialized");
    info!("Controls: WASD move, J punch, K kick, Space finisher, L special");
}
