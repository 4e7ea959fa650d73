use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier from GameConfig

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        let (pixels_per_meter, rapier_debug) = app
            .world()
            .get_resource::<GameConfig>()
            .map(|cfg| (cfg.physics.pixels_per_meter, cfg.rapier_debug))
            .unwrap_or_else(|| {
                let d = GameConfig::default();
                (d.physics.pixels_per_meter, d.rapier_debug)
            });
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            pixels_per_meter.max(1.0),
        ))
        .add_systems(Update, configure_gravity);
        if rapier_debug {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

/// Applies `physics.gravity_y` to each Rapier context as it appears and again
/// whenever the config changes.
fn configure_gravity(
    game_cfg: Res<GameConfig>,
    mut contexts: Query<&mut RapierConfiguration>,
) {
    for mut rapier_cfg in &mut contexts {
        if !rapier_cfg.is_added() && !game_cfg.is_changed() {
            continue;
        }
        rapier_cfg.gravity = Vect::new(0.0, game_cfg.physics.gravity_y);
        debug!(gravity_y = game_cfg.physics.gravity_y, "rapier gravity configured");
    }
}
