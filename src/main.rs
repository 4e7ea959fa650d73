use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;

use slingshot::core::config::{ConfigLoadReport, GameConfig};
use slingshot::interaction::session::config_hot_reload::ConfigReloadSettings;
use slingshot::GamePlugin;

/// Drag the ball off its pivot and let go.
#[derive(Parser, Debug)]
#[command(name = "slingshot", version, about)]
struct Args {
    /// Config layers, merged in order (later files win).
    #[arg(
        long = "config",
        value_name = "PATH",
        default_values = ["assets/config/game.ron", "assets/config/game.local.ron"]
    )]
    configs: Vec<PathBuf>,

    /// Exit after this many seconds (overrides `window.autoClose`).
    #[arg(long, value_name = "SECS")]
    auto_close: Option<f32>,

    /// Draw Rapier colliders and joints.
    #[arg(long)]
    rapier_debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(secs) = args.auto_close {
        if !secs.is_finite() || secs < 0.0 {
            bail!("--auto-close must be a non-negative number of seconds, got {secs}");
        }
    }

    let (mut cfg, used, errors) = GameConfig::load_layered(args.configs.iter());
    if let Some(secs) = args.auto_close {
        cfg.window.auto_close = secs;
    }
    if args.rapier_debug {
        cfg.rapier_debug = true;
    }
    let report = ConfigLoadReport {
        used,
        errors,
        warnings: cfg.validate(),
    };

    let window_title = cfg.window.title.clone();
    let resolution = (cfg.window.width, cfg.window.height);

    App::new()
        .insert_resource(cfg)
        .insert_resource(report)
        .insert_resource(ConfigReloadSettings {
            paths: args.configs,
            ..default()
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window_title,
                resolution: resolution.into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .run();
    Ok(())
}
