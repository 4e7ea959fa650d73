// This file is part of Slingshot.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::config::ConfigLoadReport;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::launcher::LaunchPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;
use crate::rendering::materials::materials::MaterialsPlugin;
use crate::rendering::tether::TetherGizmosPlugin;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (PrePhysicsSet, PostPhysicsAdjustSet.after(PrePhysicsSet)),
        )
        .add_plugins((
            CameraPlugin,
            MaterialsPlugin,
            PhysicsSetupPlugin,
            LaunchPlugin,
            TetherGizmosPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ))
        .add_systems(Startup, log_config_report);
    }
}

fn log_config_report(report: Option<Res<ConfigLoadReport>>) {
    let Some(report) = report else {
        return;
    };
    if report.used.is_empty() {
        warn!("no config file loaded; running with defaults");
    } else {
        info!("config loaded from: {}", report.used.join(", "));
    }
    for e in &report.errors {
        warn!("config: {e}");
    }
    for w in &report.warnings {
        warn!("config validation: {w}");
    }
}
