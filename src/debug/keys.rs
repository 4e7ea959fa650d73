use bevy::prelude::*;
use bevy_rapier2d::render::DebugRenderContext;

use crate::gameplay::launcher::{Launcher, SetLauncherEnabled};

/// `P` pauses / resumes the launch cycle, `F2` toggles the Rapier wireframe.
pub fn debug_key_input_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    launcher: Option<Res<Launcher>>,
    debug_render: Option<ResMut<DebugRenderContext>>,
    mut requests: EventWriter<SetLauncherEnabled>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::KeyP) {
        if let Some(launcher) = launcher {
            let enabled = !launcher.controller.is_enabled();
            info!(enabled, "DEBUG launcher toggle");
            requests.write(SetLauncherEnabled(enabled));
        }
    }
    if keys.just_pressed(KeyCode::F2) {
        if let Some(mut ctx) = debug_render {
            ctx.enabled = !ctx.enabled;
            info!(enabled = ctx.enabled, "DEBUG rapier wireframe toggle");
        }
    }
}
