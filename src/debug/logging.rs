use bevy::prelude::*;

use super::DebugState;
use crate::core::components::Ball;
use crate::gameplay::launcher::Launcher;

pub fn debug_logging_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    launcher: Option<Res<Launcher>>,
    balls: Query<(), With<Ball>>,
) {
    state.frame_counter += 1;
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let Some(launcher) = launcher else {
        return;
    };
    let ctl = &launcher.controller;
    info!(
        "SIM frame={} t={:.3}s phase={:?} dragging={} enabled={} pending={} balls={}",
        state.frame_counter,
        ctl.clock(),
        ctl.phase(),
        ctl.is_dragging(),
        ctl.is_enabled(),
        ctl.pending_actions(),
        balls.iter().count()
    );
}
