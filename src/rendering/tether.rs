use bevy::prelude::*;
use bevy_rapier2d::prelude::ImpulseJoint;

use crate::core::components::{BallRadius, LaunchPivot};
use crate::core::config::GameConfig;
use crate::rendering::palette::palette::{PIVOT_COLOR, TETHER_COLOR};

/// Pivot marker plus a band from each still-tethered ball to its anchor.
pub struct TetherGizmosPlugin;

impl Plugin for TetherGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_pivot_and_tethers);
    }
}

fn draw_pivot_and_tethers(
    mut gizmos: Gizmos,
    cfg: Res<GameConfig>,
    pivots: Query<&GlobalTransform, With<LaunchPivot>>,
    tethered: Query<(&GlobalTransform, &BallRadius, &ImpulseJoint)>,
) {
    if !cfg.draw_pivot {
        return;
    }
    for pivot in &pivots {
        let p = pivot.translation().truncate();
        gizmos.circle_2d(Isometry2d::from_translation(p), 6.0, PIVOT_COLOR);
    }
    for (ball, radius, joint) in &tethered {
        let Ok(pivot) = pivots.get(joint.parent) else {
            continue;
        };
        let (from, to) = tether_segment(
            pivot.translation().truncate(),
            ball.translation().truncate(),
            **radius,
        );
        gizmos.line_2d(from, to, TETHER_COLOR);
    }
}

/// Band from the pivot to the near rim of the ball; collapses to the pivot
/// while the ball covers it.
fn tether_segment(pivot: Vec2, ball: Vec2, radius: f32) -> (Vec2, Vec2) {
    let offset = ball - pivot;
    let reach = (offset.length() - radius).max(0.0);
    (pivot, pivot + offset.normalize_or_zero() * reach)
}
