use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;
use bevy_rapier2d::prelude::*;

use super::controller::{LaunchController, LaunchEvent, LaunchSettings};
use super::ports::{BallWorld, ScreenProjector};
use crate::core::components::{
    Ball, BallCircleVisual, BallRadius, HeldBall, LaunchPivot, LaunchedBall, Untethered,
};
use crate::core::config::GameConfig;
use crate::core::system::system_order::{BallVisualsSet, PrePhysicsSet};
use crate::interaction::input::{PointerInputPlugin, PointerSample};
use crate::rendering::camera::camera::LaunchCamera;
use crate::rendering::materials::materials::BallVisuals;

/// Smallest collider radius accepted from config.
const MIN_BALL_RADIUS: f32 = 0.5;

#[derive(Resource, Debug)]
pub struct Launcher {
    pub controller: LaunchController<Entity>,
    pub pivot: Entity,
}

/// Every launcher transition, re-published for other systems.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LauncherEvent(pub LaunchEvent<Entity>);

/// Request to pause (`false`) or resume (`true`) the launch cycle.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetLauncherEnabled(pub bool);

/// Launcher without input sampling; `PointerSample` is written by the caller.
pub struct LaunchCorePlugin;

impl Plugin for LaunchCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerSample>()
            .add_event::<LauncherEvent>()
            .add_event::<SetLauncherEnabled>()
            .add_systems(Startup, setup_launcher.after(BallVisualsSet))
            .add_systems(
                Update,
                (sync_launch_settings, drive_launcher)
                    .chain()
                    .in_set(PrePhysicsSet),
            );
    }
}

/// Launcher fed by touch / mouse.
pub struct LaunchPlugin;

impl Plugin for LaunchPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PointerInputPlugin, LaunchCorePlugin));
    }
}

/// Scene access shared by startup and the per-frame driver.
#[derive(SystemParam)]
pub struct LaunchScene<'w, 's> {
    commands: Commands<'w, 's>,
    transforms: Query<'w, 's, &'static mut Transform, With<Ball>>,
    visuals: Option<Res<'w, BallVisuals>>,
    cfg: Res<'w, GameConfig>,
}

/// `BallWorld` over Rapier components. All structural edits go through
/// `Commands`, so they land before the physics step of the same frame.
pub struct RapierBallWorld<'a, 'w, 's> {
    scene: &'a mut LaunchScene<'w, 's>,
    pivot: Entity,
}

impl<'a, 'w, 's> RapierBallWorld<'a, 'w, 's> {
    pub fn new(scene: &'a mut LaunchScene<'w, 's>, pivot: Entity) -> Self {
        Self { scene, pivot }
    }

    /// Log each event, update ball markers and forward it as `LauncherEvent`.
    fn publish(&mut self, events: Vec<LaunchEvent<Entity>>, out: &mut EventWriter<LauncherEvent>) {
        for ev in events {
            log_event(&ev);
            match ev {
                LaunchEvent::Launched { ball, .. } => {
                    self.scene
                        .commands
                        .entity(ball)
                        .remove::<HeldBall>()
                        .insert(LaunchedBall);
                }
                LaunchEvent::Detached { ball, .. } => {
                    self.scene.commands.entity(ball).insert(Untethered);
                }
                LaunchEvent::Spawned { .. } | LaunchEvent::DragStarted { .. } => {}
            }
            out.write(LauncherEvent(ev));
        }
    }
}

impl BallWorld for RapierBallWorld<'_, '_, '_> {
    type Ball = Entity;

    fn spawn_ball(&mut self, at: Vec2) -> Entity {
        let ball_cfg = self.scene.cfg.ball.clone();
        let spring = self.scene.cfg.spring.clone();
        let radius = ball_cfg.radius.max(MIN_BALL_RADIUS);
        let visual = self.scene.visuals.as_deref().and_then(|v| {
            v.pick_material(&mut rand::thread_rng())
                .map(|material| (v.mesh.clone(), material))
        });
        let joint = SpringJointBuilder::new(spring.rest_length, spring.stiffness, spring.damping);
        let mut entity = self.scene.commands.spawn((
            Ball,
            BallRadius(radius),
            HeldBall,
            RigidBody::Dynamic,
            Collider::ball(radius),
            ColliderMassProperties::Density(ball_cfg.density),
            Restitution::coefficient(ball_cfg.restitution),
            Transform::from_translation(at.extend(0.0)),
            ImpulseJoint::new(self.pivot, joint),
        ));
        if let Some((mesh, material)) = visual {
            entity.with_children(|parent| {
                parent.spawn((
                    BallCircleVisual,
                    Mesh2d(mesh),
                    MeshMaterial2d(material),
                    Transform::from_scale(Vec3::splat(radius)),
                ));
            });
        }
        entity.id()
    }

    fn set_kinematic(&mut self, ball: Entity, kinematic: bool) {
        let body = if kinematic {
            RigidBody::KinematicPositionBased
        } else {
            RigidBody::Dynamic
        };
        self.scene.commands.entity(ball).insert(body);
    }

    fn set_position(&mut self, ball: Entity, world: Vec2) {
        match self.scene.transforms.get_mut(ball) {
            Ok(mut tf) => {
                tf.translation.x = world.x;
                tf.translation.y = world.y;
            }
            // Spawned this frame: the entity only exists in the command queue.
            Err(_) => {
                self.scene
                    .commands
                    .entity(ball)
                    .insert(Transform::from_translation(world.extend(0.0)));
            }
        }
    }

    fn detach_spring(&mut self, ball: Entity) {
        self.scene.commands.entity(ball).remove::<ImpulseJoint>();
    }
}

/// Screen-to-world mapping used instead of the launch camera when present
/// (headless runs have no camera to project through).
#[derive(Resource)]
pub struct ProjectionOverride(pub Box<dyn ScreenProjector + Send + Sync>);

impl ProjectionOverride {
    pub fn new(projector: impl ScreenProjector + Send + Sync + 'static) -> Self {
        Self(Box::new(projector))
    }
}

/// Projection through the launch camera; `None` without one.
pub struct CameraProjector<'a> {
    view: Option<(&'a Camera, &'a GlobalTransform)>,
}

impl<'a> CameraProjector<'a> {
    pub fn new(view: Option<(&'a Camera, &'a GlobalTransform)>) -> Self {
        Self { view }
    }
}

impl ScreenProjector for CameraProjector<'_> {
    fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        let (camera, cam_tf) = self.view?;
        camera.viewport_to_world_2d(cam_tf, screen).ok()
    }
}

fn log_event(ev: &LaunchEvent<Entity>) {
    match *ev {
        LaunchEvent::Spawned { ball, at, time } => {
            info!(?ball, t = time, "launcher: spawned ball at ({:.1}, {:.1})", at.x, at.y)
        }
        LaunchEvent::DragStarted { ball, time } => debug!(?ball, t = time, "launcher: drag started"),
        LaunchEvent::Launched { ball, time } => info!(?ball, t = time, "launcher: launched"),
        LaunchEvent::Detached { ball, time } => info!(?ball, t = time, "launcher: spring detached"),
    }
}

pub fn setup_launcher(mut scene: LaunchScene, mut out: EventWriter<LauncherEvent>) {
    let settings = LaunchSettings::from(&scene.cfg.launcher);
    let pivot = scene
        .commands
        .spawn((
            LaunchPivot,
            RigidBody::Fixed,
            Transform::from_translation(settings.pivot.extend(0.0)),
        ))
        .id();
    info!(
        detach_delay = settings.detach_delay,
        respawn_delay = settings.respawn_delay,
        "launcher: pivot at ({:.1}, {:.1})",
        settings.pivot.x,
        settings.pivot.y
    );
    let mut controller = LaunchController::new(settings);
    let mut world = RapierBallWorld::new(&mut scene, pivot);
    let events = controller.init(&mut world);
    world.publish(events, &mut out);
    scene.commands.insert_resource(Launcher { controller, pivot });
}

/// Pushes config edits (hot reload) into the controller and moves the pivot.
fn sync_launch_settings(
    cfg: Res<GameConfig>,
    launcher: Option<ResMut<Launcher>>,
    mut pivots: Query<&mut Transform, With<LaunchPivot>>,
) {
    let Some(mut launcher) = launcher else {
        return;
    };
    if !cfg.is_changed() {
        return;
    }
    let settings = LaunchSettings::from(&cfg.launcher);
    if *launcher.controller.settings() == settings {
        return;
    }
    launcher.controller.set_settings(settings);
    if let Ok(mut tf) = pivots.get_mut(launcher.pivot) {
        tf.translation.x = settings.pivot.x;
        tf.translation.y = settings.pivot.y;
    }
    info!("launcher: settings updated from config");
}

#[allow(clippy::too_many_arguments)]
fn drive_launcher(
    time: Res<Time>,
    pointer: Res<PointerSample>,
    launcher: Option<ResMut<Launcher>>,
    cameras: Query<(&Camera, &GlobalTransform), With<LaunchCamera>>,
    projection: Option<Res<ProjectionOverride>>,
    mut requests: EventReader<SetLauncherEnabled>,
    mut scene: LaunchScene,
    mut out: EventWriter<LauncherEvent>,
    mut warned: Local<bool>,
) {
    let Some(mut launcher) = launcher else {
        if !*warned {
            warn!("launcher: no Launcher resource; skipping ticks");
            *warned = true;
        }
        return;
    };
    let launcher = &mut *launcher;
    let mut world = RapierBallWorld::new(&mut scene, launcher.pivot);
    let mut events = Vec::new();
    for SetLauncherEnabled(enabled) in requests.read().copied() {
        info!(enabled, "launcher: enable request");
        events.extend(launcher.controller.set_enabled(enabled, &mut world));
    }
    let camera = CameraProjector::new(cameras.iter().next());
    let projector: &dyn ScreenProjector = match projection.as_deref() {
        Some(ProjectionOverride(fixed)) => fixed.as_ref(),
        None => &camera,
    };
    events.extend(launcher.controller.tick(
        time.delta_secs(),
        &*pointer,
        projector,
        &mut world,
    ));
    world.publish(events, &mut out);
}
