//! Slingshot launcher: an engine-agnostic state machine (`controller`) and
//! the Bevy/Rapier driver that feeds it (`plugin`).

pub mod controller;
pub mod plugin;
pub mod ports;
pub mod queue;
pub mod recording;

pub use controller::{LaunchAction, LaunchController, LaunchEvent, LaunchPhase, LaunchSettings};
pub use plugin::{
    CameraProjector, LaunchCorePlugin, LaunchPlugin, LaunchScene, Launcher, LauncherEvent,
    ProjectionOverride, RapierBallWorld, SetLauncherEnabled,
};
pub use ports::{BallWorld, IdentityProjector, PointerContact, PointerSource, ScreenProjector};
pub use queue::{DeferredQueue, TaskId};
