use bevy::prelude::*;

/// Marker component identifying a ball entity (holds physics body & collider).
#[derive(Component)]
pub struct Ball;

/// Logical radius used both for the collider and rendering scale.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BallRadius(pub f32);

/// Tag component for the circle mesh child of a ball.
#[derive(Component)]
pub struct BallCircleVisual;

/// Fixed anchor the spring of every fresh ball is attached to.
#[derive(Component)]
pub struct LaunchPivot;

/// The ball currently owned by the launcher (resting or dragged).
#[derive(Component)]
pub struct HeldBall;

/// A ball that has been released by the launcher.
#[derive(Component, Debug, Copy, Clone)]
pub struct LaunchedBall;

/// The spring of this ball has been released; it now flies freely.
#[derive(Component)]
pub struct Untethered;
