//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PreUpdate: pointer sampling (after Bevy input processing)
//! 2. PrePhysics (launcher tick: kinematic drag, launch, deferred detach/spawn)
//! 3. Rapier (handled by plugin in PostUpdate)
//! 4. PostPhysicsAdjust (observers of launcher events, debug logging)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerSampleSet; // primary contact refreshed once per frame

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // body type / transform edits before the simulation step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsAdjustSet; // lightweight reactions after the launcher ran

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct BallVisualsSet; // startup: mesh/material handles for balls
