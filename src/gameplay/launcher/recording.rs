//! Headless stand-ins for the engine services: a ball world that records
//! every call, and a projector that mimics a centred 2D camera.

use bevy::math::Vec2;

use super::ports::{BallWorld, ScreenProjector};

#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    Spawn { ball: u32, at: Vec2 },
    SetKinematic { ball: u32, kinematic: bool },
    SetPosition { ball: u32, at: Vec2 },
    DetachSpring { ball: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBall {
    pub position: Vec2,
    pub kinematic: bool,
    /// Anchor of the spring while attached.
    pub spring_target: Option<Vec2>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingWorld {
    pivot: Vec2,
    balls: Vec<RecordedBall>,
    calls: Vec<WorldCall>,
}

impl RecordingWorld {
    pub fn new(pivot: Vec2) -> Self {
        Self {
            pivot,
            ..Default::default()
        }
    }

    pub fn ball(&self, ball: u32) -> Option<&RecordedBall> {
        self.balls.get(ball as usize)
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn calls(&self) -> &[WorldCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<WorldCall> {
        std::mem::take(&mut self.calls)
    }
}

impl BallWorld for RecordingWorld {
    type Ball = u32;

    fn spawn_ball(&mut self, at: Vec2) -> u32 {
        let ball = self.balls.len() as u32;
        self.balls.push(RecordedBall {
            position: at,
            kinematic: false,
            spring_target: Some(self.pivot),
        });
        self.calls.push(WorldCall::Spawn { ball, at });
        ball
    }

    fn set_kinematic(&mut self, ball: u32, kinematic: bool) {
        if let Some(b) = self.balls.get_mut(ball as usize) {
            b.kinematic = kinematic;
        }
        self.calls.push(WorldCall::SetKinematic { ball, kinematic });
    }

    fn set_position(&mut self, ball: u32, at: Vec2) {
        if let Some(b) = self.balls.get_mut(ball as usize) {
            b.position = at;
        }
        self.calls.push(WorldCall::SetPosition { ball, at });
    }

    fn detach_spring(&mut self, ball: u32) {
        if let Some(b) = self.balls.get_mut(ball as usize) {
            b.spring_target = None;
        }
        self.calls.push(WorldCall::DetachSpring { ball });
    }
}

/// Orthographic camera at `world_center` looking at a `viewport` sized
/// window: screen origin top-left, y down; world y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportProjector {
    pub viewport: Vec2,
    pub world_center: Vec2,
}

impl ViewportProjector {
    pub fn new(viewport: Vec2, world_center: Vec2) -> Self {
        Self {
            viewport,
            world_center,
        }
    }
}

impl ScreenProjector for ViewportProjector {
    fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        if screen.x < 0.0 || screen.y < 0.0 || screen.x > self.viewport.x || screen.y > self.viewport.y {
            return None;
        }
        let centered = screen - self.viewport * 0.5;
        Some(self.world_center + Vec2::new(centered.x, -centered.y))
    }
}
