//! Services the launch controller consumes. The controller never reaches for
//! globals: input, projection and the physics scene are handed in per call.

use bevy::math::Vec2;

/// Press state and screen coordinate of the primary contact point.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerContact {
    pub pressed: bool,
    pub screen: Vec2,
}

impl PointerContact {
    pub fn pressed_at(screen: Vec2) -> Self {
        Self {
            pressed: true,
            screen,
        }
    }

    pub fn released() -> Self {
        Self::default()
    }
}

pub trait PointerSource {
    /// Only the primary contact is ever read; additional touches are ignored.
    fn primary_contact(&self) -> PointerContact;
}

impl PointerSource for PointerContact {
    fn primary_contact(&self) -> PointerContact {
        *self
    }
}

pub trait ScreenProjector {
    /// `None` when the point cannot be projected this frame (no camera, point
    /// outside the viewport).
    fn screen_to_world(&self, screen: Vec2) -> Option<Vec2>;
}

/// Screen coordinates are already world coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProjector;

impl ScreenProjector for IdentityProjector {
    fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        Some(screen)
    }
}

/// Physics/scene side of the launcher: instantiation, body mode and the
/// spring constraint tying a ball to the pivot.
pub trait BallWorld {
    type Ball: Copy;

    /// Instantiate the ball template at `at` (identity rotation) as a dynamic
    /// body whose spring's far end is the pivot.
    fn spawn_ball(&mut self, at: Vec2) -> Self::Ball;

    /// Kinematic bodies ignore forces; their position is driven externally.
    fn set_kinematic(&mut self, ball: Self::Ball, kinematic: bool);

    fn set_position(&mut self, ball: Self::Ball, world: Vec2);

    /// Disable the spring so the ball flies untethered.
    fn detach_spring(&mut self, ball: Self::Ball);
}
