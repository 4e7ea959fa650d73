use bevy::input::InputSystem;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::system::system_order::PointerSampleSet;
use crate::gameplay::launcher::ports::{PointerContact, PointerSource};

/// Primary contact as seen this frame. Written once per frame in `PreUpdate`;
/// the launcher reads it in `Update`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pressed: bool,
    pub screen: Vec2,
}

impl PointerSource for PointerSample {
    fn primary_contact(&self) -> PointerContact {
        PointerContact {
            pressed: self.pressed,
            screen: self.screen,
        }
    }
}

pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerSample>()
            .configure_sets(PreUpdate, PointerSampleSet.after(InputSystem))
            .add_systems(PreUpdate, sample_primary_pointer.in_set(PointerSampleSet));
    }
}

/// Touch that owns the pointer until every finger has lifted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryTouch {
    id: Option<u64>,
    /// The owning finger lifted while others stayed down.
    ended: bool,
}

/// The first finger down owns the pointer; extra touches are ignored, even
/// after it lifts, until the screen is clear again. Without touches the left
/// mouse button and window cursor stand in (desktop).
pub fn sample_primary_pointer(
    touches: Res<Touches>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut primary: Local<PrimaryTouch>,
    mut sample: ResMut<PointerSample>,
) {
    if touches.iter().next().is_none() {
        *primary = PrimaryTouch::default();
    } else {
        if primary.id.is_none() {
            primary.id = touches.iter().min_by_key(|t| t.id()).map(|t| t.id());
        }
        let owner = match primary.id {
            Some(id) if !primary.ended => touches.get_pressed(id),
            _ => None,
        };
        match owner {
            Some(touch) => {
                sample.pressed = true;
                sample.screen = touch.position();
            }
            None => {
                primary.ended = true;
                sample.pressed = false;
            }
        }
        return;
    }
    if !buttons.pressed(MouseButton::Left) {
        sample.pressed = false;
        return;
    }
    // Cursor outside the window mid-drag: keep the last known point.
    if let Some(pos) = windows.single().ok().and_then(|w| w.cursor_position()) {
        sample.pressed = true;
        sample.screen = pos;
    }
}
