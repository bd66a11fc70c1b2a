//! Device input mapping
//!
//! Turns raw keyboard/touch edges into logical runner actions.

use crate::sim::Action;

/// Keys the runner cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            _ => Key::Other,
        }
    }
}

/// Discrete, edge-triggered device event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Touch began at `y` (surface coordinates, 0 = top)
    TouchStart { y: f32 },
    TouchEnd,
}

/// Translate a device event into an action.
///
/// Touches are split by the vertical half of a surface `surface_height` tall:
/// upper half jumps, lower half ducks.
pub fn translate(event: DeviceEvent, surface_height: f32) -> Option<Action> {
    match event {
        DeviceEvent::KeyDown(Key::Up) => Some(Action::Jump),
        DeviceEvent::KeyDown(Key::Down) => Some(Action::Duck),
        DeviceEvent::KeyUp(Key::Down) => Some(Action::Stand),
        DeviceEvent::TouchStart { y } => {
            if y < surface_height / 2.0 {
                Some(Action::Jump)
            } else {
                Some(Action::Duck)
            }
        }
        DeviceEvent::TouchEnd => Some(Action::Stand),
        DeviceEvent::KeyDown(_) | DeviceEvent::KeyUp(_) => None,
    }
}
