//! Input mapping from raw host events to viewer inputs
//!
//! The host reports single clicks with a timestamp; the mapper turns two
//! clicks that are close in time and space into a double click. Escape maps
//! to leaving the immersive session while one is running.

use std::time::Duration;

use crate::config::InputConfig;

/// Pointer input understood by the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Pointer moved to screen coordinates
    Move { x: f32, y: f32 },
    /// Single click
    Click { x: f32, y: f32 },
    /// Second click of a double click
    DoubleClick { x: f32, y: f32 },
    /// Pointer left the render surface
    Leave,
}

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Key press state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Actions triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Leave the immersive session (Escape while in XR)
    ExitImmersive,
}

/// Maps raw input events to viewer inputs
#[derive(Debug, Clone)]
pub struct PointerMapper {
    double_click: Duration,
    max_distance: f32,
    /// Time and position of the last single click
    last_click: Option<(Duration, f32, f32)>,
}

impl PointerMapper {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            double_click: Duration::from_millis(config.double_click_ms),
            max_distance: config.double_click_distance,
            last_click: None,
        }
    }

    /// Map a click at host time `at`
    ///
    /// Always yields the click itself; the second of two clicks within the
    /// double-click window and distance is followed by a double click. A
    /// double click consumes both clicks, so a third click starts over.
    pub fn map_click(&mut self, x: f32, y: f32, at: Duration) -> Vec<PointerInput> {
        let mut inputs = vec![PointerInput::Click { x, y }];
        let is_double = self.last_click.is_some_and(|(t, lx, ly)| {
            let dx = x - lx;
            let dy = y - ly;
            at >= t && at - t <= self.double_click && (dx * dx + dy * dy).sqrt() <= self.max_distance
        });

        if is_double {
            inputs.push(PointerInput::DoubleClick { x, y });
            self.last_click = None;
        } else {
            self.last_click = Some((at, x, y));
        }
        inputs
    }

    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for handled keys, `None` otherwise
    pub fn map_keyboard(key: Key, state: KeyState, in_xr: bool) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != KeyState::Pressed {
            return None;
        }

        match key {
            Key::Escape if in_xr => Some(InputAction::ExitImmersive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PointerMapper {
        PointerMapper::new(&InputConfig::default())
    }

    #[test]
    fn test_single_click() {
        let mut m = mapper();
        assert_eq!(m.map_click(10.0, 10.0, Duration::ZERO), vec![PointerInput::Click { x: 10.0, y: 10.0 }]);
    }

    #[test]
    fn test_double_click_within_window() {
        let mut m = mapper();
        m.map_click(10.0, 10.0, Duration::from_millis(1000));
        let inputs = m.map_click(11.0, 10.0, Duration::from_millis(1200));
        assert_eq!(
            inputs,
            vec![PointerInput::Click { x: 11.0, y: 10.0 }, PointerInput::DoubleClick { x: 11.0, y: 10.0 }]
        );
    }

    #[test]
    fn test_slow_clicks_are_not_double() {
        let mut m = mapper();
        m.map_click(10.0, 10.0, Duration::from_millis(0));
        let inputs = m.map_click(10.0, 10.0, Duration::from_millis(400));
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn test_distant_clicks_are_not_double() {
        let mut m = mapper();
        m.map_click(10.0, 10.0, Duration::from_millis(0));
        let inputs = m.map_click(30.0, 10.0, Duration::from_millis(100));
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn test_triple_click_starts_over() {
        let mut m = mapper();
        m.map_click(0.0, 0.0, Duration::from_millis(0));
        assert_eq!(m.map_click(0.0, 0.0, Duration::from_millis(100)).len(), 2);
        assert_eq!(m.map_click(0.0, 0.0, Duration::from_millis(200)).len(), 1);
    }

    #[test]
    fn test_escape_in_xr_exits() {
        let action = PointerMapper::map_keyboard(Key::Escape, KeyState::Pressed, true);
        assert_eq!(action, Some(InputAction::ExitImmersive));
    }

    #[test]
    fn test_escape_outside_xr_ignored() {
        assert_eq!(PointerMapper::map_keyboard(Key::Escape, KeyState::Pressed, false), None);
    }

    #[test]
    fn test_key_release_ignored() {
        assert_eq!(PointerMapper::map_keyboard(Key::Escape, KeyState::Released, true), None);
        assert_eq!(PointerMapper::map_keyboard(Key::Other, KeyState::Pressed, true), None);
    }
}
