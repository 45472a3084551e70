// Mouse state construction
//
// Position and buttons are a direct platform query at call time, not an
// event-driven cache; the tracker only carries the window bounds, the
// accumulated wheel value, and a mirror of the button mask maintained from
// queue events.

use crate::core::ButtonState;
use crate::platform::{CursorReading, MouseButton, WindowQuery};
use log::trace;

/// Wheel accumulation per detent, matching the convention native
/// runtimes report
pub const WHEEL_DELTA: i32 = 120;

/// Snapshot of the pointer as of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub scroll_wheel: i32,
    pub left: ButtonState,
    pub middle: ButtonState,
    pub right: ButtonState,
    pub x1: ButtonState,
    pub x2: ButtonState,
}

impl MouseState {
    /// Decode the five button states from a packed mask, preserving the
    /// left, middle, right, x1, x2 bit order consumers index by
    fn from_reading(reading: CursorReading, scroll_wheel: i32) -> Self {
        Self {
            x: reading.x,
            y: reading.y,
            scroll_wheel,
            left: ButtonState::from_mask_bit(reading.buttons, 0),
            middle: ButtonState::from_mask_bit(reading.buttons, 1),
            right: ButtonState::from_mask_bit(reading.buttons, 2),
            x1: ButtonState::from_mask_bit(reading.buttons, 3),
            x2: ButtonState::from_mask_bit(reading.buttons, 4),
        }
    }
}

/// Frame-persistent mouse bookkeeping
#[derive(Debug)]
pub struct MouseTracker {
    /// Last known window client bounds, refreshed on resize events
    window_width: u32,
    window_height: u32,

    /// Accumulated wheel value
    wheel: i32,

    /// Mirror of the platform button mask, maintained from queue events
    button_mask: u32,
}

impl MouseTracker {
    pub fn new(client_size: (u32, u32)) -> Self {
        Self {
            window_width: client_size.0,
            window_height: client_size.1,
            wheel: 0,
            button_mask: 0,
        }
    }

    /// Refresh the cached window bounds
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
        trace!("mouse bounds now {}x{}", width, height);
    }

    /// Accumulate a wheel event
    pub fn handle_wheel(&mut self, _x: i32, y: i32) {
        self.wheel += y * WHEEL_DELTA;
    }

    /// Track a button transition from the event queue
    pub fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        let bit = 1 << button.mask_bit();
        if pressed {
            self.button_mask |= bit;
        } else {
            self.button_mask &= !bit;
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn wheel(&self) -> i32 {
        self.wheel
    }

    pub fn button_mask(&self) -> u32 {
        self.button_mask
    }

    /// Build the current mouse state for the target window.
    ///
    /// One of three mutually exclusive addressing strategies applies:
    /// relative deltas while the cursor is captured, desktop-space
    /// subtraction where the platform has a global query, and the
    /// window-local fallback elsewhere (clamped to the last known bounds,
    /// since positions outside the window are unreliable there).
    pub fn state(&self, window: &dyn WindowQuery) -> MouseState {
        if window.is_cursor_captured() {
            return MouseState::from_reading(window.relative_cursor(), self.wheel);
        }

        if let Some(global) = window.global_cursor() {
            let (wx, wy) = window.position();
            let reading = CursorReading {
                x: global.x - wx,
                y: global.y - wy,
                buttons: global.buttons,
            };
            return MouseState::from_reading(reading, self.wheel);
        }

        let mut reading = window.window_cursor();
        reading.x = reading.x.clamp(0, self.window_width as i32);
        reading.y = reading.y.clamp(0, self.window_height as i32);
        MouseState::from_reading(reading, self.wheel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::sim::SimPlatform;

    #[test]
    fn test_left_button_only_mask() {
        let mut sim = SimPlatform::new();
        sim.window.supports_global_cursor = false;
        sim.window.window_cursor = CursorReading {
            x: 10,
            y: 20,
            buttons: 0b00001,
        };

        let tracker = MouseTracker::new((1280, 720));
        let state = tracker.state(&sim);

        assert_eq!(state.left, ButtonState::Pressed);
        assert_eq!(state.middle, ButtonState::Released);
        assert_eq!(state.right, ButtonState::Released);
        assert_eq!(state.x1, ButtonState::Released);
        assert_eq!(state.x2, ButtonState::Released);
    }

    #[test]
    fn test_all_buttons_decode_in_order() {
        let mut sim = SimPlatform::new();
        sim.window.supports_global_cursor = false;
        sim.window.window_cursor = CursorReading {
            x: 0,
            y: 0,
            buttons: 0b11010,
        };

        let state = MouseTracker::new((100, 100)).state(&sim);
        assert_eq!(state.left, ButtonState::Released);
        assert_eq!(state.middle, ButtonState::Pressed);
        assert_eq!(state.right, ButtonState::Released);
        assert_eq!(state.x1, ButtonState::Pressed);
        assert_eq!(state.x2, ButtonState::Pressed);
    }

    #[test]
    fn test_global_mode_subtracts_window_origin() {
        let mut sim = SimPlatform::new();
        sim.window.position = (100, 50);
        sim.window.global_cursor = CursorReading {
            x: 160,
            y: 90,
            buttons: 0,
        };

        let state = MouseTracker::new((1280, 720)).state(&sim);
        assert_eq!((state.x, state.y), (60, 40));
    }

    #[test]
    fn test_capture_mode_takes_priority() {
        let mut sim = SimPlatform::new();
        sim.window.cursor_captured = true;
        sim.window.relative_cursor = CursorReading {
            x: -3,
            y: 7,
            buttons: 0,
        };
        sim.window.global_cursor = CursorReading {
            x: 500,
            y: 500,
            buttons: 0,
        };

        let state = MouseTracker::new((1280, 720)).state(&sim);
        assert_eq!((state.x, state.y), (-3, 7));
    }

    #[test]
    fn test_window_local_clamps_to_bounds() {
        let mut sim = SimPlatform::new();
        sim.window.supports_global_cursor = false;
        sim.window.window_cursor = CursorReading {
            x: -20,
            y: 9999,
            buttons: 0,
        };

        let mut tracker = MouseTracker::new((1280, 720));
        tracker.handle_resize(640, 480);
        let state = tracker.state(&sim);
        assert_eq!((state.x, state.y), (0, 480));
    }

    #[test]
    fn test_wheel_accumulates_in_detents() {
        let mut tracker = MouseTracker::new((100, 100));
        tracker.handle_wheel(0, 1);
        tracker.handle_wheel(0, 2);
        tracker.handle_wheel(0, -1);
        assert_eq!(tracker.wheel(), 2 * WHEEL_DELTA);

        let sim = SimPlatform::new();
        assert_eq!(tracker.state(&sim).scroll_wheel, 2 * WHEEL_DELTA);
    }

    #[test]
    fn test_button_mask_mirror() {
        let mut tracker = MouseTracker::new((100, 100));
        tracker.handle_button(MouseButton::Left, true);
        tracker.handle_button(MouseButton::Right, true);
        assert_eq!(tracker.button_mask(), 0b00101);

        tracker.handle_button(MouseButton::Left, false);
        assert_eq!(tracker.button_mask(), 0b00100);
    }
}
