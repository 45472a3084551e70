// Touch panel state synchronization
//
// Fixed touch slots are refreshed from a direct device query once per
// frame. Assignment is by array position of the native finger list, not by
// finger identity, so a finger's slot can change between frames when
// contacts come and go; the event feed is the identity-stable channel.

use crate::platform::{TouchPhase, TouchQuery};
use glam::Vec2;

/// Fixed number of touch slots
pub const MAX_TOUCH_COUNT: usize = 8;

/// Sentinel finger id for an unoccupied slot
pub const NO_FINGER: i64 = -1;

/// One touch slot: a native finger id and its pixel position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSlot {
    pub finger_id: i64,
    pub position: Vec2,
}

impl Default for TouchSlot {
    fn default() -> Self {
        Self {
            finger_id: NO_FINGER,
            position: Vec2::ZERO,
        }
    }
}

/// A raw finger transition from the event queue, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub finger_id: i64,
    pub position: Vec2,
}

/// Per-frame touch state
#[derive(Debug)]
pub struct TouchPanel {
    slots: [TouchSlot; MAX_TOUCH_COUNT],

    /// Logical display size the normalized coordinates convert into,
    /// refreshed on window-resize events
    display_width: u32,
    display_height: u32,

    /// Finger transitions observed since the last drain
    events: Vec<TouchEvent>,
}

impl TouchPanel {
    pub fn new(display_size: (u32, u32)) -> Self {
        Self {
            slots: [TouchSlot::default(); MAX_TOUCH_COUNT],
            display_width: display_size.0,
            display_height: display_size.1,
            events: Vec::new(),
        }
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_width = width;
        self.display_height = height;
    }

    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    /// Refresh every slot from the device's active contact list.
    ///
    /// Slot `i` takes the `i`-th reported finger with its normalized
    /// position converted to pixels (rounded to nearest); slots past the
    /// list get the sentinel and a zero position.
    pub fn update(&mut self, touch: &dyn TouchQuery) {
        let fingers = touch.touch_fingers();
        let width = self.display_width as f32;
        let height = self.display_height as f32;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            *slot = match fingers.get(index) {
                Some(finger) => TouchSlot {
                    finger_id: finger.id,
                    position: Vec2::new(
                        (finger.x * width).round(),
                        (finger.y * height).round(),
                    ),
                },
                None => TouchSlot::default(),
            };
        }
    }

    /// Record a finger transition from the event queue
    pub fn handle_finger(&mut self, phase: TouchPhase, finger_id: i64, x: f32, y: f32) {
        let position = self.to_pixels(x, y);
        self.events.push(TouchEvent {
            phase,
            finger_id,
            position,
        });
    }

    /// Drain the finger transitions observed since the last call
    pub fn take_events(&mut self) -> Vec<TouchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn slots(&self) -> &[TouchSlot; MAX_TOUCH_COUNT] {
        &self.slots
    }

    /// Number of slots currently holding a finger
    pub fn finger_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.finger_id != NO_FINGER)
            .count()
    }

    fn to_pixels(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x * self.display_width as f32).round(),
            (y * self.display_height as f32).round(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::sim::SimPlatform;
    use crate::platform::TouchFinger;

    #[test]
    fn test_two_fingers_fill_first_two_slots() {
        let mut sim = SimPlatform::new();
        sim.set_fingers(vec![
            TouchFinger {
                id: 11,
                x: 0.5,
                y: 0.5,
            },
            TouchFinger {
                id: 12,
                x: 0.25,
                y: 1.0,
            },
        ]);

        let mut panel = TouchPanel::new((640, 480));
        panel.update(&sim);

        let slots = panel.slots();
        assert_eq!(slots[0].finger_id, 11);
        assert_eq!(slots[0].position, Vec2::new(320.0, 240.0));
        assert_eq!(slots[1].finger_id, 12);
        assert_eq!(slots[1].position, Vec2::new(160.0, 480.0));
        for slot in &slots[2..] {
            assert_eq!(slot.finger_id, NO_FINGER);
            assert_eq!(slot.position, Vec2::ZERO);
        }
        assert_eq!(panel.finger_count(), 2);
    }

    #[test]
    fn test_lifted_finger_clears_slot() {
        let mut sim = SimPlatform::new();
        sim.set_fingers(vec![TouchFinger {
            id: 7,
            x: 0.1,
            y: 0.1,
        }]);

        let mut panel = TouchPanel::new((100, 100));
        panel.update(&sim);
        assert_eq!(panel.finger_count(), 1);

        sim.set_fingers(Vec::new());
        panel.update(&sim);
        assert_eq!(panel.finger_count(), 0);
        assert_eq!(panel.slots()[0].finger_id, NO_FINGER);
    }

    #[test]
    fn test_slot_assignment_is_positional() {
        let mut sim = SimPlatform::new();
        sim.set_fingers(vec![
            TouchFinger {
                id: 1,
                x: 0.0,
                y: 0.0,
            },
            TouchFinger {
                id: 2,
                x: 0.5,
                y: 0.5,
            },
        ]);

        let mut panel = TouchPanel::new((100, 100));
        panel.update(&sim);
        assert_eq!(panel.slots()[0].finger_id, 1);

        // First finger lifts; the survivor shifts into slot 0
        sim.set_fingers(vec![TouchFinger {
            id: 2,
            x: 0.5,
            y: 0.5,
        }]);
        panel.update(&sim);
        assert_eq!(panel.slots()[0].finger_id, 2);
        assert_eq!(panel.slots()[1].finger_id, NO_FINGER);
    }

    #[test]
    fn test_positions_round_to_nearest_pixel() {
        let mut sim = SimPlatform::new();
        sim.set_fingers(vec![TouchFinger {
            id: 1,
            x: 0.333,
            y: 0.666,
        }]);

        let mut panel = TouchPanel::new((100, 100));
        panel.update(&sim);
        assert_eq!(panel.slots()[0].position, Vec2::new(33.0, 67.0));
    }

    #[test]
    fn test_excess_fingers_beyond_slots_are_dropped() {
        let mut sim = SimPlatform::new();
        let fingers = (0..12)
            .map(|i| TouchFinger {
                id: i,
                x: 0.5,
                y: 0.5,
            })
            .collect();
        sim.set_fingers(fingers);

        let mut panel = TouchPanel::new((100, 100));
        panel.update(&sim);
        assert_eq!(panel.finger_count(), MAX_TOUCH_COUNT);
    }

    #[test]
    fn test_event_feed_converts_and_drains() {
        let mut panel = TouchPanel::new((200, 100));
        panel.handle_finger(TouchPhase::Began, 5, 0.5, 0.5);
        panel.handle_finger(TouchPhase::Ended, 5, 0.5, 0.5);

        let events = panel.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase, TouchPhase::Began);
        assert_eq!(events[0].position, Vec2::new(100.0, 50.0));
        assert_eq!(events[1].phase, TouchPhase::Ended);
        assert!(panel.take_events().is_empty());
    }

    #[test]
    fn test_display_resize_changes_conversion() {
        let mut panel = TouchPanel::new((100, 100));
        panel.set_display_size(1000, 500);

        let mut sim = SimPlatform::new();
        sim.set_fingers(vec![TouchFinger {
            id: 1,
            x: 0.5,
            y: 0.5,
        }]);
        panel.update(&sim);
        assert_eq!(panel.slots()[0].position, Vec2::new(500.0, 250.0));
    }
}
