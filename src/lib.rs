// Frame-synchronous input bridge
//
// Drains the platform event queue once per frame and exposes stable,
// diffable polled state for keyboard, mouse, gamepad, and touch devices.
//
// ## Architecture
//
// - `platform`: the event tagged union and the collaborator traits the
//   native backend implements (plus a scripted `sim` backend)
// - `core`: shared scalar conversions and the two-state button reading
// - `keyboard`: translation tables, pressed-key set, text synthesis
// - `mouse`: on-demand three-mode pointer state construction
// - `gamepad`: hotplug lifecycle, slot registry, packet-diffed sampling
// - `touch`: fixed-slot contact synchronization
// - `bridge`: the dispatch loop tying everything together
//
// ## Usage Example
//
// ```rust
// use input_bridge::platform::sim::SimPlatform;
// use input_bridge::{DeadZoneMode, InputBridge, Key};
//
// let mut bridge = InputBridge::new(SimPlatform::new());
//
// // Once per frame:
// bridge.poll_events();
// bridge.update_touch_panel();
//
// // Then read whatever the game needs:
// if bridge.is_key_down(Key::Space) {
//     // jump!
// }
// let pad = bridge.gamepad_state(0, DeadZoneMode::IndependentAxes);
// if pad.is_connected {
//     let aim = pad.right_stick;
// }
// ```

pub mod bridge;
pub mod core;
pub mod gamepad;
pub mod keyboard;
pub mod mouse;
pub mod platform;
pub mod touch;

// Re-export the polled surface
pub use bridge::{FrameSignals, InputBridge};
pub use crate::core::ButtonState;
pub use gamepad::{
    Buttons, DPad, DeadZoneMode, GamePadCapabilities, GamePadState, GamepadRegistry, MAX_GAMEPADS,
};
pub use keyboard::{Key, Keymap, KeymapMode, KeyboardTracker};
pub use mouse::{MouseState, MouseTracker};
pub use touch::{TouchEvent, TouchPanel, TouchSlot, MAX_TOUCH_COUNT, NO_FINGER};
