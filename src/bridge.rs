// Event dispatch loop and the polled accessor surface
//
// `InputBridge` owns the platform backend plus all device state. Once per
// frame the driver calls `poll_events()`, then reads whatever it needs
// through the accessors; the accessors never drain events themselves.

use crate::gamepad::{DeadZoneMode, GamePadCapabilities, GamePadState, GamepadRegistry};
use crate::keyboard::{Key, Keymap, KeyboardTracker};
use crate::mouse::{MouseState, MouseTracker};
use crate::platform::{Platform, PlatformEvent};
use crate::touch::TouchPanel;
use glam::Vec3;
use log::trace;

/// Flags the frame driver consumes after each `poll_events()` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSignals {
    /// A quit event arrived; dispatch stopped early
    pub quit_requested: bool,

    /// The window was exposed and wants repainting
    pub redraw_requested: bool,

    /// The window moved displays or the display orientation changed;
    /// the graphics device needs a reset
    pub reset_device: bool,
}

impl FrameSignals {
    pub fn clear(&mut self) {
        *self = FrameSignals::default();
    }
}

/// Per-frame input bridge: drains the platform queue once per frame and
/// exposes deterministic polled state for keyboard, mouse, gamepad, and
/// touch devices.
///
/// Single-threaded by construction: every entry point takes `&mut self`
/// or `&self` on one owning value, so the frame-thread discipline is
/// enforced by the borrow checker rather than locks.
pub struct InputBridge<P: Platform> {
    platform: P,
    keyboard: KeyboardTracker,
    mouse: MouseTracker,
    gamepads: GamepadRegistry,
    touch: TouchPanel,
    signals: FrameSignals,
}

impl<P: Platform> InputBridge<P> {
    /// Build with the keymap mode taken from the environment override
    pub fn new(platform: P) -> Self {
        Self::with_keymap(platform, Keymap::from_env())
    }

    /// Build with an explicit translation strategy
    pub fn with_keymap(platform: P, keymap: Keymap) -> Self {
        let client_size = platform.client_size();
        Self {
            keyboard: KeyboardTracker::new(keymap),
            mouse: MouseTracker::new(client_size),
            gamepads: GamepadRegistry::new(),
            touch: TouchPanel::new(client_size),
            signals: FrameSignals::default(),
            platform,
        }
    }

    /// Drain all pending platform events exactly once, in arrival order,
    /// routing each to exactly one handler. Returns after the queue runs
    /// dry, or immediately after a quit event.
    pub fn poll_events(&mut self) {
        while let Some(event) = self.platform.poll_event() {
            trace!("dispatching {:?}", event);
            match event {
                PlatformEvent::KeyDown {
                    keycode,
                    scancode,
                    repeat,
                } => self.keyboard.key_down(keycode, scancode, repeat),
                PlatformEvent::KeyUp { keycode, scancode } => {
                    self.keyboard.key_up(keycode, scancode)
                }
                PlatformEvent::TextInput(text) => self.keyboard.push_text(&text),
                // No IME composition layer; the variant is consumed so
                // dispatch stays exhaustive
                PlatformEvent::TextEditing(_) => {}
                PlatformEvent::MouseButtonDown { button } => {
                    self.mouse.handle_button(button, true)
                }
                PlatformEvent::MouseButtonUp { button } => {
                    self.mouse.handle_button(button, false)
                }
                PlatformEvent::MouseWheel { x, y } => self.mouse.handle_wheel(x, y),
                PlatformEvent::Finger {
                    phase,
                    finger_id,
                    x,
                    y,
                } => self.touch.handle_finger(phase, finger_id, x, y),
                PlatformEvent::WindowResized { width, height } => {
                    self.mouse.handle_resize(width, height);
                    self.touch.set_display_size(width, height);
                }
                PlatformEvent::WindowMoved { .. } => self.signals.reset_device = true,
                PlatformEvent::WindowExposed => self.signals.redraw_requested = true,
                PlatformEvent::DisplayOrientationChanged => self.signals.reset_device = true,
                PlatformEvent::GamepadAdded { device_index } => {
                    self.gamepads.handle_added(&mut self.platform, device_index)
                }
                PlatformEvent::GamepadRemoved { instance_id } => {
                    self.gamepads.handle_removed(instance_id)
                }
                PlatformEvent::Quit => {
                    self.signals.quit_requested = true;
                    break;
                }
            }
        }
    }

    /// Signals raised by the last `poll_events()` calls
    pub fn signals(&self) -> FrameSignals {
        self.signals
    }

    /// Read and reset the accumulated signals
    pub fn take_signals(&mut self) -> FrameSignals {
        std::mem::take(&mut self.signals)
    }

    // ---- Keyboard ----

    pub fn keyboard(&self) -> &KeyboardTracker {
        &self.keyboard
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keyboard.is_key_down(key)
    }

    /// Drain the synthesized text-input characters
    pub fn take_text_input(&mut self) -> Vec<char> {
        self.keyboard.take_text_input()
    }

    /// Resolve which key the live layout produces at the physical
    /// position of `key`
    pub fn key_from_scancode(&self, key: Key) -> Key {
        self.keyboard
            .keymap()
            .key_from_scancode(key, &self.platform)
    }

    /// Toggle the platform text-input machinery
    pub fn set_text_input_active(&mut self, active: bool) {
        self.platform.set_text_input_active(active);
    }

    // ---- Mouse ----

    /// Direct pointer query against the target window, as of now
    pub fn mouse_state(&self) -> MouseState {
        self.mouse.state(&self.platform)
    }

    // ---- Gamepads ----

    pub fn gamepad_state(&mut self, slot: usize, dead_zone: DeadZoneMode) -> GamePadState {
        self.gamepads.state(slot, dead_zone)
    }

    pub fn gamepad_capabilities(&self, slot: usize) -> GamePadCapabilities {
        self.gamepads.capabilities(slot)
    }

    pub fn gamepad_guid(&self, slot: usize) -> &str {
        self.gamepads.guid(slot)
    }

    pub fn set_gamepad_vibration(&mut self, slot: usize, low: f32, high: f32) -> bool {
        self.gamepads.set_vibration(slot, low, high)
    }

    pub fn set_gamepad_trigger_vibration(&mut self, slot: usize, left: f32, right: f32) -> bool {
        self.gamepads.set_trigger_vibration(slot, left, right)
    }

    pub fn set_gamepad_light_bar(&mut self, slot: usize, r: u8, g: u8, b: u8) {
        self.gamepads.set_light_bar(slot, r, g, b);
    }

    pub fn gamepad_gyro(&mut self, slot: usize) -> (Vec3, bool) {
        self.gamepads.gyro(slot)
    }

    pub fn gamepad_accelerometer(&mut self, slot: usize) -> (Vec3, bool) {
        self.gamepads.accelerometer(slot)
    }

    // ---- Touch ----

    /// Refresh the touch slots from the device's active contacts
    pub fn update_touch_panel(&mut self) {
        self.touch.update(&self.platform);
    }

    pub fn touch_panel(&self) -> &TouchPanel {
        &self.touch
    }

    pub fn touch_panel_mut(&mut self) -> &mut TouchPanel {
        &mut self.touch
    }

    // ---- Backend access ----

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable backend access, used by drivers that script the backend
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ButtonState;
    use crate::keyboard::KeymapMode;
    use crate::platform::sim::{SimGamepad, SimPadState, SimPlatform};
    use crate::platform::{MouseButton, TouchFinger, TouchPhase};
    use crate::touch::NO_FINGER;

    fn bridge() -> InputBridge<SimPlatform> {
        InputBridge::with_keymap(SimPlatform::new(), Keymap::new(KeymapMode::VirtualKey))
    }

    #[test]
    fn test_key_events_route_to_keyboard() {
        let mut bridge = bridge();
        bridge.platform_mut().push_events([
            PlatformEvent::KeyDown {
                keycode: 0x61,
                scancode: 4,
                repeat: false,
            },
            PlatformEvent::KeyDown {
                keycode: 0x20,
                scancode: 44,
                repeat: false,
            },
            PlatformEvent::KeyUp {
                keycode: 0x61,
                scancode: 4,
            },
        ]);

        bridge.poll_events();
        assert!(!bridge.is_key_down(Key::A));
        assert!(bridge.is_key_down(Key::Space));
    }

    #[test]
    fn test_quit_stops_dispatch_early() {
        let mut bridge = bridge();
        bridge.platform_mut().push_events([
            PlatformEvent::Quit,
            PlatformEvent::KeyDown {
                keycode: 0x61,
                scancode: 4,
                repeat: false,
            },
        ]);

        bridge.poll_events();
        assert!(bridge.signals().quit_requested);
        // The event behind the quit stays queued for the next frame
        assert_eq!(bridge.platform().queued_events(), 1);
        assert!(!bridge.is_key_down(Key::A));
    }

    #[test]
    fn test_poll_returns_when_queue_empty() {
        let mut bridge = bridge();
        bridge.poll_events();
        assert_eq!(bridge.signals(), FrameSignals::default());
    }

    #[test]
    fn test_resize_updates_mouse_and_touch() {
        let mut bridge = bridge();
        bridge.platform_mut().push_event(PlatformEvent::WindowResized {
            width: 800,
            height: 600,
        });
        bridge.poll_events();

        assert_eq!(bridge.touch_panel().display_size(), (800, 600));

        // Window-local clamping now uses the new bounds
        bridge.platform_mut().window.supports_global_cursor = false;
        bridge.platform_mut().window.window_cursor = crate::platform::CursorReading {
            x: 5000,
            y: 5000,
            buttons: 0,
        };
        let state = bridge.mouse_state();
        assert_eq!((state.x, state.y), (800, 600));
    }

    #[test]
    fn test_expose_and_display_signals() {
        let mut bridge = bridge();
        bridge.platform_mut().push_events([
            PlatformEvent::WindowExposed,
            PlatformEvent::DisplayOrientationChanged,
        ]);
        bridge.poll_events();

        let signals = bridge.take_signals();
        assert!(signals.redraw_requested);
        assert!(signals.reset_device);
        assert!(!signals.quit_requested);
        assert_eq!(bridge.signals(), FrameSignals::default());
    }

    #[test]
    fn test_window_moved_requests_device_reset() {
        let mut bridge = bridge();
        bridge
            .platform_mut()
            .push_event(PlatformEvent::WindowMoved { x: 2000, y: 10 });
        bridge.poll_events();
        assert!(bridge.signals().reset_device);
    }

    #[test]
    fn test_gamepad_hotplug_through_queue() {
        let mut bridge = bridge();
        let pad = SimGamepad::new(SimPadState::new(42));
        bridge.platform_mut().attach_gamepad(0, pad);
        bridge
            .platform_mut()
            .push_event(PlatformEvent::GamepadAdded { device_index: 0 });

        bridge.poll_events();
        assert!(bridge.gamepad_state(0, DeadZoneMode::None).is_connected);
        assert_eq!(bridge.gamepad_guid(0), "xinput");

        bridge
            .platform_mut()
            .push_event(PlatformEvent::GamepadRemoved { instance_id: 42 });
        bridge.poll_events();
        assert!(!bridge.gamepad_state(0, DeadZoneMode::None).is_connected);
        assert_eq!(bridge.gamepad_guid(0), "");
    }

    #[test]
    fn test_mouse_events_route_to_tracker() {
        let mut bridge = bridge();
        bridge.platform_mut().push_events([
            PlatformEvent::MouseWheel { x: 0, y: 2 },
            PlatformEvent::MouseButtonDown {
                button: MouseButton::Left,
            },
        ]);
        bridge.poll_events();

        let state = bridge.mouse_state();
        assert_eq!(state.scroll_wheel, 240);
        assert_eq!(state.left, ButtonState::Released); // query reads the platform mask
    }

    #[test]
    fn test_finger_events_feed_touch_panel() {
        let mut bridge = bridge();
        bridge.platform_mut().push_event(PlatformEvent::Finger {
            phase: TouchPhase::Began,
            finger_id: 3,
            x: 0.5,
            y: 0.5,
        });
        bridge.poll_events();

        let events = bridge.touch_panel_mut().take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].finger_id, 3);
    }

    #[test]
    fn test_update_touch_panel_uses_query() {
        let mut bridge = bridge();
        bridge.platform_mut().set_fingers(vec![
            TouchFinger {
                id: 1,
                x: 0.0,
                y: 0.0,
            },
            TouchFinger {
                id: 2,
                x: 1.0,
                y: 1.0,
            },
        ]);
        bridge.update_touch_panel();

        assert_eq!(bridge.touch_panel().finger_count(), 2);
        assert_eq!(bridge.touch_panel().slots()[2].finger_id, NO_FINGER);
    }

    #[test]
    fn test_text_input_events_forwarded() {
        let mut bridge = bridge();
        bridge
            .platform_mut()
            .push_event(PlatformEvent::TextInput("ok".into()));
        bridge.poll_events();
        assert_eq!(bridge.take_text_input(), vec!['o', 'k']);
    }

    #[test]
    fn test_text_editing_is_consumed_silently() {
        let mut bridge = bridge();
        bridge
            .platform_mut()
            .push_event(PlatformEvent::TextEditing("候".into()));
        bridge.poll_events();
        assert!(bridge.take_text_input().is_empty());
    }

    #[test]
    fn test_key_from_scancode_uses_live_layout() {
        let mut bridge = bridge();
        // Remap the physical A position to produce 'q'
        bridge.platform_mut().remap_layout(4, 0x71);
        assert_eq!(bridge.key_from_scancode(Key::A), Key::Q);
        assert_eq!(bridge.key_from_scancode(Key::B), Key::B);
    }

    #[test]
    fn test_set_text_input_active_reaches_platform() {
        let mut bridge = bridge();
        bridge.set_text_input_active(true);
        assert!(bridge.platform().text_input_active());
    }
}
