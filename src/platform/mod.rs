// Platform abstraction layer
//
// The bridge never talks to the native windowing/input libraries directly;
// everything it consumes arrives through the narrow traits below. The `sim`
// backend implements all of them for tests and headless runs.

mod event;
pub mod sim;

pub use event::{MouseButton, PlatformEvent, TouchPhase};

/// Errors surfaced by platform collaborator calls.
///
/// None of these are fatal to the bridge; every accessor recovers to a
/// neutral value and the error stops here.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to open device {index}: {reason}")]
    OpenFailed { index: u32, reason: String },

    #[error("device does not support {0}")]
    Unsupported(&'static str),

    #[error("device call failed: {0}")]
    DeviceCall(String),
}

/// Non-blocking source of queued platform events, in arrival order
pub trait EventSource {
    /// Pop the next queued event, or `None` when the queue is empty
    fn poll_event(&mut self) -> Option<PlatformEvent>;
}

/// A cursor position sample plus the packed button mask
/// (bit 0 = left, 1 = middle, 2 = right, 3 = x1, 4 = x2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorReading {
    pub x: i32,
    pub y: i32,
    pub buttons: u32,
}

/// Window geometry and cursor queries for the target window
pub trait WindowQuery {
    /// Client area size in window-relative units
    fn client_size(&self) -> (u32, u32);

    /// Backing drawable size in physical pixels (differs from
    /// `client_size` on high-DPI configurations)
    fn drawable_size(&self) -> (u32, u32);

    /// Window origin in desktop coordinates
    fn position(&self) -> (i32, i32);

    /// Whether the cursor is currently grabbed/hidden for relative look
    fn is_cursor_captured(&self) -> bool;

    /// Accumulated relative motion since the last call (capture mode)
    fn relative_cursor(&self) -> CursorReading;

    /// Desktop-space cursor, or `None` where the windowing system has no
    /// screen-space query
    fn global_cursor(&self) -> Option<CursorReading>;

    /// Window-relative cursor; less accurate while the cursor is outside
    /// the window bounds
    fn window_cursor(&self) -> CursorReading;
}

/// Live keyboard layout resolution
pub trait KeyboardLayout {
    /// The virtual keycode the current layout produces for a physical
    /// position code; 0 when the layout has no mapping for it
    fn keycode_for_scancode(&self, scancode: u32) -> u32;
}

/// Platform text-input activation toggle
pub trait TextInputControl {
    fn set_text_input_active(&mut self, active: bool);
}

/// Physical gamepad controls, in the fixed enumeration order snapshots
/// OR them together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Gyro,
    Accelerometer,
}

/// Controller family as reported by the platform's sub-type probe.
/// Used to disambiguate devices exposed through an aggregator vendor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceFamily {
    #[default]
    Unknown,
    Xbox360,
    XboxOne,
    DualShock4,
    DualSense,
}

/// One open native gamepad handle
pub trait GamepadDevice {
    /// Platform identifier for this connection session
    fn instance_id(&self) -> u32;

    fn name(&self) -> String;

    fn vendor_id(&self) -> u16;

    fn product_id(&self) -> u16;

    fn family(&self) -> DeviceFamily;

    fn has_button(&self, button: PadButton) -> bool;

    fn has_axis(&self, axis: PadAxis) -> bool;

    /// Current pressed state; unreported buttons read as released
    fn button(&self, button: PadButton) -> bool;

    /// Raw signed axis value; triggers use the positive half only
    fn axis(&self, axis: PadAxis) -> i16;

    fn rumble(&mut self, low: u16, high: u16) -> Result<(), PlatformError>;

    fn rumble_triggers(&mut self, left: u16, right: u16) -> Result<(), PlatformError>;

    fn has_led(&self) -> bool;

    fn set_led(&mut self, r: u8, g: u8, b: u8) -> Result<(), PlatformError>;

    fn has_sensor(&self, sensor: SensorKind) -> bool;

    fn sensor_enabled(&self, sensor: SensorKind) -> bool;

    fn set_sensor_enabled(&mut self, sensor: SensorKind, enabled: bool)
        -> Result<(), PlatformError>;

    fn sensor_data(&mut self, sensor: SensorKind) -> Result<[f32; 3], PlatformError>;
}

/// Opens gamepads announced by hotplug events
pub trait GamepadHost {
    fn open_gamepad(&mut self, device_index: u32) -> Result<Box<dyn GamepadDevice>, PlatformError>;
}

/// One active touch contact in normalized [0, 1] device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchFinger {
    pub id: i64,
    pub x: f32,
    pub y: f32,
}

/// Direct query of the first touch device's active contacts
pub trait TouchQuery {
    fn touch_fingers(&self) -> Vec<TouchFinger>;
}

/// The full collaborator surface the bridge needs from one platform
pub trait Platform:
    EventSource + WindowQuery + KeyboardLayout + TextInputControl + GamepadHost + TouchQuery
{
}

impl<T> Platform for T where
    T: EventSource + WindowQuery + KeyboardLayout + TextInputControl + GamepadHost + TouchQuery
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::Unsupported("light bar");
        assert_eq!(err.to_string(), "device does not support light bar");
    }

    #[test]
    fn test_mouse_button_mask_order() {
        assert_eq!(MouseButton::Left.mask_bit(), 0);
        assert_eq!(MouseButton::Middle.mask_bit(), 1);
        assert_eq!(MouseButton::Right.mask_bit(), 2);
        assert_eq!(MouseButton::X1.mask_bit(), 3);
        assert_eq!(MouseButton::X2.mask_bit(), 4);
    }
}
