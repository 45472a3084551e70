// Platform event records

/// Mouse buttons in the fixed order consumers index by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

impl MouseButton {
    /// Bit position of this button in the platform button mask
    pub fn mask_bit(self) -> u32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::X1 => 3,
            MouseButton::X2 => 4,
        }
    }
}

/// Lifecycle phase of a touch contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One queued platform event, already classified by category.
///
/// The native backend translates its raw event records into these variants
/// and silently drops anything it does not recognize; the dispatch loop can
/// therefore match exhaustively and new categories are compile-time-checked
/// for handling.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Key press. `keycode` is the layout-dependent virtual code, `scancode`
    /// the layout-independent physical position code.
    KeyDown {
        keycode: u32,
        scancode: u32,
        repeat: bool,
    },
    /// Key release
    KeyUp { keycode: u32, scancode: u32 },
    /// Committed text from the platform IME/text layer
    TextInput(String),
    /// In-progress IME composition text
    TextEditing(String),
    MouseButtonDown { button: MouseButton },
    MouseButtonUp { button: MouseButton },
    /// Wheel movement in detents (positive y = away from the user)
    MouseWheel { x: i32, y: i32 },
    /// Touch contact transition; coordinates are normalized [0, 1]
    Finger {
        phase: TouchPhase,
        finger_id: i64,
        x: f32,
        y: f32,
    },
    /// Window client area changed size (window-relative units)
    WindowResized { width: u32, height: u32 },
    /// Window moved, possibly onto another display
    WindowMoved { x: i32, y: i32 },
    /// Window contents need repainting
    WindowExposed,
    DisplayOrientationChanged,
    /// A gamepad became available; `device_index` is only valid until opened
    GamepadAdded { device_index: u32 },
    /// A gamepad went away; `instance_id` identifies the connection session
    GamepadRemoved { instance_id: u32 },
    Quit,
}
