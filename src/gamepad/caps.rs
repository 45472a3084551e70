// Per-slot gamepad capability record

/// What the physical device reports it can do. Probed once at connect
/// time; all-false (including `is_connected`) while the slot is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamePadCapabilities {
    pub is_connected: bool,

    // Face and system buttons
    pub has_a_button: bool,
    pub has_b_button: bool,
    pub has_x_button: bool,
    pub has_y_button: bool,
    pub has_back_button: bool,
    pub has_big_button: bool,
    pub has_start_button: bool,

    // D-pad
    pub has_dpad_up_button: bool,
    pub has_dpad_down_button: bool,
    pub has_dpad_left_button: bool,
    pub has_dpad_right_button: bool,

    // Shoulders and stick clicks
    pub has_left_shoulder_button: bool,
    pub has_right_shoulder_button: bool,
    pub has_left_stick_button: bool,
    pub has_right_stick_button: bool,

    // Analog axes
    pub has_left_x_thumbstick: bool,
    pub has_left_y_thumbstick: bool,
    pub has_right_x_thumbstick: bool,
    pub has_right_y_thumbstick: bool,
    pub has_left_trigger: bool,
    pub has_right_trigger: bool,

    // Feedback
    pub has_left_vibration_motor: bool,
    pub has_right_vibration_motor: bool,
    pub has_trigger_vibration_motors: bool,
    pub has_light_bar: bool,

    // Sensors
    pub has_gyro: bool,
    pub has_accelerometer: bool,
}
