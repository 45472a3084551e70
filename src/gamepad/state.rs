// Gamepad snapshot value types and dead-zone processing

use crate::core::ButtonState;
use glam::Vec2;
use std::ops::{BitOr, BitOrAssign};

/// Packed button mask. Bit values follow the long-standing console
/// convention downstream mapping layers expect, so the mask can be
/// compared and serialized stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(pub u32);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const DPAD_UP: Buttons = Buttons(0x0000_0001);
    pub const DPAD_DOWN: Buttons = Buttons(0x0000_0002);
    pub const DPAD_LEFT: Buttons = Buttons(0x0000_0004);
    pub const DPAD_RIGHT: Buttons = Buttons(0x0000_0008);
    pub const START: Buttons = Buttons(0x0000_0010);
    pub const BACK: Buttons = Buttons(0x0000_0020);
    pub const LEFT_STICK: Buttons = Buttons(0x0000_0040);
    pub const RIGHT_STICK: Buttons = Buttons(0x0000_0080);
    pub const LEFT_SHOULDER: Buttons = Buttons(0x0000_0100);
    pub const RIGHT_SHOULDER: Buttons = Buttons(0x0000_0200);
    pub const MISC: Buttons = Buttons(0x0000_0400);
    pub const BIG_BUTTON: Buttons = Buttons(0x0000_0800);
    pub const A: Buttons = Buttons(0x0000_1000);
    pub const B: Buttons = Buttons(0x0000_2000);
    pub const X: Buttons = Buttons(0x0000_4000);
    pub const Y: Buttons = Buttons(0x0000_8000);

    /// Whether every bit of `other` is set
    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Buttons) {
        self.0 |= rhs.0;
    }
}

/// Four independent directional states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DPad {
    pub up: ButtonState,
    pub down: ButtonState,
    pub left: ButtonState,
    pub right: ButtonState,
}

/// Post-processing policy for stick and trigger values, forwarded into
/// snapshot construction by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadZoneMode {
    /// Raw values, only range-clamped
    None,
    /// Each axis zeroed independently below its threshold
    #[default]
    IndependentAxes,
    /// The whole stick vector zeroed when its magnitude is below threshold
    Circular,
}

// Conventional thresholds, expressed on the normalized scale
const LEFT_STICK_DEAD_ZONE: f32 = 7849.0 / 32768.0;
const RIGHT_STICK_DEAD_ZONE: f32 = 8689.0 / 32768.0;
const TRIGGER_THRESHOLD: f32 = 30.0 / 255.0;

fn dead_zone_stick(stick: Vec2, dead_zone: f32, mode: DeadZoneMode) -> Vec2 {
    match mode {
        DeadZoneMode::None => stick,
        DeadZoneMode::IndependentAxes => Vec2::new(
            if stick.x.abs() < dead_zone { 0.0 } else { stick.x },
            if stick.y.abs() < dead_zone { 0.0 } else { stick.y },
        ),
        DeadZoneMode::Circular => {
            if stick.length() < dead_zone {
                Vec2::ZERO
            } else {
                stick
            }
        }
    }
}

fn dead_zone_trigger(value: f32, mode: DeadZoneMode) -> f32 {
    match mode {
        DeadZoneMode::None => value,
        _ => {
            if value < TRIGGER_THRESHOLD {
                0.0
            } else {
                value
            }
        }
    }
}

/// One polled gamepad snapshot.
///
/// Stick axes are normalized to [-1, 1] with Y pointing up (inverted from
/// the raw reading); triggers to [0, 1]. The packet number increments
/// exactly when a newly sampled snapshot differs from the previous one by
/// everything except the packet number and connectivity flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamePadState {
    pub is_connected: bool,
    pub packet_number: u32,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub buttons: Buttons,
    pub dpad: DPad,
}

impl GamePadState {
    /// Value equality over everything downstream edge detection reads,
    /// ignoring the packet number and connectivity flag
    pub fn same_inputs(&self, other: &GamePadState) -> bool {
        self.left_stick == other.left_stick
            && self.right_stick == other.right_stick
            && self.left_trigger == other.left_trigger
            && self.right_trigger == other.right_trigger
            && self.buttons == other.buttons
            && self.dpad == other.dpad
    }

    pub fn is_button_down(&self, buttons: Buttons) -> bool {
        self.buttons.contains(buttons)
    }

    /// Copy with the dead-zone policy applied to sticks and triggers.
    /// The raw snapshot is what packet diffing compares; this runs on the
    /// copy handed back to the caller.
    pub(crate) fn with_dead_zone(mut self, mode: DeadZoneMode) -> GamePadState {
        self.left_stick = dead_zone_stick(self.left_stick, LEFT_STICK_DEAD_ZONE, mode);
        self.right_stick = dead_zone_stick(self.right_stick, RIGHT_STICK_DEAD_ZONE, mode);
        self.left_trigger = dead_zone_trigger(self.left_trigger, mode);
        self.right_trigger = dead_zone_trigger(self.right_trigger, mode);
        self
    }
}
