// Gamepad device lifecycle and per-frame sampling
//
// The registry owns fixed-capacity slot storage: a slot is a stable small
// integer a game can keep addressing while physical devices come and go.
// Hotplug events drive the Unoccupied -> Connected -> Unoccupied machine;
// sampling diffs each new snapshot against the stored one to advance the
// packet number.

use super::caps::GamePadCapabilities;
use super::state::{Buttons, DPad, DeadZoneMode, GamePadState};
use crate::core::math::{axis_to_unit, magnitude_to_raw, trigger_to_unit};
use crate::core::ButtonState;
use crate::platform::{
    DeviceFamily, GamepadDevice, GamepadHost, PadAxis, PadButton, SensorKind,
};
use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Simultaneous device cap; devices beyond it are ignored, not queued
pub const MAX_GAMEPADS: usize = 4;

/// Vendor id under which some platforms aggregate foreign controllers;
/// the reported family disambiguates the real hardware
const AGGREGATOR_VENDOR_ID: u16 = 0x28DE;

/// Fixed enumeration order buttons are OR'd into the mask
const BUTTON_ORDER: [(PadButton, Buttons); 12] = [
    (PadButton::A, Buttons::A),
    (PadButton::B, Buttons::B),
    (PadButton::X, Buttons::X),
    (PadButton::Y, Buttons::Y),
    (PadButton::Back, Buttons::BACK),
    (PadButton::Guide, Buttons::BIG_BUTTON),
    (PadButton::Start, Buttons::START),
    (PadButton::LeftStick, Buttons::LEFT_STICK),
    (PadButton::RightStick, Buttons::RIGHT_STICK),
    (PadButton::LeftShoulder, Buttons::LEFT_SHOULDER),
    (PadButton::RightShoulder, Buttons::RIGHT_SHOULDER),
    (PadButton::Misc, Buttons::MISC),
];

struct PadSlot {
    device: Box<dyn GamepadDevice>,
    guid: String,
    capabilities: GamePadCapabilities,
    /// Raw snapshot from the previous sample; what packet diffing compares
    last_state: GamePadState,
}

/// Owns every connected gamepad and its polled state
pub struct GamepadRegistry {
    slots: [Option<PadSlot>; MAX_GAMEPADS],
    /// Instance id -> slot index; bijective while populated
    instance_slots: HashMap<u32, usize>,
}

impl GamepadRegistry {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None, None],
            instance_slots: HashMap::new(),
        }
    }

    /// Handle a device-added hotplug event
    pub fn handle_added(&mut self, host: &mut dyn GamepadHost, device_index: u32) {
        let Some(slot) = self.slots.iter().position(Option::is_none) else {
            info!(
                "ignoring gamepad device {}: all {} slots occupied",
                device_index, MAX_GAMEPADS
            );
            return;
        };

        let mut device = match host.open_gamepad(device_index) {
            Ok(device) => device,
            Err(err) => {
                warn!("failed to open gamepad device {}: {}", device_index, err);
                return;
            }
        };

        let instance_id = device.instance_id();
        if self.instance_slots.contains_key(&instance_id) {
            // Some platforms fire the add event twice per connection;
            // dropping the handle closes the duplicate.
            warn!(
                "duplicate add for gamepad instance {}, discarding",
                instance_id
            );
            return;
        }

        let capabilities = probe_capabilities(device.as_mut());
        let guid = derive_guid(device.as_ref());
        info!(
            "gamepad connected: slot {}, \"{}\", instance {}, guid {}",
            slot,
            device.name(),
            instance_id,
            guid
        );

        self.instance_slots.insert(instance_id, slot);
        self.slots[slot] = Some(PadSlot {
            device,
            guid,
            capabilities,
            last_state: GamePadState {
                is_connected: true,
                ..Default::default()
            },
        });
    }

    /// Handle a device-removed hotplug event
    pub fn handle_removed(&mut self, instance_id: u32) {
        let Some(slot) = self.instance_slots.remove(&instance_id) else {
            // Happens when a device beyond the cap disconnects
            debug!("removal event for untracked gamepad instance {}", instance_id);
            return;
        };

        if let Some(pad) = self.slots[slot].take() {
            info!(
                "gamepad disconnected: slot {}, instance {}, guid {}",
                slot, instance_id, pad.guid
            );
        }
    }

    /// Sample the current state of a slot.
    ///
    /// The packet number carries over from the previous sample and
    /// increments by exactly 1 when any input changed. The dead-zone
    /// policy applies only to the returned copy; the stored snapshot
    /// keeps raw values so diffing sees every change.
    pub fn state(&mut self, slot: usize, dead_zone: DeadZoneMode) -> GamePadState {
        let Some(pad) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return GamePadState::default();
        };

        let device = pad.device.as_ref();
        let mut snapshot = GamePadState {
            is_connected: true,
            packet_number: pad.last_state.packet_number,
            // Raw Y points down; flip so up is positive
            left_stick: Vec2::new(
                axis_to_unit(device.axis(PadAxis::LeftX)),
                -axis_to_unit(device.axis(PadAxis::LeftY)),
            ),
            right_stick: Vec2::new(
                axis_to_unit(device.axis(PadAxis::RightX)),
                -axis_to_unit(device.axis(PadAxis::RightY)),
            ),
            left_trigger: trigger_to_unit(device.axis(PadAxis::TriggerLeft)),
            right_trigger: trigger_to_unit(device.axis(PadAxis::TriggerRight)),
            buttons: Buttons::NONE,
            dpad: DPad::default(),
        };

        for (button, mask) in BUTTON_ORDER {
            if device.button(button) {
                snapshot.buttons |= mask;
            }
        }

        snapshot.dpad = DPad {
            up: ButtonState::from_bool(device.button(PadButton::DpadUp)),
            down: ButtonState::from_bool(device.button(PadButton::DpadDown)),
            left: ButtonState::from_bool(device.button(PadButton::DpadLeft)),
            right: ButtonState::from_bool(device.button(PadButton::DpadRight)),
        };
        if snapshot.dpad.up.is_pressed() {
            snapshot.buttons |= Buttons::DPAD_UP;
        }
        if snapshot.dpad.down.is_pressed() {
            snapshot.buttons |= Buttons::DPAD_DOWN;
        }
        if snapshot.dpad.left.is_pressed() {
            snapshot.buttons |= Buttons::DPAD_LEFT;
        }
        if snapshot.dpad.right.is_pressed() {
            snapshot.buttons |= Buttons::DPAD_RIGHT;
        }

        if !snapshot.same_inputs(&pad.last_state) {
            snapshot.packet_number = snapshot.packet_number.wrapping_add(1);
        }
        pad.last_state = snapshot;

        snapshot.with_dead_zone(dead_zone)
    }

    /// Capability record probed at connect time; all-false when empty
    pub fn capabilities(&self, slot: usize) -> GamePadCapabilities {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .map(|pad| pad.capabilities)
            .unwrap_or_default()
    }

    /// Device identifier string; empty when the slot is unoccupied
    pub fn guid(&self, slot: usize) -> &str {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .map(|pad| pad.guid.as_str())
            .unwrap_or("")
    }

    /// Drive the rumble motors. Magnitudes clamp to [0, 1] before the
    /// 16-bit conversion. Returns whether the command was accepted.
    pub fn set_vibration(&mut self, slot: usize, low: f32, high: f32) -> bool {
        let Some(pad) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return false;
        };
        pad.device
            .rumble(magnitude_to_raw(low), magnitude_to_raw(high))
            .is_ok()
    }

    /// Drive the trigger rumble motors
    pub fn set_trigger_vibration(&mut self, slot: usize, left: f32, right: f32) -> bool {
        let Some(pad) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return false;
        };
        pad.device
            .rumble_triggers(magnitude_to_raw(left), magnitude_to_raw(right))
            .is_ok()
    }

    /// Set the light bar color on devices that have one
    pub fn set_light_bar(&mut self, slot: usize, r: u8, g: u8, b: u8) {
        let Some(pad) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return;
        };
        if let Err(err) = pad.device.set_led(r, g, b) {
            debug!("light bar write failed on slot {}: {}", slot, err);
        }
    }

    /// Sample the gyroscope; `(Vec3::ZERO, false)` when absent or failed
    pub fn gyro(&mut self, slot: usize) -> (Vec3, bool) {
        self.sensor(slot, SensorKind::Gyro)
    }

    /// Sample the accelerometer; `(Vec3::ZERO, false)` when absent or failed
    pub fn accelerometer(&mut self, slot: usize) -> (Vec3, bool) {
        self.sensor(slot, SensorKind::Accelerometer)
    }

    pub fn is_connected(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(Option::is_some)
    }

    pub fn connected_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Sensors are enabled lazily on first use, then sampled each call
    fn sensor(&mut self, slot: usize, kind: SensorKind) -> (Vec3, bool) {
        let Some(pad) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return (Vec3::ZERO, false);
        };
        let device = pad.device.as_mut();

        if !device.has_sensor(kind) {
            return (Vec3::ZERO, false);
        }
        if !device.sensor_enabled(kind) {
            if let Err(err) = device.set_sensor_enabled(kind, true) {
                debug!("enabling {:?} failed on slot {}: {}", kind, slot, err);
                return (Vec3::ZERO, false);
            }
        }

        match device.sensor_data(kind) {
            Ok([x, y, z]) => (Vec3::new(x, y, z), true),
            Err(err) => {
                debug!("{:?} read failed on slot {}: {}", kind, slot, err);
                (Vec3::ZERO, false)
            }
        }
    }
}

impl Default for GamepadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn probe_capabilities(device: &mut dyn GamepadDevice) -> GamePadCapabilities {
    GamePadCapabilities {
        is_connected: true,
        has_a_button: device.has_button(PadButton::A),
        has_b_button: device.has_button(PadButton::B),
        has_x_button: device.has_button(PadButton::X),
        has_y_button: device.has_button(PadButton::Y),
        has_back_button: device.has_button(PadButton::Back),
        has_big_button: device.has_button(PadButton::Guide),
        has_start_button: device.has_button(PadButton::Start),
        has_dpad_up_button: device.has_button(PadButton::DpadUp),
        has_dpad_down_button: device.has_button(PadButton::DpadDown),
        has_dpad_left_button: device.has_button(PadButton::DpadLeft),
        has_dpad_right_button: device.has_button(PadButton::DpadRight),
        has_left_shoulder_button: device.has_button(PadButton::LeftShoulder),
        has_right_shoulder_button: device.has_button(PadButton::RightShoulder),
        has_left_stick_button: device.has_button(PadButton::LeftStick),
        has_right_stick_button: device.has_button(PadButton::RightStick),
        has_left_x_thumbstick: device.has_axis(PadAxis::LeftX),
        has_left_y_thumbstick: device.has_axis(PadAxis::LeftY),
        has_right_x_thumbstick: device.has_axis(PadAxis::RightX),
        has_right_y_thumbstick: device.has_axis(PadAxis::RightY),
        has_left_trigger: device.has_axis(PadAxis::TriggerLeft),
        has_right_trigger: device.has_axis(PadAxis::TriggerRight),
        // A zero-magnitude command probes motor support without moving
        // anything the player can feel
        has_left_vibration_motor: device.rumble(0, 0).is_ok(),
        has_right_vibration_motor: device.rumble(0, 0).is_ok(),
        has_trigger_vibration_motors: device.rumble_triggers(0, 0).is_ok(),
        has_light_bar: device.has_led(),
        has_gyro: device.has_sensor(SensorKind::Gyro),
        has_accelerometer: device.has_sensor(SensorKind::Accelerometer),
    }
}

/// Short hex identifier understood by external mapping databases.
/// Vendor/product bytes little-endian halves; two known controller
/// families override the ambiguous ids the platform reports for them.
fn derive_guid(device: &dyn GamepadDevice) -> String {
    let vendor = device.vendor_id();
    let product = device.product_id();

    if vendor == 0 && product == 0 {
        return "xinput".to_string();
    }

    if vendor == AGGREGATOR_VENDOR_ID {
        match device.family() {
            DeviceFamily::Xbox360 | DeviceFamily::XboxOne => return "xinput".to_string(),
            DeviceFamily::DualShock4 => return "4c05cc09".to_string(),
            DeviceFamily::DualSense => return "4c05e60c".to_string(),
            DeviceFamily::Unknown => {}
        }
    }

    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        vendor & 0xFF,
        vendor >> 8,
        product & 0xFF,
        product >> 8
    )
}
