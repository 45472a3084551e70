// Simulated platform backend
//
// Drives the bridge without a native windowing system. Tests and the demo
// binary script queue contents, window geometry, and device state directly.
// Gamepad handles are shared (`Rc<RefCell<..>>`) so a pad can keep being
// poked after the registry has opened it.

use super::{
    CursorReading, DeviceFamily, EventSource, GamepadDevice, GamepadHost, KeyboardLayout,
    PadAxis, PadButton, PlatformError, PlatformEvent, SensorKind, TextInputControl, TouchFinger,
    TouchQuery, WindowQuery,
};
use crate::keyboard::keymap;
use std::cell::{RefCell, RefMut};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// Scriptable window geometry and cursor readings
#[derive(Debug, Clone)]
pub struct SimWindow {
    pub client_size: (u32, u32),
    pub drawable_size: (u32, u32),
    pub position: (i32, i32),
    pub cursor_captured: bool,
    pub supports_global_cursor: bool,
    pub window_cursor: CursorReading,
    pub global_cursor: CursorReading,
    pub relative_cursor: CursorReading,
}

impl Default for SimWindow {
    fn default() -> Self {
        Self {
            client_size: (1280, 720),
            drawable_size: (1280, 720),
            position: (0, 0),
            cursor_captured: false,
            supports_global_cursor: true,
            window_cursor: CursorReading::default(),
            global_cursor: CursorReading::default(),
            relative_cursor: CursorReading::default(),
        }
    }
}

/// One simulated sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct SimSensor {
    pub supported: bool,
    pub enabled: bool,
    pub reading: [f32; 3],
    pub fail_reads: bool,
}

/// Mutable state behind a simulated gamepad handle
#[derive(Debug)]
pub struct SimPadState {
    pub instance_id: u32,
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub family: DeviceFamily,
    /// Controls the device does NOT report; everything else probes present
    pub missing_buttons: HashSet<PadButton>,
    pub missing_axes: HashSet<PadAxis>,
    pub pressed: HashSet<PadButton>,
    pub axes: HashMap<PadAxis, i16>,
    pub rumble_supported: bool,
    pub trigger_rumble_supported: bool,
    pub last_rumble: Option<(u16, u16)>,
    pub last_trigger_rumble: Option<(u16, u16)>,
    pub led_supported: bool,
    pub led: Option<(u8, u8, u8)>,
    pub gyro: SimSensor,
    pub accelerometer: SimSensor,
}

impl SimPadState {
    /// A plain controller: full button/axis set, rumble, no light bar,
    /// no sensors, zeroed vendor/product ids
    pub fn new(instance_id: u32) -> Self {
        Self {
            instance_id,
            name: format!("Simulated Pad #{}", instance_id),
            vendor_id: 0,
            product_id: 0,
            family: DeviceFamily::Unknown,
            missing_buttons: HashSet::new(),
            missing_axes: HashSet::new(),
            pressed: HashSet::new(),
            axes: HashMap::new(),
            rumble_supported: true,
            trigger_rumble_supported: true,
            last_rumble: None,
            last_trigger_rumble: None,
            led_supported: false,
            led: None,
            gyro: SimSensor::default(),
            accelerometer: SimSensor::default(),
        }
    }

    fn sensor(&self, kind: SensorKind) -> &SimSensor {
        match kind {
            SensorKind::Gyro => &self.gyro,
            SensorKind::Accelerometer => &self.accelerometer,
        }
    }

    fn sensor_mut(&mut self, kind: SensorKind) -> &mut SimSensor {
        match kind {
            SensorKind::Gyro => &mut self.gyro,
            SensorKind::Accelerometer => &mut self.accelerometer,
        }
    }
}

/// Cloneable handle to a simulated gamepad
#[derive(Debug, Clone)]
pub struct SimGamepad(Rc<RefCell<SimPadState>>);

impl SimGamepad {
    pub fn new(state: SimPadState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }

    /// Borrow the pad state to script it mid-test
    pub fn state_mut(&self) -> RefMut<'_, SimPadState> {
        self.0.borrow_mut()
    }
}

impl GamepadDevice for SimGamepad {
    fn instance_id(&self) -> u32 {
        self.0.borrow().instance_id
    }

    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn vendor_id(&self) -> u16 {
        self.0.borrow().vendor_id
    }

    fn product_id(&self) -> u16 {
        self.0.borrow().product_id
    }

    fn family(&self) -> DeviceFamily {
        self.0.borrow().family
    }

    fn has_button(&self, button: PadButton) -> bool {
        !self.0.borrow().missing_buttons.contains(&button)
    }

    fn has_axis(&self, axis: PadAxis) -> bool {
        !self.0.borrow().missing_axes.contains(&axis)
    }

    fn button(&self, button: PadButton) -> bool {
        let state = self.0.borrow();
        !state.missing_buttons.contains(&button) && state.pressed.contains(&button)
    }

    fn axis(&self, axis: PadAxis) -> i16 {
        self.0.borrow().axes.get(&axis).copied().unwrap_or(0)
    }

    fn rumble(&mut self, low: u16, high: u16) -> Result<(), PlatformError> {
        let mut state = self.0.borrow_mut();
        if !state.rumble_supported {
            return Err(PlatformError::Unsupported("rumble"));
        }
        state.last_rumble = Some((low, high));
        Ok(())
    }

    fn rumble_triggers(&mut self, left: u16, right: u16) -> Result<(), PlatformError> {
        let mut state = self.0.borrow_mut();
        if !state.trigger_rumble_supported {
            return Err(PlatformError::Unsupported("trigger rumble"));
        }
        state.last_trigger_rumble = Some((left, right));
        Ok(())
    }

    fn has_led(&self) -> bool {
        self.0.borrow().led_supported
    }

    fn set_led(&mut self, r: u8, g: u8, b: u8) -> Result<(), PlatformError> {
        let mut state = self.0.borrow_mut();
        if !state.led_supported {
            return Err(PlatformError::Unsupported("light bar"));
        }
        state.led = Some((r, g, b));
        Ok(())
    }

    fn has_sensor(&self, sensor: SensorKind) -> bool {
        self.0.borrow().sensor(sensor).supported
    }

    fn sensor_enabled(&self, sensor: SensorKind) -> bool {
        self.0.borrow().sensor(sensor).enabled
    }

    fn set_sensor_enabled(
        &mut self,
        sensor: SensorKind,
        enabled: bool,
    ) -> Result<(), PlatformError> {
        let mut state = self.0.borrow_mut();
        let slot = state.sensor_mut(sensor);
        if !slot.supported {
            return Err(PlatformError::Unsupported("sensor"));
        }
        slot.enabled = enabled;
        Ok(())
    }

    fn sensor_data(&mut self, sensor: SensorKind) -> Result<[f32; 3], PlatformError> {
        let state = self.0.borrow();
        let slot = state.sensor(sensor);
        if !slot.supported {
            return Err(PlatformError::Unsupported("sensor"));
        }
        if !slot.enabled {
            return Err(PlatformError::DeviceCall("sensor not enabled".into()));
        }
        if slot.fail_reads {
            return Err(PlatformError::DeviceCall("sensor read failed".into()));
        }
        Ok(slot.reading)
    }
}

/// Scriptable platform implementing the full collaborator surface
#[derive(Debug, Default)]
pub struct SimPlatform {
    events: VecDeque<PlatformEvent>,
    pub window: SimWindow,
    text_input_active: bool,
    layout: HashMap<u32, u32>,
    gamepads: HashMap<u32, SimGamepad>,
    failing_opens: HashSet<u32>,
    fingers: Vec<TouchFinger>,
}

impl SimPlatform {
    /// Fresh platform with an empty queue and the reference keyboard layout
    pub fn new() -> Self {
        Self {
            layout: keymap::reference_layout(),
            ..Default::default()
        }
    }

    pub fn push_event(&mut self, event: PlatformEvent) {
        self.events.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = PlatformEvent>) {
        self.events.extend(events);
    }

    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    /// Register a pad to hand out when `device_index` is opened
    pub fn attach_gamepad(&mut self, device_index: u32, pad: SimGamepad) {
        self.gamepads.insert(device_index, pad);
    }

    /// Make opening `device_index` fail
    pub fn fail_open(&mut self, device_index: u32) {
        self.failing_opens.insert(device_index);
    }

    /// Replace the set of active touch contacts
    pub fn set_fingers(&mut self, fingers: Vec<TouchFinger>) {
        self.fingers = fingers;
    }

    /// Override one position of the simulated keyboard layout
    pub fn remap_layout(&mut self, scancode: u32, keycode: u32) {
        self.layout.insert(scancode, keycode);
    }

    pub fn text_input_active(&self) -> bool {
        self.text_input_active
    }
}

impl EventSource for SimPlatform {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }
}

impl WindowQuery for SimPlatform {
    fn client_size(&self) -> (u32, u32) {
        self.window.client_size
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size
    }

    fn position(&self) -> (i32, i32) {
        self.window.position
    }

    fn is_cursor_captured(&self) -> bool {
        self.window.cursor_captured
    }

    fn relative_cursor(&self) -> CursorReading {
        self.window.relative_cursor
    }

    fn global_cursor(&self) -> Option<CursorReading> {
        self.window
            .supports_global_cursor
            .then_some(self.window.global_cursor)
    }

    fn window_cursor(&self) -> CursorReading {
        self.window.window_cursor
    }
}

impl KeyboardLayout for SimPlatform {
    fn keycode_for_scancode(&self, scancode: u32) -> u32 {
        self.layout.get(&scancode).copied().unwrap_or(0)
    }
}

impl TextInputControl for SimPlatform {
    fn set_text_input_active(&mut self, active: bool) {
        self.text_input_active = active;
    }
}

impl GamepadHost for SimPlatform {
    fn open_gamepad(&mut self, device_index: u32) -> Result<Box<dyn GamepadDevice>, PlatformError> {
        if self.failing_opens.contains(&device_index) {
            return Err(PlatformError::OpenFailed {
                index: device_index,
                reason: "scripted failure".into(),
            });
        }
        match self.gamepads.get(&device_index) {
            Some(pad) => Ok(Box::new(pad.clone())),
            None => Err(PlatformError::OpenFailed {
                index: device_index,
                reason: "no such device".into(),
            }),
        }
    }
}

impl TouchQuery for SimPlatform {
    fn touch_fingers(&self) -> Vec<TouchFinger> {
        self.fingers.clone()
    }
}
