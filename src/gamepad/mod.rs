// Gamepad input system
//
// - `state`: polled snapshot value types and dead-zone processing
// - `caps`: the per-slot capability record
// - `registry`: hotplug lifecycle, slot storage, and sampling

pub mod caps;
pub mod registry;
pub mod state;

pub use caps::GamePadCapabilities;
pub use registry::{GamepadRegistry, MAX_GAMEPADS};
pub use state::{Buttons, DPad, DeadZoneMode, GamePadState};
