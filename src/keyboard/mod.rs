// Keyboard input system
//
// - `keys`: the abstract key symbols
// - `keymap`: raw-code translation tables and the active mapping strategy
// - `tracker`: pressed-key state and text-input synthesis

pub mod keymap;
pub mod keys;
pub mod tracker;

pub use keymap::{Keymap, KeymapMode, USE_SCANCODES_ENV};
pub use keys::Key;
pub use tracker::{KeyboardTracker, TEXT_INPUT_CHARS};
