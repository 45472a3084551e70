// Keyboard state tracking and text-input synthesis

use super::keymap::Keymap;
use super::keys::Key;
use std::collections::HashSet;

/// Characters synthesized for the fixed text-input bindings, in flag order.
/// The last entry is the paste control character emitted for Ctrl+V.
pub const TEXT_INPUT_CHARS: [char; 7] = [
    '\u{2}',  // Home
    '\u{3}',  // End
    '\u{8}',  // Backspace
    '\u{9}',  // Tab
    '\u{D}',  // Enter
    '\u{7F}', // Delete
    '\u{16}', // Ctrl+V
];

const PASTE_INDEX: usize = 6;

/// Flag index for keys that participate in the text-input binding table
fn text_binding_index(key: Key) -> Option<usize> {
    match key {
        Key::Home => Some(0),
        Key::End => Some(1),
        Key::Backspace => Some(2),
        Key::Tab => Some(3),
        Key::Enter => Some(4),
        Key::Delete => Some(5),
        _ => None,
    }
}

/// Consumes raw key events and maintains the pressed-key set plus the
/// synthesized text-input stream.
#[derive(Debug)]
pub struct KeyboardTracker {
    /// Active translation strategy, fixed for the session
    keymap: Keymap,

    /// Keys currently held down
    pressed: HashSet<Key>,

    /// Whether each text-input chord is currently active
    control_down: [bool; TEXT_INPUT_CHARS.len()],

    /// Platform text is dropped while the paste chord is held so the
    /// literal "v" does not leak into the stream
    suppress_text: bool,

    /// Synthesized characters pending consumption this frame
    text_queue: Vec<char>,
}

impl KeyboardTracker {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pressed: HashSet::new(),
            control_down: [false; TEXT_INPUT_CHARS.len()],
            suppress_text: false,
            text_queue: Vec::new(),
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Handle a key-down event. Repeats re-emit the synthesized character
    /// without re-adding the key, so press detection never double-counts.
    pub fn key_down(&mut self, keycode: u32, scancode: u32, repeat: bool) {
        let key = self.keymap.translate(keycode, scancode);
        if key == Key::None {
            return;
        }

        if !self.pressed.contains(&key) {
            self.pressed.insert(key);
            self.synthesize_text(key);
        } else if repeat {
            self.synthesize_text(key);
        }
    }

    /// Handle a key-up event; removal is idempotent
    pub fn key_up(&mut self, keycode: u32, scancode: u32) {
        let key = self.keymap.translate(keycode, scancode);

        if self.pressed.remove(&key) {
            if let Some(index) = text_binding_index(key) {
                self.control_down[index] = false;
            } else if (self.control_down[PASTE_INDEX] && !self.control_held()) || key == Key::V {
                self.control_down[PASTE_INDEX] = false;
                self.suppress_text = false;
            }
        }
    }

    /// Forward committed platform text into the synthesized stream
    pub fn push_text(&mut self, text: &str) {
        if self.suppress_text {
            return;
        }
        self.text_queue.extend(text.chars());
    }

    /// Drain the characters synthesized since the last call
    pub fn take_text_input(&mut self) -> Vec<char> {
        std::mem::take(&mut self.text_queue)
    }

    /// Whether the key is currently held down
    pub fn is_key_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// The set of keys currently held down
    pub fn pressed_keys(&self) -> &HashSet<Key> {
        &self.pressed
    }

    fn control_held(&self) -> bool {
        self.pressed.contains(&Key::LeftControl) || self.pressed.contains(&Key::RightControl)
    }

    fn synthesize_text(&mut self, key: Key) {
        if let Some(index) = text_binding_index(key) {
            self.control_down[index] = true;
            self.text_queue.push(TEXT_INPUT_CHARS[index]);
        } else if key == Key::V && self.control_held() {
            self.control_down[PASTE_INDEX] = true;
            self.text_queue.push(TEXT_INPUT_CHARS[PASTE_INDEX]);
            self.suppress_text = true;
        }
    }

    #[cfg(test)]
    pub(crate) fn control_down_flags(&self) -> &[bool; TEXT_INPUT_CHARS.len()] {
        &self.control_down
    }
}
