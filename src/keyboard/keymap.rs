// Raw-code translation tables and the active mapping strategy
//
// Two hand-authored one-way tables translate raw platform codes into
// abstract keys: one keyed by layout-dependent virtual keycode, one keyed
// by layout-independent physical scancode. Scancodes follow the USB HID
// keyboard usage page; virtual keycodes are the ASCII value for printable
// keys and the position code folded with bit 30 for everything else, the
// numbering the native layer reports on every desktop platform.

use super::keys::Key;
use crate::platform::KeyboardLayout;
use log::warn;
use std::collections::HashMap;

/// Which raw code key events are interpreted through. Fixed at startup;
/// mixing mid-session is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapMode {
    /// Layout-dependent virtual keycodes (the default)
    VirtualKey,
    /// Layout-independent physical scancodes
    Scancode,
}

/// Environment switch evaluated once at startup
pub const USE_SCANCODES_ENV: &str = "INPUT_BRIDGE_USE_SCANCODES";

impl KeymapMode {
    /// Read the process-wide mode from the environment override
    pub fn from_env() -> Self {
        match std::env::var(USE_SCANCODES_ENV) {
            Ok(value) if value == "1" => KeymapMode::Scancode,
            _ => KeymapMode::VirtualKey,
        }
    }
}

pub(crate) const VIRTUAL_KEY_TABLE: &[(u32, Key)] = &[
    // Letters (ASCII lowercase)
    (0x61, Key::A),
    (0x62, Key::B),
    (0x63, Key::C),
    (0x64, Key::D),
    (0x65, Key::E),
    (0x66, Key::F),
    (0x67, Key::G),
    (0x68, Key::H),
    (0x69, Key::I),
    (0x6A, Key::J),
    (0x6B, Key::K),
    (0x6C, Key::L),
    (0x6D, Key::M),
    (0x6E, Key::N),
    (0x6F, Key::O),
    (0x70, Key::P),
    (0x71, Key::Q),
    (0x72, Key::R),
    (0x73, Key::S),
    (0x74, Key::T),
    (0x75, Key::U),
    (0x76, Key::V),
    (0x77, Key::W),
    (0x78, Key::X),
    (0x79, Key::Y),
    (0x7A, Key::Z),
    // Top-row digits (ASCII)
    (0x30, Key::Digit0),
    (0x31, Key::Digit1),
    (0x32, Key::Digit2),
    (0x33, Key::Digit3),
    (0x34, Key::Digit4),
    (0x35, Key::Digit5),
    (0x36, Key::Digit6),
    (0x37, Key::Digit7),
    (0x38, Key::Digit8),
    (0x39, Key::Digit9),
    // Whitespace and control (ASCII control values)
    (0x0D, Key::Enter),
    (0x1B, Key::Escape),
    (0x08, Key::Backspace),
    (0x09, Key::Tab),
    (0x20, Key::Space),
    // Punctuation (ASCII)
    (0x2D, Key::Minus),
    (0x3D, Key::Equals),
    (0x5B, Key::LeftBracket),
    (0x5D, Key::RightBracket),
    (0x5C, Key::Backslash),
    (0x3B, Key::Semicolon),
    (0x27, Key::Quote),
    (0x60, Key::Grave),
    (0x2C, Key::Comma),
    (0x2E, Key::Period),
    (0x2F, Key::Slash),
    (0x7F, Key::Delete),
    // Function keys
    (0x4000_003A, Key::F1),
    (0x4000_003B, Key::F2),
    (0x4000_003C, Key::F3),
    (0x4000_003D, Key::F4),
    (0x4000_003E, Key::F5),
    (0x4000_003F, Key::F6),
    (0x4000_0040, Key::F7),
    (0x4000_0041, Key::F8),
    (0x4000_0042, Key::F9),
    (0x4000_0043, Key::F10),
    (0x4000_0044, Key::F11),
    (0x4000_0045, Key::F12),
    // Locks and system
    (0x4000_0039, Key::CapsLock),
    (0x4000_0046, Key::PrintScreen),
    (0x4000_0047, Key::ScrollLock),
    (0x4000_0048, Key::Pause),
    // Navigation
    (0x4000_0049, Key::Insert),
    (0x4000_004A, Key::Home),
    (0x4000_004B, Key::PageUp),
    (0x4000_004D, Key::End),
    (0x4000_004E, Key::PageDown),
    (0x4000_004F, Key::ArrowRight),
    (0x4000_0050, Key::ArrowLeft),
    (0x4000_0051, Key::ArrowDown),
    (0x4000_0052, Key::ArrowUp),
    // Numpad
    (0x4000_0053, Key::NumLock),
    (0x4000_0054, Key::NumpadDivide),
    (0x4000_0055, Key::NumpadMultiply),
    (0x4000_0056, Key::NumpadSubtract),
    (0x4000_0057, Key::NumpadAdd),
    (0x4000_0058, Key::NumpadEnter),
    (0x4000_0059, Key::Numpad1),
    (0x4000_005A, Key::Numpad2),
    (0x4000_005B, Key::Numpad3),
    (0x4000_005C, Key::Numpad4),
    (0x4000_005D, Key::Numpad5),
    (0x4000_005E, Key::Numpad6),
    (0x4000_005F, Key::Numpad7),
    (0x4000_0060, Key::Numpad8),
    (0x4000_0061, Key::Numpad9),
    (0x4000_0062, Key::Numpad0),
    (0x4000_0063, Key::NumpadDecimal),
    (0x4000_0065, Key::Menu),
    // Modifiers
    (0x4000_00E0, Key::LeftControl),
    (0x4000_00E1, Key::LeftShift),
    (0x4000_00E2, Key::LeftAlt),
    (0x4000_00E3, Key::LeftSuper),
    (0x4000_00E4, Key::RightControl),
    (0x4000_00E5, Key::RightShift),
    (0x4000_00E6, Key::RightAlt),
    (0x4000_00E7, Key::RightSuper),
];

pub(crate) const SCANCODE_TABLE: &[(u32, Key)] = &[
    // Letters
    (4, Key::A),
    (5, Key::B),
    (6, Key::C),
    (7, Key::D),
    (8, Key::E),
    (9, Key::F),
    (10, Key::G),
    (11, Key::H),
    (12, Key::I),
    (13, Key::J),
    (14, Key::K),
    (15, Key::L),
    (16, Key::M),
    (17, Key::N),
    (18, Key::O),
    (19, Key::P),
    (20, Key::Q),
    (21, Key::R),
    (22, Key::S),
    (23, Key::T),
    (24, Key::U),
    (25, Key::V),
    (26, Key::W),
    (27, Key::X),
    (28, Key::Y),
    (29, Key::Z),
    // Top-row digits
    (30, Key::Digit1),
    (31, Key::Digit2),
    (32, Key::Digit3),
    (33, Key::Digit4),
    (34, Key::Digit5),
    (35, Key::Digit6),
    (36, Key::Digit7),
    (37, Key::Digit8),
    (38, Key::Digit9),
    (39, Key::Digit0),
    // Whitespace and control
    (40, Key::Enter),
    (41, Key::Escape),
    (42, Key::Backspace),
    (43, Key::Tab),
    (44, Key::Space),
    // Punctuation
    (45, Key::Minus),
    (46, Key::Equals),
    (47, Key::LeftBracket),
    (48, Key::RightBracket),
    (49, Key::Backslash),
    (51, Key::Semicolon),
    (52, Key::Quote),
    (53, Key::Grave),
    (54, Key::Comma),
    (55, Key::Period),
    (56, Key::Slash),
    (57, Key::CapsLock),
    // Function keys
    (58, Key::F1),
    (59, Key::F2),
    (60, Key::F3),
    (61, Key::F4),
    (62, Key::F5),
    (63, Key::F6),
    (64, Key::F7),
    (65, Key::F8),
    (66, Key::F9),
    (67, Key::F10),
    (68, Key::F11),
    (69, Key::F12),
    // Locks and system
    (70, Key::PrintScreen),
    (71, Key::ScrollLock),
    (72, Key::Pause),
    // Navigation
    (73, Key::Insert),
    (74, Key::Home),
    (75, Key::PageUp),
    (76, Key::Delete),
    (77, Key::End),
    (78, Key::PageDown),
    (79, Key::ArrowRight),
    (80, Key::ArrowLeft),
    (81, Key::ArrowDown),
    (82, Key::ArrowUp),
    // Numpad
    (83, Key::NumLock),
    (84, Key::NumpadDivide),
    (85, Key::NumpadMultiply),
    (86, Key::NumpadSubtract),
    (87, Key::NumpadAdd),
    (88, Key::NumpadEnter),
    (89, Key::Numpad1),
    (90, Key::Numpad2),
    (91, Key::Numpad3),
    (92, Key::Numpad4),
    (93, Key::Numpad5),
    (94, Key::Numpad6),
    (95, Key::Numpad7),
    (96, Key::Numpad8),
    (97, Key::Numpad9),
    (98, Key::Numpad0),
    (99, Key::NumpadDecimal),
    (101, Key::Menu),
    // Modifiers
    (224, Key::LeftControl),
    (225, Key::LeftShift),
    (226, Key::LeftAlt),
    (227, Key::LeftSuper),
    (228, Key::RightControl),
    (229, Key::RightShift),
    (230, Key::RightAlt),
    (231, Key::RightSuper),
];

/// The scancode-to-keycode pairing of the reference (US) layout, joined
/// through the abstract key both tables agree on. Backends without a live
/// layout query can serve this as their layout.
pub(crate) fn reference_layout() -> HashMap<u32, u32> {
    let keycode_of: HashMap<Key, u32> = VIRTUAL_KEY_TABLE
        .iter()
        .map(|&(code, key)| (key, code))
        .collect();

    SCANCODE_TABLE
        .iter()
        .filter_map(|&(scancode, key)| keycode_of.get(&key).map(|&code| (scancode, code)))
        .collect()
}

/// The active translation strategy, selected once at configuration time
/// and injected into the keyboard tracker.
#[derive(Debug, Clone)]
pub struct Keymap {
    mode: KeymapMode,
    virtual_table: HashMap<u32, Key>,
    scancode_table: HashMap<u32, Key>,
    /// Reverse of the scancode table: which physical position produces
    /// this key on the reference layout
    key_to_scancode: HashMap<Key, u32>,
}

impl Keymap {
    /// Build the lookup tables for the given mode
    pub fn new(mode: KeymapMode) -> Self {
        let virtual_table: HashMap<u32, Key> = VIRTUAL_KEY_TABLE.iter().copied().collect();
        let scancode_table: HashMap<u32, Key> = SCANCODE_TABLE.iter().copied().collect();
        let key_to_scancode: HashMap<Key, u32> = SCANCODE_TABLE
            .iter()
            .map(|&(code, key)| (key, code))
            .collect();

        Self {
            mode,
            virtual_table,
            scancode_table,
            key_to_scancode,
        }
    }

    /// Build with the mode taken from the environment override
    pub fn from_env() -> Self {
        Self::new(KeymapMode::from_env())
    }

    pub fn mode(&self) -> KeymapMode {
        self.mode
    }

    /// Translate a raw key event into an abstract key through the active
    /// table. Unknown raw codes log a warning and map to `Key::None`.
    pub fn translate(&self, keycode: u32, scancode: u32) -> Key {
        let (table, raw) = match self.mode {
            KeymapMode::VirtualKey => (&self.virtual_table, keycode),
            KeymapMode::Scancode => (&self.scancode_table, scancode),
        };

        match table.get(&raw) {
            Some(&key) => key,
            None => {
                warn!("no key translation for raw code {:#x}", raw);
                Key::None
            }
        }
    }

    /// Resolve which key the current layout produces at the physical
    /// position that yields `key` on the reference layout.
    ///
    /// Round trip: key -> scancode -> live layout keycode -> key.
    pub fn key_from_scancode(&self, key: Key, layout: &dyn KeyboardLayout) -> Key {
        let Some(&scancode) = self.key_to_scancode.get(&key) else {
            warn!("no physical position recorded for {:?}", key);
            return Key::None;
        };

        let keycode = layout.keycode_for_scancode(scancode);
        match self.virtual_table.get(&keycode) {
            Some(&resolved) => resolved,
            None => {
                warn!(
                    "layout produced untranslatable keycode {:#x} for {:?}",
                    keycode, key
                );
                Key::None
            }
        }
    }
}
