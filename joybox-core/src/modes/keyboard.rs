//! Keyboard mode: held buttons as boot-keyboard keys.

use joybox_proto::keyboard::keycode;
use joybox_proto::{InputField, InputState, KeyboardReport};

/// One button-to-key binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMapping {
    pub field: InputField,
    pub keycode: u8,
}

const fn key(field: InputField, keycode: u8) -> KeyMapping {
    KeyMapping { field, keycode }
}

/// Layout used when keyboard mode is switched on.
pub const DEFAULT_KEYBOARD_LAYOUT: &[KeyMapping] = &[
    key(InputField::L, keycode::Q),
    key(InputField::Left, keycode::A),
    key(InputField::Down, keycode::S),
    key(InputField::Right, keycode::D),
    key(InputField::Up, keycode::W),
    key(InputField::ModX, keycode::Z),
    key(InputField::ModY, keycode::X),
    key(InputField::Start, keycode::ENTER),
    key(InputField::Select, keycode::ESCAPE),
    key(InputField::CLeft, keycode::F),
    key(InputField::CUp, keycode::T),
    key(InputField::CDown, keycode::G),
    key(InputField::CRight, keycode::H),
    key(InputField::A, keycode::J),
    key(InputField::B, keycode::K),
    key(InputField::X, keycode::L),
    key(InputField::Y, keycode::I),
    key(InputField::Z, keycode::O),
    key(InputField::R, keycode::P),
    key(InputField::Lightshield, keycode::U),
    key(InputField::Midshield, keycode::SPACE),
];

/// Keyboard side channel fed from the primary backend's inputs.
#[derive(Clone, Copy, Debug)]
pub struct KeyboardMode {
    layout: &'static [KeyMapping],
}

impl KeyboardMode {
    #[must_use]
    pub const fn new(layout: &'static [KeyMapping]) -> Self {
        Self { layout }
    }

    /// Keys for every held button, in layout order. Keys past the report's
    /// six slots are dropped.
    #[must_use]
    pub fn report(&self, inputs: &InputState) -> KeyboardReport {
        let mut report = KeyboardReport::default();
        for mapping in self.layout.iter().filter(|m| inputs.get(m.field)) {
            if !report.press(mapping.keycode) {
                break;
            }
        }
        report
    }
}

impl Default for KeyboardMode {
    fn default() -> Self {
        Self::new(DEFAULT_KEYBOARD_LAYOUT)
    }
}
