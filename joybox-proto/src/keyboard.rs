//! Boot-keyboard key state produced by keyboard modes.
//!
//! The wire report and its descriptor are `usbd_hid`'s boot keyboard;
//! [`KeyboardReport::to_hid`] and [`input_bytes`] bridge to them.

use usbd_hid::descriptor::SerializedDescriptor;

pub use usbd_hid::descriptor::KeyboardReport as HidKeyboardReport;

/// Maximum number of simultaneously reported keys.
pub const MAX_KEYS: usize = 6;

/// Size of the input report: modifiers, reserved byte, six keys.
pub const INPUT_REPORT_SIZE: usize = 8;

/// HID usage ids for the keys keyboard modes emit.
pub mod keycode {
    pub const A: u8 = 0x04;
    pub const B: u8 = 0x05;
    pub const C: u8 = 0x06;
    pub const D: u8 = 0x07;
    pub const E: u8 = 0x08;
    pub const F: u8 = 0x09;
    pub const G: u8 = 0x0A;
    pub const H: u8 = 0x0B;
    pub const I: u8 = 0x0C;
    pub const J: u8 = 0x0D;
    pub const K: u8 = 0x0E;
    pub const L: u8 = 0x0F;
    pub const M: u8 = 0x10;
    pub const N: u8 = 0x11;
    pub const O: u8 = 0x12;
    pub const P: u8 = 0x13;
    pub const Q: u8 = 0x14;
    pub const R: u8 = 0x15;
    pub const S: u8 = 0x16;
    pub const T: u8 = 0x17;
    pub const U: u8 = 0x18;
    pub const V: u8 = 0x19;
    pub const W: u8 = 0x1A;
    pub const X: u8 = 0x1B;
    pub const Y: u8 = 0x1C;
    pub const Z: u8 = 0x1D;
    pub const ENTER: u8 = 0x28;
    pub const ESCAPE: u8 = 0x29;
    pub const SPACE: u8 = 0x2C;
}

/// Modifier byte and up to [`MAX_KEYS`] held keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; MAX_KEYS],
}

impl KeyboardReport {
    /// Add a key to the report.
    ///
    /// Returns `false` if the report already holds [`MAX_KEYS`] keys.
    pub fn press(&mut self, keycode: u8) -> bool {
        if self.keys.contains(&keycode) {
            return true;
        }
        match self.keys.iter_mut().find(|slot| **slot == 0) {
            Some(slot) => {
                *slot = keycode;
                true
            }
            None => false,
        }
    }

    /// The same key state as a `usbd-hid` boot keyboard report.
    #[must_use]
    pub fn to_hid(&self) -> HidKeyboardReport {
        HidKeyboardReport {
            modifier: self.modifiers,
            reserved: 0,
            leds: 0,
            keycodes: self.keys,
        }
    }
}

/// Input report bytes in descriptor order. `leds` is an output item and is
/// not part of it.
#[must_use]
pub fn input_bytes(report: &HidKeyboardReport) -> [u8; INPUT_REPORT_SIZE] {
    let mut bytes = [0u8; INPUT_REPORT_SIZE];
    bytes[0] = report.modifier;
    bytes[1] = report.reserved;
    bytes[2..].copy_from_slice(&report.keycodes);
    bytes
}

/// HID report descriptor of the boot keyboard interface.
#[must_use]
pub fn report_descriptor() -> &'static [u8] {
    HidKeyboardReport::desc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fills_slots_in_order() {
        let mut report = KeyboardReport::default();
        assert!(report.press(keycode::A));
        assert!(report.press(keycode::B));
        assert_eq!(report.keys, [keycode::A, keycode::B, 0, 0, 0, 0]);
        assert_eq!(report.modifiers, 0);
    }

    #[test]
    fn test_hid_report_carries_key_state() {
        let mut report = KeyboardReport {
            modifiers: 0x02,
            ..KeyboardReport::default()
        };
        report.press(keycode::ENTER);
        report.press(keycode::X);

        let hid = report.to_hid();
        assert_eq!(hid.modifier, 0x02);
        assert_eq!(hid.keycodes, [keycode::ENTER, keycode::X, 0, 0, 0, 0]);
        assert_eq!(
            input_bytes(&hid),
            [0x02, 0, keycode::ENTER, keycode::X, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_released_report_is_all_zero() {
        assert_eq!(
            input_bytes(&KeyboardReport::default().to_hid()),
            [0; INPUT_REPORT_SIZE]
        );
    }

    #[test]
    fn test_descriptor_is_a_keyboard_collection() {
        let desc = report_descriptor();
        // Usage Page (Generic Desktop), Usage (Keyboard)
        assert_eq!(&desc[..4], &[0x05, 0x01, 0x09, 0x06]);
        assert_eq!(desc.last(), Some(&0xC0));
    }

    #[test]
    fn test_press_is_idempotent() {
        let mut report = KeyboardReport::default();
        report.press(keycode::SPACE);
        report.press(keycode::SPACE);
        assert_eq!(report.keys.iter().filter(|k| **k != 0).count(), 1);
    }

    #[test]
    fn test_press_rolls_over_after_six_keys() {
        let mut report = KeyboardReport::default();
        for key in [keycode::A, keycode::B, keycode::C, keycode::D, keycode::E, keycode::F] {
            assert!(report.press(key));
        }
        assert!(!report.press(keycode::G));
        assert!(!report.keys.contains(&keycode::G));
    }
}
