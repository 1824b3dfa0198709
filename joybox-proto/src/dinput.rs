//! DInput-class USB HID gamepad report.

use crate::types::{OutputState, ANALOG_NEUTRAL};

/// Hat switch value reported when no direction is held.
pub const HAT_CENTERED: u8 = 8;

/// USB HID gamepad report.
///
/// Matches [`REPORT_DESCRIPTOR`]. Total size: 9 bytes
/// (buttons: 2, hat: 1, axes: 6x1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DInputReport {
    /// Button bitfield (16 buttons, button 1 = bit 0)
    pub buttons: u16,
    /// Hat switch, 0 = up, clockwise in 45 degree steps, 8 = centred
    pub hat: u8,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    pub left_trigger: u8,
    pub right_trigger: u8,
}

impl DInputReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 9;

    // Button order matches the common "DInput" layout expected by PC titles.
    pub const B: u16 = 1 << 0;
    pub const A: u16 = 1 << 1;
    pub const Y: u16 = 1 << 2;
    pub const X: u16 = 1 << 3;
    pub const R: u16 = 1 << 4;
    pub const ZR: u16 = 1 << 5;
    pub const L: u16 = 1 << 6;
    pub const ZL: u16 = 1 << 7;
    pub const SELECT: u16 = 1 << 8;
    pub const START: u16 = 1 << 9;
    pub const LS: u16 = 1 << 10;
    pub const RS: u16 = 1 << 11;
    pub const HOME: u16 = 1 << 12;

    /// Neutral report: no buttons, hat centred, sticks centred.
    #[must_use]
    pub fn neutral() -> Self {
        Self::from(&OutputState::neutral())
    }

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let buttons = self.buttons.to_le_bytes();
        [
            buttons[0],
            buttons[1],
            self.hat,
            self.left_x,
            self.left_y,
            self.right_x,
            self.right_y,
            self.left_trigger,
            self.right_trigger,
        ]
    }
}

/// Hat switch value for a d-pad combination.
///
/// Opposing directions cancel out, so a d-pad that was not SOCD-cleaned still
/// produces a valid hat value.
#[must_use]
pub fn hat_from_dpad(up: bool, down: bool, left: bool, right: bool) -> u8 {
    let vertical = i8::from(up) - i8::from(down);
    let horizontal = i8::from(right) - i8::from(left);
    match (vertical, horizontal) {
        (1, 0) => 0,
        (1, 1) => 1,
        (0, 1) => 2,
        (-1, 1) => 3,
        (-1, 0) => 4,
        (-1, -1) => 5,
        (0, -1) => 6,
        (1, -1) => 7,
        _ => HAT_CENTERED,
    }
}

/// Mirror an axis around the centre so that up on the stick reads as up on a
/// HID Y axis, which grows downwards. Full deflection downwards saturates at 255.
fn invert_axis(axis: u8) -> u8 {
    let mirrored = 2 * u16::from(ANALOG_NEUTRAL) - u16::from(axis);
    mirrored.min(u16::from(u8::MAX)) as u8
}

impl From<&OutputState> for DInputReport {
    fn from(out: &OutputState) -> Self {
        let mut buttons = 0u16;
        let bits = [
            (out.b, Self::B),
            (out.a, Self::A),
            (out.y, Self::Y),
            (out.x, Self::X),
            (out.button_r, Self::R),
            (out.trigger_r_digital, Self::ZR),
            (out.button_l, Self::L),
            (out.trigger_l_digital, Self::ZL),
            (out.select, Self::SELECT),
            (out.start, Self::START),
            (out.left_stick_click, Self::LS),
            (out.right_stick_click, Self::RS),
            (out.home, Self::HOME),
        ];
        for (pressed, bit) in bits {
            if pressed {
                buttons |= bit;
            }
        }

        Self {
            buttons,
            hat: hat_from_dpad(out.dpad_up, out.dpad_down, out.dpad_left, out.dpad_right),
            left_x: out.left_stick_x,
            left_y: invert_axis(out.left_stick_y),
            right_x: out.right_stick_x,
            right_y: invert_axis(out.right_stick_y),
            left_trigger: out.trigger_l_analog,
            right_trigger: out.trigger_r_analog,
        }
    }
}

/// HID report descriptor for [`DInputReport`].
///
/// - 16 buttons
/// - 1 hat switch (4 bits + 4 bits padding)
/// - 6 unsigned 8-bit axes (X, Y, Z, Rz, Rx, Ry)
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (16 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x10, //   Report Count (16)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Hat switch ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x07, //   Logical Maximum (7)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x65, 0x14, //   Unit (Degrees)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    // --- Axes ---
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x09, 0x33, //   Usage (Rx) - left trigger
    0x09, 0x34, //   Usage (Ry) - right trigger
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0xFF, 0x00, //   Physical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x06, //   Report Count (6)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_report_bytes() {
        let report = DInputReport::neutral();
        assert_eq!(
            report.as_bytes(),
            [0x00, 0x00, HAT_CENTERED, 128, 128, 128, 128, 0, 0]
        );
    }

    #[test]
    fn test_button_layout() {
        let out = OutputState {
            a: true,
            start: true,
            home: true,
            ..OutputState::neutral()
        };
        let report = DInputReport::from(&out);
        assert_eq!(
            report.buttons,
            DInputReport::A | DInputReport::START | DInputReport::HOME
        );
        let bytes = report.as_bytes();
        assert_eq!(bytes[0], 0x02);
        assert_eq!(bytes[1], 0x12);
    }

    #[test]
    fn test_hat_directions() {
        assert_eq!(hat_from_dpad(true, false, false, false), 0);
        assert_eq!(hat_from_dpad(true, false, false, true), 1);
        assert_eq!(hat_from_dpad(false, true, false, false), 4);
        assert_eq!(hat_from_dpad(false, false, true, false), 6);
        assert_eq!(hat_from_dpad(true, false, true, false), 7);
        assert_eq!(hat_from_dpad(false, false, false, false), HAT_CENTERED);
    }

    #[test]
    fn test_hat_opposing_directions_cancel() {
        assert_eq!(hat_from_dpad(true, true, false, false), HAT_CENTERED);
        assert_eq!(hat_from_dpad(true, true, true, false), 6);
    }

    #[test]
    fn test_y_axes_inverted() {
        let out = OutputState {
            left_stick_y: 208,
            right_stick_y: 48,
            ..OutputState::neutral()
        };
        let report = DInputReport::from(&out);
        assert_eq!(report.left_y, 48);
        assert_eq!(report.right_y, 208);
    }

    #[test]
    fn test_y_axes_centre_matches_x() {
        let report = DInputReport::neutral();
        assert_eq!(report.left_y, report.left_x);
        assert_eq!(report.right_y, report.right_x);

        let out = OutputState {
            left_stick_y: 255,
            right_stick_y: 0,
            ..OutputState::neutral()
        };
        let report = DInputReport::from(&out);
        assert_eq!(report.left_y, 1);
        assert_eq!(report.right_y, 255);
    }

    #[test]
    fn test_descriptor_is_balanced() {
        assert_eq!(REPORT_DESCRIPTOR.first(), Some(&0x05));
        assert_eq!(REPORT_DESCRIPTOR.last(), Some(&0xC0));
    }
}
