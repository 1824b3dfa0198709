//! Raspberry Pi Pico wired as a 20-button controller with a Nunchuk port.
//!
//! | Function | GPIO |
//! |----------|------|
//! | Joybus data | 28 |
//! | Nunchuk SDA / SCL | 8 / 9 |

use joybox_core::{BoardConfig, BootOptions, GpioButtonMapping, HostDetection, ModeKind, Pinout};
use joybox_proto::InputField;

use super::{AdcChannels, AdcPins};

const BUTTONS: &[GpioButtonMapping] = &[
    GpioButtonMapping::digital(InputField::L, 5),
    GpioButtonMapping::digital(InputField::Left, 4),
    GpioButtonMapping::digital(InputField::Down, 3),
    GpioButtonMapping::digital(InputField::Right, 2),
    GpioButtonMapping::digital(InputField::ModX, 6),
    GpioButtonMapping::digital(InputField::ModY, 7),
    GpioButtonMapping::digital(InputField::Start, 0),
    GpioButtonMapping::digital(InputField::CLeft, 13),
    GpioButtonMapping::digital(InputField::CUp, 12),
    GpioButtonMapping::digital(InputField::CDown, 15),
    GpioButtonMapping::digital(InputField::A, 14),
    GpioButtonMapping::digital(InputField::CRight, 16),
    GpioButtonMapping::digital(InputField::B, 26),
    GpioButtonMapping::digital(InputField::X, 21),
    GpioButtonMapping::digital(InputField::Z, 19),
    GpioButtonMapping::digital(InputField::Up, 17),
    GpioButtonMapping::digital(InputField::R, 27),
    GpioButtonMapping::digital(InputField::Y, 22),
    GpioButtonMapping::digital(InputField::Lightshield, 20),
    GpioButtonMapping::digital(InputField::Midshield, 18),
];

pub const BOARD: BoardConfig = BoardConfig {
    name: "pico",
    buttons: BUTTONS,
    pinout: Pinout {
        joybus_data: Some(28),
        mux: None,
        nunchuk_detect: None,
        nunchuk_sda: Some(8),
        nunchuk_scl: Some(9),
    },
    // USB enumeration is usually done well within 100 ms of power-up
    detection: HostDetection::Polling {
        attempts: 100,
        interval_us: 1_000,
    },
    boot: BootOptions {
        gamecube_polling_rate: 125,
        n64_polling_rate: 60,
        adapter_polling_rate: 0,
        default_mode: ModeKind::Melee,
        bootloader_hold: true,
    },
};

/// Every ADC-capable pin is a digital button or the Joybus line here.
pub fn adc_channels(_pins: AdcPins) -> AdcChannels {
    [None, None, None, None]
}
