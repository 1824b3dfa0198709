//! Board with a Brook passthrough mux. Y and the shield buttons are wired to
//! ADC inputs.
//!
//! | Function | GPIO |
//! |----------|------|
//! | Joybus data | 17 |
//! | Passthrough mux | 11 |

use embassy_rp::adc::Channel;
use embassy_rp::gpio::Pull;
use joybox_core::{BoardConfig, BootOptions, GpioButtonMapping, HostDetection, ModeKind, Pinout};
use joybox_proto::InputField;

use super::{AdcChannels, AdcPins};

const BUTTONS: &[GpioButtonMapping] = &[
    GpioButtonMapping::digital(InputField::L, 15),
    GpioButtonMapping::digital(InputField::Left, 16),
    GpioButtonMapping::digital(InputField::Down, 14),
    GpioButtonMapping::digital(InputField::Right, 3),
    GpioButtonMapping::digital(InputField::ModX, 2),
    GpioButtonMapping::digital(InputField::ModY, 0),
    GpioButtonMapping::digital(InputField::Select, 1),
    GpioButtonMapping::digital(InputField::Start, 4),
    GpioButtonMapping::digital(InputField::Home, 12),
    GpioButtonMapping::digital(InputField::CLeft, 8),
    GpioButtonMapping::digital(InputField::CUp, 10),
    GpioButtonMapping::digital(InputField::CDown, 6),
    GpioButtonMapping::digital(InputField::A, 9),
    GpioButtonMapping::digital(InputField::CRight, 5),
    GpioButtonMapping::digital(InputField::B, 18),
    GpioButtonMapping::digital(InputField::X, 19),
    GpioButtonMapping::digital(InputField::Z, 20),
    GpioButtonMapping::digital(InputField::Up, 13),
    GpioButtonMapping::digital(InputField::R, 7),
    GpioButtonMapping::analog(InputField::Y, 0),
    GpioButtonMapping::analog(InputField::Lightshield, 1),
    GpioButtonMapping::analog(InputField::Midshield, 2),
];

pub const BOARD: BoardConfig = BoardConfig {
    name: "mux",
    buttons: BUTTONS,
    pinout: Pinout {
        joybus_data: Some(17),
        mux: Some(11),
        nunchuk_detect: None,
        nunchuk_sda: None,
        nunchuk_scl: None,
    },
    detection: HostDetection::SettleThenCheck { settle_ms: 500 },
    boot: BootOptions {
        gamecube_polling_rate: 125,
        n64_polling_rate: 60,
        adapter_polling_rate: 0,
        default_mode: ModeKind::Rivals2,
        // Start at plug-in is a normal in-game hold on this board
        bootloader_hold: false,
    },
};

/// Claim ADC channels 0 to 2 for the analog-wired buttons.
pub fn adc_channels(pins: AdcPins) -> AdcChannels {
    [
        Some(Channel::new_pin(pins.pin_26, Pull::Up)),
        Some(Channel::new_pin(pins.pin_27, Pull::Up)),
        Some(Channel::new_pin(pins.pin_28, Pull::Up)),
        None,
    ]
}
