//! GPIO button scanner.
//!
//! Buttons are wired between the pin and ground with the internal pull-up
//! enabled, so a low level means pressed. Boards short on digital pins may
//! wire buttons to ADC inputs instead; those read as pressed once the sample
//! falls below [`ANALOG_PRESS_THRESHOLD`].

use joybox_proto::{InputField, InputState};

use crate::input::InputSource;

/// 12-bit ADC sample below which an analog-wired button counts as pressed.
pub const ANALOG_PRESS_THRESHOLD: u16 = 1_024;

/// Number of user GPIOs on the target MCU.
pub const GPIO_COUNT: u8 = 30;

/// Number of ADC input channels on the target MCU.
pub const ADC_CHANNELS: u8 = 4;

/// Physical location of one button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pin {
    /// Digital GPIO number, active low.
    Digital(u8),
    /// ADC channel, pressed below [`ANALOG_PRESS_THRESHOLD`].
    Analog(u8),
}

/// Pairing of a logical input field with the pin that drives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioButtonMapping {
    pub field: InputField,
    pub pin: Pin,
}

impl GpioButtonMapping {
    #[must_use]
    pub const fn digital(field: InputField, gpio: u8) -> Self {
        Self {
            field,
            pin: Pin::Digital(gpio),
        }
    }

    #[must_use]
    pub const fn analog(field: InputField, channel: u8) -> Self {
        Self {
            field,
            pin: Pin::Analog(channel),
        }
    }
}

/// Raw pin access provided by the platform.
pub trait PinBank {
    /// Level of a digital input (`true` = high).
    fn is_high(&mut self, gpio: u8) -> bool;

    /// One 12-bit conversion on an ADC channel.
    ///
    /// Returns `None` if the conversion failed; the button then reads as
    /// released.
    fn read_analog(&mut self, channel: u8) -> Option<u16>;
}

/// Input source that scans a fixed table of buttons.
pub struct GpioButtonInput<B> {
    bank: B,
    mappings: &'static [GpioButtonMapping],
}

impl<B: PinBank> GpioButtonInput<B> {
    /// Create a scanner over `bank` for the given board table.
    pub fn new(bank: B, mappings: &'static [GpioButtonMapping]) -> Self {
        Self { bank, mappings }
    }

    /// The board table this scanner reads.
    #[must_use]
    pub fn mappings(&self) -> &'static [GpioButtonMapping] {
        self.mappings
    }

    /// Get a mutable reference to the pin bank.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    fn is_pressed(&mut self, pin: Pin) -> bool {
        match pin {
            Pin::Digital(gpio) => !self.bank.is_high(gpio),
            Pin::Analog(channel) => self
                .bank
                .read_analog(channel)
                .is_some_and(|sample| sample < ANALOG_PRESS_THRESHOLD),
        }
    }
}

impl<B: PinBank> InputSource for GpioButtonInput<B> {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        for mapping in self.mappings {
            let pressed = self.is_pressed(mapping.pin);
            inputs.set(mapping.field, pressed);
        }
    }
}
