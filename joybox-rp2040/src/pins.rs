//! Button pin bank over the RP2040 GPIO and ADC peripherals.

use embassy_rp::adc::{Adc, Blocking};
use embassy_rp::gpio::{AnyPin, Input, Pull};
use joybox_core::gpio::GPIO_COUNT;
use joybox_core::{GpioButtonMapping, Pin, PinBank};

use crate::board::AdcChannels;

/// Pin bank for one board's button table.
///
/// Digital buttons are configured as pulled-up inputs when the bank is built.
/// GPIOs not in the table read as released.
pub struct RpPinBank {
    inputs: [Option<Input<'static>>; GPIO_COUNT as usize],
    adc: Adc<'static, Blocking>,
    channels: AdcChannels,
}

impl RpPinBank {
    /// Claim every digital pin named in `mappings`.
    ///
    /// The table must have passed [`joybox_core::validate`], so no GPIO is
    /// claimed twice and none overlaps a pin used elsewhere.
    pub fn new(
        mappings: &[GpioButtonMapping],
        adc: Adc<'static, Blocking>,
        channels: AdcChannels,
    ) -> Self {
        let mut inputs = [const { None }; GPIO_COUNT as usize];
        for mapping in mappings {
            if let Pin::Digital(gpio) = mapping.pin {
                // SAFETY: validated tables name each GPIO at most once, and
                // the typed peripheral for it is never used elsewhere.
                let pin = unsafe { AnyPin::steal(gpio) };
                inputs[usize::from(gpio)] = Some(Input::new(pin, Pull::Up));
            }
        }
        Self {
            inputs,
            adc,
            channels,
        }
    }
}

impl PinBank for RpPinBank {
    fn is_high(&mut self, gpio: u8) -> bool {
        self.inputs
            .get(usize::from(gpio))
            .and_then(Option::as_ref)
            .map_or(true, Input::is_high)
    }

    fn read_analog(&mut self, channel: u8) -> Option<u16> {
        let channel = self.channels.get_mut(usize::from(channel))?.as_mut()?;
        self.adc.blocking_read(channel).ok()
    }
}
