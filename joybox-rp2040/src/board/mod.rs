//! Board tables, selected with a `board-*` feature.
//!
//! Each board provides a const [`BoardConfig`] named `BOARD` and an
//! `adc_channels` function that claims the ADC inputs its button table uses.

use embassy_rp::adc::Channel;
use embassy_rp::peripherals::{PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::Peri;

#[cfg(feature = "board-mux")]
mod mux;
#[cfg(feature = "board-pico")]
mod pico;

#[cfg(feature = "board-mux")]
pub use mux::{adc_channels, BOARD};
#[cfg(feature = "board-pico")]
pub use pico::{adc_channels, BOARD};

pub use joybox_core::BoardConfig;

/// The four ADC-capable pins, handed to the board so it can claim the ones
/// wired to buttons.
pub struct AdcPins {
    pub pin_26: Peri<'static, PIN_26>,
    pub pin_27: Peri<'static, PIN_27>,
    pub pin_28: Peri<'static, PIN_28>,
    pub pin_29: Peri<'static, PIN_29>,
}

/// ADC channel per channel number; `None` where the board reads the pin
/// digitally or not at all.
pub type AdcChannels = [Option<Channel<'static>>; 4];
