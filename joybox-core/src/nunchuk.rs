//! Wii Nunchuk input source over I2C.
//!
//! The Nunchuk is initialised in unencrypted mode and read with a pipelined
//! request: each frame reads the six bytes converted since the previous frame,
//! then asks for the next conversion. This keeps the bus transaction short and
//! never waits on the device.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal::i2c::I2c;
use joybox_proto::InputState;

use crate::input::InputSource;

/// Fixed I2C address of the Nunchuk.
pub const NUNCHUK_ADDRESS: u8 = 0x52;

/// Frames to wait before retrying a failed initialisation.
pub const NUNCHUK_RETRY_FRAMES: u16 = 500;

const INIT_SEQUENCE: [[u8; 2]; 2] = [[0xF0, 0x55], [0xFB, 0x00]];
const CONVERSION_REQUEST: [u8; 1] = [0x00];
const REPORT_LEN: usize = 6;

/// Error type for Nunchuk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NunchukError {
    /// The I2C transaction failed (no device, NACK, arbitration).
    Bus,
    /// The detect pin reports no Nunchuk plugged in.
    NotConnected,
}

/// Decoded Nunchuk reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NunchukReading {
    /// Stick X, centred at 0.
    pub x: i8,
    /// Stick Y, centred at 0.
    pub y: i8,
    pub c: bool,
    pub z: bool,
}

impl NunchukReading {
    /// Decode a raw 6-byte report.
    #[must_use]
    pub fn from_report(report: &[u8; REPORT_LEN]) -> Self {
        let centred = |raw: u8| (i16::from(raw) - 128) as i8;
        Self {
            x: centred(report[0]),
            y: centred(report[1]),
            // Buttons are active low
            c: report[5] & 0x02 == 0,
            z: report[5] & 0x01 == 0,
        }
    }
}

/// Stand-in detect pin for boards without one: always reports connected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDetect;

impl ErrorType for NoDetect {
    type Error = Infallible;
}

impl InputPin for NoDetect {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// Nunchuk input source.
pub struct NunchukInput<I, D = NoDetect> {
    i2c: I,
    detect: D,
    initialised: bool,
    retry_in: u16,
}

impl<I: I2c> NunchukInput<I, NoDetect> {
    /// Create a Nunchuk source without a detect pin.
    pub fn new(i2c: I) -> Self {
        Self::with_detect(i2c, NoDetect)
    }
}

impl<I: I2c, D: InputPin> NunchukInput<I, D> {
    /// Create a Nunchuk source with a detect pin (high = plugged in).
    pub fn with_detect(i2c: I, detect: D) -> Self {
        Self {
            i2c,
            detect,
            initialised: false,
            retry_in: 0,
        }
    }

    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    fn init(&mut self) -> Result<(), NunchukError> {
        for write in &INIT_SEQUENCE {
            self.i2c
                .write(NUNCHUK_ADDRESS, write)
                .map_err(|_| NunchukError::Bus)?;
        }
        self.i2c
            .write(NUNCHUK_ADDRESS, &CONVERSION_REQUEST)
            .map_err(|_| NunchukError::Bus)
    }

    fn read_report(&mut self) -> Result<NunchukReading, NunchukError> {
        let mut report = [0u8; REPORT_LEN];
        self.i2c
            .read(NUNCHUK_ADDRESS, &mut report)
            .map_err(|_| NunchukError::Bus)?;
        self.i2c
            .write(NUNCHUK_ADDRESS, &CONVERSION_REQUEST)
            .map_err(|_| NunchukError::Bus)?;
        Ok(NunchukReading::from_report(&report))
    }

    /// Poll the device once.
    ///
    /// Initialises it first if needed, honouring the retry back-off after a
    /// failure.
    pub fn poll(&mut self) -> Result<NunchukReading, NunchukError> {
        if !self.detect.is_high().unwrap_or(false) {
            self.initialised = false;
            return Err(NunchukError::NotConnected);
        }

        if !self.initialised {
            if self.retry_in > 0 {
                self.retry_in -= 1;
                return Err(NunchukError::NotConnected);
            }
            if let Err(e) = self.init() {
                self.retry_in = NUNCHUK_RETRY_FRAMES;
                return Err(e);
            }
            self.initialised = true;
        }

        self.read_report().inspect_err(|_| {
            self.initialised = false;
            self.retry_in = NUNCHUK_RETRY_FRAMES;
        })
    }
}

impl<I: I2c, D: InputPin> InputSource for NunchukInput<I, D> {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        if let Ok(reading) = self.poll() {
            inputs.nunchuk_connected = true;
            inputs.nunchuk_x = reading.x;
            inputs.nunchuk_y = reading.y;
            inputs.nunchuk_c = reading.c;
            inputs.nunchuk_z = reading.z;
        }
    }
}
