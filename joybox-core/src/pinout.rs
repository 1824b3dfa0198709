//! Board descriptor and boot-time validation of button tables.

use joybox_proto::InputField;

use crate::gpio::{GpioButtonMapping, Pin, ADC_CHANNELS, GPIO_COUNT};

/// Non-button pins of a board. `None` means the board lacks that line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pinout {
    /// Joybus data line.
    pub joybus_data: Option<u8>,
    /// Output driving the Brook passthrough mux.
    pub mux: Option<u8>,
    /// Input pulled low while a Nunchuk is plugged in.
    pub nunchuk_detect: Option<u8>,
    pub nunchuk_sda: Option<u8>,
    pub nunchuk_scl: Option<u8>,
}

impl Pinout {
    /// Every GPIO the pinout claims, in field order.
    pub fn claimed(&self) -> impl Iterator<Item = u8> {
        [
            self.joybus_data,
            self.mux,
            self.nunchuk_detect,
            self.nunchuk_sda,
            self.nunchuk_scl,
        ]
        .into_iter()
        .flatten()
    }
}

/// Error type for an inconsistent board table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two button mappings use the same GPIO.
    DuplicatePin(u8),
    /// GPIO number outside the chip's range.
    InvalidGpio(u8),
    /// ADC channel the chip does not have.
    InvalidAdcChannel(u8),
    /// A logical field is mapped more than once.
    DuplicateField(InputField),
    /// A pinout line shares a GPIO with a button or another line.
    PinCollision(u8),
    /// The board has no Joybus data line.
    MissingJoybusPin,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicatePin(pin) => write!(f, "GPIO {pin} mapped twice"),
            Self::InvalidGpio(pin) => write!(f, "GPIO {pin} out of range"),
            Self::InvalidAdcChannel(ch) => write!(f, "ADC channel {ch} out of range"),
            Self::DuplicateField(field) => write!(f, "{field:?} mapped twice"),
            Self::PinCollision(pin) => write!(f, "GPIO {pin} used by more than one line"),
            Self::MissingJoybusPin => write!(f, "no Joybus data pin"),
        }
    }
}

/// Check a button table and pinout for conflicts.
///
/// Runs once at boot; any error means the firmware was built for the wrong
/// board.
pub fn validate(mappings: &[GpioButtonMapping], pinout: &Pinout) -> Result<(), ConfigError> {
    let mut used: u32 = 0;
    let mut channels: u8 = 0;
    let mut fields: u32 = 0;

    for mapping in mappings {
        match mapping.pin {
            Pin::Digital(gpio) => {
                check_gpio(gpio)?;
                if used & (1 << gpio) != 0 {
                    return Err(ConfigError::DuplicatePin(gpio));
                }
                used |= 1 << gpio;
            }
            Pin::Analog(channel) => {
                if channel >= ADC_CHANNELS {
                    return Err(ConfigError::InvalidAdcChannel(channel));
                }
                // ADC channels 0..=3 sit on GPIO 26..=29
                let gpio = 26 + channel;
                if channels & (1 << channel) != 0 || used & (1 << gpio) != 0 {
                    return Err(ConfigError::DuplicatePin(gpio));
                }
                channels |= 1 << channel;
                used |= 1 << gpio;
            }
        }
        if fields & mapping.field.mask() != 0 {
            return Err(ConfigError::DuplicateField(mapping.field));
        }
        fields |= mapping.field.mask();
    }

    if pinout.joybus_data.is_none() {
        return Err(ConfigError::MissingJoybusPin);
    }
    for gpio in pinout.claimed() {
        check_gpio(gpio)?;
        if used & (1 << gpio) != 0 {
            return Err(ConfigError::PinCollision(gpio));
        }
        used |= 1 << gpio;
    }
    Ok(())
}

fn check_gpio(gpio: u8) -> Result<(), ConfigError> {
    if gpio < GPIO_COUNT {
        Ok(())
    } else {
        Err(ConfigError::InvalidGpio(gpio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTONS: &[GpioButtonMapping] = &[
        GpioButtonMapping::digital(InputField::L, 5),
        GpioButtonMapping::digital(InputField::Left, 4),
        GpioButtonMapping::analog(InputField::Y, 0),
    ];

    const PINOUT: Pinout = Pinout {
        joybus_data: Some(17),
        mux: Some(11),
        nunchuk_detect: None,
        nunchuk_sda: None,
        nunchuk_scl: None,
    };

    #[test]
    fn test_valid_board() {
        assert_eq!(validate(BUTTONS, &PINOUT), Ok(()));
    }

    #[test]
    fn test_duplicate_pin() {
        let buttons = [
            GpioButtonMapping::digital(InputField::A, 3),
            GpioButtonMapping::digital(InputField::B, 3),
        ];
        assert_eq!(validate(&buttons, &PINOUT), Err(ConfigError::DuplicatePin(3)));
    }

    #[test]
    fn test_analog_channel_shares_gpio() {
        let buttons = [
            GpioButtonMapping::digital(InputField::A, 26),
            GpioButtonMapping::analog(InputField::B, 0),
        ];
        assert_eq!(validate(&buttons, &PINOUT), Err(ConfigError::DuplicatePin(26)));
    }

    #[test]
    fn test_out_of_range() {
        let gpio = [GpioButtonMapping::digital(InputField::A, 30)];
        assert_eq!(validate(&gpio, &PINOUT), Err(ConfigError::InvalidGpio(30)));
        let adc = [GpioButtonMapping::analog(InputField::A, 4)];
        assert_eq!(validate(&adc, &PINOUT), Err(ConfigError::InvalidAdcChannel(4)));
    }

    #[test]
    fn test_duplicate_field() {
        let buttons = [
            GpioButtonMapping::digital(InputField::A, 1),
            GpioButtonMapping::digital(InputField::A, 2),
        ];
        assert_eq!(
            validate(&buttons, &PINOUT),
            Err(ConfigError::DuplicateField(InputField::A))
        );
    }

    #[test]
    fn test_pinout_collision() {
        let pinout = Pinout {
            mux: Some(5),
            ..PINOUT
        };
        assert_eq!(validate(BUTTONS, &pinout), Err(ConfigError::PinCollision(5)));
    }

    #[test]
    fn test_missing_joybus_pin() {
        let pinout = Pinout {
            joybus_data: None,
            ..PINOUT
        };
        assert_eq!(validate(BUTTONS, &pinout), Err(ConfigError::MissingJoybusPin));
    }
}
