//! Boot plan: which backends to build, decided once from the power-on holds.
//!
//! | Held at power-on | Effect |
//! |------------------|--------|
//! | `start` (boards with `bootloader_hold`) | reboot into the USB bootloader |
//! | `b` (boards with a mux) | drive the passthrough mux high |
//! | USB host found | DInput primary + input viewer, keyboard available |
//! | `c_left`, no host | N64 |
//! | `a`, no host | GameCube adapter timing |
//! | nothing, no host | GameCube |

use joybox_proto::{Console, InputState};

use crate::detect::HostDetection;
use crate::gpio::GpioButtonMapping;
use crate::modes::ModeKind;
use crate::pinout::{validate, ConfigError, Pinout};

/// Everything the firmware needs to know about one board.
#[derive(Clone, Copy, Debug)]
pub struct BoardConfig {
    pub name: &'static str,
    pub buttons: &'static [GpioButtonMapping],
    pub pinout: Pinout,
    pub detection: HostDetection,
    pub boot: BootOptions,
}

impl BoardConfig {
    /// Check the button table against the pinout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self.buttons, &self.pinout)
    }
}

/// Per-board boot defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootOptions {
    /// GameCube polling rate in Hz when nothing is held.
    pub gamecube_polling_rate: u32,
    /// N64 polling rate in Hz.
    pub n64_polling_rate: u32,
    /// Polling rate used for GameCube adapters (0 = answer every poll at once).
    pub adapter_polling_rate: u32,
    /// Mode installed on the primary backend at boot.
    pub default_mode: ModeKind,
    /// Holding `start` at power-on reboots into the USB bootloader.
    pub bootloader_hold: bool,
}

impl Default for BootOptions {
    fn default() -> Self {
        Self {
            gamecube_polling_rate: 125,
            n64_polling_rate: 60,
            adapter_polling_rate: 0,
            default_mode: ModeKind::Melee,
            bootloader_hold: true,
        }
    }
}

/// Protocol of the primary backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrimaryKind {
    DInput,
    GameCube { polling_rate: u32 },
    N64 { polling_rate: u32 },
}

impl PrimaryKind {
    /// Console emulated on the Joybus line, if any.
    #[must_use]
    pub fn console(self) -> Option<(Console, u32)> {
        match self {
            PrimaryKind::DInput => None,
            PrimaryKind::GameCube { polling_rate } => Some((Console::GameCube, polling_rate)),
            PrimaryKind::N64 { polling_rate } => Some((Console::N64, polling_rate)),
        }
    }
}

/// Backends and mode to build for this power cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootPlan {
    pub primary: PrimaryKind,
    /// Attach the input viewer as a secondary backend.
    pub viewer: bool,
    /// Allow the mode selector to turn on keyboard reports.
    pub keyboard_available: bool,
    pub default_mode: ModeKind,
}

/// `start` held at power-on asks for the bootloader, on boards that allow it.
#[must_use]
pub fn wants_bootloader(holds: &InputState, options: &BootOptions) -> bool {
    options.bootloader_hold && holds.start
}

/// Level to drive the passthrough mux, or `None` if the board has none.
#[must_use]
pub fn mux_level(holds: &InputState, pinout: &Pinout) -> Option<bool> {
    pinout.mux.map(|_| holds.b)
}

/// Pick the backends from the power-on holds and host detection result.
#[must_use]
pub fn plan_boot(holds: &InputState, usb_present: bool, options: &BootOptions) -> BootPlan {
    if usb_present {
        return BootPlan {
            primary: PrimaryKind::DInput,
            viewer: true,
            keyboard_available: true,
            default_mode: options.default_mode,
        };
    }

    let primary = if holds.c_left {
        PrimaryKind::N64 {
            polling_rate: options.n64_polling_rate,
        }
    } else if holds.a {
        PrimaryKind::GameCube {
            polling_rate: options.adapter_polling_rate,
        }
    } else {
        PrimaryKind::GameCube {
            polling_rate: options.gamecube_polling_rate,
        }
    };

    BootPlan {
        primary,
        viewer: false,
        keyboard_available: false,
        default_mode: options.default_mode,
    }
}
