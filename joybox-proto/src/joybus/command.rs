//! Host command decoding.

use crate::joybus::JoybusError;

/// Console whose controller is emulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Console {
    GameCube,
    N64,
}

/// Decoded host command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Identify the device.
    Info,
    /// Reset the controller; answered like `Info`.
    Reset,
    /// Request the neutral origin (GameCube only).
    Origin,
    /// Recalibrate and return the origin (GameCube only).
    Recalibrate,
    /// Request the current button and axis state.
    Poll { mode: u8, rumble: bool },
}

const CMD_INFO: u8 = 0x00;
const CMD_RESET: u8 = 0xFF;
const CMD_N64_POLL: u8 = 0x01;
const CMD_GC_POLL: u8 = 0x40;
const CMD_GC_ORIGIN: u8 = 0x41;
const CMD_GC_RECALIBRATE: u8 = 0x42;

/// Longest command either console sends that this device answers.
pub const MAX_COMMAND_LEN: usize = 3;

impl Console {
    /// Number of bytes (excluding the stop bit) in a command starting with `first`.
    ///
    /// Returns `None` for commands this device does not answer.
    #[must_use]
    pub fn command_len(self, first: u8) -> Option<usize> {
        match (self, first) {
            (_, CMD_INFO | CMD_RESET) => Some(1),
            (Console::GameCube, CMD_GC_ORIGIN | CMD_GC_RECALIBRATE) => Some(1),
            (Console::GameCube, CMD_GC_POLL) => Some(3),
            (Console::N64, CMD_N64_POLL) => Some(1),
            _ => None,
        }
    }

    /// Decode a complete command.
    pub fn decode(self, bytes: &[u8]) -> Result<Command, JoybusError> {
        let first = *bytes.first().ok_or(JoybusError::Truncated)?;
        match self.command_len(first) {
            None => return Err(JoybusError::UnknownCommand(first)),
            Some(len) if len != bytes.len() => return Err(JoybusError::Truncated),
            Some(_) => {}
        }
        let command = match (self, first) {
            (_, CMD_INFO) => Command::Info,
            (_, CMD_RESET) => Command::Reset,
            (Console::GameCube, CMD_GC_ORIGIN) => Command::Origin,
            (Console::GameCube, CMD_GC_RECALIBRATE) => Command::Recalibrate,
            (Console::GameCube, CMD_GC_POLL) => Command::Poll {
                mode: bytes[1],
                rumble: bytes[2] & 0x01 != 0,
            },
            (Console::N64, CMD_N64_POLL) => Command::Poll {
                mode: 0,
                rumble: false,
            },
            _ => return Err(JoybusError::UnknownCommand(first)),
        };
        Ok(command)
    }
}
