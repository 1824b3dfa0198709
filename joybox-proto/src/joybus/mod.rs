//! Joybus controller protocol (GameCube and N64).
//!
//! - [`command`]: host command decoding
//! - [`report`]: response payloads built from an [`OutputState`](crate::OutputState)
//! - [`line`]: bit-level timing over a single open-drain line
//! - [`exchange`]: one command/response round trip

pub mod command;
pub mod exchange;
pub mod line;
pub mod report;
pub mod timing;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use command::{Command, Console};
pub use exchange::{ExchangeState, JoybusSlave};
pub use line::{JoybusClock, JoybusLine};
pub use report::{GameCubeReport, N64Report, Response};

/// Error type for a Joybus exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoybusError {
    /// The host sent nothing within the receive window.
    NoCommand,
    /// The host went quiet in the middle of a command.
    Timeout,
    /// A low pulse shorter than the minimum valid width.
    Glitch,
    /// The line stayed low longer than any valid bit.
    LineStuck,
    /// The command did not end with a short stop bit.
    BadStopBit,
    /// First command byte this device does not answer.
    UnknownCommand(u8),
    /// Command shorter or longer than its opcode requires.
    Truncated,
}

impl core::fmt::Display for JoybusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoCommand => write!(f, "no command"),
            Self::Timeout => write!(f, "timeout inside command"),
            Self::Glitch => write!(f, "glitch on line"),
            Self::LineStuck => write!(f, "line stuck low"),
            Self::BadStopBit => write!(f, "bad stop bit"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command 0x{cmd:02x}"),
            Self::Truncated => write!(f, "truncated command"),
        }
    }
}
