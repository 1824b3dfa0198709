//! Controller side of one Joybus command/response round trip.

use crate::joybus::command::{Command, Console};
use crate::joybus::line::{receive_command, settle, transmit, JoybusClock, JoybusLine};
use crate::joybus::JoybusError;
use crate::types::OutputState;

/// Where the exchange state machine currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExchangeState {
    /// Waiting for the host to start a command.
    Idle,
    /// Decoding host bits.
    Receive,
    /// Driving the response.
    Respond,
}

/// Emulated controller on a Joybus line.
#[derive(Debug)]
pub struct JoybusSlave {
    console: Console,
    state: ExchangeState,
    rumble: bool,
    polls: u32,
    faults: u32,
}

impl JoybusSlave {
    #[must_use]
    pub const fn new(console: Console) -> Self {
        Self {
            console,
            state: ExchangeState::Idle,
            rumble: false,
            polls: 0,
            faults: 0,
        }
    }

    #[must_use]
    pub fn console(&self) -> Console {
        self.console
    }

    #[must_use]
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Rumble bit from the most recent poll.
    #[must_use]
    pub fn rumble(&self) -> bool {
        self.rumble
    }

    /// Number of polls answered.
    #[must_use]
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Number of aborted exchanges (glitches, bad commands, stuck line).
    #[must_use]
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Serve one host command within `window_ns`, answering with `out`.
    ///
    /// Any error aborts the exchange without sending anything: the line is
    /// left to settle and the machine returns to [`ExchangeState::Idle`].
    pub fn serve<P>(
        &mut self,
        port: &mut P,
        window_ns: u32,
        out: &OutputState,
    ) -> Result<Command, JoybusError>
    where
        P: JoybusLine + JoybusClock,
    {
        self.state = ExchangeState::Receive;
        let result = self.exchange(port, window_ns, out);
        match result {
            Ok(Command::Poll { rumble, .. }) => {
                self.rumble = rumble;
                self.polls = self.polls.wrapping_add(1);
            }
            Ok(_) | Err(JoybusError::NoCommand) => {}
            Err(_) => {
                self.faults = self.faults.wrapping_add(1);
                settle(port);
            }
        }
        self.state = ExchangeState::Idle;
        result
    }

    fn exchange<P>(
        &mut self,
        port: &mut P,
        window_ns: u32,
        out: &OutputState,
    ) -> Result<Command, JoybusError>
    where
        P: JoybusLine + JoybusClock,
    {
        let (command, stop) = receive_command(port, self.console, window_ns)?;
        self.state = ExchangeState::Respond;
        let response = self.console.respond(command, out);
        if !response.is_empty() {
            transmit(port, stop, &response);
        }
        Ok(command)
    }
}
