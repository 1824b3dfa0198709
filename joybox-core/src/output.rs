//! Output sink traits and error types.

use core::future::Future;

use joybox_proto::{InputState, JoybusError, KeyboardReport, OutputState};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
    /// Report dropped (e.g., host not polling fast enough).
    Dropped,
    /// Endpoint busy.
    Busy,
    /// The console did not poll within the receive window.
    Timeout,
    /// A Joybus exchange was aborted.
    Joybus(JoybusError),
}

impl From<JoybusError> for OutputError {
    fn from(err: JoybusError) -> Self {
        match err {
            JoybusError::NoCommand => OutputError::Timeout,
            other => OutputError::Joybus(other),
        }
    }
}

/// Everything a backend may encode for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report<'a> {
    /// Raw aggregated snapshot, before SOCD cleaning.
    pub inputs: &'a InputState,
    /// Game-mode output; `None` for backends without a game mode.
    pub outputs: Option<&'a OutputState>,
}

impl Report<'_> {
    /// Game-mode output, or a neutral state if there is none.
    #[must_use]
    pub fn outputs_or_neutral(&self) -> OutputState {
        self.outputs.copied().unwrap_or_else(OutputState::neutral)
    }
}

/// Async trait for protocol output paths.
///
/// This trait abstracts the wire side of a backend (Joybus line, USB HID
/// endpoint, diagnostic serial link) so the frame loop can drive any of them.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait OutputSink {
    /// Encode and transmit one frame.
    ///
    /// Must complete in bounded time; a peripheral that is not ready drops the
    /// report and returns an error instead of waiting.
    fn send(&mut self, report: &Report<'_>) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the output is ready to accept data.
    fn is_ready(&self) -> bool;
}

/// Async trait for the keyboard side channel.
pub trait KeyboardSink {
    /// Transmit one boot-keyboard report.
    fn send_keys(
        &mut self,
        report: &KeyboardReport,
    ) -> impl Future<Output = Result<(), OutputError>>;
}

/// Sink for an absent backend slot; accepts and discards everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullSink;

impl OutputSink for NullSink {
    async fn send(&mut self, _report: &Report<'_>) -> Result<(), OutputError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}

impl KeyboardSink for NullSink {
    async fn send_keys(&mut self, _report: &KeyboardReport) -> Result<(), OutputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_maps_to_timeout() {
        assert_eq!(OutputError::from(JoybusError::NoCommand), OutputError::Timeout);
        assert_eq!(
            OutputError::from(JoybusError::Glitch),
            OutputError::Joybus(JoybusError::Glitch)
        );
    }

    #[test]
    fn test_missing_outputs_are_neutral() {
        let inputs = InputState::neutral();
        let report = Report {
            inputs: &inputs,
            outputs: None,
        };
        assert_eq!(report.outputs_or_neutral(), OutputState::neutral());
    }
}
