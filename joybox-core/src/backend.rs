//! CommunicationBackend: one protocol output path and its game mode.

use joybox_proto::{InputState, OutputState};

use crate::modes::{AnyGameMode, GameMode};
use crate::output::{OutputError, OutputSink, Report};

/// A protocol output path.
///
/// The primary backend owns the active game mode. Secondary (diagnostic)
/// backends are built without one and forward the raw snapshot only.
///
/// # Error Handling
///
/// Sink errors are returned to the caller but never leave the backend in a
/// half-updated state: the snapshot and outputs of the frame are recorded
/// before transmission is attempted.
pub struct CommunicationBackend<O> {
    sink: O,
    mode: Option<AnyGameMode>,
    last_inputs: InputState,
    last_outputs: Option<OutputState>,
}

impl<O: OutputSink> CommunicationBackend<O> {
    /// Create a backend without a game mode.
    pub fn new(sink: O) -> Self {
        Self {
            sink,
            mode: None,
            last_inputs: InputState::neutral(),
            last_outputs: None,
        }
    }

    /// Create a backend that owns `mode`.
    pub fn with_mode(sink: O, mode: AnyGameMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::new(sink)
        }
    }

    /// Install a new game mode, returning the one it replaces.
    ///
    /// The new mode starts with empty SOCD memory.
    pub fn set_game_mode(&mut self, mode: AnyGameMode) -> Option<AnyGameMode> {
        self.mode.replace(mode)
    }

    /// The active game mode, if any.
    pub fn game_mode(&self) -> Option<&AnyGameMode> {
        self.mode.as_ref()
    }

    /// Last aggregated snapshot, before SOCD cleaning.
    pub fn get_inputs(&self) -> &InputState {
        &self.last_inputs
    }

    /// Outputs produced by the game mode for the last frame.
    pub fn last_outputs(&self) -> Option<&OutputState> {
        self.last_outputs.as_ref()
    }

    /// Apply the game mode to `inputs` and transmit the result.
    pub async fn send_report(&mut self, inputs: &InputState) -> Result<(), OutputError> {
        self.last_inputs = *inputs;
        self.last_outputs = self.mode.as_mut().map(|mode| mode.update_outputs(inputs));

        let report = Report {
            inputs: &self.last_inputs,
            outputs: self.last_outputs.as_ref(),
        };
        self.sink.send(&report).await
    }

    /// Get a reference to the output sink.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Get a mutable reference to the output sink.
    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }
}
