//! Runtime: the per-frame loop tying input sources to backends.

use embassy_futures::yield_now;
use joybox_proto::{InputState, KeyboardReport};

use crate::backend::CommunicationBackend;
use crate::input::{aggregate, InputSource};
use crate::mode_select::{ModeAction, ModeSelector};
use crate::modes::KeyboardMode;
use crate::output::{KeyboardSink, NullSink, OutputError, OutputSink};

/// Owns every piece of per-run state: the input sources, the primary backend
/// with the active game mode, an optional diagnostic backend and the keyboard
/// side channel.
///
/// Each frame runs in a fixed order: mode selection, one aggregation of all
/// sources, then the primary backend, the secondary backend and the keyboard
/// channel, all fed from the same snapshot.
///
/// # Error Handling
///
/// A failing backend does not stop the others from being served in the same
/// frame. [`Runtime::run_frame`] reports the first failure;
/// [`Runtime::run`] drops it and moves on to the next frame.
///
/// Sinks that are not ready fail without awaiting anything, so a frame with
/// an error yields to the executor once before returning. Other tasks on the
/// same executor (the USB stack in particular) keep running while no host is
/// attached.
pub struct Runtime<S, P, V = NullSink, K = NullSink> {
    sources: S,
    primary: CommunicationBackend<P>,
    secondary: Option<CommunicationBackend<V>>,
    keyboard_sink: Option<K>,
    keyboard_mode: Option<KeyboardMode>,
    /// An all-released report is owed to the host after keyboard mode ends.
    release_keys: bool,
    selector: ModeSelector,
    frames: u32,
}

impl<S: InputSource, P: OutputSink> Runtime<S, P> {
    /// Create a runtime with a primary backend only.
    pub fn new(sources: S, primary: CommunicationBackend<P>) -> Self {
        Self {
            sources,
            primary,
            secondary: None,
            keyboard_sink: None,
            keyboard_mode: None,
            release_keys: false,
            selector: ModeSelector::new(),
            frames: 0,
        }
    }
}

impl<S, P, V, K> Runtime<S, P, V, K>
where
    S: InputSource,
    P: OutputSink,
    V: OutputSink,
    K: KeyboardSink,
{
    /// Attach a diagnostic backend sharing the same sources.
    pub fn with_secondary<V2: OutputSink>(
        self,
        secondary: CommunicationBackend<V2>,
    ) -> Runtime<S, P, V2, K> {
        Runtime {
            sources: self.sources,
            primary: self.primary,
            secondary: Some(secondary),
            keyboard_sink: self.keyboard_sink,
            keyboard_mode: self.keyboard_mode,
            release_keys: self.release_keys,
            selector: self.selector,
            frames: self.frames,
        }
    }

    /// Make the keyboard side channel available. It stays off until the
    /// mode selector turns it on.
    pub fn with_keyboard<K2: KeyboardSink>(self, sink: K2) -> Runtime<S, P, V, K2> {
        Runtime {
            sources: self.sources,
            primary: self.primary,
            secondary: self.secondary,
            keyboard_sink: Some(sink),
            keyboard_mode: self.keyboard_mode,
            release_keys: self.release_keys,
            selector: self.selector,
            frames: self.frames,
        }
    }

    /// Run the frame loop forever.
    ///
    /// This method never returns under normal operation.
    pub async fn run(&mut self) -> ! {
        loop {
            let result = self.run_frame().await;
            #[cfg(feature = "defmt")]
            if let Err(e) = result {
                defmt::trace!("frame {}: {}", self.frames, e);
            }
            #[cfg(not(feature = "defmt"))]
            let _ = result;
        }
    }

    /// Run a single frame.
    ///
    /// Returns the first backend error for testing purposes.
    pub async fn run_frame(&mut self) -> Result<(), BackendError> {
        // Mode selection looks at the previous frame's snapshot
        if let Some(action) = self.selector.select(self.primary.get_inputs()) {
            self.apply(action);
        }

        let inputs = aggregate(&mut self.sources);
        self.frames = self.frames.wrapping_add(1);

        let primary = self
            .primary
            .send_report(&inputs)
            .await
            .map_err(BackendError::Primary);

        let secondary = match self.secondary.as_mut() {
            Some(backend) => backend
                .send_report(&inputs)
                .await
                .map_err(BackendError::Secondary),
            None => Ok(()),
        };

        let keyboard = match (self.keyboard_sink.as_mut(), self.keyboard_mode.as_ref()) {
            (Some(sink), Some(mode)) => sink
                .send_keys(&mode.report(self.primary.get_inputs()))
                .await
                .map_err(BackendError::Keyboard),
            (Some(sink), None) if self.release_keys => {
                let result = sink.send_keys(&KeyboardReport::default()).await;
                // Retried next frame until the host has taken it
                self.release_keys = result.is_err();
                result.map_err(BackendError::Keyboard)
            }
            _ => Ok(()),
        };

        let result = primary.and(secondary).and(keyboard);
        if result.is_err() {
            yield_now().await;
        }
        result
    }

    fn apply(&mut self, action: ModeAction) {
        match action {
            ModeAction::SetMode(kind) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Game mode: {}", kind);
                self.primary.set_game_mode(kind.build());
            }
            ModeAction::KeyboardOn if self.keyboard_sink.is_some() => {
                self.keyboard_mode = Some(KeyboardMode::default());
                self.release_keys = false;
            }
            ModeAction::KeyboardOn => {}
            ModeAction::KeyboardOff => {
                if self.keyboard_mode.take().is_some() {
                    self.release_keys = true;
                }
            }
        }
    }

    /// Frames run since boot.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Whether keyboard reports are currently sent.
    pub fn keyboard_active(&self) -> bool {
        self.keyboard_mode.is_some()
    }

    /// Last snapshot seen by the primary backend.
    pub fn last_inputs(&self) -> &InputState {
        self.primary.get_inputs()
    }

    pub fn primary(&self) -> &CommunicationBackend<P> {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut CommunicationBackend<P> {
        &mut self.primary
    }

    pub fn secondary(&self) -> Option<&CommunicationBackend<V>> {
        self.secondary.as_ref()
    }

    pub fn keyboard_sink(&self) -> Option<&K> {
        self.keyboard_sink.as_ref()
    }

    pub fn keyboard_sink_mut(&mut self) -> Option<&mut K> {
        self.keyboard_sink.as_mut()
    }

    /// Get a mutable reference to the input sources.
    pub fn sources_mut(&mut self) -> &mut S {
        &mut self.sources
    }
}

/// Error type for a frame, tagged with the channel that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackendError {
    /// Error from the primary backend.
    Primary(OutputError),
    /// Error from the diagnostic backend.
    Secondary(OutputError),
    /// Error from the keyboard side channel.
    Keyboard(OutputError),
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::modes::{GameMode, ModeKind};
    use crate::output::Report;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use embassy_futures::block_on;
    use joybox_proto::{InputField, OutputState};
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Plays back a script of held fields and counts how often it is read.
    #[derive(Default)]
    struct ScriptedInput {
        frames: VecDeque<Vec<InputField>>,
        reads: usize,
    }

    impl ScriptedInput {
        fn new(frames: &[&[InputField]]) -> Self {
            Self {
                frames: frames.iter().map(|f| f.to_vec()).collect(),
                reads: 0,
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn update_inputs(&mut self, inputs: &mut InputState) {
            self.reads += 1;
            for field in self.frames.pop_front().unwrap_or_default() {
                inputs.set(field, true);
            }
        }
    }

    #[derive(Default)]
    struct MockOutput {
        sent: Vec<(InputState, Option<OutputState>)>,
        fail: Option<OutputError>,
    }

    impl OutputSink for MockOutput {
        async fn send(&mut self, report: &Report<'_>) -> Result<(), OutputError> {
            self.sent.push((*report.inputs, report.outputs.copied()));
            self.fail.map_or(Ok(()), Err)
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct MockKeyboard {
        sent: Vec<KeyboardReport>,
        fail: Option<OutputError>,
    }

    impl KeyboardSink for MockKeyboard {
        async fn send_keys(&mut self, report: &KeyboardReport) -> Result<(), OutputError> {
            if let Some(err) = self.fail {
                return Err(err);
            }
            self.sent.push(*report);
            Ok(())
        }
    }

    fn noop_waker() -> Waker {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn melee_backend() -> CommunicationBackend<MockOutput> {
        CommunicationBackend::with_mode(MockOutput::default(), ModeKind::Melee.build())
    }

    #[test]
    fn test_one_aggregation_shared_by_all_backends() {
        let sources = ScriptedInput::new(&[&[InputField::Right, InputField::A]]);
        let mut runtime = Runtime::new(sources, melee_backend())
            .with_secondary(CommunicationBackend::new(MockOutput::default()));

        block_on(runtime.run_frame()).unwrap();

        assert_eq!(runtime.sources_mut().reads, 1);
        let primary = &runtime.primary().sink().sent;
        let secondary = &runtime.secondary().unwrap().sink().sent;
        assert_eq!(primary.len(), 1);
        assert_eq!(secondary.len(), 1);
        assert_eq!(primary[0].0, secondary[0].0);
        assert!(primary[0].1.is_some());
        assert!(secondary[0].1.is_none());
    }

    #[test]
    fn test_unwritten_fields_reset_each_frame() {
        let sources = ScriptedInput::new(&[&[InputField::B], &[]]);
        let mut runtime = Runtime::new(sources, melee_backend());
        block_on(runtime.run_frame()).unwrap();
        assert!(runtime.last_inputs().b);
        block_on(runtime.run_frame()).unwrap();
        assert_eq!(runtime.last_inputs(), &InputState::neutral());
        assert_eq!(runtime.frames(), 2);
    }

    #[test]
    fn test_mode_swap_applies_next_frame() {
        let combo: &[InputField] = &[InputField::ModX, InputField::Start, InputField::Left];
        let sources = ScriptedInput::new(&[combo, &[InputField::Right]]);
        let mut runtime = Runtime::new(sources, melee_backend());

        block_on(runtime.run_frame()).unwrap();
        assert_eq!(
            runtime.primary().game_mode().map(|m| m.kind()),
            Some(ModeKind::Melee)
        );

        block_on(runtime.run_frame()).unwrap();
        assert_eq!(
            runtime.primary().game_mode().map(|m| m.kind()),
            Some(ModeKind::Rivals2)
        );
        // Full right in Rivals 2 is 128 + 100
        let outputs = runtime.primary().last_outputs().unwrap();
        assert_eq!(outputs.left_stick_x, 228);
    }

    #[test]
    fn test_keyboard_toggle() {
        let on: &[InputField] = &[InputField::ModY, InputField::Start, InputField::L];
        let off: &[InputField] = &[InputField::ModY, InputField::Start, InputField::Left];
        let sources = ScriptedInput::new(&[on, &[InputField::Left], off, &[]]);
        let mut runtime = Runtime::new(sources, melee_backend()).with_keyboard(MockKeyboard::default());

        block_on(runtime.run_frame()).unwrap();
        assert!(!runtime.keyboard_active());
        block_on(runtime.run_frame()).unwrap();
        assert!(runtime.keyboard_active());
        block_on(runtime.run_frame()).unwrap();
        block_on(runtime.run_frame()).unwrap();
        assert!(!runtime.keyboard_active());

        let sent = &runtime.keyboard_sink().unwrap().sent;
        assert_eq!(sent.len(), 3);
        assert!(sent[..2]
            .iter()
            .all(|report| report.keys.iter().any(|k| *k != 0)));
        // The off combination itself was reported held; the host must see it released
        assert_eq!(sent[2], KeyboardReport::default());

        block_on(runtime.run_frame()).unwrap();
        assert_eq!(runtime.keyboard_sink().unwrap().sent.len(), 3);
    }

    #[test]
    fn test_keyboard_release_retried_until_sent() {
        let on: &[InputField] = &[InputField::ModY, InputField::Start, InputField::L];
        let off: &[InputField] = &[InputField::ModY, InputField::Start, InputField::Left];
        let sources = ScriptedInput::new(&[on, off, &[], &[]]);
        let mut runtime = Runtime::new(sources, melee_backend()).with_keyboard(MockKeyboard::default());

        block_on(runtime.run_frame()).unwrap();
        block_on(runtime.run_frame()).unwrap();
        assert!(runtime.keyboard_active());

        runtime.keyboard_sink_mut().unwrap().fail = Some(OutputError::NotReady);
        assert_eq!(
            block_on(runtime.run_frame()),
            Err(BackendError::Keyboard(OutputError::NotReady))
        );
        assert!(!runtime.keyboard_active());

        runtime.keyboard_sink_mut().unwrap().fail = None;
        block_on(runtime.run_frame()).unwrap();
        let sent = &runtime.keyboard_sink().unwrap().sent;
        assert_eq!(sent.last(), Some(&KeyboardReport::default()));
    }

    #[test]
    fn test_not_ready_frame_yields_to_executor() {
        let primary = CommunicationBackend::with_mode(
            MockOutput {
                fail: Some(OutputError::NotReady),
                ..MockOutput::default()
            },
            ModeKind::Melee.build(),
        );
        let secondary = CommunicationBackend::new(MockOutput {
            fail: Some(OutputError::NotReady),
            ..MockOutput::default()
        });
        let mut runtime = Runtime::new(ScriptedInput::default(), primary).with_secondary(secondary);

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut frame = pin!(runtime.run_frame());
        assert!(frame.as_mut().poll(&mut cx).is_pending());
        assert_eq!(
            frame.as_mut().poll(&mut cx),
            Poll::Ready(Err(BackendError::Primary(OutputError::NotReady)))
        );
    }

    #[test]
    fn test_good_frame_does_not_yield() {
        let mut runtime = Runtime::new(ScriptedInput::default(), melee_backend());
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut frame = pin!(runtime.run_frame());
        assert_eq!(frame.as_mut().poll(&mut cx), Poll::Ready(Ok(())));
    }

    #[test]
    fn test_keyboard_requires_sink() {
        let on: &[InputField] = &[InputField::ModY, InputField::Start, InputField::L];
        let sources = ScriptedInput::new(&[on, &[]]);
        let mut runtime = Runtime::new(sources, melee_backend());
        block_on(runtime.run_frame()).unwrap();
        block_on(runtime.run_frame()).unwrap();
        assert!(!runtime.keyboard_active());
    }

    #[test]
    fn test_primary_error_does_not_starve_secondary() {
        let sources = ScriptedInput::new(&[&[InputField::A]]);
        let primary = CommunicationBackend::with_mode(
            MockOutput {
                fail: Some(OutputError::Timeout),
                ..MockOutput::default()
            },
            ModeKind::Melee.build(),
        );
        let mut runtime = Runtime::new(sources, primary)
            .with_secondary(CommunicationBackend::new(MockOutput::default()));

        assert_eq!(
            block_on(runtime.run_frame()),
            Err(BackendError::Primary(OutputError::Timeout))
        );
        assert_eq!(runtime.secondary().unwrap().sink().sent.len(), 1);
    }
}
