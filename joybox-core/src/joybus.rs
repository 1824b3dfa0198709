//! Joybus backend output: GameCube and N64 console emulation.
//!
//! The console polls the controller at a fixed rate. Once the first poll of a
//! run has been answered, the sink sleeps through most of the poll period so
//! that the next frame's inputs are scanned shortly before the next poll
//! arrives, keeping input latency low.
//!
//! # Timing
//!
//! | State | Receive window |
//! |-------|----------------|
//! | not synchronised, rate `r` | one poll period + [`SYNC_SLACK_US`] |
//! | not synchronised, adapter | [`UNSYNCED_WINDOW_US`] |
//! | synchronised, rate `r` | [`SCAN_LEAD_US`] + [`SYNC_SLACK_US`] |
//! | synchronised, adapter | [`ADAPTER_WINDOW_US`] |
//!
//! Any failed exchange drops synchronisation.
//!
//! The wait for a command is split into slices of at most
//! [`CRITICAL_SLICE_US`], each run through [`JoybusPort::critical`], so
//! interrupts are never held off for a whole receive window.

use embedded_hal_async::delay::DelayNs;
use joybox_proto::joybus::line::{JoybusClock, JoybusLine};
use joybox_proto::{Command, Console, JoybusError, JoybusSlave, OutputState};

use crate::output::{OutputError, OutputSink, Report};

/// Time reserved before an expected poll for scanning and remapping inputs.
pub const SCAN_LEAD_US: u32 = 400;

/// Approximate duration of one poll and its response on the wire.
pub const EXCHANGE_US: u32 = 350;

/// Extra time a synchronised receive window stays open.
pub const SYNC_SLACK_US: u32 = 600;

/// Receive window in adapter mode once synchronised.
pub const ADAPTER_WINDOW_US: u32 = 1_500;

/// Receive window in adapter mode before the first poll.
pub const UNSYNCED_WINDOW_US: u32 = 20_000;

/// Longest wait for a command spent inside one critical section.
pub const CRITICAL_SLICE_US: u32 = 1_000;

/// Joybus line with a way to run timing-critical code uninterrupted.
pub trait JoybusPort: JoybusLine + JoybusClock {
    /// Run `f` with nothing else allowed to preempt it.
    ///
    /// The default runs `f` directly; platforms with interrupts override it.
    fn critical<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        f(self)
    }
}

/// Receive-window and idle-delay planning for a given polling rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSchedule {
    period_us: Option<u32>,
    synced: bool,
}

impl PollSchedule {
    /// Schedule for a console polling at `polling_rate_hz` (0 = adapter mode,
    /// answer as fast as polls arrive).
    #[must_use]
    pub const fn new(polling_rate_hz: u32) -> Self {
        let period_us = if polling_rate_hz == 0 {
            None
        } else {
            Some(1_000_000 / polling_rate_hz)
        };
        Self {
            period_us,
            synced: false,
        }
    }

    /// Expected time between polls, or `None` in adapter mode.
    #[must_use]
    pub fn period_us(&self) -> Option<u32> {
        self.period_us
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// How long the next exchange waits for a command.
    #[must_use]
    pub fn window_ns(&self) -> u32 {
        let us = match (self.synced, self.period_us) {
            (false, Some(period)) => period + SYNC_SLACK_US,
            (false, None) => UNSYNCED_WINDOW_US,
            (true, Some(_)) => SCAN_LEAD_US + SYNC_SLACK_US,
            (true, None) => ADAPTER_WINDOW_US,
        };
        us * 1_000
    }

    /// Record an answered poll; returns how long to idle before scanning
    /// inputs for the next one.
    pub fn on_poll(&mut self) -> u32 {
        self.synced = true;
        self.period_us
            .map_or(0, |period| period.saturating_sub(SCAN_LEAD_US + EXCHANGE_US))
    }

    /// Record a missed or aborted exchange.
    pub fn on_miss(&mut self) {
        self.synced = false;
    }
}

/// Output sink that answers console polls on a Joybus line.
pub struct JoybusOutput<P, D> {
    port: P,
    delay: D,
    slave: JoybusSlave,
    schedule: PollSchedule,
}

impl<P: JoybusPort, D: DelayNs> JoybusOutput<P, D> {
    /// Create a sink emulating a `console` controller polled at
    /// `polling_rate_hz`.
    pub fn new(port: P, delay: D, console: Console, polling_rate_hz: u32) -> Self {
        Self {
            port,
            delay,
            slave: JoybusSlave::new(console),
            schedule: PollSchedule::new(polling_rate_hz),
        }
    }

    /// Exchange state machine and its counters.
    pub fn slave(&self) -> &JoybusSlave {
        &self.slave
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    /// Get a mutable reference to the line.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Serve one command within the schedule's window, one critical slice at
    /// a time. Only a silent slice moves on to the next; anything else ends
    /// the exchange.
    fn serve_window(&mut self, outputs: &OutputState) -> Result<Command, JoybusError> {
        let slice_ns = CRITICAL_SLICE_US * 1_000;
        let mut remaining_ns = self.schedule.window_ns();
        loop {
            let window_ns = remaining_ns.min(slice_ns);
            let slave = &mut self.slave;
            let result = self
                .port
                .critical(|port| slave.serve(port, window_ns, outputs));
            remaining_ns -= window_ns;
            match result {
                Err(JoybusError::NoCommand) if remaining_ns > 0 => continue,
                result => return result,
            }
        }
    }
}

impl<P: JoybusPort, D: DelayNs> OutputSink for JoybusOutput<P, D> {
    async fn send(&mut self, report: &Report<'_>) -> Result<(), OutputError> {
        let outputs = report.outputs_or_neutral();
        let result = self.serve_window(&outputs);

        match result {
            Ok(Command::Poll { .. }) => {
                let idle_us = self.schedule.on_poll();
                if idle_us > 0 {
                    self.delay.delay_us(idle_us).await;
                }
                Ok(())
            }
            // Info and origin requests come in bursts; stay ready for the next one
            Ok(_) => Ok(()),
            Err(err) => {
                self.schedule.on_miss();
                Err(err.into())
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.schedule.is_synced()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_futures::block_on;
    use joybox_proto::joybus::line::ticks;
    use joybox_proto::joybus::sim::SimPort;
    use joybox_proto::{GameCubeReport, InputState};

    impl JoybusPort for SimPort {}

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
        /// Slept but not yet applied to the sim clock.
        pending_ns: u32,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.pending_ns += ns;
        }
    }

    /// Move the sim clock forward by whatever the sink slept since last time.
    fn sleep_through(sink: &mut JoybusOutput<SimPort, MockDelay>) -> u32 {
        let ns = core::mem::take(&mut sink.delay.pending_ns);
        let port = sink.port_mut();
        port.t += ticks::<SimPort>(ns);
        port.t
    }

    const POLL: [u8; 3] = [0x40, 0x03, 0x00];

    fn send(
        sink: &mut JoybusOutput<SimPort, MockDelay>,
        outputs: &OutputState,
    ) -> Result<(), OutputError> {
        let inputs = InputState::neutral();
        block_on(sink.send(&Report {
            inputs: &inputs,
            outputs: Some(outputs),
        }))
    }

    fn pressed() -> OutputState {
        OutputState {
            b: true,
            left_stick_y: 40,
            ..OutputState::neutral()
        }
    }

    #[test]
    fn test_schedule_windows() {
        let mut schedule = PollSchedule::new(125);
        assert_eq!(schedule.period_us(), Some(8_000));
        assert_eq!(schedule.window_ns(), (8_000 + SYNC_SLACK_US) * 1_000);
        assert_eq!(schedule.on_poll(), 8_000 - SCAN_LEAD_US - EXCHANGE_US);
        assert_eq!(schedule.window_ns(), (SCAN_LEAD_US + SYNC_SLACK_US) * 1_000);
        schedule.on_miss();
        assert!(!schedule.is_synced());

        let mut adapter = PollSchedule::new(0);
        assert_eq!(adapter.window_ns(), UNSYNCED_WINDOW_US * 1_000);
        assert_eq!(adapter.on_poll(), 0);
        assert_eq!(adapter.window_ns(), ADAPTER_WINDOW_US * 1_000);
    }

    #[test]
    fn test_poll_answered_then_idle() {
        let mut port = SimPort::new();
        port.host_sends(100, &POLL);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::GameCube, 125);

        send(&mut sink, &pressed()).unwrap();

        assert_eq!(
            sink.port_mut().device_bytes(),
            GameCubeReport::from(&pressed()).as_bytes().to_vec()
        );
        assert!(sink.is_ready());
        assert_eq!(sink.slave().polls(), 1);
        assert_eq!(
            sink.delay.total_ns,
            u64::from(8_000 - SCAN_LEAD_US - EXCHANGE_US) * 1_000
        );
    }

    #[test]
    fn test_next_poll_lands_in_synced_window() {
        let period = ticks::<SimPort>(8_000 * 1_000);
        let first = 100;
        let second = first + period;
        let third = second + period;
        let mut port = SimPort::new();
        port.host_sends(first, &POLL);
        port.host_sends(second, &POLL);
        port.host_sends(third, &POLL);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::GameCube, 125);

        send(&mut sink, &pressed()).unwrap();
        let woke = sleep_through(&mut sink);
        assert!(woke < second);
        assert!(second - woke < ticks::<SimPort>(sink.schedule().window_ns()));

        send(&mut sink, &pressed()).unwrap();
        let woke = sleep_through(&mut sink);
        assert!(woke < third);

        send(&mut sink, &pressed()).unwrap();
        assert_eq!(sink.slave().polls(), 3);
        assert_eq!(sink.slave().faults(), 0);
        assert!(sink.is_ready());
        // Three full GameCube payloads, each with its stop bit
        assert_eq!(
            sink.port_mut().device_pulses().len(),
            3 * (GameCubeReport::SIZE * 8 + 1)
        );
    }

    #[test]
    fn test_poll_after_first_slice_answered() {
        let mut port = SimPort::new();
        // Well past one critical slice, inside the unsynchronised window
        port.host_sends(ticks::<SimPort>(CRITICAL_SLICE_US * 2_500), &POLL);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::GameCube, 125);

        send(&mut sink, &pressed()).unwrap();
        assert_eq!(sink.slave().polls(), 1);
        assert_eq!(sink.slave().faults(), 0);
    }

    #[test]
    fn test_silent_window_spans_every_slice() {
        let mut sink =
            JoybusOutput::new(SimPort::new(), MockDelay::default(), Console::GameCube, 0);
        assert_eq!(send(&mut sink, &pressed()), Err(OutputError::Timeout));
        // The whole adapter window was waited out, not just one slice
        assert!(sink.port_mut().t >= ticks::<SimPort>(UNSYNCED_WINDOW_US * 1_000));
    }

    #[test]
    fn test_adapter_mode_never_idles() {
        let mut port = SimPort::new();
        port.host_sends(100, &[0x40, 0x03, 0x00]);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::GameCube, 0);
        send(&mut sink, &pressed()).unwrap();
        assert_eq!(sink.delay.total_ns, 0);
    }

    #[test]
    fn test_silent_console_times_out() {
        let mut sink =
            JoybusOutput::new(SimPort::new(), MockDelay::default(), Console::N64, 60);
        assert_eq!(send(&mut sink, &pressed()), Err(OutputError::Timeout));
        assert!(!sink.is_ready());
        assert_eq!(sink.delay.total_ns, 0);
    }

    #[test]
    fn test_glitch_drops_sync() {
        let mut port = SimPort::new();
        port.host_sends(100, &[0x40, 0x03, 0x00]);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::GameCube, 125);
        send(&mut sink, &pressed()).unwrap();
        assert!(sink.is_ready());

        let start = sink.port_mut().t + 10;
        sink.port_mut().host_pulse(start, 1);
        assert_eq!(
            send(&mut sink, &pressed()),
            Err(OutputError::Joybus(JoybusError::Glitch))
        );
        assert!(!sink.is_ready());
    }

    #[test]
    fn test_info_request_does_not_sync() {
        let mut port = SimPort::new();
        port.host_sends(100, &[0x00]);
        let mut sink = JoybusOutput::new(port, MockDelay::default(), Console::N64, 60);
        send(&mut sink, &pressed()).unwrap();
        assert!(!sink.is_ready());
        assert_eq!(sink.slave().polls(), 0);
    }
}
