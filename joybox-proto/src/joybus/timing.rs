//! Joybus line timing.
//!
//! Every value is in nanoseconds and converted to clock ticks with
//! [`ticks`](crate::joybus::line::ticks) at the point of use.

/// Length of one bit cell.
pub const BIT_PERIOD_NS: u32 = 4_000;

/// Low time of a transmitted `1` bit.
pub const ONE_LOW_NS: u32 = 1_000;

/// Low time of a transmitted `0` bit.
pub const ZERO_LOW_NS: u32 = 3_000;

/// Low time of the stop bit that ends a device response.
pub const STOP_LOW_NS: u32 = 2_000;

/// Received low pulses shorter than this are line noise.
pub const MIN_PULSE_NS: u32 = 500;

/// Received low pulses shorter than this decode as `1`, longer as `0`.
pub const BIT_THRESHOLD_NS: u32 = 2_000;

/// Received low pulses longer than this mean the line is held or shorted.
pub const MAX_PULSE_NS: u32 = 4_500;

/// Longest high gap allowed between two bits of the same command.
pub const BIT_WINDOW_NS: u32 = 5_000;

/// Delay between the host stop bit and the start of the response.
pub const REPLY_DELAY_NS: u32 = 2_000;

/// High time after which the line is considered idle again.
pub const IDLE_GAP_NS: u32 = 12_000;

/// Upper bound on waiting for an aborted exchange to go idle.
pub const MAX_SETTLE_NS: u32 = 200_000;
