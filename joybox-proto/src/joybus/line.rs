//! Bit-level Joybus codec over an open-drain line.
//!
//! Every wait in this module is bounded by an explicit window measured on a
//! monotonic tick clock, so a silent or misbehaving host can never stall the
//! caller.

use crate::joybus::command::{Command, Console, MAX_COMMAND_LEN};
use crate::joybus::timing::{
    BIT_PERIOD_NS, BIT_THRESHOLD_NS, BIT_WINDOW_NS, IDLE_GAP_NS, MAX_PULSE_NS, MAX_SETTLE_NS,
    MIN_PULSE_NS, ONE_LOW_NS, REPLY_DELAY_NS, STOP_LOW_NS, ZERO_LOW_NS,
};
use crate::joybus::JoybusError;

/// The single half-duplex data line.
///
/// The line is pulled up externally; the device only ever drives it low or
/// releases it.
pub trait JoybusLine {
    /// Sample the line level.
    fn is_high(&mut self) -> bool;

    /// Pull the line low.
    fn drive_low(&mut self);

    /// Stop driving and let the pull-up raise the line.
    fn release(&mut self);
}

/// Free-running monotonic tick counter used to time pulses.
///
/// `now` must wrap cleanly at `u32::MAX`; all arithmetic here is done with
/// `wrapping_sub`.
pub trait JoybusClock {
    /// Clock ticks per microsecond.
    const TICKS_PER_US: u32;

    /// Current tick count.
    fn now(&mut self) -> u32;
}

/// Convert nanoseconds to ticks of clock `C`.
#[inline]
#[must_use]
pub fn ticks<C: JoybusClock + ?Sized>(ns: u32) -> u32 {
    (u64::from(ns) * u64::from(C::TICKS_PER_US) / 1_000) as u32
}

/// One received low pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pulse {
    width: u32,
    rise: u32,
}

fn wait_until<P: JoybusClock>(port: &mut P, from: u32, duration: u32) {
    while port.now().wrapping_sub(from) < duration {}
}

/// Wait up to `wait` ticks after `since` for the line to fall.
fn wait_fall<P>(port: &mut P, since: u32, wait: u32) -> Result<u32, JoybusError>
where
    P: JoybusLine + JoybusClock,
{
    loop {
        if !port.is_high() {
            return Ok(port.now());
        }
        if port.now().wrapping_sub(since) > wait {
            return Err(JoybusError::Timeout);
        }
    }
}

/// Measure a low pulse that started at `fall`.
fn measure_low<P>(port: &mut P, fall: u32) -> Result<Pulse, JoybusError>
where
    P: JoybusLine + JoybusClock,
{
    let max_low = ticks::<P>(MAX_PULSE_NS);
    loop {
        if port.is_high() {
            break;
        }
        if port.now().wrapping_sub(fall) > max_low {
            return Err(JoybusError::LineStuck);
        }
    }
    let rise = port.now();

    let width = rise.wrapping_sub(fall);
    if width < ticks::<P>(MIN_PULSE_NS) {
        return Err(JoybusError::Glitch);
    }
    Ok(Pulse { width, rise })
}

fn read_pulse<P>(port: &mut P, since: u32, wait: u32) -> Result<Pulse, JoybusError>
where
    P: JoybusLine + JoybusClock,
{
    let fall = wait_fall(port, since, wait)?;
    measure_low(port, fall)
}

/// Read the remaining seven bits of a byte whose first bit is `first`.
fn read_byte<P>(port: &mut P, first: Pulse) -> Result<(u8, u32), JoybusError>
where
    P: JoybusLine + JoybusClock,
{
    let threshold = ticks::<P>(BIT_THRESHOLD_NS);
    let bit_window = ticks::<P>(BIT_WINDOW_NS);

    let mut byte = u8::from(first.width < threshold);
    let mut last_rise = first.rise;
    for _ in 1..8 {
        let pulse = read_pulse(port, last_rise, bit_window)?;
        byte = (byte << 1) | u8::from(pulse.width < threshold);
        last_rise = pulse.rise;
    }
    Ok((byte, last_rise))
}

/// Receive one host command.
///
/// Waits up to `window_ns` for the first bit and fails with
/// [`JoybusError::NoCommand`] if the host stays silent. On success returns
/// the command and the tick at which the host stop bit ended, which is the
/// reference point for the reply.
pub fn receive_command<P>(
    port: &mut P,
    console: Console,
    window_ns: u32,
) -> Result<(Command, u32), JoybusError>
where
    P: JoybusLine + JoybusClock,
{
    let bit_window = ticks::<P>(BIT_WINDOW_NS);
    let start = port.now();

    let fall =
        wait_fall(port, start, ticks::<P>(window_ns)).map_err(|_| JoybusError::NoCommand)?;
    let first_pulse = measure_low(port, fall)?;
    let (first, mut last_rise) = read_byte(port, first_pulse)?;
    let len = console
        .command_len(first)
        .ok_or(JoybusError::UnknownCommand(first))?;

    let mut bytes = [0u8; MAX_COMMAND_LEN];
    bytes[0] = first;
    for slot in bytes.iter_mut().take(len).skip(1) {
        let pulse = read_pulse(port, last_rise, bit_window)?;
        let (byte, rise) = read_byte(port, pulse)?;
        *slot = byte;
        last_rise = rise;
    }

    let stop = read_pulse(port, last_rise, bit_window)?;
    if stop.width >= ticks::<P>(BIT_THRESHOLD_NS) {
        return Err(JoybusError::BadStopBit);
    }

    let command = console.decode(&bytes[..len])?;
    Ok((command, stop.rise))
}

/// Transmit `bytes` followed by a device stop bit.
///
/// Transmission starts [`REPLY_DELAY_NS`] after `reference`, the end of the
/// host stop bit.
pub fn transmit<P>(port: &mut P, reference: u32, bytes: &[u8])
where
    P: JoybusLine + JoybusClock,
{
    let period = ticks::<P>(BIT_PERIOD_NS);
    let one_low = ticks::<P>(ONE_LOW_NS);
    let zero_low = ticks::<P>(ZERO_LOW_NS);

    wait_until(port, reference, ticks::<P>(REPLY_DELAY_NS));

    let mut cell = port.now();
    for byte in bytes {
        for bit in (0..8).rev() {
            let low = if byte & (1 << bit) != 0 { one_low } else { zero_low };
            port.drive_low();
            wait_until(port, cell, low);
            port.release();
            wait_until(port, cell, period);
            cell = cell.wrapping_add(period);
        }
    }

    port.drive_low();
    wait_until(port, cell, ticks::<P>(STOP_LOW_NS));
    port.release();
}

/// Wait for the line to stay high for [`IDLE_GAP_NS`].
///
/// Used after an aborted exchange so the tail of a command is not mistaken
/// for the start of the next one. Gives up after [`MAX_SETTLE_NS`] and
/// returns `false`.
pub fn settle<P>(port: &mut P) -> bool
where
    P: JoybusLine + JoybusClock,
{
    let idle_gap = ticks::<P>(IDLE_GAP_NS);
    let limit = ticks::<P>(MAX_SETTLE_NS);

    let start = port.now();
    let mut high_since = start;
    loop {
        let now = port.now();
        if !port.is_high() {
            high_since = now;
        } else if now.wrapping_sub(high_since) >= idle_gap {
            return true;
        }
        if now.wrapping_sub(start) > limit {
            return false;
        }
    }
}
