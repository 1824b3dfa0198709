//! Simulated Joybus line for host tests.
//!
//! Time advances by one tick on every `now()` call. The host side is a list
//! of scheduled low intervals; the device side is recorded as edges.

extern crate std;

use std::vec::Vec;

use crate::joybus::line::{JoybusClock, JoybusLine};

/// Host bit cell in sim ticks (4 ticks per microsecond).
pub const CELL: u32 = 16;
pub const HOST_ONE: u32 = 4;
pub const HOST_ZERO: u32 = 12;
pub const HOST_STOP: u32 = 4;

#[derive(Debug, Default)]
pub struct SimPort {
    pub t: u32,
    host_lows: Vec<(u32, u32)>,
    driving: bool,
    /// `(tick, driven_low)` for every device edge.
    pub edges: Vec<(u32, bool)>,
}

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a host low pulse of `width` ticks at `start`.
    pub fn host_pulse(&mut self, start: u32, width: u32) {
        self.host_lows.push((start, start + width));
    }

    /// Schedule a host command starting at `start`; returns the tick at which
    /// its stop bit ends.
    pub fn host_sends(&mut self, start: u32, bytes: &[u8]) -> u32 {
        let mut cell = start;
        for byte in bytes {
            for bit in (0..8).rev() {
                let low = if byte & (1 << bit) != 0 {
                    HOST_ONE
                } else {
                    HOST_ZERO
                };
                self.host_pulse(cell, low);
                cell += CELL;
            }
        }
        self.host_pulse(cell, HOST_STOP);
        cell + HOST_STOP
    }

    /// Widths of the device's low pulses, in order.
    pub fn device_pulses(&self) -> Vec<(u32, u32)> {
        self.edges
            .chunks(2)
            .filter_map(|pair| match pair {
                [(fall, true), (rise, false)] => Some((*fall, rise - fall)),
                _ => None,
            })
            .collect()
    }

    /// Decode the device response, dropping the trailing stop bit.
    pub fn device_bytes(&self) -> Vec<u8> {
        let pulses = self.device_pulses();
        let bits = &pulses[..pulses.len().saturating_sub(1)];
        bits.chunks(8)
            .map(|byte| {
                byte.iter()
                    .fold(0u8, |acc, (_, width)| (acc << 1) | u8::from(*width < 8))
            })
            .collect()
    }
}

impl JoybusClock for SimPort {
    const TICKS_PER_US: u32 = 4;

    fn now(&mut self) -> u32 {
        let t = self.t;
        self.t += 1;
        t
    }
}

impl JoybusLine for SimPort {
    fn is_high(&mut self) -> bool {
        let t = self.t;
        !self.driving && !self.host_lows.iter().any(|(a, b)| (*a..*b).contains(&t))
    }

    fn drive_low(&mut self) {
        self.driving = true;
        self.edges.push((self.t, true));
    }

    fn release(&mut self) {
        self.driving = false;
        self.edges.push((self.t, false));
    }
}
