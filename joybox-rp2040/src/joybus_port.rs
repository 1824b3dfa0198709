//! Joybus data line on an RP2040 GPIO, timed with SysTick.
//!
//! The line is driven open-drain: the output latch is held low and the pin
//! switches between input (released) and output (driven low).

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use embassy_rp::gpio::{AnyPin, Flex, Pull};
use joybox_core::JoybusPort;
use joybox_proto::joybus::{JoybusClock, JoybusLine};

/// SysTick reload value; the counter is 24 bits wide.
const SYST_MASK: u32 = 0x00FF_FFFF;

/// Core clock cycles extended from the 24-bit SysTick counter to 32 bits.
///
/// Wraps of the hardware counter are folded in on every call, so `now` must
/// be called at least once per 134 ms at 125 MHz.
pub struct CycleClock {
    last: u32,
    elapsed: u32,
}

impl CycleClock {
    /// Start SysTick counting core clock cycles.
    pub fn new(mut syst: SYST) -> Self {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(SYST_MASK);
        syst.clear_current();
        syst.enable_counter();
        Self {
            last: SYST::get_current(),
            elapsed: 0,
        }
    }

    #[inline(always)]
    fn now(&mut self) -> u32 {
        let current = SYST::get_current();
        // SysTick counts down
        let delta = self.last.wrapping_sub(current) & SYST_MASK;
        self.last = current;
        self.elapsed = self.elapsed.wrapping_add(delta);
        self.elapsed
    }
}

/// Joybus line plus its tick clock.
pub struct RpJoybusPort {
    pin: Flex<'static>,
    clock: CycleClock,
}

impl RpJoybusPort {
    /// Claim `gpio` as the Joybus data line.
    ///
    /// # Safety
    ///
    /// `gpio` must not be used by anything else, which a validated board
    /// table guarantees for its Joybus pin.
    pub unsafe fn new(gpio: u8, clock: CycleClock) -> Self {
        let mut pin = Flex::new(AnyPin::steal(gpio));
        pin.set_pull(Pull::Up);
        pin.set_low();
        pin.set_as_input();
        Self { pin, clock }
    }
}

impl JoybusLine for RpJoybusPort {
    #[inline(always)]
    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }

    #[inline(always)]
    fn drive_low(&mut self) {
        self.pin.set_as_output();
    }

    #[inline(always)]
    fn release(&mut self) {
        self.pin.set_as_input();
    }
}

impl JoybusClock for RpJoybusPort {
    /// Default 125 MHz system clock.
    const TICKS_PER_US: u32 = 125;

    #[inline(always)]
    fn now(&mut self) -> u32 {
        self.clock.now()
    }
}

impl JoybusPort for RpJoybusPort {
    fn critical<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        critical_section::with(|_| f(self))
    }
}
