//! Boot-time USB host detection.
//!
//! Boards differ in how they can tell whether a USB host is present, so the
//! board table picks a [`HostDetection`] strategy and [`detect_host`] runs it.

use embedded_hal_async::delay::DelayNs;

/// How long and how often to look for a USB host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostDetection {
    /// Check up to `attempts` times, `interval_us` apart, stopping at the
    /// first positive check.
    Polling { attempts: u32, interval_us: u32 },
    /// Wait `settle_ms` for enumeration to finish, then check once.
    SettleThenCheck { settle_ms: u32 },
}

/// Source of truth for "a USB host has configured us".
pub trait UsbPresence {
    fn is_present(&mut self) -> bool;
}

impl<F: FnMut() -> bool> UsbPresence for F {
    fn is_present(&mut self) -> bool {
        self()
    }
}

/// Run `strategy` against `usb`; returns `true` if a host was found.
///
/// Always finishes within the strategy's bound.
pub async fn detect_host<U, D>(strategy: HostDetection, mut usb: U, mut delay: D) -> bool
where
    U: UsbPresence,
    D: DelayNs,
{
    match strategy {
        HostDetection::Polling {
            attempts,
            interval_us,
        } => {
            for attempt in 0..attempts {
                if usb.is_present() {
                    return true;
                }
                if attempt + 1 < attempts {
                    delay.delay_us(interval_us).await;
                }
            }
            false
        }
        HostDetection::SettleThenCheck { settle_ms } => {
            delay.delay_ms(settle_ms).await;
            usb.is_present()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct MockDelay {
        total_us: u64,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_us += u64::from(ns) / 1_000;
        }
    }

    #[test]
    fn test_polling_stops_at_first_hit() {
        let mut delay = MockDelay::default();
        let mut checks = 0;
        let found = block_on(detect_host(
            HostDetection::Polling {
                attempts: 100,
                interval_us: 10,
            },
            || {
                checks += 1;
                checks == 4
            },
            &mut delay,
        ));
        assert!(found);
        assert_eq!(checks, 4);
        assert_eq!(delay.total_us, 30);
    }

    #[test]
    fn test_polling_gives_up() {
        let mut delay = MockDelay::default();
        let found = block_on(detect_host(
            HostDetection::Polling {
                attempts: 5,
                interval_us: 100,
            },
            || false,
            &mut delay,
        ));
        assert!(!found);
        assert_eq!(delay.total_us, 400);
    }

    #[test]
    fn test_settle_then_check() {
        let mut delay = MockDelay::default();
        let mut checks = 0;
        let found = block_on(detect_host(
            HostDetection::SettleThenCheck { settle_ms: 500 },
            || {
                checks += 1;
                true
            },
            &mut delay,
        ));
        assert!(found);
        assert_eq!(checks, 1);
        assert_eq!(delay.total_us, 500_000);
    }
}
