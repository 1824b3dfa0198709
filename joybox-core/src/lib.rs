//! Platform-agnostic runtime for the joybox controller adapter.
//!
//! This crate holds everything between the pins and the wire that does not
//! depend on a particular microcontroller. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`input`]: Input source trait ([`InputSource`]) and per-frame aggregation
//! - [`gpio`]: Button table scanner over a [`PinBank`]
//! - [`nunchuk`]: Wii Nunchuk over `embedded-hal` I2C
//! - [`socd`]: Opposing-direction cleaning ([`SocdCleaner`])
//! - [`modes`]: Per-title remapping ([`GameMode`], [`ModeKind`]) and keyboard mode
//! - [`output`]: Output sink traits ([`OutputSink`], [`KeyboardSink`])
//! - [`backend`]: One output path and its game mode ([`CommunicationBackend`])
//! - [`joybus`]: Console emulation sink with poll scheduling ([`JoybusOutput`])
//! - [`mode_select`]: Held-combination mode switching ([`ModeSelector`])
//! - [`runtime`]: The frame loop ([`Runtime`])
//! - [`pinout`], [`detect`], [`boot`]: Board description and boot decisions
//!
//! # Frame
//!
//! ```text
//! ModeSelector -> aggregate(sources) -> primary.send_report
//!                                    -> secondary.send_report
//!                                    -> keyboard (if on)
//! ```
//!
//! # Example
//!
//! ```rust
//! use joybox_core::{CommunicationBackend, GameMode, InputSource, ModeKind, NullSink, Runtime};
//! use joybox_proto::InputState;
//!
//! struct AlwaysRight;
//!
//! impl InputSource for AlwaysRight {
//!     fn update_inputs(&mut self, inputs: &mut InputState) {
//!         inputs.right = true;
//!     }
//! }
//!
//! let backend = CommunicationBackend::with_mode(NullSink, ModeKind::Melee.build());
//! let mut runtime = Runtime::new(AlwaysRight, backend);
//! embassy_futures::block_on(runtime.run_frame()).unwrap();
//! assert_eq!(runtime.primary().last_outputs().map(|o| o.left_stick_x), Some(208));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod boot;
pub mod detect;
pub mod gpio;
pub mod input;
pub mod joybus;
pub mod mode_select;
pub mod modes;
pub mod nunchuk;
pub mod output;
pub mod pinout;
pub mod runtime;
pub mod socd;

// Re-export main types at crate root
pub use backend::CommunicationBackend;
pub use boot::{
    mux_level, plan_boot, wants_bootloader, BoardConfig, BootOptions, BootPlan, PrimaryKind,
};
pub use detect::{detect_host, HostDetection, UsbPresence};
pub use gpio::{GpioButtonInput, GpioButtonMapping, Pin, PinBank, ANALOG_PRESS_THRESHOLD};
pub use input::{aggregate, InputSource};
pub use joybus::{JoybusOutput, JoybusPort, PollSchedule};
pub use mode_select::{ModeAction, ModeSelector};
pub use modes::{AnyGameMode, GameMode, KeyboardMode, Melee20Button, ModeKind, Rivals2};
pub use nunchuk::{NunchukError, NunchukInput, NunchukReading};
pub use output::{KeyboardSink, NullSink, OutputError, OutputSink, Report};
pub use pinout::{validate, ConfigError, Pinout};
pub use runtime::{BackendError, Runtime};
pub use socd::{SocdCleaner, SocdPair, SocdType};
