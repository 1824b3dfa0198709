//! Controller state types and wire encoders for the joybox adapter.
//!
//! - **Types**: the raw and console-facing controller snapshots
//!   - [`InputState`] - physical inputs, one boolean per [`InputField`]
//!   - [`OutputState`] - console-facing buttons, sticks and triggers
//!
//! - **Joybus** ([`joybus`]): GameCube and N64 controller protocol
//!   - [`Console::decode`] / [`Console::respond`] - command and payload layer
//!   - [`JoybusSlave`] - one timed command/response exchange on the line
//!
//! - **USB HID**: [`DInputReport`] gamepad with its report descriptor, and
//!   [`KeyboardReport`] key state for the boot keyboard
//!
//! - **Input viewer** ([`viewer`]): diagnostic frames for a host visualizer
//!
//! # Input Viewer Frame
//!
//! ```text
//! I<buttons>:<nx>:<ny>*<checksum>\n
//! ```
//!
//! The checksum is CRC-8/SMBUS over the bytes between `I` and `*`.
//!
//! # Example
//!
//! ```
//! use joybox_proto::{DInputReport, OutputState};
//!
//! let out = OutputState { a: true, ..OutputState::neutral() };
//! let report = DInputReport::from(&out);
//! assert_eq!(report.buttons, DInputReport::A);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod crc;
pub mod dinput;
pub mod format;
pub mod joybus;
pub mod keyboard;
pub mod types;
pub mod viewer;

pub use self::crc::{calculate_crc8, Crc8Digest};
pub use dinput::{hat_from_dpad, DInputReport};
pub use joybus::{
    Command, Console, ExchangeState, GameCubeReport, JoybusError, JoybusSlave, N64Report, Response,
};
pub use keyboard::KeyboardReport;
pub use types::{InputField, InputState, OutputState, ANALOG_NEUTRAL};
pub use viewer::{frame_to_vec, serialize_frame, SerializeError, MAX_FRAME_SIZE};
