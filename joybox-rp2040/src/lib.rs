//! Fighting-game controller adapter firmware for RP2040.
//!
//! This crate provides the RP2040 side of the adapter: the board tables,
//! pin access, the Joybus line and the USB device. Everything protocol- or
//! game-specific lives in [`joybox_core`] and [`joybox_proto`].
//!
//! # Overview
//!
//! At power-on the firmware:
//! 1. Validates the board table (a mismatch is fatal)
//! 2. Reads the buttons once to get the boot holds
//! 3. Reboots into the USB bootloader if `start` is held
//! 4. Sets the passthrough mux from `b` on boards that have one
//! 5. Looks for a USB host with the board's detection strategy
//! 6. Builds either a DInput primary with the input viewer and keyboard
//!    channel, or a GameCube/N64 primary on the Joybus line
//! 7. Runs the frame loop forever
//!
//! # Architecture
//!
//! Two tasks run on the Embassy executor:
//!
//! - **USB Task**: Manages the USB device stack and tracks the configured state
//! - **Main**: Runs the [`Runtime`](joybox_core::Runtime) frame loop
//!
//! Joybus exchanges run inside a critical section so bit timing is never
//! disturbed by the USB interrupt.
//!
//! # Modules
//!
//! - [`board`]: Board tables ([`BOARD`](board::BOARD))
//! - [`pins`]: Button pin bank ([`RpPinBank`])
//! - [`joybus_port`]: Joybus line and cycle clock ([`RpJoybusPort`])
//! - [`usb`]: USB sinks ([`DInputOutput`], [`KeyboardOutput`], [`ViewerOutput`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`board-pico`** (default): Raspberry Pi Pico pinout with Nunchuk port
//! - **`board-mux`**: Board with a Brook passthrough mux

#![no_std]

// Exactly one board table
#[cfg(all(feature = "board-pico", feature = "board-mux"))]
compile_error!("Cannot enable both `board-pico` and `board-mux` features - they define conflicting pin tables");

#[cfg(not(any(feature = "board-pico", feature = "board-mux")))]
compile_error!("Enable one board feature: `board-pico` or `board-mux`");

pub mod board;
pub mod joybus_port;
pub mod pins;
pub mod usb;

pub use joybus_port::{CycleClock, RpJoybusPort};
pub use pins::RpPinBank;
pub use usb::{
    configure_dinput, configure_keyboard, configure_viewer, usb_configured, DInputOutput,
    KeyboardOutput, UsbDriver, UsbStateHandler, ViewerOutput,
};
