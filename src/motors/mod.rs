// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motor Channels
//!
//! This module holds the data both halves of the firmware agree on.
//!
//! ## Modules
//!
//! - [`channel`] - Per-channel registers and the motor/acceleration/direction enums.
//! - [`register_file`] - The four channels plus global enable/pause.
//! - [`pins`] - Logical pin identifiers and the `PinDriver` interface.

pub mod channel;
pub mod pins;
pub mod register_file;

pub use channel::{AccelType, Direction, MotorRegisters, MotorSnapshot, MotorType};
pub use pins::{ChannelPins, PinDriver, PinId, BOARD_CHANNEL_PINS, BOARD_PIN_COUNT};
pub use register_file::{RegisterFile, Snapshot};
