// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # I2C Register Protocol
//!
//! ## Modules
//!
//! - [`registers`] - Register ids and their decoded form.
//! - [`packing`] - 2-bit-per-channel fields used by packed registers.
//! - [`handler`] - Byte-level slave state machine.
//! - [`transport`] - Peripheral interface and the per-event service routine.

pub mod handler;
pub mod packing;
pub mod registers;
pub mod transport;

pub use handler::{BusEvent, BusFlags, BusHandler, Phase, Transfer};
pub use registers::{reg, Register, SENTINEL};
pub use transport::{service, service_all, BusError, BusTransport};
