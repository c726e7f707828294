// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motor HAT Firmware
//!
//! This crate contains the firmware for a four-channel motor controller that sits on a shared I2C
//! bus as an addressed peripheral. A host (e.g. a Raspberry Pi) reads and writes a flat bank of
//! byte registers; the controller turns them into software-generated PWM with configurable
//! acceleration.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`motors`] | Shared register file, per-channel state and pin identifiers |
//! | [`protocol`] | I2C register map and the slave-side byte state machine |
//! | [`control`] | Acceleration profiles and the software PWM engine |
//! | [`config`] | Compile-time configuration |
//! | `hw` | STM32F7 peripherals (I2C slave, time base, output pins, debug UART); `firmware` feature |
//!
//! The register file is the only thing the I2C interrupt and the main loop share. Every field has
//! exactly one writer (see [`motors::RegisterFile`]), so both sides hold a plain `&RegisterFile`
//! and no locks are taken.
//!
//! ## Getting Started
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod config;
pub mod control;
pub mod motors;
pub mod protocol;

#[cfg(feature = "firmware")]
pub mod hw;
