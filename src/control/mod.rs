// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motor Control
//!
//! This module turns register values into output waveforms.
//!
//! ## Modules
//!
//! - [`profile`] - Instant, linear and banded-exponential acceleration laws.
//! - [`pwm_engine`] - Software PWM and acceleration scheduling for all four channels.

pub mod profile;
pub mod pwm_engine;

pub use pwm_engine::PwmEngine;
