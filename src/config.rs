// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration.
//!
//! Nothing here is persisted; every value is baked into the image and the register file starts
//! from these defaults after each reset.

use crate::motors::AccelType;

/// 7-bit I2C slave address.
pub const I2C_ADDRESS: u8 = 0x23;

/// Number of motor channels.
pub const CHANNELS: usize = 4;

/// PWM frames a servo channel skips before its output is actually asserted.
pub const SERVO_PHASE_CYCLES: u8 = 20;

// Power-on acceleration settings
pub const DEFAULT_ACCEL_TYPE: AccelType = AccelType::Exponential;
pub const DEFAULT_ACCEL_RATE: u8 = 150;
pub const DEFAULT_MINIMUM_DUTY: u8 = 0;

/// Upper bound on polls of the transmit-empty flag after a read response.
pub const DRAIN_SPIN_LIMIT: u32 = 10_000;

/// I2C1 TIMINGR value for 100 kHz with a 16 MHz kernel clock (RM0410, table 220).
pub const I2C_TIMINGR: u32 = 0x0030_3D5B;

/// TIM3 prescaler: 16 MHz / (124 + 1) = 128 kHz tick, 256 ticks = 2 ms PWM frame.
pub const TIMEBASE_PRESCALER: u16 = 124;

/// Baud rate of the debug terminal.
pub const DEBUG_BAUD: u32 = 115_200;

/// Maximum log level compiled into the firmware logger.
#[cfg(feature = "verbose")]
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
#[cfg(not(feature = "verbose"))]
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
