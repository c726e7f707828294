// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F767 board support: bus transport, PWM time base, output pins and debug terminal.

pub mod i2c_slave;
pub mod pins;
pub mod timebase;
pub mod usart;

pub use i2c_slave::I2cSlave;
pub use pins::{BoardPins, PinBank};
pub use timebase::TimeBase;
pub use usart::{init_logger, Usart};
