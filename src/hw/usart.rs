// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debug terminal and `log` backend.
//!
//! Log records are written to USART3, which the devboard routes to the ST-LINK virtual COM port.
//! Each record is prefixed with its level and terminated with CRLF.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::{
    cell::RefCell,
    fmt::{self, Write as _},
};

use cortex_m::interrupt::{self, Mutex};
use log::{Log, Metadata, Record};
use nb::block;
use stm32f7xx_hal::{
    pac::USART3,
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

use crate::config::LOG_LEVEL;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// Terminal shared by the main loop and the bus interrupts.
static TERMINAL: Mutex<RefCell<Option<Usart<USART3>>>> = Mutex::new(RefCell::new(None));

static LOGGER: UsartLogger = UsartLogger;

/// `log` backend writing to [`TERMINAL`].
pub struct UsartLogger;

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(usart) = TERMINAL.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{:<5}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = TERMINAL.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}

/// Hand the terminal to the logger and install it.
///
/// Records logged before this call are dropped. Calling it twice keeps the first logger but
/// swaps in the new terminal.
pub fn init_logger(usart: Usart<USART3>) {
    interrupt::free(|cs| TERMINAL.borrow(cs).replace(Some(usart)));
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOG_LEVEL);
    }
}
