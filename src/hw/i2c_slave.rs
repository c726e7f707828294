// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I2C1 slave transport.
//!
//! Drives the peripheral registers directly: the HAL only offers a master driver. Clock stretching
//! is left enabled, so the master is held on every address match and every byte until the event
//! has been serviced.
//!
//! Interrupt flags are mapped onto [`BusEvent`]s as follows:
//!
//! | ISR flag | event |
//! | -------- | ----- |
//! | ADDR | address byte, direction from DIR |
//! | RXNE | data byte written by the master |
//! | TXIS | data byte requested by the master |
//! | OVR | overflow on the current byte |
//! | BERR, ARLO | collision on the current byte |
//! | STOPF | cleared, no event |

use stm32f7xx_hal::pac;

use crate::config::I2C_TIMINGR;
use crate::protocol::{BusEvent, BusFlags, BusTransport, Transfer};

/// OA1EN bit in OAR1.
const OAR1_ENABLE: u32 = 1 << 15;

pub struct I2cSlave {
    i2c: pac::I2C1,
}

impl I2cSlave {
    /// Enable I2C1 as a 7-bit slave at `address` with all event and error interrupts on.
    ///
    /// The SCL/SDA pins must already be in their open-drain alternate function.
    pub fn new(i2c1: pac::I2C1, address: u8) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.i2c1en().set_bit());

        let i2c = i2c1;

        // Disable peripheral while configuring
        i2c.cr1.modify(|_, w| w.pe().clear_bit());

        i2c.timingr.write(|w| unsafe { w.bits(I2C_TIMINGR) });

        // OA1 can only be changed while OA1EN is clear
        i2c.oar1.write(|w| unsafe { w.bits(0) });
        i2c.oar1
            .write(|w| unsafe { w.bits(OAR1_ENABLE | ((address as u32) << 1)) });

        i2c.cr1.modify(|_, w| {
            w.addrie()
                .set_bit()
                .rxie()
                .set_bit()
                .txie()
                .set_bit()
                .stopie()
                .set_bit()
                .errie()
                .set_bit()
        });
        i2c.cr1.modify(|_, w| w.pe().set_bit());

        Self { i2c }
    }

    fn clear_errors(&mut self) {
        self.i2c.icr.write(|w| {
            w.ovrcf()
                .set_bit()
                .berrcf()
                .set_bit()
                .arlocf()
                .set_bit()
        });
    }
}

impl BusTransport for I2cSlave {
    fn poll(&mut self) -> Option<BusEvent> {
        let isr = self.i2c.isr.read();

        let transfer = if isr.dir().bit_is_set() {
            Transfer::Read
        } else {
            Transfer::Write
        };
        let flags = BusFlags {
            overflow: isr.ovr().bit_is_set(),
            collision: isr.berr().bit_is_set() || isr.arlo().bit_is_set(),
        };

        if flags.any() {
            let event = match transfer {
                Transfer::Write => BusEvent::data_write(self.i2c.rxdr.read().bits() as u8),
                Transfer::Read => BusEvent::data_read(),
            };
            return Some(event.with_flags(flags));
        }

        if isr.addr().bit_is_set() {
            if transfer == Transfer::Read {
                // Discard anything left over from an aborted read
                self.i2c.isr.modify(|_, w| w.txe().set_bit());
            }
            return Some(BusEvent::address(transfer));
        }

        if isr.rxne().bit_is_set() {
            return Some(BusEvent::data_write(self.i2c.rxdr.read().bits() as u8));
        }

        if isr.txis().bit_is_set() {
            return Some(BusEvent::data_read());
        }

        if isr.stopf().bit_is_set() {
            self.i2c.icr.write(|w| w.stopcf().set_bit());
        }

        None
    }

    #[inline]
    fn respond(&mut self, byte: u8) {
        self.i2c.txdr.write(|w| unsafe { w.bits(byte as u32) });
    }

    fn release(&mut self) {
        let isr = self.i2c.isr.read();
        if isr.ovr().bit_is_set() || isr.berr().bit_is_set() || isr.arlo().bit_is_set() {
            self.clear_errors();
        }
        if isr.addr().bit_is_set() {
            self.i2c.icr.write(|w| w.addrcf().set_bit());
        }
    }

    #[inline]
    fn tx_pending(&mut self) -> bool {
        self.i2c.isr.read().txe().bit_is_clear()
    }
}
