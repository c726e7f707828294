// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Glue between a bus peripheral and the [`BusHandler`].
//!
//! The peripheral side only has to classify bytes and move them in and out of its data register;
//! everything else lives in the handler.

use crate::config::DRAIN_SPIN_LIMIT;
use crate::motors::RegisterFile;
use crate::protocol::handler::{BusEvent, BusHandler, Transfer};

/// Error type for servicing one bus event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BusError {
    /// The byte was overwritten before it was read. It has been dropped.
    Overflow,
    /// Bus error or collision on this byte. It has been dropped.
    Collision,
    /// The transmit buffer did not empty within `DRAIN_SPIN_LIMIT` polls.
    DrainTimeout,
}

/// Slave-side byte transport.
///
/// The peripheral stretches the clock from the moment an event is reported until
/// [`release`](Self::release) is called.
pub trait BusTransport {
    /// Next pending byte event, if any.
    fn poll(&mut self) -> Option<BusEvent>;

    /// Load the byte to be clocked out for a read.
    fn respond(&mut self, byte: u8);

    /// Release the clock and clear any latched error flags.
    fn release(&mut self);

    /// True while the transmit buffer still holds an unsent byte.
    fn tx_pending(&mut self) -> bool;
}

/// Wait for the transmit buffer to empty, giving up after `DRAIN_SPIN_LIMIT` polls.
pub fn drain<T: BusTransport>(transport: &mut T) -> Result<(), BusError> {
    for _ in 0..DRAIN_SPIN_LIMIT {
        if !transport.tx_pending() {
            return Ok(());
        }
    }
    Err(BusError::DrainTimeout)
}

/// Service a single event. Returns `Ok(false)` if nothing was pending.
///
/// Errored bytes are dropped by the handler; they are reported here, after the clock has been
/// released, so the caller can log them.
pub fn service<T: BusTransport>(
    handler: &mut BusHandler,
    transport: &mut T,
    regs: &RegisterFile,
) -> Result<bool, BusError> {
    let Some(event) = transport.poll() else {
        return Ok(false);
    };

    let response = handler.handle(event, regs);
    if let Some(byte) = response {
        transport.respond(byte);
    }
    transport.release();

    if event.flags.overflow {
        return Err(BusError::Overflow);
    }
    if event.flags.collision {
        return Err(BusError::Collision);
    }
    if response.is_some() && event.transfer == Transfer::Read {
        drain(transport)?;
    }
    Ok(true)
}

/// Service every pending event. Errors are logged and do not stop the loop.
pub fn service_all<T: BusTransport>(
    handler: &mut BusHandler,
    transport: &mut T,
    regs: &RegisterFile,
) {
    loop {
        match service(handler, transport, regs) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => log::warn!("i2c: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::handler::BusFlags;

    /// Transport with at most one pending event and a transmit buffer that empties after a fixed
    /// number of polls.
    struct OneShot {
        event: Option<BusEvent>,
        sent: Option<u8>,
        released: bool,
        busy_polls: u32,
    }

    impl OneShot {
        fn new(event: BusEvent, busy_polls: u32) -> Self {
            Self {
                event: Some(event),
                sent: None,
                released: false,
                busy_polls,
            }
        }
    }

    impl BusTransport for OneShot {
        fn poll(&mut self) -> Option<BusEvent> {
            self.event.take()
        }

        fn respond(&mut self, byte: u8) {
            self.sent = Some(byte);
        }

        fn release(&mut self) {
            self.released = true;
        }

        fn tx_pending(&mut self) -> bool {
            if self.busy_polls == 0 {
                false
            } else {
                self.busy_polls -= 1;
                true
            }
        }
    }

    #[test]
    fn nothing_pending() {
        let regs = RegisterFile::new();
        let mut h = BusHandler::new();
        let mut t = OneShot::new(BusEvent::data_read(), 0);
        t.event = None;
        assert_eq!(service(&mut h, &mut t, &regs), Ok(false));
        assert!(!t.released);
    }

    #[test]
    fn read_waits_for_drain() {
        let regs = RegisterFile::new();
        let mut h = BusHandler::new();
        let mut t = OneShot::new(BusEvent::data_read(), 5);
        assert_eq!(service(&mut h, &mut t, &regs), Ok(true));
        assert_eq!(t.sent, Some(0xFF));
        assert!(t.released);
        assert_eq!(t.busy_polls, 0);
    }

    #[test]
    fn stuck_transmitter_times_out() {
        let regs = RegisterFile::new();
        let mut h = BusHandler::new();
        let mut t = OneShot::new(BusEvent::data_read(), u32::MAX);
        assert_eq!(service(&mut h, &mut t, &regs), Err(BusError::DrainTimeout));
        assert!(t.released);
    }

    #[test]
    fn errored_byte_is_released_and_reported() {
        let regs = RegisterFile::new();
        let mut h = BusHandler::new();
        let flags = BusFlags {
            overflow: true,
            collision: false,
        };
        let mut t = OneShot::new(BusEvent::data_write(3).with_flags(flags), 0);
        assert_eq!(service(&mut h, &mut t, &regs), Err(BusError::Overflow));
        assert!(t.released);
        assert_eq!(t.sent, None);
    }

    #[test]
    fn write_does_not_drain() {
        let regs = RegisterFile::new();
        let mut h = BusHandler::new();
        let mut t = OneShot::new(BusEvent::data_write(2), 7);
        assert_eq!(service(&mut h, &mut t, &regs), Ok(true));
        assert_eq!(t.busy_polls, 7);
    }
}
