// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI devboard running the motor HAT firmware.

use stm32f7xx_hal::{
    gpio::{gpiod, gpiof, Alternate, Output, PinState, PushPull},
    pac,
    prelude::*,
};

use crate::motors::{PinDriver, PinId};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOF);
/// ```
pub struct BoardPins {
    pub outputs: PinBank,
    pub usart3: Usart3Pins,
}

/// USART3 routed to the ST-LINK virtual COM port.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// The twelve logical output lines, indexed by [`PinId`].
///
/// | id | pin | id | pin |
/// | -- | --- | -- | --- |
/// | 0 | PD0 | 6 | PD6 |
/// | 1 | PD1 | 7 | PD7 |
/// | 2 | PD2 | 8 | PF12 |
/// | 3 | PD3 | 9 | PF13 |
/// | 4 | PD4 | 10 | PF14 |
/// | 5 | PD5 | 11 | PF15 |
pub struct PinBank {
    pub l0: gpiod::PD0<Output<PushPull>>,
    pub l1: gpiod::PD1<Output<PushPull>>,
    pub l2: gpiod::PD2<Output<PushPull>>,
    pub l3: gpiod::PD3<Output<PushPull>>,
    pub l4: gpiod::PD4<Output<PushPull>>,
    pub l5: gpiod::PD5<Output<PushPull>>,
    pub l6: gpiod::PD6<Output<PushPull>>,
    pub l7: gpiod::PD7<Output<PushPull>>,
    pub l8: gpiof::PF12<Output<PushPull>>,
    pub l9: gpiof::PF13<Output<PushPull>>,
    pub l10: gpiof::PF14<Output<PushPull>>,
    pub l11: gpiof::PF15<Output<PushPull>>,
}

impl PinDriver for PinBank {
    fn set_pin(&mut self, pin: PinId, high: bool) {
        let state = if high { PinState::High } else { PinState::Low };
        match pin.0 {
            0 => self.l0.set_state(state),
            1 => self.l1.set_state(state),
            2 => self.l2.set_state(state),
            3 => self.l3.set_state(state),
            4 => self.l4.set_state(state),
            5 => self.l5.set_state(state),
            6 => self.l6.set_state(state),
            7 => self.l7.set_state(state),
            8 => self.l8.set_state(state),
            9 => self.l9.set_state(state),
            10 => self.l10.set_state(state),
            11 => self.l11.set_state(state),
            _ => {}
        }
    }
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    ///
    /// I2C1 (PB8 SCL, PB9 SDA) is switched to open-drain AF4 here and never touched again; the
    /// slave driver talks to the peripheral registers directly.
    pub fn new(gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpiof: pac::GPIOF) -> Self {
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpiof = gpiof.split();

        let _scl = gpiob.pb8.into_alternate_open_drain::<4>();
        let _sda = gpiob.pb9.into_alternate_open_drain::<4>();

        Self {
            outputs: PinBank {
                l0: gpiod.pd0.into_push_pull_output(),
                l1: gpiod.pd1.into_push_pull_output(),
                l2: gpiod.pd2.into_push_pull_output(),
                l3: gpiod.pd3.into_push_pull_output(),
                l4: gpiod.pd4.into_push_pull_output(),
                l5: gpiod.pd5.into_push_pull_output(),
                l6: gpiod.pd6.into_push_pull_output(),
                l7: gpiod.pd7.into_push_pull_output(),
                l8: gpiof.pf12.into_push_pull_output(),
                l9: gpiof.pf13.into_push_pull_output(),
                l10: gpiof.pf14.into_push_pull_output(),
                l11: gpiof.pf15.into_push_pull_output(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },
        }
    }
}
