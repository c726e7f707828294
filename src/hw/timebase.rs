// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared PWM time base on TIM3.
//!
//! TIM3 free-runs as an up-counter from 0 to 255 and wraps. Every software PWM channel compares
//! against the same count, so all four outputs share one frame.

use stm32f7xx_hal::pac;

use crate::config::TIMEBASE_PRESCALER;

/// Top of the count; one frame is `PERIOD + 1` ticks.
const PERIOD: u32 = 0xFF;

pub struct TimeBase {
    tim: pac::TIM3,
}

impl TimeBase {
    /// Configure TIM3 as an 8-bit free-running counter.
    pub fn tim3(tim3: pac::TIM3) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());

        let tim = tim3;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc.write(|w| unsafe { w.bits(TIMEBASE_PRESCALER as u32) });
        tim.arr.write(|w| unsafe { w.bits(PERIOD) });

        // Latch the prescaler now instead of at the first overflow
        tim.egr.write(|w| w.ug().set_bit());

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Current position in the PWM frame.
    #[inline]
    pub fn now(&self) -> u8 {
        self.tim.cnt.read().bits() as u8
    }
}
