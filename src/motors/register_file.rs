// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The register file shared by the I2C handler and the PWM engine.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::CHANNELS;
use crate::motors::channel::{MotorRegisters, MotorSnapshot};

/// All motor channels plus the global switches.
///
/// Construct once (it is `const`, so a `static` works) and hand `&RegisterFile` to both the
/// interrupt handler and the main loop. Each field has a single writer; the other side only reads
/// it, and a read may be one iteration stale.
pub struct RegisterFile {
    motors: [MotorRegisters; CHANNELS],
    pwm_enable: AtomicBool,
    pwm_pause: AtomicBool,
}

impl RegisterFile {
    pub const fn new() -> Self {
        Self {
            motors: [
                MotorRegisters::new(),
                MotorRegisters::new(),
                MotorRegisters::new(),
                MotorRegisters::new(),
            ],
            pwm_enable: AtomicBool::new(true),
            pwm_pause: AtomicBool::new(false),
        }
    }

    /// Channel `index`, or `None` past the last channel.
    #[inline]
    pub fn motor(&self, index: usize) -> Option<&MotorRegisters> {
        self.motors.get(index)
    }

    #[inline]
    pub fn motors(&self) -> &[MotorRegisters; CHANNELS] {
        &self.motors
    }

    /// Global kill switch. When false every output is forced low immediately.
    #[inline]
    pub fn pwm_enable(&self) -> bool {
        self.pwm_enable.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_pwm_enable(&self, on: bool) {
        self.pwm_enable.store(on, Ordering::Relaxed);
    }

    /// Global soft stop. Channels ramp down and stay at zero while set.
    #[inline]
    pub fn pwm_pause(&self) -> bool {
        self.pwm_pause.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_pwm_pause(&self, on: bool) {
        self.pwm_pause.store(on, Ordering::Relaxed);
    }

    /// Plain copy of the whole file.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            motors: [
                self.motors[0].snapshot(),
                self.motors[1].snapshot(),
                self.motors[2].snapshot(),
                self.motors[3].snapshot(),
            ],
            pwm_enable: self.pwm_enable(),
            pwm_pause: self.pwm_pause(),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-atomic copy of a [`RegisterFile`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub motors: [MotorSnapshot; CHANNELS],
    pub pwm_enable: bool,
    pub pwm_pause: bool,
}
