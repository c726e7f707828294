// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Registers for a single motor channel.
//!
//! Each field is a byte-sized atomic. Relaxed loads and stores compile to plain byte accesses on
//! Cortex-M, so a reader in either context sees either the old or the new value, never a torn one.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::{DEFAULT_ACCEL_RATE, DEFAULT_ACCEL_TYPE, DEFAULT_MINIMUM_DUTY};

/// Selects how the PWM engine toggles a channel's output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MotorType {
    Dc = 0,
    Servo = 1,
}

impl MotorType {
    /// Decode a 2-bit type code. Codes 2 and 3 are reserved.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dc),
            1 => Some(Self::Servo),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Law used to move `duty` towards `target`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AccelType {
    Instant = 0,
    Linear = 1,
    Exponential = 2,
}

impl AccelType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Instant),
            1 => Some(Self::Linear),
            2 => Some(Self::Exponential),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Rotation sense of a channel.
///
/// `Forward` drives the direction pin high and the counter-direction pin low.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Reverse,
    Forward,
}

impl Direction {
    #[inline]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Forward
        } else {
            Self::Reverse
        }
    }

    #[inline]
    pub fn bit(self) -> bool {
        self == Self::Forward
    }
}

/// Shared registers of one motor channel.
///
/// Writers:
/// - bus handler: `target`, `target_direction`, `enabled`, `paused`, `motor_type`,
///   `minimum_duty`, `accel_type`, `accel_rate`
/// - PWM engine: `duty`, `direction`
pub struct MotorRegisters {
    enabled: AtomicBool,
    paused: AtomicBool,
    motor_type: AtomicU8,
    duty: AtomicU8,
    target: AtomicU8,
    direction: AtomicBool,
    target_direction: AtomicBool,
    minimum_duty: AtomicU8,
    accel_type: AtomicU8,
    accel_rate: AtomicU8,
}

impl MotorRegisters {
    /// Power-on state: enabled, DC, stopped, forward.
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            paused: AtomicBool::new(false),
            motor_type: AtomicU8::new(MotorType::Dc as u8),
            duty: AtomicU8::new(0),
            target: AtomicU8::new(0),
            direction: AtomicBool::new(true),
            target_direction: AtomicBool::new(true),
            minimum_duty: AtomicU8::new(DEFAULT_MINIMUM_DUTY),
            accel_type: AtomicU8::new(DEFAULT_ACCEL_TYPE as u8),
            accel_rate: AtomicU8::new(DEFAULT_ACCEL_RATE),
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::Relaxed);
    }

    #[inline]
    pub fn paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_paused(&self, on: bool) {
        self.paused.store(on, Ordering::Relaxed);
    }

    #[inline]
    pub fn motor_type(&self) -> MotorType {
        MotorType::from_code(self.motor_type.load(Ordering::Relaxed)).unwrap_or(MotorType::Dc)
    }

    #[inline]
    pub fn set_motor_type(&self, motor_type: MotorType) {
        self.motor_type.store(motor_type.code(), Ordering::Relaxed);
    }

    /// Current PWM compare value.
    #[inline]
    pub fn duty(&self) -> u8 {
        self.duty.load(Ordering::Relaxed)
    }

    /// Only the PWM engine calls this.
    #[inline]
    pub fn set_duty(&self, duty: u8) {
        self.duty.store(duty, Ordering::Relaxed);
    }

    #[inline]
    pub fn target(&self) -> u8 {
        self.target.load(Ordering::Relaxed)
    }

    /// Store a speed command. Values under the minimum duty become a stop command (0).
    pub fn set_speed(&self, value: u8) {
        let target = if value < self.minimum_duty() { 0 } else { value };
        self.target.store(target, Ordering::Relaxed);
    }

    /// Target as the engine should chase it: anything below the movement floor means stop.
    ///
    /// Differs from [`target`](Self::target) only when the floor was raised after the speed was
    /// written.
    pub fn effective_target(&self) -> u8 {
        let target = self.target();
        if target < self.minimum_duty() {
            0
        } else {
            target
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_bit(self.direction.load(Ordering::Relaxed))
    }

    /// Only the PWM engine calls this, and only while `duty == 0`.
    #[inline]
    pub fn set_direction(&self, direction: Direction) {
        self.direction.store(direction.bit(), Ordering::Relaxed);
    }

    #[inline]
    pub fn target_direction(&self) -> Direction {
        Direction::from_bit(self.target_direction.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_target_direction(&self, direction: Direction) {
        self.target_direction.store(direction.bit(), Ordering::Relaxed);
    }

    #[inline]
    pub fn minimum_duty(&self) -> u8 {
        self.minimum_duty.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_minimum_duty(&self, floor: u8) {
        self.minimum_duty.store(floor, Ordering::Relaxed);
    }

    #[inline]
    pub fn accel_type(&self) -> AccelType {
        AccelType::from_code(self.accel_type.load(Ordering::Relaxed)).unwrap_or(DEFAULT_ACCEL_TYPE)
    }

    #[inline]
    pub fn set_accel_type(&self, accel: AccelType) {
        self.accel_type.store(accel.code(), Ordering::Relaxed);
    }

    /// Main-loop iterations between acceleration steps, minus one.
    #[inline]
    pub fn accel_rate(&self) -> u8 {
        self.accel_rate.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_accel_rate(&self, rate: u8) {
        self.accel_rate.store(rate, Ordering::Relaxed);
    }

    /// Plain copy of every field.
    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            enabled: self.enabled(),
            paused: self.paused(),
            motor_type: self.motor_type(),
            duty: self.duty(),
            target: self.target(),
            direction: self.direction(),
            target_direction: self.target_direction(),
            minimum_duty: self.minimum_duty(),
            accel_type: self.accel_type(),
            accel_rate: self.accel_rate(),
        }
    }
}

impl Default for MotorRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-atomic copy of [`MotorRegisters`], for logging and comparisons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotorSnapshot {
    pub enabled: bool,
    pub paused: bool,
    pub motor_type: MotorType,
    pub duty: u8,
    pub target: u8,
    pub direction: Direction,
    pub target_direction: Direction,
    pub minimum_duty: u8,
    pub accel_type: AccelType,
    pub accel_rate: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_defaults() {
        let m = MotorRegisters::new();
        let s = m.snapshot();
        assert!(s.enabled);
        assert!(!s.paused);
        assert_eq!(s.motor_type, MotorType::Dc);
        assert_eq!(s.duty, 0);
        assert_eq!(s.target, 0);
        assert_eq!(s.direction, Direction::Forward);
        assert_eq!(s.target_direction, Direction::Forward);
        assert_eq!(s.accel_type, AccelType::Exponential);
        assert_eq!(s.accel_rate, 150);
    }

    #[test]
    fn speed_below_floor_is_a_stop() {
        let m = MotorRegisters::new();
        m.set_minimum_duty(20);
        m.set_speed(10);
        assert_eq!(m.target(), 0);
        m.set_speed(20);
        assert_eq!(m.target(), 20);
    }

    #[test]
    fn raising_floor_after_write_stops_the_motor() {
        let m = MotorRegisters::new();
        m.set_speed(40);
        m.set_minimum_duty(60);
        assert_eq!(m.target(), 40);
        assert_eq!(m.effective_target(), 0);
    }

    #[test]
    fn reserved_codes_are_rejected() {
        assert_eq!(MotorType::from_code(2), None);
        assert_eq!(MotorType::from_code(3), None);
        assert_eq!(AccelType::from_code(3), None);
        assert_eq!(AccelType::from_code(2), Some(AccelType::Exponential));
    }
}
