// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register map exposed over I2C.
//!
//! Ids 1..=40 come in groups of five: the `ALL_*` register first, then one register per channel.
//! Ids 41..=52 are read-only views of engine state.

/// Byte returned for reads of unmapped registers.
pub const SENTINEL: u8 = 0xFF;

// Register ids
pub mod reg {
    pub const ALL_SPEED: u8 = 1;
    pub const MOTOR_0_SPEED: u8 = 2;
    pub const ALL_MOTOR_TYPE: u8 = 6;
    pub const MOTOR_0_TYPE: u8 = 7;
    pub const ALL_DIRECTION: u8 = 11;
    pub const MOTOR_0_DIRECTION: u8 = 12;
    pub const ALL_PAUSE: u8 = 16;
    pub const MOTOR_0_PAUSE: u8 = 17;
    pub const ALL_ENABLE: u8 = 21;
    pub const MOTOR_0_ENABLE: u8 = 22;
    pub const ALL_ACCEL_TYPE: u8 = 26;
    pub const MOTOR_0_ACCEL_TYPE: u8 = 27;
    pub const ALL_ACCEL_RATE: u8 = 31;
    pub const MOTOR_0_ACCEL_RATE: u8 = 32;
    pub const ALL_MIN_DUTY: u8 = 36;
    pub const MOTOR_0_MIN_DUTY: u8 = 37;
    pub const MOTOR_0_TARGET: u8 = 41;
    pub const MOTOR_0_DIRECTION_STATE: u8 = 45;
    pub const MOTOR_0_DUTY: u8 = 49;

    /// Highest mapped id.
    pub const LAST: u8 = 52;
}

/// A decoded register id. Channel variants carry the channel index (0..=3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    AllSpeed,
    Speed(usize),
    AllMotorType,
    MotorType(usize),
    AllDirection,
    Direction(usize),
    AllPause,
    Pause(usize),
    AllEnable,
    Enable(usize),
    AllAccelType,
    AccelType(usize),
    AllAccelRate,
    AccelRate(usize),
    AllMinDuty,
    MinDuty(usize),
    Target(usize),
    DirectionState(usize),
    Duty(usize),
}

impl Register {
    /// Decode a register id, `None` if unmapped.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=40 => {
                let group = (id - 1) / 5;
                let slot = ((id - 1) % 5) as usize;
                let reg = match (group, slot) {
                    (0, 0) => Self::AllSpeed,
                    (0, n) => Self::Speed(n - 1),
                    (1, 0) => Self::AllMotorType,
                    (1, n) => Self::MotorType(n - 1),
                    (2, 0) => Self::AllDirection,
                    (2, n) => Self::Direction(n - 1),
                    (3, 0) => Self::AllPause,
                    (3, n) => Self::Pause(n - 1),
                    (4, 0) => Self::AllEnable,
                    (4, n) => Self::Enable(n - 1),
                    (5, 0) => Self::AllAccelType,
                    (5, n) => Self::AccelType(n - 1),
                    (6, 0) => Self::AllAccelRate,
                    (6, n) => Self::AccelRate(n - 1),
                    (7, 0) => Self::AllMinDuty,
                    (_, n) => Self::MinDuty(n - 1),
                };
                Some(reg)
            }
            41..=44 => Some(Self::Target((id - reg::MOTOR_0_TARGET) as usize)),
            45..=48 => Some(Self::DirectionState((id - reg::MOTOR_0_DIRECTION_STATE) as usize)),
            49..=52 => Some(Self::Duty((id - reg::MOTOR_0_DUTY) as usize)),
            _ => None,
        }
    }

    /// Registers the host may only read. Writes to them are ignored.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::Target(_) | Self::DirectionState(_) | Self::Duty(_)
        )
    }
}
