// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Slave-side I2C register state machine.
//!
//! The handler sees one classified byte at a time and turns it into register-file updates or a
//! response byte. It never touches hardware, so it runs the same in the interrupt and in tests.
//!
//! Transactions:
//! - write: `[addr+W] [register] [value]*`. Each value goes to the selected register and the
//!   selection then advances by one, so several consecutive registers can be streamed.
//! - read: `[addr+R]` then one response per clocked byte, starting at the register selected by
//!   the last write and advancing by one per byte.

use crate::config::CHANNELS;
use crate::motors::{AccelType, Direction, MotorRegisters, MotorType, RegisterFile};
use crate::protocol::packing::{pack, unpack};
use crate::protocol::registers::{Register, SENTINEL};

/// Whether the byte was an address byte or a data byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Address,
    Data,
}

/// Direction of the transfer, from the master's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    Write,
    Read,
}

/// Error conditions latched by the peripheral for this byte.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BusFlags {
    /// A byte arrived before the previous one was read.
    pub overflow: bool,
    /// Bus error or write collision.
    pub collision: bool,
}

impl BusFlags {
    #[inline]
    pub fn any(&self) -> bool {
        self.overflow || self.collision
    }
}

/// One byte-level bus event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusEvent {
    pub byte: u8,
    pub phase: Phase,
    pub transfer: Transfer,
    pub flags: BusFlags,
}

impl BusEvent {
    pub fn address(transfer: Transfer) -> Self {
        let rw = match transfer {
            Transfer::Write => 0,
            Transfer::Read => 1,
        };
        Self {
            byte: (crate::config::I2C_ADDRESS << 1) | rw,
            phase: Phase::Address,
            transfer,
            flags: BusFlags::default(),
        }
    }

    /// Data byte written by the master.
    pub fn data_write(byte: u8) -> Self {
        Self {
            byte,
            phase: Phase::Data,
            transfer: Transfer::Write,
            flags: BusFlags::default(),
        }
    }

    /// Master is clocking out a byte from us.
    pub fn data_read() -> Self {
        Self {
            byte: 0,
            phase: Phase::Data,
            transfer: Transfer::Read,
            flags: BusFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: BusFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Next written data byte selects a register.
    AwaitingRegister,
    /// A register is selected; writes store into it and reads come from it.
    Selected(u8),
}

impl State {
    /// Id 0 is not a register, so selecting it (or wrapping onto it) means nothing is selected.
    fn select(id: u8) -> Self {
        if id == 0 {
            State::AwaitingRegister
        } else {
            State::Selected(id)
        }
    }
}

pub struct BusHandler {
    state: State,
}

impl BusHandler {
    pub const fn new() -> Self {
        Self {
            state: State::AwaitingRegister,
        }
    }

    /// Currently selected register id, if any.
    pub fn selected(&self) -> Option<u8> {
        match self.state {
            State::AwaitingRegister => None,
            State::Selected(id) => Some(id),
        }
    }

    /// Process one bus event. Returns the byte to transmit for read-data events.
    pub fn handle(&mut self, event: BusEvent, regs: &RegisterFile) -> Option<u8> {
        if event.flags.any() {
            log::warn!("i2c: dropped byte {:#04x} ({:?})", event.byte, event.flags);
            return None;
        }

        match (event.phase, event.transfer) {
            (Phase::Address, Transfer::Write) => {
                self.state = State::AwaitingRegister;
                None
            }
            (Phase::Data, Transfer::Write) => {
                match self.state {
                    State::AwaitingRegister => self.state = State::select(event.byte),
                    State::Selected(id) => {
                        write_register(regs, id, event.byte);
                        self.state = State::select(id.wrapping_add(1));
                    }
                }
                None
            }
            (Phase::Address, Transfer::Read) => None,
            (Phase::Data, Transfer::Read) => match self.state {
                State::AwaitingRegister => Some(SENTINEL),
                State::Selected(id) => {
                    let byte = read_register(regs, id);
                    self.state = State::select(id.wrapping_add(1));
                    Some(byte)
                }
            },
        }
    }
}

impl Default for BusHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a host write. Unmapped and read-only ids are ignored.
pub fn write_register(regs: &RegisterFile, id: u8, value: u8) {
    let Some(register) = Register::from_id(id) else {
        log::debug!("i2c: write to unmapped register {}", id);
        return;
    };
    if register.is_read_only() {
        log::debug!("i2c: write to read-only register {}", id);
        return;
    }
    log::debug!("i2c: reg {} <- {:#04x}", id, value);

    let motors = regs.motors();
    let bit = value & 1 != 0;

    match register {
        Register::AllSpeed => motors.iter().for_each(|m| m.set_speed(value)),
        Register::Speed(i) => motors[i].set_speed(value),

        Register::AllMotorType => {
            for (m, code) in motors.iter().zip(unpack(value)) {
                if let Some(t) = MotorType::from_code(code) {
                    m.set_motor_type(t);
                }
            }
        }
        Register::MotorType(i) => {
            if let Some(t) = MotorType::from_code(value) {
                motors[i].set_motor_type(t);
            }
        }

        Register::AllDirection => {
            for (m, field) in motors.iter().zip(unpack(value)) {
                m.set_target_direction(Direction::from_bit(field & 1 != 0));
            }
        }
        Register::Direction(i) => motors[i].set_target_direction(Direction::from_bit(bit)),

        Register::AllPause => regs.set_pwm_pause(bit),
        Register::Pause(i) => motors[i].set_paused(bit),

        Register::AllEnable => regs.set_pwm_enable(bit),
        Register::Enable(i) => motors[i].set_enabled(bit),

        Register::AllAccelType => {
            if let Some(a) = AccelType::from_code(value) {
                motors.iter().for_each(|m| m.set_accel_type(a));
            }
        }
        Register::AccelType(i) => {
            if let Some(a) = AccelType::from_code(value) {
                motors[i].set_accel_type(a);
            }
        }

        Register::AllAccelRate => motors.iter().for_each(|m| m.set_accel_rate(value)),
        Register::AccelRate(i) => motors[i].set_accel_rate(value),

        Register::AllMinDuty => motors.iter().for_each(|m| m.set_minimum_duty(value)),
        Register::MinDuty(i) => motors[i].set_minimum_duty(value),

        Register::Target(_) | Register::DirectionState(_) | Register::Duty(_) => {}
    }
}

/// Byte the host sees when reading register `id`.
pub fn read_register(regs: &RegisterFile, id: u8) -> u8 {
    let Some(register) = Register::from_id(id) else {
        return SENTINEL;
    };
    let motors = regs.motors();

    match register {
        Register::AllSpeed => uniform(motors, MotorRegisters::target),
        Register::Speed(i) | Register::Target(i) => motors[i].target(),

        Register::AllMotorType => pack(motors.each(|m| m.motor_type().code())),
        Register::MotorType(i) => motors[i].motor_type().code(),

        Register::AllDirection => pack(motors.each(|m| m.target_direction().bit() as u8)),
        Register::Direction(i) => motors[i].target_direction().bit() as u8,

        Register::AllPause => regs.pwm_pause() as u8,
        Register::Pause(i) => motors[i].paused() as u8,

        Register::AllEnable => regs.pwm_enable() as u8,
        Register::Enable(i) => motors[i].enabled() as u8,

        Register::AllAccelType => uniform(motors, |m| m.accel_type().code()),
        Register::AccelType(i) => motors[i].accel_type().code(),

        Register::AllAccelRate => uniform(motors, MotorRegisters::accel_rate),
        Register::AccelRate(i) => motors[i].accel_rate(),

        Register::AllMinDuty => uniform(motors, MotorRegisters::minimum_duty),
        Register::MinDuty(i) => motors[i].minimum_duty(),

        Register::DirectionState(i) => motors[i].direction().bit() as u8,
        Register::Duty(i) => motors[i].duty(),
    }
}

/// Value shared by every channel, or the sentinel if they differ.
fn uniform(motors: &[MotorRegisters; CHANNELS], field: impl Fn(&MotorRegisters) -> u8) -> u8 {
    let first = field(&motors[0]);
    if motors.iter().all(|m| field(m) == first) {
        first
    } else {
        SENTINEL
    }
}

trait EachChannel {
    fn each(&self, f: impl Fn(&MotorRegisters) -> u8) -> [u8; CHANNELS];
}

impl EachChannel for [MotorRegisters; CHANNELS] {
    fn each(&self, f: impl Fn(&MotorRegisters) -> u8) -> [u8; CHANNELS] {
        core::array::from_fn(|i| f(&self[i]))
    }
}
