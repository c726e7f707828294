// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Software PWM for four channels on one free-running counter.
//!
//! The MCU has too few PWM units, so every output is toggled by hand. Each call to
//! [`PwmEngine::poll`] compares the shared 8-bit time base against each channel's duty: below the
//! duty the output is high, at or above it the output is low. A per-channel toggle flag remembers
//! the last commanded level so a pin is only written on an edge.
//!
//! Acceleration runs at a decimated rate: a channel steps its duty once every `accel_rate + 1`
//! polls.

use crate::config::{CHANNELS, SERVO_PHASE_CYCLES};
use crate::control::profile;
use crate::motors::{ChannelPins, Direction, MotorRegisters, MotorType, PinDriver, RegisterFile};

/// State only the engine sees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct ChannelState {
    /// Inside the high part of the current PWM frame.
    toggle: bool,
    /// Last level written to the output pin.
    pin_high: bool,
    /// Frames skipped since the last servo pulse.
    servo_phase: u8,
    /// Polls since the last acceleration step.
    accel_count: u8,
}

pub struct PwmEngine {
    pins: [ChannelPins; CHANNELS],
    channels: [ChannelState; CHANNELS],
}

impl PwmEngine {
    pub fn new(pins: [ChannelPins; CHANNELS]) -> Self {
        Self {
            pins,
            channels: [ChannelState::default(); CHANNELS],
        }
    }

    /// Drive every output low and put each bridge in the channel's current direction.
    pub fn init<D: PinDriver>(&mut self, regs: &RegisterFile, driver: &mut D) {
        for (i, motor) in regs.motors().iter().enumerate() {
            let pins = self.pins[i];
            driver.set_pin(pins.output, false);
            apply_direction(&pins, motor.direction(), driver);
            self.channels[i] = ChannelState::default();
        }
    }

    /// Last level written to channel `index`'s output.
    pub fn output_high(&self, index: usize) -> bool {
        self.channels[index].pin_high
    }

    /// One main-loop iteration. `now` is the shared PWM time base.
    pub fn poll<D: PinDriver>(&mut self, now: u8, regs: &RegisterFile, driver: &mut D) {
        let enabled = regs.pwm_enable();
        for (i, motor) in regs.motors().iter().enumerate() {
            self.update_output(i, now, enabled && motor.enabled(), motor, driver);
        }

        for (i, motor) in regs.motors().iter().enumerate() {
            let ch = &mut self.channels[i];
            if ch.accel_count >= motor.accel_rate() {
                ch.accel_count = 0;
                self.accelerate_channel(i, regs, driver);
            } else {
                ch.accel_count += 1;
            }
        }
    }

    fn update_output<D: PinDriver>(
        &mut self,
        index: usize,
        now: u8,
        active: bool,
        motor: &MotorRegisters,
        driver: &mut D,
    ) {
        let out = self.pins[index].output;
        let ch = &mut self.channels[index];

        if !active {
            if ch.pin_high {
                driver.set_pin(out, false);
                ch.pin_high = false;
            }
            ch.toggle = false;
            ch.servo_phase = 0;
            return;
        }

        let duty = motor.duty();
        let rising = now < duty && !ch.toggle;
        let falling = now >= duty && ch.toggle;

        match motor.motor_type() {
            MotorType::Dc => {
                if rising {
                    ch.toggle = true;
                    ch.pin_high = true;
                    driver.set_pin(out, true);
                } else if falling {
                    ch.toggle = false;
                    ch.pin_high = false;
                    driver.set_pin(out, false);
                }
            }
            MotorType::Servo => {
                if rising {
                    ch.toggle = true;
                    if ch.servo_phase < SERVO_PHASE_CYCLES {
                        ch.servo_phase += 1;
                    } else {
                        ch.pin_high = true;
                        driver.set_pin(out, true);
                    }
                } else if falling {
                    ch.toggle = false;
                    if ch.pin_high {
                        ch.pin_high = false;
                        ch.servo_phase = 0;
                        driver.set_pin(out, false);
                    }
                }
            }
        }
    }

    /// One acceleration step for channel `index`.
    ///
    /// A paused channel, or one whose requested direction differs from its current one, ramps to
    /// zero; once at zero the direction is switched. Otherwise duty moves towards the target.
    pub fn accelerate_channel<D: PinDriver>(
        &mut self,
        index: usize,
        regs: &RegisterFile,
        driver: &mut D,
    ) {
        let motor = &regs.motors()[index];
        let duty = motor.duty();
        let floor = motor.minimum_duty();
        let accel = motor.accel_type();
        let reversing = motor.direction() != motor.target_direction();

        if regs.pwm_pause() || motor.paused() || reversing {
            if duty > 0 {
                motor.set_duty(profile::stop(duty, floor, accel));
            } else if reversing {
                let direction = motor.target_direction();
                motor.set_direction(direction);
                apply_direction(&self.pins[index], direction, driver);
                log::debug!("pwm: channel {} now {:?}", index, direction);
            }
            return;
        }

        let target = motor.effective_target();
        if duty != target {
            motor.set_duty(profile::approach(duty, target, floor, accel));
        }
    }
}

fn apply_direction<D: PinDriver>(pins: &ChannelPins, direction: Direction, driver: &mut D) {
    match direction {
        Direction::Forward => driver.set_complementary(pins.direction, pins.counter_direction),
        Direction::Reverse => driver.set_complementary(pins.counter_direction, pins.direction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motors::{AccelType, PinId, BOARD_CHANNEL_PINS, BOARD_PIN_COUNT};

    /// Remembers pin levels and counts writes.
    #[derive(Default)]
    struct Recorder {
        levels: [bool; BOARD_PIN_COUNT],
        writes: usize,
    }

    impl PinDriver for Recorder {
        fn set_pin(&mut self, pin: PinId, high: bool) {
            self.levels[pin.index()] = high;
            self.writes += 1;
        }
    }

    impl Recorder {
        fn level(&self, pin: PinId) -> bool {
            self.levels[pin.index()]
        }
    }

    fn engine() -> PwmEngine {
        PwmEngine::new(BOARD_CHANNEL_PINS)
    }

    #[test]
    fn init_sets_forward_bridge() {
        let regs = RegisterFile::new();
        let mut pins = Recorder::default();
        engine().init(&regs, &mut pins);
        for ch in BOARD_CHANNEL_PINS {
            assert!(!pins.level(ch.output));
            assert!(pins.level(ch.direction));
            assert!(!pins.level(ch.counter_direction));
        }
    }

    #[test]
    fn dc_output_follows_counter() {
        let regs = RegisterFile::new();
        regs.motors()[0].set_duty(100);
        let mut pwm = engine();
        let mut pins = Recorder::default();
        let out = BOARD_CHANNEL_PINS[0].output;

        pwm.poll(0, &regs, &mut pins);
        assert!(pins.level(out));
        let writes = pins.writes;
        pwm.poll(99, &regs, &mut pins);
        assert_eq!(pins.writes, writes, "no write without an edge");
        pwm.poll(100, &regs, &mut pins);
        assert!(!pins.level(out));
        pwm.poll(255, &regs, &mut pins);
        assert!(!pins.level(out));
        pwm.poll(3, &regs, &mut pins);
        assert!(pins.level(out));
    }

    #[test]
    fn zero_duty_never_rises() {
        let regs = RegisterFile::new();
        let mut pwm = engine();
        let mut pins = Recorder::default();
        for now in 0..=255u8 {
            pwm.poll(now, &regs, &mut pins);
        }
        assert_eq!(pins.writes, 0);
    }

    #[test]
    fn disabling_forces_output_low() {
        let regs = RegisterFile::new();
        regs.motors()[1].set_duty(200);
        let mut pwm = engine();
        let mut pins = Recorder::default();
        let out = BOARD_CHANNEL_PINS[1].output;

        pwm.poll(0, &regs, &mut pins);
        assert!(pins.level(out));

        regs.motors()[1].set_enabled(false);
        pwm.poll(1, &regs, &mut pins);
        assert!(!pins.level(out));
        assert!(!pwm.output_high(1));

        regs.motors()[1].set_enabled(true);
        regs.set_pwm_enable(false);
        pwm.poll(2, &regs, &mut pins);
        assert!(!pins.level(out));

        regs.set_pwm_enable(true);
        pwm.poll(3, &regs, &mut pins);
        assert!(pins.level(out));
    }

    #[test]
    fn servo_skips_frames_before_pulsing() {
        let regs = RegisterFile::new();
        let motor = &regs.motors()[2];
        motor.set_motor_type(MotorType::Servo);
        motor.set_duty(64);
        let mut pwm = engine();
        let mut pins = Recorder::default();
        let out = BOARD_CHANNEL_PINS[2].output;

        for _ in 0..SERVO_PHASE_CYCLES {
            pwm.poll(0, &regs, &mut pins);
            assert!(!pins.level(out));
            pwm.poll(128, &regs, &mut pins);
            assert!(!pins.level(out));
        }

        pwm.poll(0, &regs, &mut pins);
        assert!(pins.level(out));
        pwm.poll(128, &regs, &mut pins);
        assert!(!pins.level(out));

        // Counter restarted: next frame is skipped again.
        pwm.poll(0, &regs, &mut pins);
        assert!(!pins.level(out));
    }

    #[test]
    fn instant_reaches_target_in_one_tick() {
        let regs = RegisterFile::new();
        let motor = &regs.motors()[1];
        motor.set_accel_type(AccelType::Instant);
        motor.set_speed(200);
        let mut pwm = engine();
        let mut pins = Recorder::default();

        pwm.accelerate_channel(1, &regs, &mut pins);
        assert_eq!(motor.duty(), 200);
    }

    #[test]
    fn acceleration_is_decimated() {
        let regs = RegisterFile::new();
        let motor = &regs.motors()[0];
        motor.set_accel_type(AccelType::Linear);
        motor.set_accel_rate(3);
        motor.set_speed(10);
        let mut pwm = engine();
        let mut pins = Recorder::default();

        for _ in 0..3 {
            pwm.poll(0, &regs, &mut pins);
        }
        assert_eq!(motor.duty(), 0);
        pwm.poll(0, &regs, &mut pins);
        assert_eq!(motor.duty(), 1);
        for _ in 0..4 {
            pwm.poll(0, &regs, &mut pins);
        }
        assert_eq!(motor.duty(), 2);
    }

    #[test]
    fn zero_rate_steps_every_poll() {
        let regs = RegisterFile::new();
        let motor = &regs.motors()[3];
        motor.set_accel_type(AccelType::Linear);
        motor.set_accel_rate(0);
        motor.set_speed(5);
        let mut pwm = engine();
        let mut pins = Recorder::default();
        for _ in 0..5 {
            pwm.poll(0, &regs, &mut pins);
        }
        assert_eq!(motor.duty(), 5);
    }

    #[test]
    fn reversal_waits_for_zero() {
        for accel in [AccelType::Linear, AccelType::Exponential] {
            let regs = RegisterFile::new();
            let motor = &regs.motors()[2];
            let pins_map = BOARD_CHANNEL_PINS[2];
            motor.set_accel_type(accel);
            motor.set_duty(50);
            motor.set_speed(50);
            motor.set_target_direction(Direction::Reverse);

            let mut pwm = engine();
            let mut pins = Recorder::default();
            pwm.init(&regs, &mut pins);

            let mut ticks = 0;
            while motor.duty() > 0 {
                let before = motor.duty();
                pwm.accelerate_channel(2, &regs, &mut pins);
                assert!(motor.duty() < before);
                assert_eq!(motor.direction(), Direction::Forward);
                assert!(pins.level(pins_map.direction));
                ticks += 1;
            }
            assert!(ticks > 1, "{accel:?} stopped in one tick");

            pwm.accelerate_channel(2, &regs, &mut pins);
            assert_eq!(motor.direction(), Direction::Reverse);
            assert!(!pins.level(pins_map.direction));
            assert!(pins.level(pins_map.counter_direction));

            // Then speeds back up in the new direction.
            pwm.accelerate_channel(2, &regs, &mut pins);
            assert_eq!(motor.duty(), 1);
        }
    }

    #[test]
    fn pause_ramps_down_and_holds() {
        let regs = RegisterFile::new();
        let motor = &regs.motors()[0];
        motor.set_accel_type(AccelType::Linear);
        motor.set_duty(3);
        motor.set_speed(3);
        motor.set_paused(true);
        let mut pwm = engine();
        let mut pins = Recorder::default();

        for _ in 0..10 {
            pwm.accelerate_channel(0, &regs, &mut pins);
        }
        assert_eq!(motor.duty(), 0);
        assert_eq!(motor.direction(), Direction::Forward);

        motor.set_paused(false);
        regs.set_pwm_pause(true);
        motor.set_duty(3);
        pwm.accelerate_channel(0, &regs, &mut pins);
        assert_eq!(motor.duty(), 2);

        regs.set_pwm_pause(false);
        pwm.accelerate_channel(0, &regs, &mut pins);
        assert_eq!(motor.duty(), 3);
    }

    #[test]
    fn duty_never_exceeds_highest_target() {
        // Deterministic pseudo-random command stream.
        let mut seed: u32 = 0x1234_5678;
        let mut next = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 24) as u8
        };

        for accel in [AccelType::Instant, AccelType::Linear, AccelType::Exponential] {
            let regs = RegisterFile::new();
            let motor = &regs.motors()[0];
            motor.set_accel_type(accel);
            motor.set_minimum_duty(25);
            let mut pwm = engine();
            let mut pins = Recorder::default();
            let mut highest = 0;

            for round in 0..200 {
                if round % 10 == 0 {
                    motor.set_speed(next());
                    highest = highest.max(motor.target());
                    if next() & 1 == 0 {
                        motor.set_target_direction(Direction::from_bit(next() & 1 == 0));
                    }
                }
                let was = motor.direction();
                let duty_before = motor.duty();
                pwm.accelerate_channel(0, &regs, &mut pins);
                assert!(motor.duty() <= highest);
                if motor.direction() != was {
                    assert_eq!(duty_before, 0);
                }
            }
        }
    }
}
