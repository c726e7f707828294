// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Acceleration laws.
//!
//! All functions are pure: they take the current duty and return the next one. The PWM engine
//! calls them once per acceleration tick.
//!
//! `floor` is the channel's minimum duty, the lowest value at which the motor actually turns.
//! Below it a channel is either stopped (duty 0) or jumps straight to the floor.

use crate::motors::AccelType;

/// Step size bands for [`AccelType::Exponential`], keyed on distance above the floor.
///
/// Tuned on hardware; the values define observable ramp timing.
const EXPONENTIAL_BANDS: [(u8, u8); 4] = [(150, 25), (100, 20), (75, 10), (50, 5)];

/// Distance above the floor past which the top band applies.
const EXPONENTIAL_TOP_BAND: u8 = 200;

/// Step taken when decaying in the top band.
const EXPONENTIAL_TOP_DECAY: u8 = 50;

/// Size of one exponential step from `current` towards `target`.
///
/// Large far from the floor and 1 near it. When growing in the top band the step covers the whole
/// remaining distance. The result never carries `current` past `target`.
pub fn exponential_step(current: u8, target: u8, floor: u8) -> u8 {
    let remaining = current.abs_diff(target);
    let height = current.saturating_sub(floor);

    let step = if height > EXPONENTIAL_TOP_BAND {
        if current > target {
            EXPONENTIAL_TOP_DECAY
        } else {
            remaining
        }
    } else {
        EXPONENTIAL_BANDS
            .iter()
            .find(|&&(above, _)| height > above)
            .map_or(1, |&(_, step)| step)
    };

    step.min(remaining)
}

/// Next duty when chasing `target`.
///
/// `target` must already be the effective target (0 if below the floor).
pub fn approach(duty: u8, target: u8, floor: u8, accel: AccelType) -> u8 {
    let duty = if duty < floor && target >= floor {
        floor
    } else if duty <= floor && target < floor {
        0
    } else {
        duty
    };

    match accel {
        AccelType::Instant => target,
        AccelType::Linear => {
            if duty > target {
                duty - 1
            } else if duty < target {
                duty + 1
            } else {
                duty
            }
        }
        AccelType::Exponential => {
            let step = exponential_step(duty, target, floor);
            if duty > target {
                duty - step
            } else {
                duty + step
            }
        }
    }
}

/// Next duty when bringing a channel to a stop.
///
/// Ramps down to the floor with the given law, then drops to 0.
pub fn stop(duty: u8, floor: u8, accel: AccelType) -> u8 {
    if duty <= floor {
        return 0;
    }
    match accel {
        AccelType::Instant => 0,
        AccelType::Linear => duty - 1,
        AccelType::Exponential => duty - exponential_step(duty, floor, floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_bands() {
        assert_eq!(exponential_step(255, 0, 0), 50);
        assert_eq!(exponential_step(201, 0, 0), 50);
        assert_eq!(exponential_step(200, 0, 0), 25);
        assert_eq!(exponential_step(151, 0, 0), 25);
        assert_eq!(exponential_step(150, 0, 0), 20);
        assert_eq!(exponential_step(101, 0, 0), 20);
        assert_eq!(exponential_step(100, 0, 0), 10);
        assert_eq!(exponential_step(76, 0, 0), 10);
        assert_eq!(exponential_step(75, 0, 0), 5);
        assert_eq!(exponential_step(51, 0, 0), 5);
        assert_eq!(exponential_step(50, 0, 0), 1);
        assert_eq!(exponential_step(1, 0, 0), 1);
    }

    #[test]
    fn bands_are_relative_to_floor() {
        assert_eq!(exponential_step(100, 0, 0), 10);
        assert_eq!(exponential_step(100, 0, 30), 5);
        assert_eq!(exponential_step(100, 0, 60), 1);
        assert_eq!(exponential_step(10, 0, 30), 1);
    }

    #[test]
    fn top_band_growth_covers_remaining_distance() {
        assert_eq!(exponential_step(210, 250, 0), 40);
        assert_eq!(exponential_step(200, 250, 0), 25);
    }

    #[test]
    fn never_overshoots() {
        for floor in [0u8, 20, 90] {
            for current in 0..=255u8 {
                for target in (0..=255u8).step_by(7) {
                    let step = exponential_step(current, target, floor);
                    assert!(step <= current.abs_diff(target));
                    if current != target {
                        assert!(step >= 1);
                    }
                }
            }
        }
    }

    #[test]
    fn decay_step_grows_with_distance() {
        // Stopping ramps towards the floor, so distance to target and height coincide.
        for floor in [0u8, 20, 40] {
            let mut last = 0;
            for current in floor..=255 {
                let step = exponential_step(current, floor, floor);
                assert!(step >= last, "step shrank at {current} (floor {floor})");
                last = step;
            }
        }
    }

    #[test]
    fn instant_snaps() {
        assert_eq!(approach(0, 200, 0, AccelType::Instant), 200);
        assert_eq!(approach(200, 0, 0, AccelType::Instant), 0);
        assert_eq!(stop(200, 10, AccelType::Instant), 0);
    }

    #[test]
    fn linear_moves_one_unit() {
        assert_eq!(approach(10, 20, 0, AccelType::Linear), 11);
        assert_eq!(approach(20, 10, 0, AccelType::Linear), 19);
        assert_eq!(approach(20, 20, 0, AccelType::Linear), 20);
    }

    #[test]
    fn starting_jumps_to_floor() {
        assert_eq!(approach(0, 100, 30, AccelType::Linear), 31);
        assert_eq!(approach(0, 100, 30, AccelType::Exponential), 31);
        assert_eq!(approach(0, 30, 30, AccelType::Linear), 30);
    }

    #[test]
    fn slowing_under_floor_drops_to_zero() {
        assert_eq!(approach(30, 0, 30, AccelType::Linear), 0);
        assert_eq!(approach(31, 0, 30, AccelType::Linear), 30);
        assert_eq!(stop(31, 30, AccelType::Linear), 30);
        assert_eq!(stop(30, 30, AccelType::Linear), 0);
        assert_eq!(stop(30, 30, AccelType::Exponential), 0);
    }

    #[test]
    fn exponential_stop_never_dips_below_floor_before_zero() {
        let floor = 40;
        let mut duty = 255;
        while duty > 0 {
            let next = stop(duty, floor, AccelType::Exponential);
            assert!(next < duty);
            assert!(next == 0 || next >= floor);
            duty = next;
        }
    }
}
