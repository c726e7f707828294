// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 2-bit-per-channel packing used by `ALL_MOTOR_TYPE` and `ALL_DIRECTION`.
//!
//! Channel `i` lives in bits `[2i+1:2i]`, so channel 0 is the least significant pair.

use crate::config::CHANNELS;

const FIELD_MASK: u8 = 0b11;

/// Pack four 2-bit fields into one byte. Bits above the low two of each field are dropped.
pub fn pack(fields: [u8; CHANNELS]) -> u8 {
    fields
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &f)| acc | ((f & FIELD_MASK) << (2 * i)))
}

/// Split a byte into four 2-bit fields.
pub fn unpack(byte: u8) -> [u8; CHANNELS] {
    core::array::from_fn(|i| (byte >> (2 * i)) & FIELD_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_zero_is_least_significant() {
        assert_eq!(pack([1, 0, 0, 0]), 0b0000_0001);
        assert_eq!(pack([0, 0, 0, 1]), 0b0100_0000);
        assert_eq!(unpack(0b1000_0000), [0, 0, 0, 2]);
    }

    #[test]
    fn wide_fields_are_masked() {
        assert_eq!(pack([0xFF, 0, 0, 0]), 0b11);
    }

    #[test]
    fn unpack_inverts_pack() {
        let fields = [3, 0, 2, 1];
        assert_eq!(unpack(pack(fields)), fields);
        assert_eq!(pack(unpack(0xA5)), 0xA5);
    }
}
