// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Logical output lines and the driver interface used to set them.

/// Logical output line identifier. The board layer maps it to a physical pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PinId(pub u8);

impl PinId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The three lines that drive one H-bridge channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelPins {
    /// PWM output (enable input of the bridge).
    pub output: PinId,
    /// Direction input, high for forward.
    pub direction: PinId,
    /// Counter-direction input, always the inverse of `direction`.
    pub counter_direction: PinId,
}

impl ChannelPins {
    pub const fn new(output: u8, direction: u8, counter_direction: u8) -> Self {
        Self {
            output: PinId(output),
            direction: PinId(direction),
            counter_direction: PinId(counter_direction),
        }
    }
}

/// Pin assignment of the four channels on the controller board.
///
/// Chosen so the outputs appear in the same order on every header.
pub const BOARD_CHANNEL_PINS: [ChannelPins; 4] = [
    ChannelPins::new(0, 1, 2),
    ChannelPins::new(5, 4, 3),
    ChannelPins::new(6, 7, 9),
    ChannelPins::new(11, 10, 8),
];

/// Number of distinct logical lines used by [`BOARD_CHANNEL_PINS`].
pub const BOARD_PIN_COUNT: usize = 12;

/// Sets a logical output line high or low.
pub trait PinDriver {
    fn set_pin(&mut self, pin: PinId, high: bool);

    /// Drive a complementary pair: the line going low is written first, so the two are never
    /// high together.
    fn set_complementary(&mut self, high: PinId, low: PinId) {
        self.set_pin(low, false);
        self.set_pin(high, true);
    }
}

impl<T: PinDriver + ?Sized> PinDriver for &mut T {
    #[inline]
    fn set_pin(&mut self, pin: PinId, high: bool) {
        (**self).set_pin(pin, high)
    }

    #[inline]
    fn set_complementary(&mut self, high: PinId, low: PinId) {
        (**self).set_complementary(high, low)
    }
}
