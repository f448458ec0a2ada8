//! The fixed digit palette the learner picks from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DrillError;

/// Largest digit offered by the palette.
pub const MAX_DIGIT: u8 = 10;

/// Number of buttons in the palette.
pub const PALETTE_LEN: usize = MAX_DIGIT as usize + 1;

/// A selectable digit, always within `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    /// Build a digit, rejecting values outside the palette.
    pub fn new(value: u8) -> Result<Self, DrillError> {
        if value > MAX_DIGIT {
            return Err(DrillError::DigitOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub(crate) fn clamped(value: u8) -> Self {
        Self(value.min(MAX_DIGIT))
    }

    /// Raw integer value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Map a keyboard character to a digit. Only `0`-`9` have a key;
    /// 10 is reached through palette navigation.
    pub fn from_key(ch: char) -> Option<Self> {
        ch.to_digit(10).map(|value| Self(value as u8))
    }

    /// Position of this digit inside [`DIGIT_PALETTE`].
    pub fn palette_index(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = DrillError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered palette `0..=10`, constant for the process lifetime.
pub const DIGIT_PALETTE: [Digit; PALETTE_LEN] = [
    Digit(0),
    Digit(1),
    Digit(2),
    Digit(3),
    Digit(4),
    Digit(5),
    Digit(6),
    Digit(7),
    Digit(8),
    Digit(9),
    Digit(10),
];

/// Iterate the palette in display order.
pub fn palette() -> impl Iterator<Item = Digit> {
    DIGIT_PALETTE.into_iter()
}
