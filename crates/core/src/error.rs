//! Errors raised while constructing drill values.

use thiserror::Error;

use crate::problem::{MAX_TARGET_NUMBER, MIN_TARGET_NUMBER};

/// Failure to build a domain value from raw integers.
///
/// State transitions never fail; only the constructors that guard the
/// numeric ranges return this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrillError {
    /// A palette digit outside `0..=10`.
    #[error("digit {0} is outside the palette 0..=10")]
    DigitOutOfRange(u8),
    /// A target outside the configured bounds.
    #[error(
        "target {0} is outside {min}..={max}",
        min = MIN_TARGET_NUMBER,
        max = MAX_TARGET_NUMBER
    )]
    TargetOutOfRange(u8),
    /// A given operand larger than its target.
    #[error("given operand {given} exceeds target {target}")]
    GivenExceedsTarget {
        /// Offending given operand.
        given: u8,
        /// Target it was paired with.
        target: u8,
    },
}
