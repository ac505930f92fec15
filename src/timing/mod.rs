//! Timebase arithmetic shared by the rebaser and the reporting code

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rational timebase: one timestamp unit lasts `num / den` seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// A timebase with a zero term cannot express any duration
    pub fn is_valid(&self) -> bool {
        self.num != 0 && self.den != 0
    }

    /// Convert a timestamp in this timebase to seconds
    pub fn to_seconds(&self, timestamp: i64) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        timestamp as f64 * self.num as f64 / self.den as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Convert `value` expressed in `from` units into `to` units.
///
/// Computes `value * from.num * to.den / (from.den * to.num)` exactly in
/// 128-bit arithmetic and rounds to the nearest integer, ties to even.
/// Results outside the `i64` range saturate. Invalid timebases yield 0.
pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
    if !from.is_valid() || !to.is_valid() {
        return 0;
    }

    let mut numerator = value as i128 * from.num as i128 * to.den as i128;
    let mut denominator = from.den as i128 * to.num as i128;
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder.abs() * 2;

    let round_away = twice > denominator || (twice == denominator && quotient % 2 != 0);
    let rounded = if round_away {
        quotient + numerator.signum()
    } else {
        quotient
    };

    rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
