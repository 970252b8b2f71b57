//! Logical time measured in whole minutes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point on the monotonic logical clock, in minutes since the epoch of the
/// system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(u64);

impl Time {
    /// The start of the logical clock.
    pub const ZERO: Self = Self(0);

    /// Creates a time from a minute count.
    #[must_use]
    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes)
    }

    /// Returns the minute count.
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.0
    }

    /// Returns the time `minutes` later, or `None` on overflow.
    #[must_use]
    pub const fn checked_add_minutes(self, minutes: u64) -> Option<Self> {
        match self.0.checked_add(minutes) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the minutes elapsed since `earlier`, or `None` when `earlier`
    /// lies in the future.
    #[must_use]
    pub const fn minutes_since(self, earlier: Self) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.0)
    }
}

/// Acceptable deviation from an estimate, in basis points.
///
/// One basis point is a hundredth of a percent, so `1_250` is a fraction of
/// 0.125.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Deviation(u32);

impl Deviation {
    /// Basis points in a whole (a fraction of 1.0).
    pub const WHOLE: u32 = 10_000;

    /// Creates a deviation from basis points (`1_250` means ±12.5%).
    #[must_use]
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Creates a deviation from a whole percentage (`10` means ±10%).
    #[must_use]
    pub const fn from_percent(percent: u32) -> Self {
        Self(percent.saturating_mul(100))
    }

    /// Returns the deviation in basis points.
    #[must_use]
    pub const fn basis_points(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.checked_div(100).unwrap_or_default();
        let hundredths = self.0.checked_rem(100).unwrap_or_default();
        if hundredths == 0 {
            return write!(f, "{whole}%");
        }
        let fraction = format!("{hundredths:02}");
        write!(f, "{whole}.{}%", fraction.trim_end_matches('0'))
    }
}
