//! # Virtual Time
//!
//! Simulated time as a signed count of ticks at a fixed resolution.
//! Nothing in here observes the wall clock; time moves only when the
//! simulator extracts an event.
//!
//! ## Expectations:
//! - Integer tick arithmetic, deterministic on every platform
//! - Unit conversion detects overflow instead of wrapping
//! - Resolutions from seconds down to femtoseconds

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing or combining virtual times.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("{value}{unit} does not fit in 64-bit ticks at {resolution} resolution")]
    Overflow {
        value: i64,
        unit: TimeUnit,
        resolution: TimeUnit,
    },

    #[error("virtual time arithmetic overflowed")]
    ArithmeticOverflow,

    #[error("unknown time unit '{0}' (expected s, ms, us, ns, ps or fs)")]
    UnknownUnit(String),
}

/// Human time units, ordered from coarsest to finest.
///
/// The same enum doubles as the tick resolution of a simulation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    #[default]
    Ns,
    Ps,
    Fs,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::S,
        TimeUnit::Ms,
        TimeUnit::Us,
        TimeUnit::Ns,
        TimeUnit::Ps,
        TimeUnit::Fs,
    ];

    /// Length of one unit in femtoseconds, the finest supported resolution.
    #[inline]
    pub const fn femtos(self) -> i128 {
        match self {
            TimeUnit::S => 1_000_000_000_000_000,
            TimeUnit::Ms => 1_000_000_000_000,
            TimeUnit::Us => 1_000_000_000,
            TimeUnit::Ns => 1_000_000,
            TimeUnit::Ps => 1_000,
            TimeUnit::Fs => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == lowered)
            .ok_or_else(|| TimeError::UnknownUnit(s.to_string()))
    }
}

/// A point in (or span of) simulated time, measured in ticks.
///
/// What a tick means is decided by the resolution the simulator was built
/// with; `VirtualTime` itself only carries the integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VirtualTime(i64);

impl VirtualTime {
    /// Start of every run.
    pub const ZERO: VirtualTime = VirtualTime(0);
    /// Latest representable instant.
    pub const MAX: VirtualTime = VirtualTime(i64::MAX);
    pub const MIN: VirtualTime = VirtualTime(i64::MIN);

    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        VirtualTime(ticks)
    }

    #[inline]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Converts `value` expressed in `unit` into ticks of `resolution`.
    ///
    /// Units finer than the resolution truncate toward zero.
    pub fn from_unit(value: i64, unit: TimeUnit, resolution: TimeUnit) -> Result<Self, TimeError> {
        let femtos = i128::from(value) * unit.femtos();
        i64::try_from(femtos / resolution.femtos())
            .map(VirtualTime)
            .map_err(|_| TimeError::Overflow {
                value,
                unit,
                resolution,
            })
    }

    /// Expresses this time in `unit`, assuming ticks of `resolution`.
    pub fn to_unit(self, unit: TimeUnit, resolution: TimeUnit) -> f64 {
        let femtos = i128::from(self.0) * resolution.femtos();
        femtos as f64 / unit.femtos() as f64
    }

    #[inline]
    pub fn as_seconds(self, resolution: TimeUnit) -> f64 {
        self.to_unit(TimeUnit::S, resolution)
    }

    #[inline]
    pub fn checked_add(self, rhs: VirtualTime) -> Option<VirtualTime> {
        self.0.checked_add(rhs.0).map(VirtualTime)
    }

    #[inline]
    pub fn checked_sub(self, rhs: VirtualTime) -> Option<VirtualTime> {
        self.0.checked_sub(rhs.0).map(VirtualTime)
    }

    #[inline]
    pub fn saturating_sub(self, rhs: VirtualTime) -> VirtualTime {
        VirtualTime(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Renders the tick count with its unit, e.g. `+1500ns`.
    pub fn with_unit(self, resolution: TimeUnit) -> WithUnit {
        WithUnit {
            time: self,
            resolution,
        }
    }
}

impl fmt::Display for VirtualTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T={}", self.0)
    }
}

/// Display adapter returned by [`VirtualTime::with_unit`].
#[derive(Debug, Clone, Copy)]
pub struct WithUnit {
    time: VirtualTime,
    resolution: TimeUnit,
}

impl fmt::Display for WithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}{}", self.time.0, self.resolution)
    }
}

impl Add for VirtualTime {
    type Output = VirtualTime;

    #[inline]
    fn add(self, rhs: VirtualTime) -> VirtualTime {
        self.checked_add(rhs).expect("virtual time overflow")
    }
}

impl AddAssign for VirtualTime {
    #[inline]
    fn add_assign(&mut self, rhs: VirtualTime) {
        *self = *self + rhs;
    }
}

impl Sub for VirtualTime {
    type Output = VirtualTime;

    #[inline]
    fn sub(self, rhs: VirtualTime) -> VirtualTime {
        self.checked_sub(rhs).expect("virtual time underflow")
    }
}

impl SubAssign for VirtualTime {
    #[inline]
    fn sub_assign(&mut self, rhs: VirtualTime) {
        *self = *self - rhs;
    }
}

impl Mul<i64> for VirtualTime {
    type Output = VirtualTime;

    #[inline]
    fn mul(self, rhs: i64) -> VirtualTime {
        VirtualTime(self.0.checked_mul(rhs).expect("virtual time overflow"))
    }
}

impl Neg for VirtualTime {
    type Output = VirtualTime;

    #[inline]
    fn neg(self) -> VirtualTime {
        VirtualTime(self.0.checked_neg().expect("virtual time overflow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units_into_ticks() {
        let t = VirtualTime::from_unit(3, TimeUnit::Ms, TimeUnit::Ns).unwrap();
        assert_eq!(t.ticks(), 3_000_000);

        let t = VirtualTime::from_unit(2, TimeUnit::S, TimeUnit::Us).unwrap();
        assert_eq!(t.ticks(), 2_000_000);
    }

    #[test]
    fn finer_units_truncate_toward_zero() {
        let t = VirtualTime::from_unit(1_999, TimeUnit::Us, TimeUnit::Ms).unwrap();
        assert_eq!(t.ticks(), 1);

        let t = VirtualTime::from_unit(-1_999, TimeUnit::Us, TimeUnit::Ms).unwrap();
        assert_eq!(t.ticks(), -1);
    }

    #[test]
    fn detects_conversion_overflow() {
        let err = VirtualTime::from_unit(i64::MAX, TimeUnit::S, TimeUnit::Ns).unwrap_err();
        assert!(matches!(err, TimeError::Overflow { .. }));

        // ~292 years of nanoseconds still fit.
        assert!(VirtualTime::from_unit(9_000_000_000, TimeUnit::S, TimeUnit::Ns).is_ok());
        assert!(VirtualTime::from_unit(10_000_000_000, TimeUnit::S, TimeUnit::Ns).is_err());
    }

    #[test]
    fn converts_back_to_units() {
        let t = VirtualTime::from_ticks(1_500_000);
        assert_eq!(t.to_unit(TimeUnit::Ms, TimeUnit::Ns), 1.5);
        assert_eq!(t.as_seconds(TimeUnit::Ns), 0.0015);
    }

    #[test]
    fn arithmetic_and_ordering() {
        let a = VirtualTime::from_ticks(10);
        let b = VirtualTime::from_ticks(25);
        assert!(a < b);
        assert_eq!((a + b).ticks(), 35);
        assert_eq!((b - a).ticks(), 15);
        assert_eq!((a - b).ticks(), -15);
        assert_eq!((a * 3).ticks(), 30);
        assert_eq!((-a).ticks(), -10);
        assert!((a - b).is_negative());

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(VirtualTime::MAX.checked_add(VirtualTime::from_ticks(1)), None);
        assert_eq!(VirtualTime::MIN.checked_sub(VirtualTime::from_ticks(1)), None);
        assert_eq!(
            VirtualTime::ZERO.saturating_sub(VirtualTime::MAX).ticks(),
            -i64::MAX
        );
    }

    #[test]
    #[should_panic(expected = "virtual time overflow")]
    fn add_panics_on_overflow() {
        let _ = VirtualTime::MAX + VirtualTime::from_ticks(1);
    }

    #[test]
    fn display_formats() {
        let t = VirtualTime::from_ticks(1500);
        assert_eq!(t.to_string(), "T=1500");
        assert_eq!(t.with_unit(TimeUnit::Ns).to_string(), "+1500ns");
    }

    #[test]
    fn parses_units() {
        assert_eq!("ms".parse::<TimeUnit>().unwrap(), TimeUnit::Ms);
        assert_eq!(" NS ".parse::<TimeUnit>().unwrap(), TimeUnit::Ns);
        assert!("minutes".parse::<TimeUnit>().is_err());
    }
}
