//! Rational media time.
//!
//! [`MediaTime`] counts whole ticks at [`TIMESCALE`] ticks per second.
//! Presentation times are computed from a frame's position in the sequence,
//! not accumulated, so rounding never compounds and replaying a sequence
//! always lands on exactly the same timestamps.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::time::Duration;

/// Ticks per second used by every [`MediaTime`].
///
/// 600 divides evenly by the common frame rates (24, 25, 30, 50, 60).
pub const TIMESCALE: u64 = 600;

/// A non-negative point or span on the media timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MediaTime {
    ticks: u64,
}

impl MediaTime {
    /// The start of the timeline.
    pub const ZERO: MediaTime = MediaTime { ticks: 0 };

    /// Create a time from a raw tick count.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Convert seconds to the nearest tick.
    ///
    /// Negative and NaN inputs clamp to [`MediaTime::ZERO`].
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds.is_nan() || seconds <= 0.0 {
            return Self::ZERO;
        }
        Self {
            ticks: (seconds * TIMESCALE as f64).round() as u64,
        }
    }

    /// Raw tick count.
    pub const fn ticks(self) -> u64 {
        self.ticks
    }

    /// The time in (possibly fractional) seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.ticks as f64 / TIMESCALE as f64
    }

    /// The time as a [`Duration`], truncated to whole nanoseconds.
    pub fn as_duration(self) -> Duration {
        let seconds = self.ticks / TIMESCALE;
        let remainder = self.ticks % TIMESCALE;
        let nanos = remainder * 1_000_000_000 / TIMESCALE;
        Duration::new(seconds, nanos as u32)
    }

    /// The span from `earlier` to `self`, or zero if `earlier` is later.
    pub fn saturating_sub(self, earlier: MediaTime) -> MediaTime {
        MediaTime::from_ticks(self.ticks.saturating_sub(earlier.ticks))
    }

    /// Add two times, returning `None` on overflow.
    pub fn checked_add(self, other: MediaTime) -> Option<MediaTime> {
        self.ticks.checked_add(other.ticks).map(MediaTime::from_ticks)
    }
}

impl Add for MediaTime {
    type Output = MediaTime;

    fn add(self, other: MediaTime) -> MediaTime {
        MediaTime::from_ticks(self.ticks + other.ticks)
    }
}

impl AddAssign for MediaTime {
    fn add_assign(&mut self, other: MediaTime) {
        self.ticks += other.ticks;
    }
}

impl Mul<u64> for MediaTime {
    type Output = MediaTime;

    fn mul(self, count: u64) -> MediaTime {
        MediaTime::from_ticks(self.ticks * count)
    }
}

impl Sum for MediaTime {
    fn sum<I: Iterator<Item = MediaTime>>(iter: I) -> MediaTime {
        iter.fold(MediaTime::ZERO, Add::add)
    }
}

impl From<MediaTime> for Duration {
    fn from(time: MediaTime) -> Duration {
        time.as_duration()
    }
}

impl Display for MediaTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}
