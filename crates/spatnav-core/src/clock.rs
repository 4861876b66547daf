#![forbid(unsafe_code)]

//! Time source for deferred navigation tasks.
//!
//! In production the navigator reads `web_time::Instant::now()`. Tests and
//! the replay tool use a [`LabClock`] so that activation and settle delays
//! elapse only when the clock is advanced explicitly.
//!
//! ```
//! use spatnav_core::clock::{Clock, LabClock};
//! use web_time::Duration;
//!
//! let lab = LabClock::new();
//! let clock = Clock::lab(&lab);
//! let start = clock.now();
//! lab.advance(Duration::from_millis(150));
//! assert_eq!(clock.now() - start, Duration::from_millis(150));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use web_time::{Duration, Instant};

/// Clock for replays and tests: stands still until [`advance`](Self::advance)
/// is called, so a 150 ms activation delay elapses exactly when the script
/// says so.
///
/// Clones share one elapsed counter; hand a clone to the navigator and keep
/// one to drive time.
#[derive(Debug, Clone)]
pub struct LabClock {
    start: Instant,
    elapsed_us: Arc<AtomicU64>,
}

impl LabClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed_us: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward; sub-microsecond remainders are dropped.
    pub fn advance(&self, by: Duration) {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_us.fetch_add(micros, Ordering::AcqRel);
    }

    /// Total time advanced since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        self.start + self.elapsed()
    }
}

impl Default for LabClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the navigator reads the current time from.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// Real wall-clock time.
    #[default]
    Real,
    /// Deterministic lab clock.
    Lab(LabClock),
}

impl Clock {
    #[must_use]
    pub fn lab(clock: &LabClock) -> Self {
        Self::Lab(clock.clone())
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        match self {
            Self::Real => Instant::now(),
            Self::Lab(lab) => lab.now(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_lab(&self) -> bool {
        matches!(self, Self::Lab(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_clock_only_moves_when_advanced() {
        let lab = LabClock::new();
        let t0 = lab.now();
        assert_eq!(lab.now(), t0);
        lab.advance(Duration::from_millis(300));
        assert_eq!(lab.now() - t0, Duration::from_millis(300));
        assert_eq!(lab.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn clones_share_offset() {
        let lab = LabClock::new();
        let clock = Clock::lab(&lab);
        let t0 = clock.now();
        lab.clone().advance(Duration::from_millis(5));
        assert_eq!(clock.now() - t0, Duration::from_millis(5));
        assert!(clock.is_lab());
        assert!(!Clock::Real.is_lab());
    }
}
