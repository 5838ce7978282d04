// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time budgets for work-loop slices.
//!
//! The host decides how long each slice of work may run and exposes that
//! decision as a [`Deadline`]. The work loop only ever asks how much time is
//! left; it never reads a clock itself, so any timer (browser idle deadlines,
//! `Instant`, simulated step budgets in tests) can drive it.

use core::time::Duration;

/// Reports the time left in the current slice.
pub trait Deadline {
    /// Returns the remaining budget. Implementations may count down between
    /// calls; the work loop queries once before each unit of work.
    fn time_remaining(&self) -> Duration;
}

impl<D: Deadline + ?Sized> Deadline for &D {
    fn time_remaining(&self) -> Duration {
        (**self).time_remaining()
    }
}

/// A deadline that never runs out.
///
/// A slice run with `Unbounded` processes the whole tree in one go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// A deadline with a constant remaining budget.
///
/// Useful for forcing a specific loop decision: a value below the configured
/// threshold yields immediately, anything else behaves like [`Unbounded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fixed(pub Duration);

impl Deadline for Fixed {
    fn time_remaining(&self) -> Duration {
        self.0
    }
}

/// A wall-clock deadline at a fixed [`Instant`](std::time::Instant).
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstantDeadline {
    end: std::time::Instant,
}

#[cfg(feature = "std")]
impl InstantDeadline {
    /// Creates a deadline that expires at `end`.
    #[must_use]
    pub const fn at(end: std::time::Instant) -> Self {
        Self { end }
    }

    /// Creates a deadline that expires `budget` from now.
    #[must_use]
    pub fn from_now(budget: Duration) -> Self {
        Self {
            end: std::time::Instant::now() + budget,
        }
    }
}

#[cfg(feature = "std")]
impl Deadline for InstantDeadline {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(std::time::Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_runs_out() {
        assert_eq!(Unbounded.time_remaining(), Duration::MAX);
    }

    #[test]
    fn references_forward() {
        fn remaining(d: impl Deadline) -> Duration {
            d.time_remaining()
        }
        let d = Fixed(Duration::from_millis(3));
        let r: &dyn Deadline = &d;
        assert_eq!(remaining(r), Duration::from_millis(3));
        assert_eq!(remaining(&d), Duration::from_millis(3));
    }

    #[cfg(feature = "std")]
    #[test]
    fn instant_deadline_in_the_past_is_exhausted() {
        let d = InstantDeadline::at(std::time::Instant::now());
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(d.time_remaining(), Duration::ZERO);
    }
}
