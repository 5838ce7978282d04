// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic deadlines.

use std::cell::Cell;
use std::time::Duration;

use didact_core::deadline::Deadline;

/// A deadline that allows a fixed number of units of work.
///
/// Each query reports the steps left as whole milliseconds and then consumes
/// one step. The work loop queries once per unit, so under the browser
/// threshold (1 ms) a budget of `n` yields after exactly `n` units; a budget
/// of zero yields immediately.
#[derive(Debug)]
pub struct StepDeadline {
    steps: Cell<u32>,
}

impl StepDeadline {
    /// Creates a deadline that allows `steps` units.
    #[must_use]
    pub const fn new(steps: u32) -> Self {
        Self {
            steps: Cell::new(steps),
        }
    }

    /// Returns how many queries remain before the deadline reports zero.
    #[must_use]
    pub fn steps_left(&self) -> u32 {
        self.steps.get()
    }
}

impl Deadline for StepDeadline {
    fn time_remaining(&self) -> Duration {
        let left = self.steps.get();
        self.steps.set(left.saturating_sub(1));
        Duration::from_millis(u64::from(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero_and_stays_there() {
        let d = StepDeadline::new(2);
        assert_eq!(d.time_remaining(), Duration::from_millis(2));
        assert_eq!(d.time_remaining(), Duration::from_millis(1));
        assert_eq!(d.time_remaining(), Duration::ZERO);
        assert_eq!(d.time_remaining(), Duration::ZERO);
        assert_eq!(d.steps_left(), 0);
    }
}
