// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slice-by-slice driving of a work loop.
//!
//! In a browser the idle callback re-schedules itself after every slice. The
//! driver plays that role synchronously: it hands the loop a fresh deadline
//! per slice and keeps going until the loop is idle.

use didact_core::deadline::{Deadline, Unbounded};
use didact_core::trace::Tracer;
use didact_core::{RenderError, WorkLoop};

use crate::host::{HeadlessHost, HostError, NodeId};

/// Totals for one [`drive`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Slices run.
    pub slices: u32,
    /// Units performed across all slices.
    pub units: u32,
}

/// Failures reported by [`drive`].
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// The host failed; the render was dropped.
    #[error(transparent)]
    Render(#[from] RenderError<HostError>),
    /// The loop was still working after the allowed number of slices.
    #[error("render still working after {0} slices")]
    SliceLimit(u32),
}

/// Runs `work_loop` until it is idle, creating a deadline per slice with
/// `deadline`.
///
/// # Errors
///
/// Returns [`DriveError::Render`] if the host fails and
/// [`DriveError::SliceLimit`] if the loop is not idle after `max_slices`
/// slices (for example when every deadline is already exhausted).
pub fn drive<D, F>(
    work_loop: &mut WorkLoop<NodeId>,
    host: &mut HeadlessHost,
    mut deadline: F,
    max_slices: u32,
    tracer: &mut Tracer<'_>,
) -> Result<DriveStats, DriveError>
where
    D: Deadline,
    F: FnMut() -> D,
{
    let mut stats = DriveStats::default();
    while !work_loop.is_idle() {
        if stats.slices == max_slices {
            return Err(DriveError::SliceLimit(max_slices));
        }
        let report = work_loop.run(host, &deadline(), tracer)?;
        stats.slices += 1;
        stats.units += report.units;
    }
    Ok(stats)
}

/// Runs `work_loop` to completion in a single unbounded slice.
///
/// # Errors
///
/// Returns [`DriveError::Render`] if the host fails.
pub fn run_to_idle(
    work_loop: &mut WorkLoop<NodeId>,
    host: &mut HeadlessHost,
    tracer: &mut Tracer<'_>,
) -> Result<DriveStats, DriveError> {
    drive(work_loop, host, || Unbounded, 1, tracer)
}
