// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative work loop.
//!
//! The [`WorkLoop`] owns the fiber arena and the pointer to the next unit of
//! work. [`WorkLoop::render`] seeds it; [`WorkLoop::run`] performs units until
//! the host's [`Deadline`] runs low, then returns so the host can schedule the
//! next slice. One unit of work is:
//!
//! 1. create the fiber's host node (unless it has one, as the root does),
//! 2. append that node to the parent fiber's node,
//! 3. materialize one child fiber per child element,
//! 4. advance the pointer to the next fiber in pre-order.
//!
//! Nodes are attached as soon as they are created; there is no commit phase,
//! so a render that is interrupted leaves a partial tree in the host.
//!
//! # Slice decisions
//!
//! Before each unit, the loop checks, in order:
//!
//! - the pointer: no fiber left means the render is complete
//!   ([`SliceEndReason::Idle`]),
//! - the per-slice cap from [`WorkLoopConfig::max_units_per_slice`]
//!   ([`SliceEndReason::UnitLimit`]),
//! - the deadline: it is queried exactly once, and the loop yields if the
//!   reported time is zero or below [`WorkLoopConfig::min_remaining`]
//!   ([`SliceEndReason::BudgetExhausted`]).

use core::num::NonZeroU32;
use core::time::Duration;

use crate::deadline::Deadline;
use crate::element::Element;
use crate::fiber::{FiberId, FiberStore};
use crate::host::{Host, materialize};
use crate::trace::{
    RenderCompleteEvent, RenderFailedEvent, RenderStartEvent, SliceBeginEvent, SliceEndEvent,
    Tracer, UnitEvent, UnitKind,
};

/// Configuration for the [`WorkLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkLoopConfig {
    /// The loop starts another unit only while the deadline reports at least
    /// this much time.
    pub min_remaining: Duration,
    /// Optional hard cap on units per slice, applied regardless of the
    /// deadline. Non-zero so that every slice makes progress.
    pub max_units_per_slice: Option<NonZeroU32>,
}

impl WorkLoopConfig {
    /// Configuration for browser idle callbacks: yield once less than 1 ms
    /// remains.
    #[must_use]
    pub const fn browser() -> Self {
        Self {
            min_remaining: Duration::from_millis(1),
            max_units_per_slice: None,
        }
    }

    /// Configuration for hosts without idle time accounting: only an
    /// exhausted deadline yields.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            min_remaining: Duration::ZERO,
            max_units_per_slice: None,
        }
    }

    /// Headless configuration that performs at most `units` units per slice.
    #[must_use]
    pub const fn throttled(units: NonZeroU32) -> Self {
        Self {
            min_remaining: Duration::ZERO,
            max_units_per_slice: Some(units),
        }
    }
}

impl Default for WorkLoopConfig {
    fn default() -> Self {
        Self::browser()
    }
}

/// Whether the loop has work left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopStatus {
    /// No pending unit of work.
    Idle,
    /// A render is in progress.
    Working,
}

/// Why a call to [`WorkLoop::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliceEndReason {
    /// The deadline ran below the threshold.
    BudgetExhausted,
    /// The per-slice unit cap was reached.
    UnitLimit,
    /// There is no work left.
    Idle,
    /// A host operation failed; the render was dropped.
    Failed,
}

impl SliceEndReason {
    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BudgetExhausted => "budget",
            Self::UnitLimit => "unit-limit",
            Self::Idle => "idle",
            Self::Failed => "failed",
        }
    }
}

/// Summary of one successful slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceReport {
    /// Units completed.
    pub units: u32,
    /// Loop status after the slice.
    pub status: LoopStatus,
    /// Why the slice ended.
    pub reason: SliceEndReason,
}

/// A host operation failed while performing a unit of work.
///
/// The render that hit the error is dropped: the loop is idle afterwards and
/// nodes attached so far stay in the host tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("host binding failed at {fiber:?} during render {render_index}: {error}")]
pub struct RenderError<E> {
    /// The fiber whose unit failed.
    pub fiber: FiberId,
    /// The render that was dropped.
    pub render_index: u64,
    /// The host's error.
    pub error: E,
}

/// Cooperative scheduler over a fiber arena.
///
/// `N` is the host's node handle type. The loop is single-threaded; the host
/// calls [`run`](Self::run) from its idle callback and re-requests the
/// callback afterwards.
pub struct WorkLoop<N> {
    config: WorkLoopConfig,
    fibers: FiberStore<N>,
    next_unit: Option<FiberId>,
    render_index: u64,
    slice_index: u64,
    render_units: u32,
    render_slices: u32,
    started: bool,
    abandoned: bool,
}

impl<N> core::fmt::Debug for WorkLoop<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkLoop")
            .field("config", &self.config)
            .field("next_unit", &self.next_unit)
            .field("render_index", &self.render_index)
            .field("slice_index", &self.slice_index)
            .field("fibers", &self.fibers)
            .finish_non_exhaustive()
    }
}

impl<N> Default for WorkLoop<N> {
    fn default() -> Self {
        Self::new(WorkLoopConfig::default())
    }
}

impl<N> WorkLoop<N> {
    /// Creates an idle loop.
    #[must_use]
    pub fn new(config: WorkLoopConfig) -> Self {
        Self {
            config,
            fibers: FiberStore::new(),
            next_unit: None,
            render_index: 0,
            slice_index: 0,
            render_units: 0,
            render_slices: 0,
            started: false,
            abandoned: false,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkLoopConfig {
        &self.config
    }

    /// Starts rendering `element` into `container`.
    ///
    /// Any render still in flight is abandoned: its fibers are dropped, but
    /// nodes it already attached to the host stay where they are. No host
    /// operation happens here; construction runs in subsequent
    /// [`run`](Self::run) calls.
    pub fn render(&mut self, element: Element, container: N) {
        self.abandoned = self.next_unit.is_some();
        self.fibers.reset();
        let root = self.fibers.create_root(container, element);
        self.next_unit = Some(root);
        self.render_index += 1;
        self.render_units = 0;
        self.render_slices = 0;
        self.started = false;
    }

    /// Returns whether work is pending.
    #[must_use]
    pub fn status(&self) -> LoopStatus {
        if self.next_unit.is_some() {
            LoopStatus::Working
        } else {
            LoopStatus::Idle
        }
    }

    /// Returns `true` if there is no pending unit of work.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.next_unit.is_none()
    }

    /// Returns the fiber that the next unit of work will process.
    #[must_use]
    pub fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    /// Returns the index of the latest render (0 before the first).
    #[must_use]
    pub fn render_index(&self) -> u64 {
        self.render_index
    }

    /// Read-only access to the fibers of the latest render.
    #[must_use]
    pub fn fibers(&self) -> &FiberStore<N> {
        &self.fibers
    }

    /// Performs units of work until the render is complete, the slice cap is
    /// reached, or `deadline` runs low.
    ///
    /// Returns immediately with [`SliceEndReason::Idle`] when there is no
    /// work; no trace events are emitted in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the host fails. The failing render is
    /// dropped and the loop becomes idle.
    ///
    /// # Panics
    ///
    /// Panics if the fiber arena's invariants are broken, which indicates a
    /// bug in the loop rather than in the host.
    pub fn run<H, D>(
        &mut self,
        host: &mut H,
        deadline: &D,
        tracer: &mut Tracer<'_>,
    ) -> Result<SliceReport, RenderError<H::Error>>
    where
        H: Host<Node = N> + ?Sized,
        D: Deadline + ?Sized,
    {
        if self.next_unit.is_none() {
            return Ok(SliceReport {
                units: 0,
                status: LoopStatus::Idle,
                reason: SliceEndReason::Idle,
            });
        }

        if !self.started {
            self.started = true;
            tracer.render_start(&RenderStartEvent {
                render_index: self.render_index,
                abandoned: self.abandoned,
            });
        }
        self.slice_index += 1;
        self.render_slices += 1;
        tracer.slice_begin(&SliceBeginEvent {
            slice_index: self.slice_index,
            render_index: self.render_index,
        });

        let mut units = 0_u32;
        let reason = loop {
            let Some(id) = self.next_unit else {
                break SliceEndReason::Idle;
            };
            if self
                .config
                .max_units_per_slice
                .is_some_and(|cap| units >= cap.get())
            {
                break SliceEndReason::UnitLimit;
            }
            if self.should_yield(deadline.time_remaining()) {
                break SliceEndReason::BudgetExhausted;
            }

            let (created_node, children) = match self.perform_unit(host, id) {
                Ok(done) => done,
                Err(error) => {
                    self.next_unit = None;
                    tracer.slice_end(&SliceEndEvent {
                        slice_index: self.slice_index,
                        render_index: self.render_index,
                        units,
                        reason: SliceEndReason::Failed,
                    });
                    tracer.render_failed(&RenderFailedEvent {
                        render_index: self.render_index,
                        fiber: id,
                        units: self.render_units,
                    });
                    return Err(RenderError {
                        fiber: id,
                        render_index: self.render_index,
                        error,
                    });
                }
            };
            units += 1;
            self.render_units += 1;
            self.next_unit = self.fibers.next_unit(id);
            tracer.unit(&UnitEvent {
                render_index: self.render_index,
                slice_index: self.slice_index,
                fiber: id,
                kind: UnitKind::of(self.fibers.kind(id)),
                created_node,
                children,
            });
        };

        tracer.slice_end(&SliceEndEvent {
            slice_index: self.slice_index,
            render_index: self.render_index,
            units,
            reason,
        });
        if reason == SliceEndReason::Idle {
            tracer.render_complete(&RenderCompleteEvent {
                render_index: self.render_index,
                units: self.render_units,
                slices: self.render_slices,
            });
        }

        Ok(SliceReport {
            units,
            status: self.status(),
            reason,
        })
    }

    fn should_yield(&self, remaining: Duration) -> bool {
        remaining.is_zero() || remaining < self.config.min_remaining
    }

    /// Creates, attaches and expands one fiber. Returns whether a node was
    /// created and how many child fibers were materialized.
    fn perform_unit<H>(&mut self, host: &mut H, id: FiberId) -> Result<(bool, u32), H::Error>
    where
        H: Host<Node = N> + ?Sized,
    {
        let mut created_node = false;
        if self.fibers.node(id).is_none()
            && let Some(element) = self.fibers.element(id)
        {
            let node = materialize(host, element)?;
            self.fibers.set_node(id, node);
            created_node = true;
        }

        if let Some(parent) = self.fibers.parent(id) {
            match (self.fibers.node(parent), self.fibers.node(id)) {
                (Some(parent_node), Some(node)) => host.append_child(parent_node, node)?,
                _ => panic!("{id:?} has no host node to attach under {parent:?}"),
            }
        }

        Ok((created_node, self.fibers.expand_children(id)))
    }
}
