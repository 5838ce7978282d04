// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the work loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`WorkLoop`](crate::work_loop::WorkLoop) calls as a render progresses. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Event order
//!
//! For one render that finishes without errors:
//!
//! ```text
//! render_start
//! slice_begin, unit*, slice_end      (once per slice)
//! render_complete                    (after the last slice_end)
//! ```
//!
//! A failing unit ends the slice with [`SliceEndReason::Failed`] and is
//! followed by `render_failed` instead of `render_complete`.

use crate::element::ElementKind;
use crate::fiber::FiberId;
use crate::work_loop::SliceEndReason;

/// Whether this build dispatches events to sinks (the `trace` feature).
pub const ENABLED: bool = cfg!(feature = "trace");

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What kind of fiber a unit of work processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// The synthetic root wrapping the render container.
    Root,
    /// A tagged element.
    Element,
    /// A text element.
    Text,
}

impl UnitKind {
    /// Classifies a fiber by the kind of its source element (`None` for the
    /// root).
    #[must_use]
    pub fn of(kind: Option<&ElementKind>) -> Self {
        match kind {
            None => Self::Root,
            Some(ElementKind::Text) => Self::Text,
            Some(ElementKind::Tag(_)) => Self::Element,
        }
    }

    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Element => "element",
            Self::Text => "text",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the first slice that works on a new render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStartEvent {
    /// Monotonic render counter, starting at 1.
    pub render_index: u64,
    /// Whether this render replaced one that had not finished.
    pub abandoned: bool,
}

/// Emitted when a slice starts performing units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceBeginEvent {
    /// Monotonic slice counter across all renders, starting at 1.
    pub slice_index: u64,
    /// Render the slice works on.
    pub render_index: u64,
}

/// Emitted after each completed unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitEvent {
    /// Render the unit belongs to.
    pub render_index: u64,
    /// Slice the unit ran in.
    pub slice_index: u64,
    /// The fiber that was processed.
    pub fiber: FiberId,
    /// What kind of fiber it was.
    pub kind: UnitKind,
    /// Whether the unit created a host node (false only for the root).
    pub created_node: bool,
    /// Number of child fibers materialized.
    pub children: u32,
}

/// Emitted when a slice stops performing units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceEndEvent {
    /// Slice counter.
    pub slice_index: u64,
    /// Render the slice worked on.
    pub render_index: u64,
    /// Units completed in this slice.
    pub units: u32,
    /// Why the slice ended.
    pub reason: SliceEndReason,
}

/// Emitted when the traversal of a render is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCompleteEvent {
    /// Render counter.
    pub render_index: u64,
    /// Total units performed for the render.
    pub units: u32,
    /// Number of slices the render was spread over.
    pub slices: u32,
}

/// Emitted when the host binding fails during a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderFailedEvent {
    /// Render counter.
    pub render_index: u64,
    /// The fiber whose unit failed.
    pub fiber: FiberId,
    /// Units completed before the failure.
    pub units: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the work loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a slice first works on a new render.
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        _ = e;
    }

    /// Called when a slice begins.
    fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
        _ = e;
    }

    /// Called after every unit of work.
    fn on_unit(&mut self, e: &UnitEvent) {
        _ = e;
    }

    /// Called when a slice ends.
    fn on_slice_end(&mut self, e: &SliceEndEvent) {
        _ = e;
    }

    /// Called when a render has been fully constructed.
    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        _ = e;
    }

    /// Called when a render stops because of a host failure.
    fn on_render_failed(&mut self, e: &RenderFailedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Dispatches one event to the sink, or does nothing without `trace`.
macro_rules! emit {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RenderStartEvent`].
    #[inline]
    pub fn render_start(&mut self, e: &RenderStartEvent) {
        emit!(self, on_render_start, e);
    }

    /// Emits a [`SliceBeginEvent`].
    #[inline]
    pub fn slice_begin(&mut self, e: &SliceBeginEvent) {
        emit!(self, on_slice_begin, e);
    }

    /// Emits a [`UnitEvent`].
    #[inline]
    pub fn unit(&mut self, e: &UnitEvent) {
        emit!(self, on_unit, e);
    }

    /// Emits a [`SliceEndEvent`].
    #[inline]
    pub fn slice_end(&mut self, e: &SliceEndEvent) {
        emit!(self, on_slice_end, e);
    }

    /// Emits a [`RenderCompleteEvent`].
    #[inline]
    pub fn render_complete(&mut self, e: &RenderCompleteEvent) {
        emit!(self, on_render_complete, e);
    }

    /// Emits a [`RenderFailedEvent`].
    #[inline]
    pub fn render_failed(&mut self, e: &RenderFailedEvent) {
        emit!(self, on_render_failed, e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn unit_kind_classifies_sources() {
        assert_eq!(UnitKind::of(None), UnitKind::Root);
        assert_eq!(UnitKind::of(Some(&ElementKind::Text)), UnitKind::Text);
        let tag = ElementKind::Tag(String::from("div"));
        assert_eq!(UnitKind::of(Some(&tag)), UnitKind::Element);
        assert_eq!(UnitKind::Text.label(), "text");
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_render_start(&RenderStartEvent {
            render_index: 1,
            abandoned: false,
        });
        sink.on_slice_end(&SliceEndEvent {
            slice_index: 1,
            render_index: 1,
            units: 0,
            reason: SliceEndReason::BudgetExhausted,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.slice_begin(&SliceBeginEvent {
            slice_index: 1,
            render_index: 1,
        });
        tracer.render_complete(&RenderCompleteEvent {
            render_index: 1,
            units: 3,
            slices: 1,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            slices: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
                self.slices.push(e.slice_index);
            }
        }

        let mut sink = RecordingSink { slices: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.slice_begin(&SliceBeginEvent {
            slice_index: 7,
            render_index: 2,
        });
        drop(tracer);
        assert_eq!(sink.slices, &[7]);
    }
}
