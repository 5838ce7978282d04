// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, JSON export and log forwarding for didact
//! work-loop traces.
//!
//! This crate provides [`TraceSink`](didact_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as JSON lines.
//! - [`log_sink::LogSink`]: forwards events to the [`log`] facade.
//! - [`Fanout`]: sends every event to several sinks.

pub mod json;
pub mod log_sink;
pub mod pretty;
pub mod recorder;

use didact_core::trace::{
    RenderCompleteEvent, RenderFailedEvent, RenderStartEvent, SliceBeginEvent, SliceEndEvent,
    TraceSink, UnitEvent,
};

/// A [`TraceSink`] that forwards every event to each of its sinks in order.
pub struct Fanout<'a> {
    sinks: Vec<&'a mut dyn TraceSink>,
}

impl std::fmt::Debug for Fanout<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fanout")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl<'a> Fanout<'a> {
    /// Creates a fan-out over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<&'a mut dyn TraceSink>) -> Self {
        Self { sinks }
    }
}

impl TraceSink for Fanout<'_> {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        for s in &mut self.sinks {
            s.on_render_start(e);
        }
    }

    fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
        for s in &mut self.sinks {
            s.on_slice_begin(e);
        }
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        for s in &mut self.sinks {
            s.on_unit(e);
        }
    }

    fn on_slice_end(&mut self, e: &SliceEndEvent) {
        for s in &mut self.sinks {
            s.on_slice_end(e);
        }
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        for s in &mut self.sinks {
            s.on_render_complete(e);
        }
    }

    fn on_render_failed(&mut self, e: &RenderFailedEvent) {
        for s in &mut self.sinks {
            s.on_render_failed(e);
        }
    }
}
