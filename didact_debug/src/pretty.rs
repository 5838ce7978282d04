// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Unit lines
//! are indented under their slice.

use std::io::Write;

use didact_core::trace::{
    RenderCompleteEvent, RenderFailedEvent, RenderStartEvent, SliceBeginEvent, SliceEndEvent,
    TraceSink, UnitEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    show_units: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("show_units", &self.show_units)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            show_units: true,
        }
    }

    /// Sets whether per-unit lines are written. Slice and render lines are
    /// always written.
    #[must_use]
    pub fn show_units(mut self, show: bool) -> Self {
        self.show_units = show;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        let abandoned = if e.abandoned {
            " (abandoned previous)"
        } else {
            ""
        };
        let _ = writeln!(self.writer, "[render:start] render={}{abandoned}", e.render_index);
    }

    fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[slice:begin] slice={} render={}",
            e.slice_index, e.render_index,
        );
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        if !self.show_units {
            return;
        }
        let created = if e.created_node { " +node" } else { "" };
        let _ = writeln!(
            self.writer,
            "  [unit] fiber={} {}{created} children={}",
            e.fiber.index(),
            e.kind.label(),
            e.children,
        );
    }

    fn on_slice_end(&mut self, e: &SliceEndEvent) {
        let _ = writeln!(
            self.writer,
            "[slice:end] slice={} units={} reason={}",
            e.slice_index,
            e.units,
            e.reason.label(),
        );
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[render:done] render={} units={} slices={}",
            e.render_index, e.units, e.slices,
        );
    }

    fn on_render_failed(&mut self, e: &RenderFailedEvent) {
        let _ = writeln!(
            self.writer,
            "[render:FAILED] render={} fiber={} after {} units",
            e.render_index,
            e.fiber.index(),
            e.units,
        );
    }
}
