// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding trace events to the [`log`] facade.
//!
//! Levels:
//!
//! - `info`: render start and completion,
//! - `debug`: slice boundaries,
//! - `trace`: individual units,
//! - `error`: render failures.

use didact_core::trace::{
    RenderCompleteEvent, RenderFailedEvent, RenderStartEvent, SliceBeginEvent, SliceEndEvent,
    TraceSink, UnitEvent,
};

/// Log target used by [`LogSink`] unless overridden.
pub const DEFAULT_TARGET: &str = "didact";

/// A [`TraceSink`] that emits one log record per event.
#[derive(Clone, Copy, Debug)]
pub struct LogSink {
    target: &'static str,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    /// Creates a sink logging under [`DEFAULT_TARGET`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            target: DEFAULT_TARGET,
        }
    }

    /// Creates a sink logging under `target`.
    #[must_use]
    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl TraceSink for LogSink {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        if e.abandoned {
            log::info!(
                target: self.target,
                "render {} started, previous render abandoned",
                e.render_index
            );
        } else {
            log::info!(target: self.target, "render {} started", e.render_index);
        }
    }

    fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
        log::debug!(
            target: self.target,
            "slice {} begins (render {})",
            e.slice_index,
            e.render_index
        );
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        log::trace!(
            target: self.target,
            "unit {:?} {} created_node={} children={}",
            e.fiber,
            e.kind.label(),
            e.created_node,
            e.children
        );
    }

    fn on_slice_end(&mut self, e: &SliceEndEvent) {
        log::debug!(
            target: self.target,
            "slice {} ended after {} units: {}",
            e.slice_index,
            e.units,
            e.reason.label()
        );
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        log::info!(
            target: self.target,
            "render {} complete: {} units in {} slices",
            e.render_index,
            e.units,
            e.slices
        );
    }

    fn on_render_failed(&mut self, e: &RenderFailedEvent) {
        log::error!(
            target: self.target,
            "render {} failed at {:?} after {} units",
            e.render_index,
            e.fiber,
            e.units
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use didact_core::fiber::FiberId;
    use log::{Level, Log, Metadata, Record};

    use super::*;

    struct Capture(Mutex<Vec<(Level, String, String)>>);

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.0.lock().unwrap().push((
                record.level(),
                record.target().to_owned(),
                record.args().to_string(),
            ));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn events_map_to_levels() {
        // Only test in this binary that installs a logger.
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let mut sink = LogSink::with_target("test-sink");
        sink.on_render_start(&RenderStartEvent {
            render_index: 1,
            abandoned: false,
        });
        sink.on_render_failed(&RenderFailedEvent {
            render_index: 1,
            fiber: FiberId::from_parts(3, 1),
            units: 2,
        });

        let records: Vec<_> = CAPTURE
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, target, _)| target == "test-sink")
            .cloned()
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Level::Info);
        assert_eq!(records[0].2, "render 1 started");
        assert_eq!(records[1].0, Level::Error);
        assert!(records[1].2.contains("after 2 units"), "got {:?}", records[1]);
    }
}
