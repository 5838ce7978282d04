// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes one JSON object
//! per line. Every object has an `"event"` field naming the event type; the
//! remaining fields mirror the event struct.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as JSON lines.
///
/// # Errors
///
/// Returns any error reported by `writer`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    for recorded in decode(bytes) {
        serde_json::to_writer(&mut *writer, &to_value(&recorded))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Converts one recorded event to its JSON form.
#[must_use]
pub fn to_value(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::RenderStart(e) => json!({
            "event": "render_start",
            "render": e.render_index,
            "abandoned": e.abandoned,
        }),
        RecordedEvent::SliceBegin(e) => json!({
            "event": "slice_begin",
            "slice": e.slice_index,
            "render": e.render_index,
        }),
        RecordedEvent::Unit(e) => json!({
            "event": "unit",
            "render": e.render_index,
            "slice": e.slice_index,
            "fiber": e.fiber.index(),
            "epoch": e.fiber.epoch(),
            "kind": e.kind.label(),
            "created_node": e.created_node,
            "children": e.children,
        }),
        RecordedEvent::SliceEnd(e) => json!({
            "event": "slice_end",
            "slice": e.slice_index,
            "render": e.render_index,
            "units": e.units,
            "reason": e.reason.label(),
        }),
        RecordedEvent::RenderComplete(e) => json!({
            "event": "render_complete",
            "render": e.render_index,
            "units": e.units,
            "slices": e.slices,
        }),
        RecordedEvent::RenderFailed(e) => json!({
            "event": "render_failed",
            "render": e.render_index,
            "fiber": e.fiber.index(),
            "epoch": e.fiber.epoch(),
            "units": e.units,
        }),
    }
}
