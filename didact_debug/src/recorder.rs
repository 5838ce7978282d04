// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed with a one-byte
//! tag. [`decode`] reads them back as an iterator of [`RecordedEvent`].
//! Decoding stops for good at the first unknown tag or truncated record.

use core::iter::FusedIterator;

use didact_core::SliceEndReason;
use didact_core::fiber::FiberId;
use didact_core::trace::{
    RenderCompleteEvent, RenderFailedEvent, RenderStartEvent, SliceBeginEvent, SliceEndEvent,
    TraceSink, UnitEvent, UnitKind,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_RENDER_START: u8 = 1;
const TAG_SLICE_BEGIN: u8 = 2;
const TAG_UNIT: u8 = 3;
const TAG_SLICE_END: u8 = 4;
const TAG_RENDER_COMPLETE: u8 = 5;
const TAG_RENDER_FAILED: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_fiber(&mut self, id: FiberId) {
        self.write_u32(id.index());
        self.write_u32(id.epoch());
    }

    fn write_kind(&mut self, kind: UnitKind) {
        self.write_u8(match kind {
            UnitKind::Root => 0,
            UnitKind::Element => 1,
            UnitKind::Text => 2,
        });
    }

    fn write_reason(&mut self, reason: SliceEndReason) {
        self.write_u8(match reason {
            SliceEndReason::BudgetExhausted => 0,
            SliceEndReason::UnitLimit => 1,
            SliceEndReason::Idle => 2,
            SliceEndReason::Failed => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_render_start(&mut self, e: &RenderStartEvent) {
        self.write_u8(TAG_RENDER_START);
        self.write_u64(e.render_index);
        self.write_u8(u8::from(e.abandoned));
    }

    fn on_slice_begin(&mut self, e: &SliceBeginEvent) {
        self.write_u8(TAG_SLICE_BEGIN);
        self.write_u64(e.slice_index);
        self.write_u64(e.render_index);
    }

    fn on_unit(&mut self, e: &UnitEvent) {
        self.write_u8(TAG_UNIT);
        self.write_u64(e.render_index);
        self.write_u64(e.slice_index);
        self.write_fiber(e.fiber);
        self.write_kind(e.kind);
        self.write_u8(u8::from(e.created_node));
        self.write_u32(e.children);
    }

    fn on_slice_end(&mut self, e: &SliceEndEvent) {
        self.write_u8(TAG_SLICE_END);
        self.write_u64(e.slice_index);
        self.write_u64(e.render_index);
        self.write_u32(e.units);
        self.write_reason(e.reason);
    }

    fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
        self.write_u8(TAG_RENDER_COMPLETE);
        self.write_u64(e.render_index);
        self.write_u32(e.units);
        self.write_u32(e.slices);
    }

    fn on_render_failed(&mut self, e: &RenderFailedEvent) {
        self.write_u8(TAG_RENDER_FAILED);
        self.write_u64(e.render_index);
        self.write_fiber(e.fiber);
        self.write_u32(e.units);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`RenderStartEvent`].
    RenderStart(RenderStartEvent),
    /// A [`SliceBeginEvent`].
    SliceBegin(SliceBeginEvent),
    /// A [`UnitEvent`].
    Unit(UnitEvent),
    /// A [`SliceEndEvent`].
    SliceEnd(SliceEndEvent),
    /// A [`RenderCompleteEvent`].
    RenderComplete(RenderCompleteEvent),
    /// A [`RenderFailedEvent`].
    RenderFailed(RenderFailedEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_fiber(&mut self) -> Option<FiberId> {
        let index = self.read_u32()?;
        let epoch = self.read_u32()?;
        Some(FiberId::from_parts(index, epoch))
    }

    fn read_kind(&mut self) -> Option<UnitKind> {
        Some(match self.read_u8()? {
            0 => UnitKind::Root,
            1 => UnitKind::Element,
            2 => UnitKind::Text,
            _ => return None,
        })
    }

    fn read_reason(&mut self) -> Option<SliceEndReason> {
        Some(match self.read_u8()? {
            0 => SliceEndReason::BudgetExhausted,
            1 => SliceEndReason::UnitLimit,
            2 => SliceEndReason::Idle,
            3 => SliceEndReason::Failed,
            _ => return None,
        })
    }

    fn decode_render_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderStart(RenderStartEvent {
            render_index: self.read_u64()?,
            abandoned: self.read_bool()?,
        }))
    }

    fn decode_slice_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SliceBegin(SliceBeginEvent {
            slice_index: self.read_u64()?,
            render_index: self.read_u64()?,
        }))
    }

    fn decode_unit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Unit(UnitEvent {
            render_index: self.read_u64()?,
            slice_index: self.read_u64()?,
            fiber: self.read_fiber()?,
            kind: self.read_kind()?,
            created_node: self.read_bool()?,
            children: self.read_u32()?,
        }))
    }

    fn decode_slice_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SliceEnd(SliceEndEvent {
            slice_index: self.read_u64()?,
            render_index: self.read_u64()?,
            units: self.read_u32()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_render_complete(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderComplete(RenderCompleteEvent {
            render_index: self.read_u64()?,
            units: self.read_u32()?,
            slices: self.read_u32()?,
        }))
    }

    fn decode_render_failed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderFailed(RenderFailedEvent {
            render_index: self.read_u64()?,
            fiber: self.read_fiber()?,
            units: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = match self.read_u8()? {
            TAG_RENDER_START => self.decode_render_start(),
            TAG_SLICE_BEGIN => self.decode_slice_begin(),
            TAG_UNIT => self.decode_unit(),
            TAG_SLICE_END => self.decode_slice_end(),
            TAG_RENDER_COMPLETE => self.decode_render_complete(),
            TAG_RENDER_FAILED => self.decode_render_failed(),
            _ => None,
        };
        if event.is_none() {
            // Nothing after a bad record can be trusted.
            self.pos = self.data.len();
        }
        event
    }
}

impl FusedIterator for DecodeIter<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
