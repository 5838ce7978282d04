// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber identity.

use core::fmt;

/// Sentinel value indicating "no fiber" in link fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a fiber in a [`FiberStore`](super::FiberStore).
///
/// Holds the slot index and the render epoch the fiber was created in. Every
/// render starts a new epoch, so a handle kept across a `render` call fails
/// validation instead of silently pointing at an unrelated fiber.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiberId {
    pub(crate) idx: u32,
    pub(crate) epoch: u32,
}

impl FiberId {
    /// Reassembles a handle from its parts, e.g. when decoding a trace
    /// recording. The result is only meaningful to the store that issued the
    /// original handle.
    #[inline]
    #[must_use]
    pub const fn from_parts(index: u32, epoch: u32) -> Self {
        Self { idx: index, epoch }
    }

    /// Returns the raw slot index. The synthetic root is always slot 0.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the render epoch this handle belongs to.
    #[inline]
    #[must_use]
    pub const fn epoch(self) -> u32 {
        self.epoch
    }
}

impl fmt::Debug for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FiberId({}@epoch{})", self.idx, self.epoch)
    }
}
