// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal over fiber links.
//!
//! [`FiberStore::next_unit`] is the whole continuation logic of the work loop:
//! given the fiber that was just processed, it picks the next one in
//! pre-order (first child, else own sibling, else the nearest ancestor's
//! sibling) using nothing but the stored links.

use super::id::{FiberId, INVALID};
use super::store::FiberStore;

impl<N> FiberStore<N> {
    /// Returns the fiber to process after `id`, or `None` when the tree is
    /// exhausted.
    ///
    /// Descends to the first child if `id` has one. Otherwise walks upward
    /// from `id` and returns the first sibling found; reaching a fiber with
    /// neither sibling nor parent ends the walk.
    ///
    /// Only materialized links are followed, so this must be called after `id`
    /// has been expanded for its children to be visited.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn next_unit(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        let first = self.child[id.idx as usize];
        if first != INVALID {
            return Some(self.handle(first));
        }
        let mut cur = id.idx;
        loop {
            let next = self.sibling[cur as usize];
            if next != INVALID {
                return Some(self.handle(next));
            }
            let up = self.parent[cur as usize];
            if up == INVALID {
                return None;
            }
            cur = up;
        }
    }

    /// Returns a pre-order iterator over all materialized fibers, starting at
    /// the root.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_, N> {
        PreOrder {
            store: self,
            next: self.root(),
        }
    }
}

/// An iterator over the direct children of a fiber.
///
/// Created by [`FiberStore::children`].
pub struct Children<'a, N> {
    store: &'a FiberStore<N>,
    current: u32,
}

impl<'a, N> Children<'a, N> {
    pub(crate) fn new(store: &'a FiberStore<N>, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl<N> core::fmt::Debug for Children<'_, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Children")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.sibling[idx as usize];
        Some(self.store.handle(idx))
    }
}

/// A pre-order iterator over materialized fibers.
///
/// Created by [`FiberStore::pre_order`]. Visits fibers in the same order the
/// work loop processes them.
pub struct PreOrder<'a, N> {
    store: &'a FiberStore<N>,
    next: Option<FiberId>,
}

impl<N> core::fmt::Debug for PreOrder<'_, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreOrder")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<N> Iterator for PreOrder<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.store.next_unit(id);
        Some(id)
    }
}
