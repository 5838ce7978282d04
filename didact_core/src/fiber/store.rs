// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays fiber storage with allocation, linking, and node slots.

use alloc::vec::Vec;
use core::fmt;

use crate::element::{Element, ElementKind};

use super::id::{FiberId, INVALID};
use super::traverse::Children;

/// What a fiber mirrors.
pub(crate) enum Source {
    /// The synthetic root; holds the element being rendered as its only
    /// pending child.
    Root(Element),
    /// A fiber created for an element.
    Element(Element),
}

impl Source {
    fn child_elements(&self) -> &[Element] {
        match self {
            Self::Root(el) => core::slice::from_ref(el),
            Self::Element(el) => el.children(),
        }
    }
}

/// Struct-of-arrays storage for the fibers of one render.
///
/// Fibers are addressed by [`FiberId`] handles. The store is append-only
/// within a render; starting a new render clears it and bumps the epoch, so
/// handles from the previous render fail validation.
///
/// `N` is the host's node handle type.
pub struct FiberStore<N> {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) child: Vec<u32>,
    pub(crate) sibling: Vec<u32>,

    // -- Work --
    pub(crate) source: Vec<Source>,
    pub(crate) node: Vec<Option<N>>,
    pub(crate) expanded: Vec<bool>,

    // -- Identity --
    pub(crate) epoch: u32,
}

impl<N> Default for FiberStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for FiberStore<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiberStore")
            .field("len", &self.parent.len())
            .field("epoch", &self.epoch)
            .field(
                "materialized",
                &self.node.iter().filter(|n| n.is_some()).count(),
            )
            .finish_non_exhaustive()
    }
}

impl<N> FiberStore<N> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            child: Vec::new(),
            sibling: Vec::new(),
            source: Vec::new(),
            node: Vec::new(),
            expanded: Vec::new(),
            epoch: 0,
        }
    }

    /// Returns the number of fibers created in the current epoch.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "slot count is bounded by INVALID, checked in alloc"
    )]
    pub fn len(&self) -> u32 {
        self.parent.len() as u32
    }

    /// Returns `true` if the store holds no fibers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the current render epoch.
    #[must_use]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    // -- Lifecycle (driven by the work loop) --

    /// Drops every fiber and starts a new epoch.
    ///
    /// Node handles held by the dropped fibers are dropped with them. The host
    /// nodes themselves are untouched: whatever was attached stays attached.
    pub(crate) fn reset(&mut self) {
        self.parent.clear();
        self.child.clear();
        self.sibling.clear();
        self.source.clear();
        self.node.clear();
        self.expanded.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Creates the synthetic root fiber with `container` as its node and
    /// `element` as its single pending child.
    ///
    /// # Panics
    ///
    /// Panics if the store is not empty.
    pub(crate) fn create_root(&mut self, container: N, element: Element) -> FiberId {
        assert!(self.is_empty(), "root fiber must be the first fiber of an epoch");
        let idx = self.alloc(INVALID, Source::Root(element));
        self.node[idx as usize] = Some(container);
        self.handle(idx)
    }

    /// Materializes one fiber per child element of `id` and links them: the
    /// first as `id`'s child, each later one as the previous one's sibling.
    ///
    /// Returns the number of fibers created.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `id` was already expanded.
    pub(crate) fn expand_children(&mut self, id: FiberId) -> u32 {
        self.validate(id);
        let p = id.idx;
        assert!(
            !self.expanded[p as usize],
            "fiber {id:?} was already expanded"
        );
        self.expanded[p as usize] = true;

        let elements: Vec<Element> = self.source[p as usize].child_elements().to_vec();
        let mut prev = INVALID;
        let mut count = 0;
        for element in elements {
            let idx = self.alloc(p, Source::Element(element));
            if prev == INVALID {
                self.child[p as usize] = idx;
            } else {
                self.sibling[prev as usize] = idx;
            }
            prev = idx;
            count += 1;
        }
        count
    }

    /// Stores the host node created for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the fiber already has a node.
    pub(crate) fn set_node(&mut self, id: FiberId, node: N) {
        self.validate(id);
        let slot = &mut self.node[id.idx as usize];
        assert!(slot.is_none(), "fiber {id:?} already has a host node");
        *slot = Some(node);
    }

    // -- Queries --

    /// Returns whether the given handle refers to a fiber of the current
    /// epoch.
    #[must_use]
    pub fn is_alive(&self, id: FiberId) -> bool {
        id.epoch == self.epoch && id.idx < self.len()
    }

    /// Returns the synthetic root of the current render, if any.
    #[must_use]
    pub fn root(&self) -> Option<FiberId> {
        (!self.is_empty()).then(|| self.handle(0))
    }

    /// Returns `true` if `id` is the synthetic root.
    #[must_use]
    pub fn is_root(&self, id: FiberId) -> bool {
        self.validate(id);
        matches!(self.source[id.idx as usize], Source::Root(_))
    }

    /// Returns the parent of a fiber, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.parent[id.idx as usize])
    }

    /// Returns the first child of a fiber, if it has been expanded and has
    /// children.
    #[must_use]
    pub fn child(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.child[id.idx as usize])
    }

    /// Returns the next sibling of a fiber, if any.
    #[must_use]
    pub fn sibling(&self, id: FiberId) -> Option<FiberId> {
        self.validate(id);
        self.link(self.sibling[id.idx as usize])
    }

    /// Returns an iterator over the materialized children of a fiber.
    #[must_use]
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        self.validate(id);
        Children::new(self, self.child[id.idx as usize])
    }

    /// Returns the element a fiber mirrors, or `None` for the root.
    #[must_use]
    pub fn element(&self, id: FiberId) -> Option<&Element> {
        self.validate(id);
        match &self.source[id.idx as usize] {
            Source::Root(_) => None,
            Source::Element(el) => Some(el),
        }
    }

    /// Returns the kind of node a fiber creates, or `None` for the root.
    #[must_use]
    pub fn kind(&self, id: FiberId) -> Option<&ElementKind> {
        self.element(id).map(Element::kind)
    }

    /// Returns the elements that expanding `id` turns into child fibers.
    #[must_use]
    pub fn child_elements(&self, id: FiberId) -> &[Element] {
        self.validate(id);
        self.source[id.idx as usize].child_elements()
    }

    /// Returns the host node of a fiber, if created.
    #[must_use]
    pub fn node(&self, id: FiberId) -> Option<&N> {
        self.validate(id);
        self.node[id.idx as usize].as_ref()
    }

    /// Returns whether the fiber has been processed.
    #[must_use]
    pub fn is_expanded(&self, id: FiberId) -> bool {
        self.validate(id);
        self.expanded[id.idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: FiberId) {
        assert!(
            self.is_alive(id),
            "stale FiberId: {id:?} (current epoch: {}, len: {})",
            self.epoch,
            self.len()
        );
    }

    pub(crate) fn handle(&self, idx: u32) -> FiberId {
        FiberId {
            idx,
            epoch: self.epoch,
        }
    }

    fn link(&self, idx: u32) -> Option<FiberId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    fn alloc(&mut self, parent: u32, source: Source) -> u32 {
        let idx = self.len();
        assert!(idx != INVALID, "fiber store is full");
        self.parent.push(parent);
        self.child.push(INVALID);
        self.sibling.push(INVALID);
        self.source.push(source);
        self.node.push(None);
        self.expanded.push(false);
        idx
    }
}
