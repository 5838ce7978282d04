// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber arena.
//!
//! A *fiber* is the mutable unit-of-work record for one element. Each fiber
//! has:
//!
//! - An identity ([`FiberId`]): an index handle stamped with the render epoch
//!   it belongs to, so handles from an abandoned render are rejected instead
//!   of aliasing fibers of the current one.
//! - Topology: parent, first-child and next-sibling links. A fiber has exactly
//!   one `child` link; its other children hang off that child's `sibling`
//!   chain.
//! - A source: the [`Element`](crate::element::Element) it mirrors, or for the
//!   synthetic root, the single element being rendered.
//! - An optional host node, created at most once.
//!
//! Fibers are stored in struct-of-arrays layout. Links are raw indices with
//! [`INVALID`] meaning "none", which is what lets the work loop stop after any
//! fiber and pick up again later: the whole continuation is one [`FiberId`].
//!
//! # Lazy expansion
//!
//! A fiber's children are only materialized when the fiber itself is
//! processed. Until then its `child` link is [`INVALID`] and its element's
//! children exist only in the element tree.

mod id;
mod store;
mod traverse;

pub use id::{FiberId, INVALID};
pub use store::FiberStore;
pub use traverse::{Children, PreOrder};
