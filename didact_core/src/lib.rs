// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber arena and cooperative work loop for incremental element-tree
//! rendering.
//!
//! `didact_core` mounts an immutable [`Element`](element::Element) tree into a
//! host tree (DOM nodes, an in-memory tree, ...) without ever blocking the
//! host for long. Construction is split into *units of work*, one per element,
//! and the host decides how many units fit into each idle slot. It is
//! `no_std` compatible (with `alloc`) and keeps all traversal state in an
//! index-addressed arena, so an interrupted render resumes exactly where it
//! stopped.
//!
//! # Architecture
//!
//! ```text
//!   create_element() ──► Element tree (immutable)
//!                              │
//!   WorkLoop::render(element, container)
//!                              │  seeds the root fiber
//!                              ▼
//!   Host idle callback ──► WorkLoop::run(host, deadline)
//!                              │
//!        ┌─────────────────────┴────────────────────┐
//!        │ while work remains and budget is left:    │
//!        │   expand fiber ──► Host::create_node      │
//!        │                ──► Host::set_property     │
//!        │                ──► Host::append_child     │
//!        │   advance to next fiber (pre-order)       │
//!        └─────────────────────┬────────────────────┘
//!                              ▼
//!   SliceReport ──► host requests the next idle slot
//! ```
//!
//! **[`element`]**: Immutable element tree and the `create_element` builder.
//! Primitive children become text elements.
//!
//! **[`fiber`]**: Struct-of-arrays fiber arena with epoch-checked handles.
//! Parent, first-child and next-sibling links are plain indices, which is
//! what makes traversal resumable without recursion.
//!
//! **[`host`]**: The [`Host`](host::Host) trait that host bindings implement
//! to create, configure and attach native nodes.
//!
//! **[`deadline`]**: The [`Deadline`](deadline::Deadline) budget contract the
//! host hands to each slice.
//!
//! **[`work_loop`]**: The cooperative scheduler that owns the fiber arena and
//! the pointer to the next unit of work.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! work-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Adds [`InstantDeadline`](deadline::InstantDeadline).
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod deadline;
pub mod element;
pub mod fiber;
pub mod host;
pub mod trace;
pub mod work_loop;

pub use element::{Child, Element, ElementKind, PropValue, Props, create_element, text};
pub use work_loop::{
    LoopStatus, RenderError, SliceEndReason, SliceReport, WorkLoop, WorkLoopConfig,
};
