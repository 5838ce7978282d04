// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host binding for `didact_core`.
//!
//! This crate stands in for a browser when rendering outside of one:
//!
//! - [`HeadlessHost`]: a [`Host`](didact_core::host::Host) over an in-memory
//!   node arena that logs every call as a [`HostOp`] and serializes subtrees
//!   as markup.
//! - [`StepDeadline`]: a deterministic deadline that allows a fixed number of
//!   units per slice.
//! - [`drive`]: the synchronous equivalent of an idle callback that
//!   re-schedules itself until the work loop is idle.
//!
//! # Example
//!
//! ```
//! use didact_core::trace::Tracer;
//! use didact_core::{Props, WorkLoop, WorkLoopConfig, create_element};
//! use didact_headless::{HeadlessHost, StepDeadline, drive};
//!
//! let mut host = HeadlessHost::new();
//! let container = host.create_container("main");
//! let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
//! work_loop.render(
//!     create_element(
//!         "div",
//!         Props::new().with("id", "foo"),
//!         [create_element("h1", Props::new(), ["Didact!"])],
//!     ),
//!     container,
//! );
//!
//! drive(&mut work_loop, &mut host, || StepDeadline::new(1), 16, &mut Tracer::none()).unwrap();
//! assert_eq!(host.inner_markup(container), r#"<div id="foo"><h1>Didact!</h1></div>"#);
//! ```

pub mod deadline;
pub mod driver;
pub mod host;

pub use deadline::StepDeadline;
pub use driver::{DriveError, DriveStats, drive, run_to_idle};
pub use host::{HeadlessHost, HostError, HostOp, NodeId};
