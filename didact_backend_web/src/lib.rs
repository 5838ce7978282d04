// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for didact.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomHost`]: the [`Host`] binding over a `web_sys::Document`
//! - [`IdleLoop`]: `requestIdleCallback` slice source
//! - [`DomRoot`]: a render root that runs one slice per idle period
//!
//! ```rust,ignore
//! let host = DomHost::from_window().expect("no document");
//! let container = host.document().get_element_by_id("root").expect("no #root");
//! let root = DomRoot::new(host, WorkLoopConfig::browser())?;
//! root.render(element, &container);
//! ```

#![no_std]

extern crate alloc;

mod host;
mod idle;
mod root;

pub use didact_core::host::Host;
pub use host::DomHost;
pub use idle::{IdleBudget, IdleLoop, IdleUnavailable};
pub use root::{DomRoot, Scheduled};
