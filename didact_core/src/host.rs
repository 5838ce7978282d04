// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host binding contract.
//!
//! Didact never touches a native UI toolkit itself. Everything that produces
//! real nodes goes through a [`Host`] implementation, provided by a backend
//! crate:
//!
//! - **Node creation**: [`Host::create_node`] makes a text node or an element
//!   node for an [`ElementKind`].
//! - **Props**: [`Host::set_property`] applies one prop to a fresh node. Text
//!   nodes receive their content through the
//!   [`NODE_VALUE`](crate::element::NODE_VALUE) prop.
//! - **Attachment**: [`Host::append_child`] attaches a node under its parent's
//!   node.
//!
//! Backends also drive the work loop from whatever idle primitive the platform
//! offers (e.g. `requestIdleCallback`), handing each slice a
//! [`Deadline`](crate::deadline::Deadline).
//!
//! # Crate boundaries
//!
//! `didact_core` owns the element model, the fiber arena, the work loop and
//! this contract. Backend crates depend on `didact_core` and provide the
//! platform glue. Application code depends on both and wires them together in
//! an idle callback.

use crate::element::{Element, ElementKind, PropValue};

/// Creates, configures and attaches native nodes.
///
/// Both the DOM binding and the in-memory headless binding implement this
/// trait, enabling generic work loops and test doubles.
///
/// # Idle callback pseudocode
///
/// ```rust,ignore
/// fn on_idle(deadline: &IdleDeadline) {
///     // Perform units of work until the deadline runs low.
///     if let Err(err) = work_loop.run(&mut host, &budget(deadline), &mut tracer) {
///         report(err);
///     }
///     // Ask for the next idle slot, whether or not work remains.
///     request_idle_callback(on_idle);
/// }
/// ```
pub trait Host {
    /// Handle to a native node. Fibers own one handle each once created.
    type Node;

    /// Error reported by failing host operations.
    type Error;

    /// Creates a detached node for `kind`.
    fn create_node(&mut self, kind: &ElementKind) -> Result<Self::Node, Self::Error>;

    /// Applies one prop to `node`.
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), Self::Error>;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), Self::Error>;
}

/// Creates the node for `element` and applies all of its props in order.
///
/// Children are not part of the props and are never passed to the host here;
/// they become fibers of their own.
pub fn materialize<H: Host + ?Sized>(host: &mut H, element: &Element) -> Result<H::Node, H::Error> {
    let node = host.create_node(element.kind())?;
    for (name, value) in element.props().iter() {
        host.set_property(&node, name, value)?;
    }
    Ok(node)
}
