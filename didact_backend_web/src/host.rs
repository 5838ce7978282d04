// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM host binding.
//!
//! Element props become attributes via `setAttribute`; text nodes take their
//! content from the `nodeValue` prop.

use alloc::string::ToString;

use didact_core::element::NODE_VALUE;
use didact_core::host::Host;
use didact_core::{ElementKind, PropValue};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, Node};

/// Creates and attaches DOM nodes in one document.
pub struct DomHost {
    document: Document,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("document", &"Document")
            .finish()
    }
}

impl DomHost {
    /// Creates a host for `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Creates a host for the current window's document, if there is one.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    /// Returns the document nodes are created in.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Host for DomHost {
    type Node = Node;
    type Error = JsValue;

    fn create_node(&mut self, kind: &ElementKind) -> Result<Node, JsValue> {
        Ok(match kind {
            ElementKind::Text => self.document.create_text_node("").into(),
            ElementKind::Tag(tag) => self.document.create_element(tag)?.into(),
        })
    }

    fn set_property(&mut self, node: &Node, name: &str, value: &PropValue) -> Result<(), JsValue> {
        let value = value.to_string();
        if let Some(element) = node.dyn_ref::<Element>() {
            element.set_attribute(name, &value)
        } else {
            if name == NODE_VALUE {
                node.set_node_value(Some(&value));
            }
            Ok(())
        }
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), JsValue> {
        parent.append_child(child).map(drop)
    }
}
