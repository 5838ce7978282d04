// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host tree.
//!
//! [`HeadlessHost`] keeps nodes in an arena addressed by [`NodeId`] and
//! follows DOM semantics where they matter to the work loop:
//!
//! - `append_child` moves a node that already has a parent,
//! - a node cannot be appended into itself or its own subtree,
//! - text nodes cannot have children.
//!
//! Every call made through the [`Host`] trait is appended to an operation log
//! ([`HostOp`]) so tests can assert on order, not only on the final tree.

use std::fmt::Write as _;

use didact_core::element::NODE_VALUE;
use didact_core::host::Host;
use didact_core::{ElementKind, PropValue};

/// Handle to a node in a [`HeadlessHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Failures reported by [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Node creation for this tag was configured to fail.
    #[error("creation of <{0}> was rejected")]
    CreateRejected(String),
    /// The handle does not belong to this host.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// The append would put a node under itself or under a text node.
    #[error("cannot append {child:?} to {parent:?}")]
    HierarchyRequest {
        /// Prospective parent.
        parent: NodeId,
        /// Node being appended.
        child: NodeId,
    },
}

/// One recorded host call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostOp {
    /// A node was created.
    Create {
        /// The new node.
        node: NodeId,
        /// What was requested.
        kind: ElementKind,
    },
    /// A prop was applied.
    SetProperty {
        /// Target node.
        node: NodeId,
        /// Prop name.
        name: String,
        /// Prop value, in string form.
        value: String,
    },
    /// A node was appended.
    Append {
        /// New parent.
        parent: NodeId,
        /// Appended node.
        child: NodeId,
    },
}

#[derive(Debug)]
enum Content {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An in-memory host tree that records every operation.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    nodes: Vec<Node>,
    ops: Vec<HostOp>,
    reject_tag: Option<String>,
}

impl HeadlessHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element to render into. Not recorded in the
    /// operation log.
    pub fn create_container(&mut self, tag: &str) -> NodeId {
        self.push(Content::Element {
            tag: tag.to_owned(),
            attributes: Vec::new(),
        })
    }

    /// Makes every later creation of `tag` fail with
    /// [`HostError::CreateRejected`].
    pub fn fail_on_tag(&mut self, tag: &str) {
        self.reject_tag = Some(tag.to_owned());
    }

    /// Returns every recorded host call, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Empties the operation log.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Returns the number of nodes, containers included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the parent of `id`, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Returns the children of `id` in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| &n.children)
    }

    /// Returns the tag of an element node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.content {
            Content::Element { tag, .. } => Some(tag),
            Content::Text(_) => None,
        }
    }

    /// Returns the content of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.content {
            Content::Text(text) => Some(text),
            Content::Element { .. } => None,
        }
    }

    /// Returns an attribute of an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.content {
            Content::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            Content::Text(_) => None,
        }
    }

    /// Serializes `id` and its subtree as HTML-like markup.
    #[must_use]
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Serializes the children of `id`, without `id` itself.
    #[must_use]
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.content {
            Content::Text(text) => escape_into(text, false, out),
            Content::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, HostError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(HostError::UnknownNode(id))
    }

    fn push(&mut self, content: Content) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "test trees stay far below u32::MAX nodes"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            content,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(up) => id = up,
                None => return false,
            }
        }
    }
}

impl Host for HeadlessHost {
    type Node = NodeId;
    type Error = HostError;

    fn create_node(&mut self, kind: &ElementKind) -> Result<NodeId, HostError> {
        let content = match kind {
            ElementKind::Text => Content::Text(String::new()),
            ElementKind::Tag(tag) => {
                if self.reject_tag.as_deref() == Some(tag.as_str()) {
                    return Err(HostError::CreateRejected(tag.clone()));
                }
                Content::Element {
                    tag: tag.clone(),
                    attributes: Vec::new(),
                }
            }
        };
        let node = self.push(content);
        self.ops.push(HostOp::Create {
            node,
            kind: kind.clone(),
        });
        Ok(node)
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        let value = value.to_string();
        match &mut self.get_mut(*node)?.content {
            Content::Text(text) => {
                // Text nodes only understand their content.
                if name == NODE_VALUE {
                    text.clone_from(&value);
                }
            }
            Content::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(k, _)| k == name) {
                    Some((_, v)) => v.clone_from(&value),
                    None => attributes.push((name.to_owned(), value.clone())),
                }
            }
        }
        self.ops.push(HostOp::SetProperty {
            node: *node,
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        let (parent, child) = (*parent, *child);
        let _ = self.get_mut(child)?;
        if matches!(self.get_mut(parent)?.content, Content::Text(_))
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(HostError::HierarchyRequest { parent, child });
        }

        if let Some(old) = self.parent(child) {
            self.get_mut(old)?.children.retain(|&c| c != child);
        }
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        self.ops.push(HostOp::Append { parent, child });
        Ok(())
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> ElementKind {
        ElementKind::Tag(name.to_owned())
    }

    #[test]
    fn builds_and_serializes_a_tree() {
        let mut host = HeadlessHost::new();
        let root = host.create_container("main");
        let div = host.create_node(&tag("div")).unwrap();
        host.set_property(&div, "id", &PropValue::from("foo"))
            .unwrap();
        let text = host.create_node(&ElementKind::Text).unwrap();
        host.set_property(&text, NODE_VALUE, &PropValue::from("a < b"))
            .unwrap();
        host.append_child(&div, &text).unwrap();
        host.append_child(&root, &div).unwrap();

        assert_eq!(host.inner_markup(root), "<div id=\"foo\">a &lt; b</div>");
        assert_eq!(host.markup(root), "<main><div id=\"foo\">a &lt; b</div></main>");
        assert_eq!(host.attribute(div, "id"), Some("foo"));
        assert_eq!(host.text(text), Some("a < b"));
        assert_eq!(host.parent(div), Some(root));
        assert_eq!(host.ops().len(), 6, "the container is not logged");
    }

    #[test]
    fn reappending_moves_the_node() {
        let mut host = HeadlessHost::new();
        let a = host.create_container("a");
        let b = host.create_container("b");
        let child = host.create_node(&tag("i")).unwrap();
        host.append_child(&a, &child).unwrap();
        host.append_child(&b, &child).unwrap();
        assert!(host.children(a).is_empty());
        assert_eq!(host.children(b), [child]);
        assert_eq!(host.parent(child), Some(b));
    }

    #[test]
    fn setting_an_attribute_twice_replaces_it() {
        let mut host = HeadlessHost::new();
        let a = host.create_node(&tag("a")).unwrap();
        host.set_property(&a, "href", &PropValue::from("x")).unwrap();
        host.set_property(&a, "href", &PropValue::from("y")).unwrap();
        assert_eq!(host.markup(a), "<a href=\"y\"></a>");
    }

    #[test]
    fn rejects_cycles_and_text_parents() {
        let mut host = HeadlessHost::new();
        let outer = host.create_node(&tag("div")).unwrap();
        let inner = host.create_node(&tag("p")).unwrap();
        host.append_child(&outer, &inner).unwrap();
        assert_eq!(
            host.append_child(&inner, &outer),
            Err(HostError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
        assert!(host.append_child(&outer, &outer).is_err());

        let text = host.create_node(&ElementKind::Text).unwrap();
        assert!(host.append_child(&text, &inner).is_err());
        assert_eq!(host.parent(inner), Some(outer), "failed appends change nothing");
    }

    #[test]
    fn failure_injection_targets_one_tag() {
        let mut host = HeadlessHost::new();
        host.fail_on_tag("ul");
        assert!(host.create_node(&tag("li")).is_ok());
        assert_eq!(
            host.create_node(&tag("ul")),
            Err(HostError::CreateRejected("ul".to_owned()))
        );
        assert!(host.create_node(&ElementKind::Text).is_ok());
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut host = HeadlessHost::new();
        let a = host.create_container("a");
        let bogus = NodeId(99);
        assert_eq!(
            host.append_child(&a, &bogus),
            Err(HostError::UnknownNode(bogus))
        );
        assert_eq!(
            host.set_property(&bogus, "id", &PropValue::from(1)),
            Err(HostError::UnknownNode(bogus))
        );
    }
}
