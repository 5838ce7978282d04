// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable element trees.
//!
//! An [`Element`] describes one node of the desired host tree: its
//! [`ElementKind`] (a text node or a tagged element), its [`Props`], and its
//! ordered children. Elements are built once with [`create_element`] and never
//! mutated afterwards; cloning an `Element` clones a reference-counted handle,
//! so fibers can hold on to their source element without copying subtrees.
//!
//! Children passed to [`create_element`] may be elements or primitives.
//! Primitives (strings, numbers, booleans) are wrapped into text elements whose
//! [`NODE_VALUE`] prop carries the primitive's string form.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Prop name that carries the text of a text element.
pub const NODE_VALUE: &str = "nodeValue";

/// Reserved prop name. Children are structural and never host attributes.
pub const CHILDREN: &str = "children";

/// What kind of host node an element turns into.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A text node. Its content is the [`NODE_VALUE`] prop.
    Text,
    /// An element node with the given tag name.
    Tag(String),
}

impl ElementKind {
    /// Returns the tag name, or `None` for text.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Text => None,
            Self::Tag(tag) => Some(tag),
        }
    }

    /// Returns `true` for [`ElementKind::Text`].
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A prop value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// A string.
    Str(String),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
}

impl PropValue {
    /// Returns the string payload, if this is a [`PropValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Errors reported while building elements.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// The tag name was empty.
    #[error("element tag must not be empty")]
    EmptyTag,
    /// The tag name contained whitespace or markup delimiters.
    #[error("invalid element tag {0:?}")]
    InvalidTag(String),
    /// A prop used a reserved name.
    #[error("prop name {0:?} is reserved")]
    ReservedProp(String),
}

/// Insertion-ordered prop mapping.
///
/// Setting a name that is already present replaces its value in place, so the
/// order hosts see props in is the order names were first set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    /// Creates an empty prop mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style [`set`](Self::set).
    ///
    /// # Panics
    ///
    /// Panics if `name` is [`CHILDREN`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `name` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is [`CHILDREN`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        if let Err(err) = self.try_set(name, value) {
            panic!("{err}");
        }
    }

    /// Sets `name` to `value`, rejecting reserved names.
    pub fn try_set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropValue>,
    ) -> Result<(), ElementError> {
        let name = name.into();
        if name == CHILDREN {
            return Err(ElementError::ReservedProp(name));
        }
        self.insert(name, value.into());
        Ok(())
    }

    /// Returns the value of `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of props.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no props are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: String, value: PropValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }
}

#[derive(Debug, PartialEq)]
struct ElementData {
    kind: ElementKind,
    props: Props,
    children: Vec<Element>,
}

/// An immutable node description.
///
/// Cloning is cheap: all clones share the same underlying node.
#[derive(Clone, PartialEq)]
pub struct Element(Rc<ElementData>);

impl Element {
    /// Creates a text element with the given content.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let mut props = Props::new();
        props.insert(NODE_VALUE.into(), PropValue::Str(value.into()));
        Self(Rc::new(ElementData {
            kind: ElementKind::Text,
            props,
            children: Vec::new(),
        }))
    }

    /// Returns the element kind.
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.0.kind
    }

    /// Returns the element's props. Children are not part of the props.
    #[must_use]
    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// Returns the ordered children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.0.children
    }

    /// Returns the content of a text element, or `None` for tagged elements.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        if !self.0.kind.is_text() {
            return None;
        }
        self.0.props.get(NODE_VALUE).and_then(PropValue::as_str)
    }

    /// Returns the number of elements in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = alloc::vec![self];
        while let Some(el) = stack.pop() {
            count += 1;
            stack.extend(el.children());
        }
        count
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.0.kind)
            .field("props", &self.0.props)
            .field("children", &self.0.children)
            .finish()
    }
}

/// A child passed to [`create_element`]: an element or a primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    /// An element, used as-is.
    Element(Element),
    /// A primitive, wrapped into a text element.
    Primitive(PropValue),
}

impl Child {
    /// Converts the child into an element, wrapping primitives into text.
    #[must_use]
    pub fn into_element(self) -> Element {
        match self {
            Self::Element(el) => el,
            Self::Primitive(value) => Element::text(value.to_string()),
        }
    }
}

impl From<Element> for Child {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<&Element> for Child {
    fn from(value: &Element) -> Self {
        Self::Element(value.clone())
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<u32> for Child {
    fn from(value: u32) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Self::Primitive(value.into())
    }
}

/// Builds a tagged element.
///
/// # Panics
///
/// Panics if `tag` is empty or contains whitespace, `<`, `>` or `/`. Use
/// [`try_create_element`] to handle invalid tags.
#[must_use]
pub fn create_element<I, C>(tag: &str, props: Props, children: I) -> Element
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    match try_create_element(tag, props, children) {
        Ok(el) => el,
        Err(err) => panic!("{err}"),
    }
}

/// Builds a tagged element, validating the tag name.
pub fn try_create_element<I, C>(
    tag: &str,
    props: Props,
    children: I,
) -> Result<Element, ElementError>
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    validate_tag(tag)?;
    let children = children
        .into_iter()
        .map(|c| c.into().into_element())
        .collect();
    Ok(Element(Rc::new(ElementData {
        kind: ElementKind::Tag(tag.into()),
        props,
        children,
    })))
}

/// Shorthand for [`Element::text`].
#[must_use]
pub fn text(value: impl Into<String>) -> Element {
    Element::text(value)
}

fn validate_tag(tag: &str) -> Result<(), ElementError> {
    if tag.is_empty() {
        return Err(ElementError::EmptyTag);
    }
    if tag
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/'))
    {
        return Err(ElementError::InvalidTag(tag.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn no_children() -> [Child; 0] {
        []
    }

    #[test]
    fn primitive_children_become_text() {
        let el = create_element(
            "p",
            Props::new(),
            [Child::from("count: "), Child::from(3), Child::from(true)],
        );
        let texts: Vec<_> = el.children().iter().map(|c| c.text_value()).collect();
        assert_eq!(texts, vec![Some("count: "), Some("3"), Some("true")]);
        assert!(el.children().iter().all(|c| c.kind().is_text()));
        assert!(el.children().iter().all(|c| c.children().is_empty()));
    }

    #[test]
    fn nested_example_tree() {
        let el = create_element(
            "div",
            Props::new().with("id", "foo"),
            [create_element("h1", Props::new(), ["Didact!"])],
        );
        assert_eq!(el.kind().tag(), Some("div"));
        assert_eq!(el.props().get("id"), Some(&PropValue::from("foo")));
        assert_eq!(el.children().len(), 1);
        let h1 = &el.children()[0];
        assert_eq!(h1.kind().tag(), Some("h1"));
        assert_eq!(h1.children()[0].text_value(), Some("Didact!"));
        assert_eq!(el.subtree_len(), 3);
    }

    #[test]
    fn props_keep_first_insertion_order() {
        let props = Props::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", "again");
        let names: Vec<_> = props.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropValue::from("again")));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn children_prop_is_reserved() {
        let mut props = Props::new();
        assert_eq!(
            props.try_set(CHILDREN, "x"),
            Err(ElementError::ReservedProp("children".into()))
        );
        assert!(props.is_empty());
    }

    #[test]
    #[should_panic(expected = "is reserved")]
    fn with_children_prop_panics() {
        let _ = Props::new().with(CHILDREN, 1);
    }

    #[test]
    fn invalid_tags_are_rejected() {
        assert_eq!(
            try_create_element("", Props::new(), no_children()),
            Err(ElementError::EmptyTag)
        );
        assert_eq!(
            try_create_element("di v", Props::new(), no_children()),
            Err(ElementError::InvalidTag("di v".into()))
        );
        assert!(try_create_element("<b>", Props::new(), no_children()).is_err());
        assert!(try_create_element("my-widget", Props::new(), no_children()).is_ok());
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn create_element_panics_on_empty_tag() {
        let _ = create_element("", Props::new(), no_children());
    }

    #[test]
    fn clones_share_the_node() {
        let el = text("hi");
        let copy = el.clone();
        assert!(Element::ptr_eq(&el, &copy));
        assert!(!Element::ptr_eq(&el, &text("hi")));
        assert_eq!(el, text("hi"));
    }

    #[test]
    fn tagged_element_has_no_text_value() {
        let el = create_element("span", Props::new().with(NODE_VALUE, "x"), no_children());
        assert_eq!(el.text_value(), None);
    }

    #[test]
    fn prop_values_render_as_strings() {
        assert_eq!(PropValue::from("x").to_string(), "x");
        assert_eq!(PropValue::from(42).to_string(), "42");
        assert_eq!(PropValue::from(1.5).to_string(), "1.5");
        assert_eq!(PropValue::from(false).to_string(), "false");
    }
}
