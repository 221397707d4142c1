//! MemoryDocument - In-memory Document
//!
//! An arena of elements with just enough DOM semantics for the guide:
//! document-order queries, classes, attributes, inline styles, text and form state.

use hashlink::LinkedHashMap;
use serde::Serialize;

use super::{Document, NodeId, Selector};

/// Element description used when building a document
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    value: String,
    checked: bool,
}

impl Element {
    /// Create a new element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the `id` attribute
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the element's own text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the form control value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the initial checked state
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: LinkedHashMap<String, String>,
    classes: Vec<String>,
    style: LinkedHashMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn from_element(element: Element, parent: Option<NodeId>) -> Self {
        let mut attributes = LinkedHashMap::new();
        for (name, value) in element.attributes {
            attributes.insert(name, value);
        }
        Self {
            tag: element.tag,
            attributes,
            classes: element.classes,
            style: LinkedHashMap::new(),
            text: element.text,
            value: element.value,
            checked: element.checked,
            parent,
            children: Vec::new(),
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        selector.matches(
            &self.tag,
            |name| self.attributes.get(name).map(String::as_str),
            |class| self.classes.iter().any(|c| c == class),
        )
    }
}

/// Serializable view of an element subtree
#[derive(Debug, Clone, Serialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub attributes: LinkedHashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub style: LinkedHashMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

/// In-memory document with `<html>` and `<body>` pre-created
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
}

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl MemoryDocument {
    /// Create an empty document
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node::from_element(Element::new("html"), None)],
            focused: None,
        };
        doc.append(ROOT, Element::new("body"));
        doc
    }

    /// Append an element as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::from_element(element, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.push(id);
        }
        id
    }

    /// Snapshot the whole document
    pub fn snapshot(&self) -> ElementSnapshot {
        self.snapshot_node(ROOT)
    }

    fn snapshot_node(&self, id: NodeId) -> ElementSnapshot {
        let node = &self.nodes[id.0];
        ElementSnapshot {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            classes: node.classes.clone(),
            style: node.style.clone(),
            text: node.text.clone(),
            value: node.value.clone(),
            checked: node.checked,
            children: node.children.iter().map(|c| self.snapshot_node(*c)).collect(),
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Pre-order traversal of `scope`'s descendants (excluding `scope`)
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(scope) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            out.push_str(&node.text);
            for child in &node.children {
                self.collect_text(*child, out);
            }
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        std::iter::once(ROOT)
            .chain(self.descendants(ROOT))
            .filter(|id| self.nodes[id.0].matches(selector))
            .collect()
    }

    fn query_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.nodes[id.0].matches(selector))
    }

    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.node(id)?;
            if n.matches(selector) {
                return Some(id);
            }
            current = n.parent;
        }
        None
    }

    fn root(&self) -> NodeId {
        ROOT
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attributes.replace(name.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.node(node).map(|n| n.classes.clone()).unwrap_or_default()
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, force: bool) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        let present = n.classes.iter().any(|c| c == class);
        if force && !present {
            n.classes.push(class.to_string());
        } else if !force && present {
            n.classes.retain(|c| c != class);
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
            n.children.clear();
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)?.style.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.style.replace(property.to_string(), value.to_string());
        }
    }

    fn value(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.value = value.to_string();
        }
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.checked)
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(n) = self.node_mut(node) {
            n.checked = checked;
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.node(node).is_some() {
            self.focused = Some(node);
        }
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}
