//! Document Host
//!
//! The controllers never touch a concrete page. They talk to a [`Document`],
//! which a browser host implements over real nodes and tests implement with
//! [`MemoryDocument`].

mod memory;
mod selector;

pub use memory::*;
pub use selector::*;

/// Handle to an element inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The subset of the DOM the guide reads and mutates
pub trait Document {
    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    /// First element matching `selector`
    fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`
    fn query_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId>;

    /// Nearest ancestor-or-self matching `selector`
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId>;

    /// The document element (`<html>`)
    fn root(&self) -> NodeId;

    /// The `<body>` element
    fn body(&self) -> NodeId;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn classes(&self, node: NodeId) -> Vec<String>;
    /// Add the class when `force` is true, remove it otherwise
    fn toggle_class(&mut self, node: NodeId, class: &str, force: bool);

    /// Concatenated text of the element and its descendants
    fn text_content(&self, node: NodeId) -> String;
    /// Replace the element's children with a single text run
    fn set_text_content(&mut self, node: NodeId, text: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Current value of a form control
    fn value(&self, node: NodeId) -> String;
    fn set_value(&mut self, node: NodeId, value: &str);

    fn is_checked(&self, node: NodeId) -> bool;
    fn set_checked(&mut self, node: NodeId, checked: bool);

    fn focus(&mut self, node: NodeId);
    fn focused(&self) -> Option<NodeId>;
}

/// Parse `selector` and return the first match, logging invalid selectors
pub fn lookup(doc: &dyn Document, selector: &str) -> Option<NodeId> {
    match Selector::parse(selector) {
        Ok(selector) => doc.query(&selector),
        Err(e) => {
            tracing::warn!(error = %e, "Selector lookup skipped");
            None
        }
    }
}

/// Parse `selector` and return every match, logging invalid selectors
pub fn lookup_all(doc: &dyn Document, selector: &str) -> Vec<NodeId> {
    match Selector::parse(selector) {
        Ok(selector) => doc.query_all(&selector),
        Err(e) => {
            tracing::warn!(error = %e, "Selector lookup skipped");
            Vec::new()
        }
    }
}

/// Text content with runs of whitespace collapsed to single spaces
pub fn normalized_text(doc: &dyn Document, node: NodeId) -> String {
    doc.text_content(node).split_whitespace().collect::<Vec<_>>().join(" ")
}
