//! PageEvent - Events delivered by the host page
//!
//! Everything the controllers react to arrives as one of these.

use crate::dom::NodeId;
use crate::preferences::MediaFeature;

/// Keyboard keys the guide distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Tab,
    /// Any other key, by its `KeyboardEvent.key` name
    Other(String),
}

impl Key {
    /// Parse a `KeyboardEvent.key` name
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "Tab" => Key::Tab,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Events delivered by the host page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Primary click on an element
    Click { target: NodeId },
    /// Key pressed; `target` is the focused element, if any
    KeyDown { target: Option<NodeId>, key: Key },
    /// Intermediate value of a control while it is being dragged
    Input { target: NodeId, value: String },
    /// Committed value or checked state of a control
    Change { target: NodeId },
    /// Mouse button pressed anywhere
    MouseDown,
    /// An OS media feature changed
    MediaChange { feature: MediaFeature, matches: bool },
}
