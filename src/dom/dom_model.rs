use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

// ============================================================================
// Minimal document capabilities consumed by extraction and dispatch
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Other,
}

/// Viewport-relative box of a rendered element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Read-only view of a live document tree.
///
/// Extraction only ever walks the tree through this trait, so synthetic
/// documents and real rendering engines are interchangeable.
pub trait DomTree {
    type NodeRef: Copy + Eq + Hash + Debug;

    fn document_root(&self) -> Self::NodeRef;

    fn body(&self) -> Option<Self::NodeRef>;

    fn node_kind(&self, node: Self::NodeRef) -> NodeKind;

    /// Lower-cased tag name, `None` for non-elements.
    fn tag_name(&self, node: Self::NodeRef) -> Option<&str>;

    fn attribute(&self, node: Self::NodeRef, name: &str) -> Option<&str>;

    /// Character data of a text node.
    fn text(&self, node: Self::NodeRef) -> Option<&str>;

    fn parent(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// Child nodes in document order.
    fn children(&self, node: Self::NodeRef) -> Vec<Self::NodeRef>;

    fn bounding_box(&self, node: Self::NodeRef) -> BoundingBox;

    /// False when the computed `display` of an element is `none`.
    fn is_displayed(&self, node: Self::NodeRef) -> bool;

    /// Node immediately before `node` under the same parent.
    fn previous_sibling(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    fn previous_element_sibling(&self, node: Self::NodeRef) -> Option<Self::NodeRef> {
        let mut current = self.previous_sibling(node);
        while let Some(sibling) = current {
            if self.node_kind(sibling) == NodeKind::Element {
                return Some(sibling);
            }
            current = self.previous_sibling(sibling);
        }
        None
    }

    /// Concatenated text of every descendant text node.
    fn text_content(&self, node: Self::NodeRef) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            match self.node_kind(next) {
                NodeKind::Text => {
                    if let Some(text) = self.text(next) {
                        out.push_str(text);
                    }
                }
                NodeKind::Element => stack.extend(self.children(next).into_iter().rev()),
                NodeKind::Other => {}
            }
        }
        out
    }

    /// Destination of a link element, taken verbatim from its `href`.
    fn link_target(&self, node: Self::NodeRef) -> Option<String> {
        if self.tag_name(node) != Some("a") {
            return None;
        }

        self.attribute(node, "href")
            .filter(|href| !href.is_empty())
            .map(str::to_string)
    }
}

/// Effects the action dispatcher may apply to a document.
pub trait DocumentHost: DomTree {
    /// Assign the live value of a form control.
    fn set_value(&mut self, node: Self::NodeRef, value: &str);

    /// Simulate a user activation (click).
    fn activate(&mut self, node: Self::NodeRef);

    fn navigate(&mut self, url: &str);

    /// Current scroll position as `(x, y)`.
    fn scroll_offset(&self) -> (f64, f64);
}
