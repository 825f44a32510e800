use std::collections::BTreeMap;

use serde::Serialize;

use crate::dom::dom_model::{BoundingBox, DocumentHost, DomTree, NodeKind};

/// Handle of a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub value: Option<String>,
    pub checked: bool,
    pub display_none: bool,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct DomNode {
    parent: Option<NodeId>,
    /// Index in the parent's `children`.
    position: usize,
    children: Vec<NodeId>,
    data: NodeData,
    layout: Option<BoundingBox>,
}

/// Side effects observed on the document, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomEvent {
    Click { node: NodeId },
    ValueSet { node: NodeId, value: String },
    Navigated { url: String },
}

/// In-memory document with live form state.
///
/// Stands in for a rendered page: layout boxes are assigned explicitly and
/// visibility follows the inline `style`/`hidden` attributes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
    url: Option<String>,
    scroll: (f64, f64),
    history: Vec<String>,
    events: Vec<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode {
                parent: None,
                position: 0,
                children: vec![],
                data: NodeData::Document,
                layout: None,
            }],
            url: None,
            scroll: (0.0, 0.0),
            history: vec![],
            events: vec![],
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode {
            parent: None,
            position: 0,
            children: vec![],
            data,
            layout: None,
        });
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            value: None,
            checked: false,
            display_none: false,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    /// Attach `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let position = self.nodes[parent.0].children.len();
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].position = position;
        self.nodes[parent.0].children.push(child);
    }

    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        let position = self.nodes[node.0].position;
        self.nodes[parent.0].children.remove(position);
        for index in position..self.nodes[parent.0].children.len() {
            let sibling = self.nodes[parent.0].children[index];
            self.nodes[sibling.0].position = index;
        }
    }

    /// Set an attribute. `value` and `checked` also seed the live form state.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            let name = name.to_lowercase();
            match name.as_str() {
                "value" => el.value = Some(value.to_string()),
                "checked" => el.checked = true,
                _ => {}
            }
            el.attributes.insert(name, value.to_string());
        }
    }

    pub fn set_bounding_box(&mut self, node: NodeId, rect: BoundingBox) {
        self.nodes[node.0].layout = Some(rect);
    }

    /// Force the computed `display` of an element to `none` (or back).
    pub fn set_display_none(&mut self, node: NodeId, hidden: bool) {
        if let Some(el) = self.element_mut(node) {
            el.display_none = hidden;
        }
    }

    pub fn set_scroll_offset(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn navigation_history(&self) -> &[String] {
        &self.history
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|el| el.value.as_deref())
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).map(|el| el.checked).unwrap_or(false)
    }

    pub fn click_count(&self, node: NodeId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DomEvent::Click { node: n } if *n == node))
            .count()
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// All nodes below `node` in document (pre-)order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// First element carrying the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.document_root())
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(id))
    }

    /// First element with the given tag name, in document order.
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.document_root())
            .into_iter()
            .find(|n| self.tag_name(*n) == Some(tag))
    }

    fn input_type(&self, node: NodeId) -> Option<String> {
        if self.tag_name(node) != Some("input") {
            return None;
        }
        Some(
            self.attribute(node, "type")
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    fn check_radio(&mut self, node: NodeId) {
        let group = self.attribute(node, "name").map(str::to_string);
        if let Some(group) = group {
            let peers: Vec<NodeId> = self
                .descendants(self.document_root())
                .into_iter()
                .filter(|n| {
                    *n != node
                        && self.input_type(*n).as_deref() == Some("radio")
                        && self.attribute(*n, "name") == Some(group.as_str())
                })
                .collect();
            for peer in peers {
                if let Some(el) = self.element_mut(peer) {
                    el.checked = false;
                }
            }
        }
        if let Some(el) = self.element_mut(node) {
            el.checked = true;
        }
    }
}

fn inline_display_none(style: &str) -> bool {
    style.split(';').any(|decl| {
        let mut parts = decl.splitn(2, ':');
        let property = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        property.eq_ignore_ascii_case("display")
            && value
                .trim_end_matches("!important")
                .trim()
                .eq_ignore_ascii_case("none")
    })
}

impl DomTree for Document {
    type NodeRef = NodeId;

    fn document_root(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        self.first_by_tag("body")
    }

    fn node_kind(&self, node: NodeId) -> NodeKind {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let entry = self.nodes.get(node.0)?;
        let siblings = &self.nodes[entry.parent?.0].children;
        entry.position.checked_sub(1).map(|index| siblings[index])
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, node: NodeId) -> BoundingBox {
        self.nodes
            .get(node.0)
            .and_then(|n| n.layout)
            .unwrap_or_default()
    }

    fn is_displayed(&self, node: NodeId) -> bool {
        match self.element(node) {
            Some(el) => {
                !(el.display_none
                    || el.attributes.contains_key("hidden")
                    || el
                        .attributes
                        .get("style")
                        .map(|s| inline_display_none(s))
                        .unwrap_or(false))
            }
            None => true,
        }
    }
}

impl DocumentHost for Document {
    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.value = Some(value.to_string());
            self.events.push(DomEvent::ValueSet {
                node,
                value: value.to_string(),
            });
        }
    }

    fn activate(&mut self, node: NodeId) {
        self.events.push(DomEvent::Click { node });

        match self.input_type(node).as_deref() {
            Some("checkbox") => {
                if let Some(el) = self.element_mut(node) {
                    el.checked = !el.checked;
                }
                return;
            }
            Some("radio") => {
                self.check_radio(node);
                return;
            }
            _ => {}
        }

        if let Some(href) = self.link_target(node) {
            self.navigate(&href);
        }
    }

    fn navigate(&mut self, url: &str) {
        self.history.push(url.to_string());
        self.url = Some(url.to_string());
        self.events.push(DomEvent::Navigated {
            url: url.to_string(),
        });
    }

    fn scroll_offset(&self) -> (f64, f64) {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_style_display_none_is_detected() {
        assert!(inline_display_none("display:none"));
        assert!(inline_display_none("color: red; display : NONE !important"));
        assert!(!inline_display_none("display: block"));
        assert!(!inline_display_none(""));
    }

    #[test]
    fn sibling_positions_survive_detach() {
        let mut doc = Document::new();
        let root = doc.document_root();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("i");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        assert_eq!(doc.previous_sibling(c), Some(b));
        assert_eq!(doc.previous_sibling(a), None);

        doc.detach(b);
        assert_eq!(doc.previous_sibling(c), Some(a));
        assert_eq!(doc.previous_sibling(b), None);

        doc.append_child(root, b);
        assert_eq!(doc.previous_sibling(b), Some(c));
    }

    #[test]
    fn radio_activation_unchecks_group_peers() {
        let mut doc = Document::new();
        let body = doc.create_element("body");
        doc.append_child(doc.document_root(), body);

        let a = doc.create_element("input");
        doc.set_attribute(a, "type", "radio");
        doc.set_attribute(a, "name", "size");
        doc.set_attribute(a, "checked", "");
        let b = doc.create_element("input");
        doc.set_attribute(b, "type", "radio");
        doc.set_attribute(b, "name", "size");
        doc.append_child(body, a);
        doc.append_child(body, b);

        doc.activate(b);

        assert!(!doc.is_checked(a));
        assert!(doc.is_checked(b));
    }
}
