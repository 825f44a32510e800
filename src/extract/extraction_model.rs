use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Attribute key carrying the identifier of an interactive node.
pub const MCP_ID_ATTRIBUTE: &str = "mcp_id";

/// Attribute key carrying the recorded link destination.
pub const HREF_ATTRIBUTE: &str = "href";

/// Default cutoff for treating a preceding sibling's text as a label.
pub const DEFAULT_SIBLING_LABEL_LIMIT: usize = 100;

// ============================================================================
// Identifier
// ============================================================================

/// Opaque per-pass token addressing one interactive node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct McpId(String);

impl McpId {
    pub fn from_counter(n: u32) -> Self {
        McpId(format!("mcp-id-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for McpId {
    fn from(value: &str) -> Self {
        McpId(value.to_string())
    }
}

impl From<String> for McpId {
    fn from(value: String) -> Self {
        McpId(value)
    }
}

impl fmt::Display for McpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Detailed tree
// ============================================================================

/// Structural representation of one extracted node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailedNode {
    Text(TextNode),
    Element(ElementNode),
}

/// Serialized as `{"role": "text", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextNode {
    pub value: String,
}

impl Serialize for TextNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TextNode", 2)?;
        state.serialize_field("role", "text")?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub role: String,
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<DetailedNode>,
}

impl DetailedNode {
    pub fn text(value: &str) -> Self {
        DetailedNode::Text(TextNode {
            value: value.to_string(),
        })
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DetailedNode::Element(el) => Some(el),
            DetailedNode::Text(_) => None,
        }
    }

    /// Identifier recorded on this node, if it was classified interactive.
    pub fn mcp_id(&self) -> Option<&str> {
        self.as_element()
            .and_then(|el| el.attributes.get(MCP_ID_ATTRIBUTE))
            .map(String::as_str)
    }

    /// Depth-first search for the element carrying `mcp_id`.
    pub fn find_by_mcp_id(&self, mcp_id: &str) -> Option<&ElementNode> {
        self.elements()
            .into_iter()
            .find(|el| el.attributes.get(MCP_ID_ATTRIBUTE).map(String::as_str) == Some(mcp_id))
    }

    /// Every identifier in the tree, in document order.
    pub fn mcp_ids(&self) -> Vec<McpId> {
        self.elements()
            .into_iter()
            .filter_map(|el| el.attributes.get(MCP_ID_ATTRIBUTE))
            .map(|id| McpId::from(id.as_str()))
            .collect()
    }

    /// Element nodes of the tree in document (pre-)order.
    pub fn elements(&self) -> Vec<&ElementNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let DetailedNode::Element(el) = node {
                out.push(el);
                stack.extend(el.children.iter().rev());
            }
        }
        out
    }
}

// Iterative teardown; nesting depth is unbounded.
impl Drop for ElementNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let DetailedNode::Element(mut el) = node {
                pending.append(&mut el.children);
            }
        }
    }
}

// ============================================================================
// Extraction output
// ============================================================================

/// Both renderings of one extraction root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub simplified: String,
    pub detailed: DetailedNode,
}

/// Tuning knobs of an extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    /// Preceding-sibling text at or above this many characters is not
    /// taken as a label.
    pub sibling_label_limit: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            sibling_label_limit: DEFAULT_SIBLING_LABEL_LIMIT,
        }
    }
}
