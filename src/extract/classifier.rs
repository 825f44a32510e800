use crate::dom::dom_model::{DomTree, NodeKind};

const NON_CONTENT_TAGS: [&str; 5] = ["script", "style", "noscript", "meta", "link"];

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Text nodes are always visible; elements unless their computed display is `none`.
pub fn is_visible<D: DomTree>(dom: &D, node: D::NodeRef) -> bool {
    match dom.node_kind(node) {
        NodeKind::Element => dom.is_displayed(node),
        _ => true,
    }
}

/// False for script/style/metadata elements. Text nodes are always relevant.
pub fn is_relevant<D: DomTree>(dom: &D, node: D::NodeRef) -> bool {
    match dom.tag_name(node) {
        Some(tag) => !NON_CONTENT_TAGS.contains(&tag),
        None => true,
    }
}

/// Links, buttons and form controls.
pub fn is_interactive<D: DomTree>(dom: &D, node: D::NodeRef) -> bool {
    dom.tag_name(node)
        .map(|tag| INTERACTIVE_TAGS.contains(&tag))
        .unwrap_or(false)
}

/// Checkbox and radio inputs hold a boolean state rather than text.
pub fn is_toggle_input<D: DomTree>(dom: &D, node: D::NodeRef) -> bool {
    dom.tag_name(node) == Some("input")
        && matches!(
            dom.attribute(node, "type").map(|t| t.to_ascii_lowercase()).as_deref(),
            Some("checkbox") | Some("radio")
        )
}

/// Controls whose value can be assigned directly.
pub fn is_fillable<D: DomTree>(dom: &D, node: D::NodeRef) -> bool {
    matches!(dom.tag_name(node), Some("input") | Some("textarea") | Some("select"))
}
