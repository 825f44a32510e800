use page_context::dom::document::{Document, NodeId};
use page_context::dom::dom_model::DomTree;

/// Empty `<html><body></body></html>` document.
pub fn page() -> (Document, NodeId) {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.append_child(doc.document_root(), html);
    doc.append_child(html, body);
    (doc, body)
}

/// Append an element with attributes to `parent`.
pub fn el(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let node = doc.create_element(tag);
    for (name, value) in attrs {
        doc.set_attribute(node, name, value);
    }
    doc.append_child(parent, node);
    node
}

/// Append a text node to `parent`.
pub fn text(doc: &mut Document, parent: NodeId, value: &str) -> NodeId {
    let node = doc.create_text(value);
    doc.append_child(parent, node);
    node
}

/// Every `[label](id)` reference in a simplified string, as (label, id).
pub fn references(simplified: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut rest = simplified;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find("](") else { break };
        let label = &after[..close];
        let tail = &after[close + 2..];
        let Some(end) = tail.find(')') else { break };
        out.push((label.to_string(), tail[..end].to_string()));
        rest = &tail[end + 1..];
    }
    out
}
