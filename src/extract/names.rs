use std::collections::HashMap;

use crate::dom::dom_model::{DomTree, NodeKind};
use crate::extract::extraction_model::ExtractionOptions;

/// Best-effort human-readable names for the elements of one document.
///
/// Candidates are tried in order and the first non-empty one (after
/// trimming) wins:
/// 1. `aria-label`
/// 2. `placeholder`
/// 3. `title`
/// 4. `alt`, for images
/// 5. a `<label for=...>` pointing at the element's `id`
/// 6. the nearest enclosing `<label>`
/// 7. the previous element sibling's text (or the parent's previous
///    sibling), when shorter than `options.sibling_label_limit`
/// 8. `alt` of a descendant image
///
/// `label[for]` targets are indexed once when the resolver is built; the
/// first label in document order wins for a given `for` value.
pub struct NameResolver<'a, D: DomTree> {
    dom: &'a D,
    labels: HashMap<&'a str, D::NodeRef>,
    options: &'a ExtractionOptions,
}

impl<'a, D: DomTree> NameResolver<'a, D> {
    pub fn new(dom: &'a D, options: &'a ExtractionOptions) -> Self {
        let mut labels = HashMap::new();
        let mut stack = vec![dom.document_root()];
        while let Some(node) = stack.pop() {
            if dom.tag_name(node) == Some("label") {
                if let Some(target) = dom.attribute(node, "for") {
                    labels.entry(target).or_insert(node);
                }
            }
            stack.extend(dom.children(node).into_iter().rev());
        }

        Self {
            dom,
            labels,
            options,
        }
    }

    pub fn resolve(&self, node: D::NodeRef) -> Option<String> {
        let dom = self.dom;
        if dom.node_kind(node) != NodeKind::Element {
            return None;
        }

        for attr in ["aria-label", "placeholder", "title"] {
            if let Some(name) = non_empty(dom.attribute(node, attr)) {
                return Some(name);
            }
        }

        if dom.tag_name(node) == Some("img") {
            if let Some(alt) = non_empty(dom.attribute(node, "alt")) {
                return Some(alt);
            }
        }

        if let Some(id) = dom.attribute(node, "id").filter(|id| !id.is_empty()) {
            if let Some(label) = self.labels.get(id) {
                if let Some(text) = non_empty(Some(dom.text_content(*label).as_str())) {
                    return Some(text);
                }
            }
        }

        if let Some(label) = closest(dom, node, "label") {
            if let Some(text) = non_empty(Some(dom.text_content(label).as_str())) {
                return Some(text);
            }
        }

        let sibling = dom.previous_element_sibling(node).or_else(|| {
            dom.parent(node)
                .and_then(|parent| dom.previous_element_sibling(parent))
        });
        if let Some(sibling) = sibling {
            let text = dom.text_content(sibling);
            let text = text.trim();
            if !text.is_empty() && text.chars().count() < self.options.sibling_label_limit {
                return Some(text.to_string());
            }
        }

        find_descendant(dom, node, |n| dom.tag_name(n) == Some("img"))
            .and_then(|img| non_empty(dom.attribute(img, "alt")))
    }
}

/// Resolve a single element's name. Builds the label index on every call;
/// use a [`NameResolver`] when naming many elements of one document.
pub fn resolve_name<D: DomTree>(
    dom: &D,
    node: D::NodeRef,
    options: &ExtractionOptions,
) -> Option<String> {
    NameResolver::new(dom, options).resolve(node)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The node itself or its nearest ancestor with the given tag.
fn closest<D: DomTree>(dom: &D, node: D::NodeRef, tag: &str) -> Option<D::NodeRef> {
    let mut current = Some(node);
    while let Some(n) = current {
        if dom.tag_name(n) == Some(tag) {
            return Some(n);
        }
        current = dom.parent(n);
    }
    None
}

/// First descendant of `node` (excluding itself) in document order matching `pred`.
fn find_descendant<D: DomTree>(
    dom: &D,
    node: D::NodeRef,
    pred: impl Fn(D::NodeRef) -> bool,
) -> Option<D::NodeRef> {
    let mut stack: Vec<D::NodeRef> = dom.children(node).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        if pred(next) {
            return Some(next);
        }
        stack.extend(dom.children(next).into_iter().rev());
    }
    None
}
