use std::collections::HashMap;

use scraper::{Html, Node, Selector};

use crate::dom::document::{Document, NodeId};
use crate::dom::dom_model::DomTree;
use crate::error::ContextError;

/// Parse an HTML page into a [`Document`].
pub fn parse_html(source: &str) -> Document {
    let (document, _) = convert(&Html::parse_document(source), &[]);
    document
}

/// Parse an HTML page and resolve each CSS selector to the elements it
/// matches. Matches are returned in selector order, then document order,
/// without duplicates.
pub fn load_document(
    source: &str,
    selectors: &[String],
) -> Result<(Document, Vec<NodeId>), ContextError> {
    let parsed: Vec<Selector> = selectors
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| ContextError::InvalidSelector {
                selector: s.clone(),
                reason: format!("{:?}", e),
            })
        })
        .collect::<Result<_, _>>()?;

    let html = Html::parse_document(source);
    Ok(convert(&html, &parsed))
}

fn convert(html: &Html, selectors: &[Selector]) -> (Document, Vec<NodeId>) {
    let mut document = Document::new();
    let mut ids = HashMap::new();
    let root = html.tree.root();
    ids.insert(root.id(), document.document_root());

    for node in root.descendants().skip(1) {
        let created = match node.value() {
            Node::Element(el) => {
                let id = document.create_element(el.name());
                for (name, value) in el.attrs() {
                    document.set_attribute(id, name, value);
                }
                id
            }
            Node::Text(text) => document.create_text(&text[..]),
            Node::Comment(comment) => document.create_comment(&comment[..]),
            _ => continue,
        };

        if let Some(parent) = node.parent().and_then(|p| ids.get(&p.id()).copied()) {
            document.append_child(parent, created);
        }
        ids.insert(node.id(), created);
    }

    let mut roots = Vec::new();
    for selector in selectors {
        for matched in html.select(selector) {
            if let Some(id) = ids.get(&matched.id()).copied() {
                if !roots.contains(&id) {
                    roots.push(id);
                }
            }
        }
    }

    (document, roots)
}
