use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::dom::dom_model::{DomTree, NodeKind};
use crate::extract::classifier::{is_interactive, is_relevant, is_visible};
use crate::extract::extraction_model::{
    DetailedNode, ElementNode, ExtractionOptions, ExtractionResult, HREF_ATTRIBUTE,
    MCP_ID_ATTRIBUTE, McpId,
};
use crate::extract::identifier_map::IdentifierMap;
use crate::extract::names::NameResolver;
use crate::extract::simplifier::simplify;

/// Monotonic identifier source for one pass. Starts at zero; the first
/// identifier handed out is `mcp-id-1`.
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    value: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> McpId {
        self.value += 1;
        McpId::from_counter(self.value)
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// An element whose children are still being built.
struct OpenElement<N> {
    element: ElementNode,
    remaining: std::vec::IntoIter<N>,
}

enum Visit<N> {
    Leaf(Option<DetailedNode>),
    Open(OpenElement<N>),
}

/// Build the detailed tree of `node`.
///
/// Text always yields a text node. Irrelevant elements (and anything that is
/// neither text nor an element) yield `None` and their subtree is skipped.
/// Interactive elements get the next identifier, recorded under `mcp_id`
/// and registered in `identifiers`; links also record their destination
/// under `href`.
///
/// The walk keeps its own stack of open elements, so nesting depth is not
/// limited by the thread's stack.
pub fn build_detailed_tree<D: DomTree>(
    dom: &D,
    node: D::NodeRef,
    counter: &mut IdCounter,
    identifiers: &mut IdentifierMap<D::NodeRef>,
    names: &NameResolver<'_, D>,
) -> Option<DetailedNode> {
    let mut open = match visit(dom, node, counter, identifiers, names) {
        Visit::Leaf(leaf) => return leaf,
        Visit::Open(element) => vec![element],
    };

    loop {
        let top = open.last_mut()?;
        match top.remaining.next() {
            Some(child) => match visit(dom, child, counter, identifiers, names) {
                Visit::Leaf(Some(leaf)) => top.element.children.push(leaf),
                Visit::Leaf(None) => {}
                Visit::Open(element) => open.push(element),
            },
            None => {
                let finished = open.pop()?;
                let built = DetailedNode::Element(finished.element);
                match open.last_mut() {
                    Some(parent) => parent.element.children.push(built),
                    None => return Some(built),
                }
            }
        }
    }
}

/// Classify one node. Elements come back open, with their identifier
/// already assigned so that numbering follows document order.
fn visit<D: DomTree>(
    dom: &D,
    node: D::NodeRef,
    counter: &mut IdCounter,
    identifiers: &mut IdentifierMap<D::NodeRef>,
    names: &NameResolver<'_, D>,
) -> Visit<D::NodeRef> {
    match dom.node_kind(node) {
        NodeKind::Text => return Visit::Leaf(Some(DetailedNode::text(dom.text(node).unwrap_or("")))),
        NodeKind::Other => return Visit::Leaf(None),
        NodeKind::Element => {}
    }

    if !is_relevant(dom, node) {
        return Visit::Leaf(None);
    }

    let mut attributes = BTreeMap::new();
    if is_interactive(dom, node) {
        let id = counter.next_id();
        attributes.insert(MCP_ID_ATTRIBUTE.to_string(), id.to_string());
        if let Some(href) = dom.link_target(node) {
            attributes.insert(HREF_ATTRIBUTE.to_string(), href);
        }
        identifiers.register(id, node);
    }

    Visit::Open(OpenElement {
        element: ElementNode {
            role: dom.tag_name(node).unwrap_or_default().to_string(),
            name: names.resolve(node),
            attributes,
            children: Vec::new(),
        },
        remaining: dom.children(node).into_iter(),
    })
}

/// Run one extraction pass over `roots`.
///
/// Counter and identifier map start fresh. Roots that are invisible or
/// irrelevant produce no result.
pub fn parse_nodes<D: DomTree>(
    dom: &D,
    roots: &[D::NodeRef],
    options: &ExtractionOptions,
) -> (Vec<ExtractionResult>, IdentifierMap<D::NodeRef>) {
    let mut counter = IdCounter::new();
    let mut identifiers = IdentifierMap::new();
    let names = NameResolver::new(dom, options);

    let results: Vec<ExtractionResult> = roots
        .iter()
        .filter_map(|root| {
            if !is_visible(dom, *root) {
                debug!(root = ?root, "skipping hidden extraction root");
                return None;
            }
            let detailed = build_detailed_tree(dom, *root, &mut counter, &mut identifiers, &names)?;
            Some(ExtractionResult {
                simplified: simplify(&detailed),
                detailed,
            })
        })
        .collect();

    info!(
        roots = roots.len(),
        results = results.len(),
        identifiers = identifiers.len(),
        "extraction pass complete"
    );

    (results, identifiers)
}
