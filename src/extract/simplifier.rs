use crate::extract::extraction_model::{DetailedNode, ElementNode, MCP_ID_ATTRIBUTE};

/// Fold a detailed tree into one line of prompt-ready text.
///
/// Interactive elements become `[label](mcp-id-N)`, labelled by their
/// trimmed inner text or, failing that, their resolved name. An interactive
/// element with neither contributes nothing.
pub fn simplify(node: &DetailedNode) -> String {
    enum Step<'a> {
        Enter(&'a DetailedNode),
        /// Close an interactive element whose inner text starts at `start`.
        Close { element: &'a ElementNode, start: usize },
    }

    let mut out = String::new();
    let mut steps = vec![Step::Enter(node)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(DetailedNode::Text(text)) => out.push_str(&text.value),
            Step::Enter(DetailedNode::Element(el)) => {
                if el.attributes.contains_key(MCP_ID_ATTRIBUTE) {
                    steps.push(Step::Close {
                        element: el,
                        start: out.len(),
                    });
                }
                steps.extend(el.children.iter().rev().map(Step::Enter));
            }
            Step::Close { element, start } => {
                let reference = reference(element, &out[start..]);
                out.truncate(start);
                out.push_str(&reference);
            }
        }
    }

    out
}

fn reference(el: &ElementNode, inner: &str) -> String {
    let Some(mcp_id) = el.attributes.get(MCP_ID_ATTRIBUTE) else {
        return inner.to_string();
    };

    let trimmed = inner.trim();
    let label = if !trimmed.is_empty() {
        Some(trimmed)
    } else {
        el.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    };

    match label {
        Some(label) => format!("[{}]({})", label, mcp_id),
        None => String::new(),
    }
}
