use serde::Serialize;

use crate::actions::action_model::{Action, ActionRequest};
use crate::dom::dom_model::DocumentHost;
use crate::extract::extraction_model::McpId;
use crate::extract::identifier_map::IdentifierMap;

/// Default distance, in pixels, between an annotation and the top of its target.
pub const DEFAULT_PREVIEW_MARGIN: f64 = 30.0;

/// A transient page annotation describing a pending action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewAnnotation {
    pub mcp_id: McpId,
    pub text: String,
    /// Document-space position (viewport box plus scroll offset).
    pub top: f64,
    pub left: f64,
}

pub fn describe(action: &Action) -> String {
    match action {
        Action::FillInput { value, .. } => format!("Fill with: \"{}\"", value),
        Action::PressButton { .. } => "Press Button".to_string(),
        Action::Navigate { url, .. } => format!("Follow Link: {}", url),
    }
}

/// Annotations for every action whose target resolves. Actions without a
/// resolvable target are left out.
pub fn build_previews<H: DocumentHost>(
    host: &H,
    identifiers: &IdentifierMap<H::NodeRef>,
    requests: &[ActionRequest],
    vertical_margin: f64,
) -> Vec<PreviewAnnotation> {
    let (scroll_x, scroll_y) = host.scroll_offset();

    requests
        .iter()
        .filter_map(|request| {
            let mcp_id = request.action.target()?;
            let node = identifiers.resolve(mcp_id)?;
            let rect = host.bounding_box(node);

            Some(PreviewAnnotation {
                mcp_id: mcp_id.clone(),
                text: describe(&request.action),
                top: scroll_y + rect.top - vertical_margin,
                left: scroll_x + rect.left,
            })
        })
        .collect()
}
