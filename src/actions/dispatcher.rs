use serde::Serialize;
use tracing::{info, warn};

use crate::actions::action_model::{Action, ActionRequest};
use crate::dom::dom_model::DocumentHost;
use crate::extract::classifier::{is_fillable, is_toggle_input};
use crate::extract::extraction_model::McpId;
use crate::extract::identifier_map::IdentifierMap;

/// What a dispatched action did. Misses and unsupported targets are
/// diagnostics, not errors: the document is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Navigated { url: String },
    ValueAssigned { mcp_id: McpId },
    Toggled { mcp_id: McpId },
    Pressed { mcp_id: McpId },
    /// Identifier absent from the current map.
    Unresolved { mcp_id: McpId },
    /// Fill requested on something that is not a form control.
    Unsupported { mcp_id: McpId, tag: String },
    /// Navigate without a destination.
    Skipped,
}

impl DispatchOutcome {
    pub fn applied(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Navigated { .. }
                | DispatchOutcome::ValueAssigned { .. }
                | DispatchOutcome::Toggled { .. }
                | DispatchOutcome::Pressed { .. }
        )
    }
}

/// Apply one action to the document.
pub fn dispatch<H: DocumentHost>(
    host: &mut H,
    identifiers: &IdentifierMap<H::NodeRef>,
    action: &Action,
) -> DispatchOutcome {
    match action {
        Action::Navigate { url, .. } => {
            if url.is_empty() {
                return DispatchOutcome::Skipped;
            }
            host.navigate(url);
            DispatchOutcome::Navigated { url: url.clone() }
        }

        Action::FillInput { mcp_id, value } => {
            let Some(node) = identifiers.resolve(mcp_id) else {
                warn!(%mcp_id, "fill_input target not found");
                return DispatchOutcome::Unresolved { mcp_id: mcp_id.clone() };
            };

            if is_toggle_input(&*host, node) {
                host.activate(node);
                DispatchOutcome::Toggled { mcp_id: mcp_id.clone() }
            } else if is_fillable(&*host, node) {
                host.set_value(node, value);
                DispatchOutcome::ValueAssigned { mcp_id: mcp_id.clone() }
            } else {
                let tag = host.tag_name(node).unwrap_or_default().to_string();
                warn!(%mcp_id, %tag, "attempted to fill non-input element");
                DispatchOutcome::Unsupported {
                    mcp_id: mcp_id.clone(),
                    tag,
                }
            }
        }

        Action::PressButton { mcp_id } => match identifiers.resolve(mcp_id) {
            Some(node) => {
                host.activate(node);
                DispatchOutcome::Pressed { mcp_id: mcp_id.clone() }
            }
            None => {
                warn!(%mcp_id, "press_button target not found");
                DispatchOutcome::Unresolved { mcp_id: mcp_id.clone() }
            }
        },
    }
}

/// Execute a batch in order. A failing action never stops the batch.
pub fn execute_actions<H: DocumentHost>(
    host: &mut H,
    identifiers: &IdentifierMap<H::NodeRef>,
    requests: &[ActionRequest],
) -> Vec<DispatchOutcome> {
    if !requests.is_empty() {
        info!(count = requests.len(), "executing actions");
    }

    requests
        .iter()
        .map(|request| dispatch(host, identifiers, &request.action))
        .collect()
}
