use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::extract::extraction_model::McpId;

/// An effect to apply to the page.
///
/// Wire form is tagged by `action`: `navigate`, `fill_input`, `press_button`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate {
        url: String,
        /// The link the destination was taken from, used to place previews.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mcp_id: Option<McpId>,
    },
    FillInput {
        mcp_id: McpId,
        value: String,
    },
    PressButton {
        mcp_id: McpId,
    },
}

impl Action {
    /// Element the action targets, if any.
    pub fn target(&self) -> Option<&McpId> {
        match self {
            Action::Navigate { mcp_id, .. } => mcp_id.as_ref(),
            Action::FillInput { mcp_id, .. } | Action::PressButton { mcp_id } => Some(mcp_id),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Navigate { .. } => "navigate",
            Action::FillInput { .. } => "fill_input",
            Action::PressButton { .. } => "press_button",
        }
    }
}

/// An action as proposed by an external agent, with its display-only reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Action> for ActionRequest {
    fn from(action: Action) -> Self {
        Self {
            action,
            reason: None,
        }
    }
}

/// Decode a batch of raw actions. Entries that do not decode (unknown kind,
/// missing fields) are skipped without affecting the rest of the batch.
pub fn decode_action_batch(raw: &[Value]) -> Vec<ActionRequest> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<ActionRequest>(value.clone()) {
                Ok(request) => Some(request),
                Err(e) => {
                    debug!(index, error = %e, "skipping malformed action");
                    None
                }
            }
        })
        .collect()
}
