use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::actions::action_model::{Action, ActionRequest};
use crate::extract::extraction_model::{ElementNode, ExtractionResult, HREF_ATTRIBUTE, McpId};

pub const DEFAULT_REASON: &str = "No reason provided.";

/// Tools an agent may call against the extracted context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    FollowLink,
    FillInput,
    PressButton,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::FollowLink => "follow_link",
            ToolKind::FillInput => "fill_input",
            ToolKind::PressButton => "press_button",
        }
    }
}

impl FromStr for ToolKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow_link" => Ok(ToolKind::FollowLink),
            "fill_input" => Ok(ToolKind::FillInput),
            "press_button" => Ok(ToolKind::PressButton),
            _ => Err(()),
        }
    }
}

/// A function call returned by the reasoning backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProposalError {
    #[error("tool '{tool}' called without '{argument}'")]
    MissingArgument { tool: String, argument: String },

    #[error("tried to use a tool on an element with an invalid ID ('{0}')")]
    InvalidIdentifier(String),
}

/// Text of all extraction roots, separated by blank lines, for a prompt.
pub fn prompt_context(results: &[ExtractionResult]) -> String {
    results
        .iter()
        .map(|r| r.simplified.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Search every detailed tree for the element carrying `mcp_id`.
pub fn find_node_by_mcp_id<'a>(results: &'a [ExtractionResult], mcp_id: &str) -> Option<&'a ElementNode> {
    results
        .iter()
        .find_map(|r| r.detailed.find_by_mcp_id(mcp_id))
}

/// Turn a tool call into an action request.
///
/// Every call must name an element of `results`, whatever the tool.
/// Returns `Ok(None)` for tools this crate does not know and for
/// `follow_link` on an element without a recorded destination.
pub fn resolve_tool_call(
    results: &[ExtractionResult],
    call: &ToolCall,
) -> Result<Option<ActionRequest>, ProposalError> {
    let mcp_id = string_arg(call, "mcp_id").ok_or_else(|| ProposalError::MissingArgument {
        tool: call.name.clone(),
        argument: "mcp_id".into(),
    })?;

    let target = find_node_by_mcp_id(results, &mcp_id)
        .ok_or_else(|| ProposalError::InvalidIdentifier(mcp_id.clone()))?;

    let Ok(kind) = call.name.parse::<ToolKind>() else {
        return Ok(None);
    };

    let reason = string_arg(call, "reason").unwrap_or_else(|| DEFAULT_REASON.to_string());
    let mcp_id = McpId::from(mcp_id);

    let action = match kind {
        ToolKind::FollowLink => match target.attributes.get(HREF_ATTRIBUTE) {
            Some(url) => Action::Navigate {
                url: url.clone(),
                mcp_id: Some(mcp_id),
            },
            None => return Ok(None),
        },
        ToolKind::FillInput => Action::FillInput {
            mcp_id,
            value: string_arg(call, "value").unwrap_or_default(),
        },
        ToolKind::PressButton => Action::PressButton { mcp_id },
    };

    Ok(Some(ActionRequest {
        action,
        reason: Some(reason),
    }))
}

/// Resolve a whole response. The first invalid identifier rejects the batch.
pub fn resolve_tool_calls(
    results: &[ExtractionResult],
    calls: &[ToolCall],
) -> Result<Vec<ActionRequest>, ProposalError> {
    let mut requests = Vec::new();
    for call in calls {
        if let Some(request) = resolve_tool_call(results, call)? {
            requests.push(request);
        }
    }
    Ok(requests)
}

fn string_arg(call: &ToolCall, key: &str) -> Option<String> {
    call.args.get(key).and_then(Value::as_str).map(str::to_string)
}
