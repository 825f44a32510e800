use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{dispatcher::DispatchOutcome, preview::PreviewAnnotation};
use crate::extract::extraction_model::ExtractionResult;

/// Requests delivered to the page context by the UI surface.
///
/// Action lists stay raw JSON so that one malformed entry cannot reject
/// the whole message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentMessage {
    ShowContextOverlay {
        content: String,
    },
    StartSelection,
    StopSelection,
    ClearSelection,
    ParseEntirePage,
    GetSelectedContent,
    ExecuteActions {
        #[serde(default)]
        actions: Vec<Value>,
    },
    ShowActionPreviews {
        #[serde(default)]
        actions: Vec<Value>,
    },
    ClearActionPreviews,
}

/// Replies produced by the page context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentResponse {
    Extraction(Vec<ExtractionResult>),
    Dispatched(Vec<DispatchOutcome>),
    Previews(Vec<PreviewAnnotation>),
}
