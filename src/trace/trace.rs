use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    actions::{action_model::Action, dispatcher::DispatchOutcome},
    extract::extraction_model::ExtractionResult,
};

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub pass: u64,

    pub kind: String,

    pub roots: Option<usize>,
    pub identifiers: Option<usize>,
    pub fingerprint: Option<String>,

    pub action: Option<String>,
    pub outcome: Option<String>,
}

impl TraceEvent {
    pub fn now(pass: u64, kind: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            pass,
            kind: kind.to_string(),
            roots: None,
            identifiers: None,
            fingerprint: None,
            action: None,
            outcome: None,
        }
    }

    pub fn with_extraction(mut self, results: &[ExtractionResult], identifiers: usize) -> Self {
        self.roots = Some(results.len());
        self.identifiers = Some(identifiers);
        self.fingerprint = Some(extraction_fingerprint(results));
        self
    }

    pub fn with_action(mut self, action: &Action) -> Self {
        self.action = Some(format!("{:?}", action));
        self
    }

    pub fn with_outcome(mut self, outcome: &DispatchOutcome) -> Self {
        self.outcome = Some(format!("{:?}", outcome));
        self
    }
}

/// SHA-1 over the simplified output of a pass. Two passes over an unchanged
/// page share a fingerprint.
pub fn extraction_fingerprint(results: &[ExtractionResult]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for result in results {
        hasher.update(result.simplified.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
