use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::extract::extraction_model::ExtractionResult;

// ============================================================================
// Context inspector: side-by-side view of what the agent is given
// ============================================================================

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((mcp-id-\d+)\)").expect("reference pattern is valid")
});

const UNAVAILABLE: &str = "(detailed tree unavailable)";

const EMPTY_HINT: &str = "<p>No content was selected or parsed from the page. \
Use the 'Select Content' or 'Parse Entire Page' tools first.</p>";

/// Render a simplified string as HTML, turning each `[label](mcp-id-N)`
/// reference into a highlighted span titled with its identifier.
pub fn format_simplified_html(simplified: &str) -> String {
    let escaped = escape_html(simplified);
    REFERENCE
        .replace_all(&escaped, r#"<span class="interactive" title="$2">$1</span>"#)
        .into_owned()
}

/// Build the inspector overlay content: one row per extraction root with the
/// human-readable view on the left and the detailed tree on the right.
pub fn build_context_html(results: Option<&[ExtractionResult]>) -> String {
    let mut rows = String::new();

    match results {
        Some(results) if !results.is_empty() => {
            for block in results {
                let detailed = pretty_json(&block.detailed);
                rows.push_str(&format!(
                    r#"<div class="context-row">
<div class="simplified-view">{simplified}</div>
<pre class="detailed-view">{detailed}</pre>
</div>
"#,
                    simplified = format_simplified_html(&block.simplified),
                    detailed = escape_html(&detailed),
                ));
            }
        }
        _ => rows.push_str(EMPTY_HINT),
    }

    format!(
        r#"<div class="content-modal">
<div class="modal-header">
<h3>Context Inspector</h3>
<span class="close-btn" onclick="this.closest('#ai-sidebar-context-overlay').remove()">&times;</span>
</div>
<div class="modal-body">
<div class="column-header">Human-Readable View</div>
<div class="column-header">Full Context for AI</div>
{rows}
</div>
</div>"#,
        rows = rows,
    )
}

/// Pretty JSON for the detailed column, or a marker when it cannot be
/// serialized.
fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to serialize detailed tree for the inspector");
            UNAVAILABLE.to_string()
        }
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
