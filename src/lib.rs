//! Structured, addressable extraction of page regions for downstream agents.
//!
//! A pass walks the selected roots of a document, producing a detailed tree
//! and a simplified one-line text per root in which every link, button and
//! form control appears as `[label](mcp-id-N)`. The identifiers resolve back
//! to live nodes through the pass's identifier map until the next pass
//! replaces it, which is what the action dispatcher and preview renderer use.

use crate::{
    dom::{dom_model::DomTree, html::parse_html},
    extract::{
        extraction_model::{ExtractionOptions, ExtractionResult},
        tree_builder::parse_nodes,
    },
};

pub mod actions;
pub mod cli;
pub mod context;
pub mod dom;
pub mod error;
pub mod extract;
pub mod report;
pub mod selection;
pub mod trace;

/// Parse an HTML page and extract its whole body in one pass.
pub fn extract_html(source: &str, options: &ExtractionOptions) -> Vec<ExtractionResult> {
    let document = parse_html(source);
    let Some(body) = document.body() else {
        return Vec::new();
    };
    let (results, _) = parse_nodes(&document, &[body], options);
    results
}
