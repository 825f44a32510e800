use serde_json::Value;
use tracing::{info, warn};

use crate::actions::action_model::decode_action_batch;
use crate::cli::config::{RootArgs, Settings};
use crate::context::context::ExtractionContext;
use crate::dom::document::{Document, NodeId};
use crate::dom::dom_model::DomTree;
use crate::dom::html::load_document;
use crate::error::ContextError;
use crate::extract::extraction_model::ExtractionResult;
use crate::report::inspector::build_context_html;
use crate::trace::logger::TraceLogger;

pub const NOTHING_SELECTED: &str =
    "Nothing selected: pass --select <css> or --whole-page.";

// ============================================================================
// extract subcommand
// ============================================================================

pub fn cmd_extract(
    roots: &RootArgs,
    format: &str,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = open_context(roots, settings)?;

    let Some(results) = context.extract_selection() else {
        eprintln!("{}", NOTHING_SELECTED);
        return Ok(());
    };

    match format {
        "simplified" => {
            for result in &results {
                println!("{}", result.simplified);
            }
        }
        _ => println!("{}", to_json(&results, "extraction results")?),
    }

    Ok(())
}

// ============================================================================
// act subcommand
// ============================================================================

pub fn cmd_act(
    roots: &RootArgs,
    actions_path: &str,
    preview: bool,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_file(actions_path)?;
    let batch: Vec<Value> = serde_json::from_str(&raw).map_err(|e| ContextError::JsonParse {
        context: actions_path.to_string(),
        source: e,
    })?;
    let requests = decode_action_batch(&batch);

    let mut context = open_context(roots, settings)?;
    if context.extract_selection().is_none() {
        eprintln!("{}", NOTHING_SELECTED);
        return Ok(());
    }

    if preview {
        let annotations = context.show_previews(&requests);
        println!("{}", to_json(&annotations, "preview annotations")?);
    } else {
        let outcomes = context.execute(&requests);
        info!(
            applied = outcomes.iter().filter(|o| o.applied()).count(),
            total = outcomes.len(),
            "actions executed"
        );
        println!("{}", to_json(&outcomes, "dispatch outcomes")?);
        println!("{}", to_json(context.host().events(), "document events")?);
    }

    Ok(())
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(
    roots: &RootArgs,
    output: Option<&str>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = open_context(roots, settings)?;
    let results = context.extract_selection();
    let html = build_context_html(results.as_deref());

    match output {
        Some(path) => std::fs::write(path, &html).map_err(|e| ContextError::Io {
            path: path.to_string(),
            source: e,
        })?,
        None => print!("{}", html),
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Load the page and apply the root selection the way a user would:
/// discrete picks for `--select`, whole-document mode for `--whole-page`.
pub fn open_context(
    roots: &RootArgs,
    settings: &Settings,
) -> Result<ExtractionContext<Document>, ContextError> {
    let source = read_file(&roots.html)?;
    let (document, picked) = load_document(&source, &roots.selectors)?;

    if roots.whole_page && document.body().is_none() {
        return Err(ContextError::MissingBody);
    }

    let tracer = match &settings.trace_path {
        Some(path) => TraceLogger::open(path).unwrap_or_else(|e| {
            warn!(error = %e, "trace disabled");
            TraceLogger::disabled()
        }),
        None => TraceLogger::disabled(),
    };

    let mut context = ExtractionContext::new(document)
        .with_options(settings.options.clone())
        .with_preview_margin(settings.preview_margin)
        .with_tracer(tracer);

    select_roots(&mut context, &picked, roots.whole_page);
    Ok(context)
}

fn select_roots(context: &mut ExtractionContext<Document>, picked: &[NodeId], whole_page: bool) {
    let selection = context.selection_mut();
    if whole_page {
        selection.parse_entire_page();
        return;
    }
    selection.start();
    for node in picked {
        selection.toggle(*node);
    }
    selection.stop();
}

fn read_file(path: &str) -> Result<String, ContextError> {
    std::fs::read_to_string(path).map_err(|e| ContextError::Io {
        path: path.to_string(),
        source: e,
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, context: &str) -> Result<String, ContextError> {
    serde_json::to_string_pretty(value).map_err(|e| ContextError::JsonSerialize {
        context: context.to_string(),
        source: e,
    })
}

/// Extraction results of a page, for callers that only need the data.
pub fn extract_file(roots: &RootArgs, settings: &Settings) -> Result<Option<Vec<ExtractionResult>>, ContextError> {
    let mut context = open_context(roots, settings)?;
    Ok(context.extract_selection())
}
