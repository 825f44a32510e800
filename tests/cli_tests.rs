use std::io::Write;

use clap::Parser;
use page_context::cli::commands::{extract_file, open_context};
use page_context::cli::config::{
    AppConfig, Cli, Commands, RootArgs, Settings, load_config, log_filter, resolve_settings,
};
use page_context::error::ContextError;
use page_context::extract::extraction_model::ExtractionOptions;
use page_context::trace::logger::TraceLogger;
use page_context::trace::trace::{TraceEvent, extraction_fingerprint};

const PAGE: &str = r#"<html><body>
<header><a href="/">Home</a></header>
<form id="login"><input placeholder="User"><button>Sign in</button></form>
</body></html>"#;

fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn defaults() -> Settings {
    resolve_settings(
        &Cli::parse_from(["page-context", "extract", "--html", "x.html"]),
        &AppConfig::default(),
    )
}

fn roots(html: &str, selectors: &[&str], whole_page: bool) -> RootArgs {
    RootArgs {
        html: html.to_string(),
        selectors: selectors.iter().map(|s| s.to_string()).collect(),
        whole_page,
    }
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_extract_minimal() {
    let cli = Cli::parse_from(["page-context", "extract", "--html", "page.html"]);
    match cli.command {
        Commands::Extract { roots, format } => {
            assert_eq!(roots.html, "page.html");
            assert!(roots.selectors.is_empty());
            assert!(!roots.whole_page);
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Extract command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_repeated_selectors() {
    let cli = Cli::parse_from([
        "page-context",
        "extract",
        "--html",
        "page.html",
        "--select",
        "form",
        "--select",
        "nav a",
        "--format",
        "simplified",
    ]);
    match cli.command {
        Commands::Extract { roots, format } => {
            assert_eq!(roots.selectors, vec!["form", "nav a"]);
            assert_eq!(format, "simplified");
        }
        _ => panic!("Expected Extract command"),
    }
}

#[test]
fn cli_parse_act_with_globals() {
    let cli = Cli::parse_from([
        "page-context",
        "act",
        "--html",
        "page.html",
        "--whole-page",
        "--actions",
        "batch.json",
        "--preview",
        "-vv",
        "--sibling-label-limit",
        "40",
        "--trace",
        "run.jsonl",
    ]);
    match &cli.command {
        Commands::Act { roots, actions, preview } => {
            assert!(roots.whole_page);
            assert_eq!(actions, "batch.json");
            assert!(*preview);
        }
        _ => panic!("Expected Act command"),
    }
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.sibling_label_limit, Some(40));
    assert_eq!(cli.trace.as_deref(), Some("run.jsonl"));
}

#[test]
fn cli_parse_inspect_output() {
    let cli = Cli::parse_from(["page-context", "inspect", "--html", "p.html", "-o", "out.html"]);
    match cli.command {
        Commands::Inspect { output, .. } => assert_eq!(output.as_deref(), Some("out.html")),
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn cli_requires_html() {
    assert!(Cli::try_parse_from(["page-context", "extract"]).is_err());
}

#[test]
fn verbosity_maps_to_filters() {
    assert_eq!(log_filter(0), "warn");
    assert_eq!(log_filter(1), "info");
    assert_eq!(log_filter(2), "debug");
    assert_eq!(log_filter(9), "trace");
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_missing_file_returns_defaults() {
    let config = load_config(Some("/nonexistent/page-context.yaml"));
    assert_eq!(config.extraction.sibling_label_limit, 100);
    assert_eq!(config.preview.vertical_margin, 30.0);
    assert!(config.trace.path.is_none());
}

#[test]
fn config_partial_yaml_fills_defaults() {
    let file = write_temp("extraction:\n  sibling_label_limit: 60\n", ".yaml");
    let config = load_config(file.path().to_str());
    assert_eq!(config.extraction.sibling_label_limit, 60);
    assert_eq!(config.preview.vertical_margin, 30.0);
}

#[test]
fn config_malformed_yaml_returns_defaults() {
    let file = write_temp("extraction: [unclosed", ".yaml");
    let config = load_config(file.path().to_str());
    assert_eq!(config.extraction.sibling_label_limit, 100);
}

#[test]
fn cli_flags_override_config() {
    let file = write_temp(
        "extraction:\n  sibling_label_limit: 60\npreview:\n  vertical_margin: 12\ntrace:\n  path: from-config.jsonl\n",
        ".yaml",
    );
    let config = load_config(file.path().to_str());

    let from_config = resolve_settings(
        &Cli::parse_from(["page-context", "extract", "--html", "p.html"]),
        &config,
    );
    assert_eq!(
        from_config,
        Settings {
            options: ExtractionOptions { sibling_label_limit: 60 },
            preview_margin: 12.0,
            trace_path: Some("from-config.jsonl".into()),
        }
    );

    let overridden = resolve_settings(
        &Cli::parse_from([
            "page-context",
            "extract",
            "--html",
            "p.html",
            "--sibling-label-limit",
            "5",
            "--trace",
            "cli.jsonl",
        ]),
        &config,
    );
    assert_eq!(overridden.options.sibling_label_limit, 5);
    assert_eq!(overridden.trace_path.as_deref(), Some("cli.jsonl"));
}

// ============================================================================
// Page loading
// ============================================================================

#[test]
fn selected_roots_extract_from_file() {
    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &["#login"], false);

    let results = extract_file(&args, &defaults()).unwrap().expect("selection");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].simplified, "[User](mcp-id-1)[Sign in](mcp-id-2)");
}

#[test]
fn whole_page_extracts_body_from_file() {
    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &[], true);

    let results = extract_file(&args, &defaults()).unwrap().expect("selection");
    assert_eq!(results.len(), 1);
    assert!(results[0].simplified.contains("[Home](mcp-id-1)"));
    assert!(results[0].simplified.contains("[Sign in](mcp-id-3)"));
}

#[test]
fn no_selection_extracts_nothing() {
    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &["table"], false);
    assert_eq!(extract_file(&args, &defaults()).unwrap(), None);
}

#[test]
fn missing_html_file_is_io_error() {
    let args = roots("/nonexistent/page.html", &[], true);
    match open_context(&args, &defaults()) {
        Err(ContextError::Io { path, .. }) => assert_eq!(path, "/nonexistent/page.html"),
        Err(other) => panic!("expected Io error, got {:?}", other),
        Ok(_) => panic!("expected Io error"),
    }
}

#[test]
fn open_context_applies_settings() {
    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &["form", "header"], false);
    let mut settings = defaults();
    settings.preview_margin = 0.0;

    let mut context = open_context(&args, &settings).unwrap();
    assert_eq!(context.selection().selected().len(), 2);
    assert!(!context.selection().is_active());

    let results = context.extract_selection().expect("selection");
    assert_eq!(results[1].simplified, "[Home](mcp-id-3)");
}

// ============================================================================
// Trace Logger Tests
// ============================================================================

#[test]
fn trace_logger_appends_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let path_str = path.to_str().unwrap();

    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &["#login"], false);
    let mut settings = defaults();
    settings.trace_path = Some(path_str.to_string());

    let mut context = open_context(&args, &settings).unwrap();
    let first = context.extract_selection().unwrap();
    context.extract_selection().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "extract");
    assert_eq!(lines[0]["pass"], 1);
    assert_eq!(lines[1]["pass"], 2);
    assert_eq!(lines[0]["identifiers"], 2);
    assert_eq!(lines[0]["fingerprint"], lines[1]["fingerprint"]);
    assert_eq!(lines[0]["fingerprint"], extraction_fingerprint(&first).as_str());
}

#[test]
fn disabled_logger_writes_nothing() {
    let logger = TraceLogger::disabled();
    assert!(!logger.is_enabled());
    logger.log(&TraceEvent::now(1, "extract"));
    assert_eq!(logger.written(), 0);
}

#[test]
fn unwritable_trace_path_is_an_io_error() {
    let result = TraceLogger::open("/nonexistent/dir/trace.jsonl");
    assert!(matches!(
        result,
        Err(ContextError::Io { ref path, .. }) if path == "/nonexistent/dir/trace.jsonl"
    ));
}

#[test]
fn unwritable_trace_path_does_not_block_extraction() {
    let page = write_temp(PAGE, ".html");
    let args = roots(page.path().to_str().unwrap(), &["#login"], false);
    let mut settings = defaults();
    settings.trace_path = Some("/nonexistent/dir/trace.jsonl".into());

    let mut context = open_context(&args, &settings).unwrap();
    assert_eq!(context.extract_selection().unwrap().len(), 1);
}

#[test]
fn logger_counts_appended_lines_and_keeps_existing_content() {
    let file = write_temp("{\"kind\":\"earlier\"}\n", ".jsonl");
    let path = file.path().to_str().unwrap();

    let logger = TraceLogger::open(path).unwrap();
    assert!(logger.is_enabled());
    logger.log(&TraceEvent::now(1, "extract"));
    logger.log(&TraceEvent::now(1, "action"));
    assert_eq!(logger.written(), 2);

    let content = std::fs::read_to_string(path).unwrap();
    let kinds: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .map(|v| v["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["earlier", "extract", "action"]);
}

#[test]
fn fingerprint_changes_with_content() {
    let options = ExtractionOptions::default();
    let a = page_context::extract_html("<body><p>one</p></body>", &options);
    let b = page_context::extract_html("<body><p>two</p></body>", &options);
    assert_ne!(extraction_fingerprint(&a), extraction_fingerprint(&b));
    assert_eq!(extraction_fingerprint(&a).len(), 40);
}
