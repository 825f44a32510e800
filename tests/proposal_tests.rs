mod common;

use common::utils::{el, page, text};
use page_context::{
    actions::{
        action_model::Action,
        proposal::{
            DEFAULT_REASON, ProposalError, ToolCall, ToolKind, find_node_by_mcp_id, prompt_context,
            resolve_tool_call, resolve_tool_calls,
        },
    },
    extract::{
        extraction_model::{ExtractionOptions, ExtractionResult, McpId},
        tree_builder::parse_nodes,
    },
};
use serde_json::json;

// ============================================================================
// Helper builders
// ============================================================================

/// Two roots: a search box with a button, then a nav with one link and one
/// anchor without a destination.
fn results() -> Vec<ExtractionResult> {
    let (mut doc, body) = page();
    let search = el(&mut doc, body, "form", &[]);
    el(&mut doc, search, "input", &[("placeholder", "Search")]);
    let go = el(&mut doc, search, "button", &[]);
    text(&mut doc, go, "Go");

    let nav = el(&mut doc, body, "nav", &[]);
    let docs = el(&mut doc, nav, "a", &[("href", "https://x.test/docs")]);
    text(&mut doc, docs, "Docs");
    let dead = el(&mut doc, nav, "a", &[]);
    text(&mut doc, dead, "Menu");

    parse_nodes(&doc, &[search, nav], &ExtractionOptions::default()).0
}

fn call(name: &str, args: serde_json::Value) -> ToolCall {
    serde_json::from_value(json!({"name": name, "args": args})).unwrap()
}

// ============================================================================
// Prompt context
// ============================================================================

#[test]
fn prompt_context_joins_roots_with_blank_lines() {
    let results = results();
    assert_eq!(
        prompt_context(&results),
        "[Search](mcp-id-1)[Go](mcp-id-2)\n\n[Docs](mcp-id-3)[Menu](mcp-id-4)"
    );
    assert_eq!(prompt_context(&[]), "");
}

#[test]
fn lookup_searches_every_root() {
    let results = results();
    let link = find_node_by_mcp_id(&results, "mcp-id-3").expect("link found");
    assert_eq!(link.role, "a");
    assert!(find_node_by_mcp_id(&results, "mcp-id-9").is_none());
}

// ============================================================================
// Tool calls
// ============================================================================

#[test]
fn tool_names_parse() {
    assert_eq!("follow_link".parse::<ToolKind>(), Ok(ToolKind::FollowLink));
    assert_eq!(ToolKind::PressButton.as_str(), "press_button");
    assert!("scroll".parse::<ToolKind>().is_err());
}

#[test]
fn fill_call_becomes_fill_action() {
    let results = results();
    let request = resolve_tool_call(
        &results,
        &call("fill_input", json!({"mcp_id": "mcp-id-1", "value": "rust", "reason": "query"})),
    )
    .unwrap()
    .expect("request");

    assert_eq!(
        request.action,
        Action::FillInput { mcp_id: McpId::from("mcp-id-1"), value: "rust".into() }
    );
    assert_eq!(request.reason.as_deref(), Some("query"));
}

#[test]
fn follow_link_uses_recorded_href() {
    let results = results();
    let request = resolve_tool_call(&results, &call("follow_link", json!({"mcp_id": "mcp-id-3"})))
        .unwrap()
        .expect("request");

    assert_eq!(
        request.action,
        Action::Navigate {
            url: "https://x.test/docs".into(),
            mcp_id: Some(McpId::from("mcp-id-3")),
        }
    );
    assert_eq!(request.reason.as_deref(), Some(DEFAULT_REASON));
}

#[test]
fn follow_link_without_href_is_dropped() {
    let results = results();
    let request = resolve_tool_call(&results, &call("follow_link", json!({"mcp_id": "mcp-id-4"})));
    assert_eq!(request, Ok(None));
}

#[test]
fn unknown_tool_on_valid_target_is_ignored() {
    let results = results();
    assert_eq!(
        resolve_tool_call(&results, &call("scroll", json!({"mcp_id": "mcp-id-1"}))),
        Ok(None)
    );
}

#[test]
fn unknown_tool_still_needs_a_valid_target() {
    let results = results();
    assert_eq!(
        resolve_tool_call(&results, &call("scroll", json!({"mcp_id": "mcp-id-42"}))),
        Err(ProposalError::InvalidIdentifier("mcp-id-42".into()))
    );

    let calls = vec![
        call("press_button", json!({"mcp_id": "mcp-id-2"})),
        call("scroll", json!({})),
    ];
    assert!(resolve_tool_calls(&results, &calls).is_err(), "batch is rejected");
}

#[test]
fn invalid_identifier_is_an_error() {
    let results = results();
    let err = resolve_tool_call(&results, &call("press_button", json!({"mcp_id": "mcp-id-42"})))
        .unwrap_err();
    assert_eq!(err, ProposalError::InvalidIdentifier("mcp-id-42".into()));
    assert!(err.to_string().contains("mcp-id-42"));
}

#[test]
fn missing_identifier_is_an_error() {
    let results = results();
    let err = resolve_tool_call(&results, &call("press_button", json!({}))).unwrap_err();
    assert_eq!(
        err,
        ProposalError::MissingArgument { tool: "press_button".into(), argument: "mcp_id".into() }
    );
}

#[test]
fn batch_keeps_call_order() {
    let results = results();
    let calls = vec![
        call("fill_input", json!({"mcp_id": "mcp-id-1", "value": "rust"})),
        call("press_button", json!({"mcp_id": "mcp-id-2"})),
        call("follow_link", json!({"mcp_id": "mcp-id-4"})),
    ];

    let requests = resolve_tool_calls(&results, &calls).unwrap();
    let kinds: Vec<&str> = requests.iter().map(|r| r.action.kind()).collect();
    assert_eq!(kinds, vec!["fill_input", "press_button"]);
}

#[test]
fn batch_rejects_on_first_bad_identifier() {
    let results = results();
    let calls = vec![
        call("press_button", json!({"mcp_id": "mcp-id-2"})),
        call("press_button", json!({"mcp_id": "mcp-id-77"})),
    ];
    assert!(resolve_tool_calls(&results, &calls).is_err());
}
