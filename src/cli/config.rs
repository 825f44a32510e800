use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::actions::preview::DEFAULT_PREVIEW_MARGIN;
use crate::extract::extraction_model::{DEFAULT_SIBLING_LABEL_LIMIT, ExtractionOptions};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-context",
    version,
    about = "Extract addressable page context and replay agent actions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-context.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Preceding-sibling label cutoff in characters
    #[arg(long, global = true)]
    pub sibling_label_limit: Option<usize>,

    /// Append a JSONL trace of passes and actions to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

/// Which roots of the page to extract.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RootArgs {
    /// HTML file to load
    #[arg(long)]
    pub html: String,

    /// CSS selector of an extraction root (repeatable)
    #[arg(long = "select")]
    pub selectors: Vec<String>,

    /// Extract the whole document body
    #[arg(long, default_value_t = false)]
    pub whole_page: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the selected roots and print the result
    Extract {
        #[command(flatten)]
        roots: RootArgs,

        /// Output format: json or simplified
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Extract, then execute or preview a batch of actions
    Act {
        #[command(flatten)]
        roots: RootArgs,

        /// JSON file holding an array of actions
        #[arg(long)]
        actions: String,

        /// Only compute preview annotations; do not touch the page
        #[arg(long, default_value_t = false)]
        preview: bool,
    },

    /// Render the context inspector HTML for the selected roots
    Inspect {
        #[command(flatten)]
        roots: RootArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-context.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_sibling_label_limit")]
    pub sibling_label_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sibling_label_limit: DEFAULT_SIBLING_LABEL_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_margin")]
    pub vertical_margin: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            vertical_margin: DEFAULT_PREVIEW_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_sibling_label_limit() -> usize { DEFAULT_SIBLING_LABEL_LIMIT }
fn default_margin() -> f64 { DEFAULT_PREVIEW_MARGIN }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("page-context.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Settings resolution (CLI > config file > defaults)
// ============================================================================

/// Fully resolved settings for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub options: ExtractionOptions,
    pub preview_margin: f64,
    pub trace_path: Option<String>,
}

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> Settings {
    Settings {
        options: ExtractionOptions {
            sibling_label_limit: cli
                .sibling_label_limit
                .unwrap_or(config.extraction.sibling_label_limit),
        },
        preview_margin: config.preview.vertical_margin,
        trace_path: cli.trace.clone().or_else(|| config.trace.path.clone()),
    }
}

/// Map `-v` occurrences to a log filter directive.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
