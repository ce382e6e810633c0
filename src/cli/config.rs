use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::discovery::extract::Strictness;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "click-audit",
    version,
    about = "Clickable-element liveness auditor for dynamic web pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: click-audit.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append JSONL trace events to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover, click, and classify every clickable element on a page
    Audit(AuditArgs),

    /// Discover clickable elements only, without clicking anything
    Discover(DiscoverArgs),
}

/// Flags left unset fall back to the config file, then to built-in
/// defaults.
#[derive(Args, Debug, Default)]
pub struct AuditArgs {
    /// Page URL to audit
    #[arg(long)]
    pub url: String,

    /// Parallel browser sessions (default 3)
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Seconds to wait after page load before discovery (default 5)
    #[arg(long)]
    pub wait_time: Option<u64>,

    /// Per-request timeout in seconds for href HEAD probes (default 10)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Run browsers headless (default true)
    #[arg(long, action = clap::ArgAction::Set)]
    pub headless: Option<bool>,

    /// Candidate filtering: relaxed, normal, strict
    #[arg(long)]
    pub strictness: Option<String>,

    /// HEAD-probe discovered hrefs and record status codes
    #[arg(long)]
    pub probe_links: bool,

    /// Skip the pre-discovery interaction pass
    #[arg(long)]
    pub no_deep_scan: bool,

    /// Report output path (default: clickability_test_<url>.json)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {
    /// Page URL to scan
    #[arg(long)]
    pub url: String,

    /// Seconds to wait after page load before discovery (default 5)
    #[arg(long)]
    pub wait_time: Option<u64>,

    /// Run the browser headless (default true)
    #[arg(long, action = clap::ArgAction::Set)]
    pub headless: Option<bool>,

    /// Candidate filtering: relaxed, normal, strict
    #[arg(long)]
    pub strictness: Option<String>,

    /// Skip the pre-discovery interaction pass
    #[arg(long)]
    pub no_deep_scan: bool,

    /// Write the element list as JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn parse_strictness(name: &str) -> Strictness {
    match name {
        "relaxed" => Strictness::Relaxed,
        "strict" => Strictness::Strict,
        _ => Strictness::Normal,
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `click-audit.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_three")]
    pub max_workers: usize,

    #[serde(default = "default_five")]
    pub wait_time: u64,

    #[serde(default = "default_ten")]
    pub timeout: u64,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub strictness: Strictness,

    #[serde(default)]
    pub probe_links: bool,

    #[serde(default = "default_true")]
    pub deep_scan: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_workers: 3,
            wait_time: 5,
            timeout: 10,
            headless: true,
            strictness: Strictness::Normal,
            probe_links: false,
            deep_scan: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub user_agent: Option<String>,

    #[serde(default = "default_width")]
    pub window_width: u32,

    #[serde(default = "default_height")]
    pub window_height: u32,

    /// Path to the Node.js browser server script
    pub server_script: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            window_width: 1920,
            window_height: 1080,
            server_script: None,
        }
    }
}

// Serde default helpers
fn default_three() -> usize { 3 }
fn default_five() -> u64 { 5 }
fn default_ten() -> u64 { 10 }
fn default_true() -> bool { true }
fn default_width() -> u32 { 1920 }
fn default_height() -> u32 { 1080 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("click-audit.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
