use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::browser::driver::SessionConfig;
use crate::browser::session::SubprocessSessionFactory;
use crate::cli::config::{parse_strictness, AppConfig, AuditArgs, AuditConfig, DiscoverArgs};
use crate::discovery::engine::{DiscoveryConfig, DiscoveryEngine};
use crate::discovery::extract::Strictness;
use crate::report::console::format_console_report;
use crate::report::json::save_report;
use crate::runner::concurrent::RunnerConfig;
use crate::trace::logger::TraceLogger;
use crate::verify::click_test::VerifyTiming;
use crate::{run_audit, AuditOptions};

// ============================================================================
// Settings resolution (CLI over config file over defaults)
// ============================================================================

/// Effective audit settings after merging CLI flags with the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSettings {
    pub max_workers: usize,
    pub wait_time: u64,
    pub timeout: u64,
    pub headless: bool,
    pub strictness: Strictness,
    pub probe_links: bool,
    pub deep_scan: bool,
}

/// An explicit CLI flag wins; an unset one takes the config file value.
pub fn resolve_audit(args: &AuditArgs, config: &AuditConfig) -> AuditSettings {
    AuditSettings {
        max_workers: args.max_workers.unwrap_or(config.max_workers),
        wait_time: args.wait_time.unwrap_or(config.wait_time),
        timeout: args.timeout.unwrap_or(config.timeout),
        headless: args.headless.unwrap_or(config.headless),
        strictness: args
            .strictness
            .as_deref()
            .map(parse_strictness)
            .unwrap_or(config.strictness),
        probe_links: args.probe_links || config.probe_links,
        deep_scan: !args.no_deep_scan && config.deep_scan,
    }
}

pub fn resolve_discover(args: &DiscoverArgs, config: &AuditConfig) -> AuditSettings {
    resolve_audit(
        &AuditArgs {
            url: args.url.clone(),
            wait_time: args.wait_time,
            headless: args.headless,
            strictness: args.strictness.clone(),
            no_deep_scan: args.no_deep_scan,
            output: args.output.clone(),
            ..AuditArgs::default()
        },
        config,
    )
}

// ============================================================================
// audit subcommand
// ============================================================================

/// Run the full audit and return whether it completed without a run-level error.
pub fn cmd_audit(
    args: &AuditArgs,
    verbose: u8,
    trace_path: Option<&str>,
    app_config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = resolve_audit(args, &app_config.audit);

    let factory = SubprocessSessionFactory::new(session_config(settings.headless, app_config));
    let tracer = match trace_path {
        Some(path) => TraceLogger::to_file(Path::new(path)),
        None => TraceLogger::disabled(),
    };

    let options = AuditOptions {
        url: args.url.clone(),
        discovery: DiscoveryConfig {
            wait_time: Duration::from_secs(settings.wait_time),
            probe_links: settings.probe_links,
            probe_timeout: Duration::from_secs(settings.timeout),
            strictness: settings.strictness,
            deep_scan: settings.deep_scan,
            verbose: verbose > 0,
            ..DiscoveryConfig::default()
        },
        runner: RunnerConfig {
            max_workers: settings.max_workers,
            timing: VerifyTiming::default(),
            verbose: verbose > 0,
            ..RunnerConfig::default()
        },
    };

    if verbose > 0 {
        eprintln!("Auditing {} with {} workers...", args.url, settings.max_workers);
    }

    let report = run_audit(&factory, &options, &tracer);

    print!("{}", format_console_report(&report));

    let path = args.output.as_deref().map(PathBuf::from);
    let written = save_report(&report, path.as_deref())?;
    println!("\nReport written to {}", written.display());

    Ok(report.error.is_none())
}

// ============================================================================
// discover subcommand
// ============================================================================

/// Scan a page without clicking anything and emit the element list as JSON.
pub fn cmd_discover(
    args: &DiscoverArgs,
    verbose: u8,
    app_config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    use crate::browser::driver::SessionFactory;

    let settings = resolve_discover(args, &app_config.audit);

    let factory = SubprocessSessionFactory::new(session_config(settings.headless, app_config));
    let mut session = factory.create()?;

    let engine = DiscoveryEngine::new(DiscoveryConfig {
        wait_time: Duration::from_secs(settings.wait_time),
        strictness: settings.strictness,
        deep_scan: settings.deep_scan,
        verbose: verbose > 0,
        ..DiscoveryConfig::default()
    });

    let result = engine.discover(session.as_mut(), &args.url);
    session.quit()?;
    let result = result?;

    if verbose > 0 {
        for failure in &result.diagnostics.failures {
            eprintln!("Warning: {}", failure);
        }
    }

    let json = serde_json::to_string_pretty(&result.elements)?;
    match args.output.as_deref() {
        Some(path) => {
            std::fs::write(Path::new(path), &json)?;
            println!("{} elements written to {}", result.elements.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn session_config(headless: bool, app_config: &AppConfig) -> SessionConfig {
    let mut config = SessionConfig {
        headless,
        window_width: app_config.browser.window_width,
        window_height: app_config.browser.window_height,
        ..SessionConfig::default()
    };
    if let Some(ua) = &app_config.browser.user_agent {
        config.user_agent = ua.clone();
    }
    if let Some(script) = &app_config.browser.server_script {
        config.server_script = PathBuf::from(script);
    }
    config
}
