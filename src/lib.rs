use crate::{
    browser::driver::SessionFactory,
    discovery::engine::{DiscoveryConfig, DiscoveryEngine},
    report::report_model::TestReport,
    runner::concurrent::{ConcurrentRunner, RunnerConfig},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

pub mod browser;
pub mod cli;
pub mod discovery;
pub mod element;
pub mod error;
pub mod report;
pub mod runner;
pub mod trace;
pub mod verify;

/// Everything one audit run needs besides the session factory.
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub url: String,
    pub discovery: DiscoveryConfig,
    pub runner: RunnerConfig,
}

/// Full audit: discover clickable elements in one session, then click each
/// of them across a pool of isolated parallel sessions and aggregate the
/// outcomes. Never panics on a broken page; failures surface as an error
/// report.
pub fn run_audit(
    factory: &dyn SessionFactory,
    options: &AuditOptions,
    tracer: &TraceLogger,
) -> TestReport {
    tracer.log(&TraceEvent::now("run_started").with_url(&options.url));

    let mut discovery_session = match factory.create() {
        Ok(session) => session,
        Err(e) => {
            let report = TestReport::failed(&options.url, e.to_string());
            tracer.log(&TraceEvent::now("run_failed").with_detail(e.to_string()));
            return report;
        }
    };

    let engine = DiscoveryEngine::new(options.discovery.clone());
    let discovered = engine.discover(discovery_session.as_mut(), &options.url);
    let _ = discovery_session.quit();

    let discovered = match discovered {
        Ok(result) => result,
        Err(e) => {
            tracer.log(&TraceEvent::now("run_failed").with_detail(e.to_string()));
            return TestReport::failed(&options.url, e.to_string());
        }
    };

    for (strategy, count) in &discovered.diagnostics.strategy_counts {
        tracer.log(&TraceEvent::now("discovery_strategy").with_strategy(strategy, *count));
    }
    for failure in &discovered.diagnostics.failures {
        tracer.log(&TraceEvent::now("discovery_failure").with_detail(failure));
    }
    tracer.log(&TraceEvent::now("discovery_complete").with_count(discovered.elements.len()));

    let total_found = discovered.elements.len();
    let runner = ConcurrentRunner::new(options.runner.clone());
    let report = runner.run(factory, &options.url, discovered.elements, total_found);

    for outcome in &report.results {
        tracer.log(
            &TraceEvent::now("element_tested")
                .with_outcome(&outcome.element_info.fingerprint, outcome.click_status),
        );
    }
    tracer.log(
        &TraceEvent::now("run_complete")
            .with_url(&options.url)
            .with_count(report.elements_tested)
            .with_elapsed(report.concurrent_info.total_time),
    );

    report
}
