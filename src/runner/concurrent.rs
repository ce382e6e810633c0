use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::browser::driver::{PageDriver, SessionFactory};
use crate::element::element_model::ElementDescriptor;
use crate::report::report_model::{ClickStatus, ConcurrentInfo, TestOutcome, TestReport};
use crate::runner::batch::{partition, BatchJob};
use crate::runner::pool::SessionPool;
use crate::verify::click_test::{ClickVerifier, VerifyTiming};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub max_workers: usize,
    /// Wait after (re-)loading the page before testing an element
    pub page_load_wait: Duration,
    pub timing: VerifyTiming,
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_workers: 3,
            page_load_wait: Duration::from_secs(3),
            timing: VerifyTiming::default(),
            verbose: false,
        }
    }
}

/// Runs click verification over the element list with one isolated browser
/// session per batch.
///
/// Each worker thread owns its session outright, so workers never share
/// page state and a crash in one browser cannot poison another batch. The
/// report is assembled from results in completion order; outcome counts do
/// not depend on which worker finished first.
pub struct ConcurrentRunner {
    config: RunnerConfig,
}

impl ConcurrentRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        factory: &dyn SessionFactory,
        url: &str,
        elements: Vec<ElementDescriptor>,
        total_found: usize,
    ) -> TestReport {
        let started = Instant::now();
        let mut batches = partition(elements, self.config.max_workers);

        if batches.is_empty() {
            return TestReport::from_outcomes(
                url,
                total_found,
                Vec::new(),
                ConcurrentInfo {
                    max_workers: self.config.max_workers,
                    batches_created: 0,
                    batch_sizes: Vec::new(),
                    total_time: started.elapsed().as_secs_f64(),
                },
            );
        }

        let pool = match SessionPool::build(factory, batches.len()) {
            Ok(pool) => pool,
            Err(e) => return TestReport::failed(url, e.to_string()),
        };

        // Fewer sessions than planned batches: fold the elements back
        // together and cut batches to the sessions we actually have.
        if pool.len() < batches.len() {
            let all: Vec<ElementDescriptor> = batches
                .into_iter()
                .flat_map(|b| b.elements)
                .collect();
            batches = partition(all, pool.len());
        }

        let batch_sizes: Vec<usize> = batches.iter().map(|b| b.elements.len()).collect();
        let batches_created = batches.len();
        if self.config.verbose {
            eprintln!(
                "[runner] {} batches over {} sessions: {:?}",
                batches_created,
                pool.len(),
                batch_sizes
            );
        }

        let (tx, rx) = mpsc::channel::<(usize, Vec<TestOutcome>, f64)>();
        let sessions = pool.into_sessions();

        thread::scope(|scope| {
            for (batch, session) in batches.into_iter().zip(sessions) {
                let tx = tx.clone();
                let config = &self.config;
                scope.spawn(move || {
                    let batch_started = Instant::now();
                    let outcomes = run_batch(session, url, &batch, config);
                    // Receiver outliving the scope is the only way this
                    // send fails, and it cannot.
                    let _ = tx.send((
                        batch.batch_id,
                        outcomes,
                        batch_started.elapsed().as_secs_f64(),
                    ));
                });
            }
            drop(tx);

            let mut results = Vec::new();
            for (batch_id, outcomes, elapsed) in rx {
                if self.config.verbose {
                    eprintln!(
                        "[runner] batch {} done: {} elements in {:.1}s",
                        batch_id,
                        outcomes.len(),
                        elapsed
                    );
                }
                results.extend(outcomes);
            }

            TestReport::from_outcomes(
                url,
                total_found,
                results,
                ConcurrentInfo {
                    max_workers: self.config.max_workers,
                    batches_created,
                    batch_sizes,
                    total_time: started.elapsed().as_secs_f64(),
                },
            )
        })
    }
}

fn run_batch(
    mut session: Box<dyn PageDriver>,
    url: &str,
    batch: &BatchJob,
    config: &RunnerConfig,
) -> Vec<TestOutcome> {
    let verifier = ClickVerifier::new(config.timing.clone());
    let mut outcomes = Vec::with_capacity(batch.elements.len());

    for descriptor in &batch.elements {
        // A click that navigated away leaves the session on the wrong
        // page for the next element.
        let on_page = session
            .current_url()
            .map(|current| current == url)
            .unwrap_or(false);
        if !on_page {
            if let Err(e) = session.navigate(url) {
                outcomes.push(batch_error_outcome(descriptor, url, e.to_string()));
                continue;
            }
            thread::sleep(config.page_load_wait);
        }
        outcomes.push(verifier.test_element(session.as_mut(), descriptor));
    }

    let _ = session.quit();
    outcomes
}

fn batch_error_outcome(descriptor: &ElementDescriptor, url: &str, message: String) -> TestOutcome {
    TestOutcome {
        element_info: descriptor.clone(),
        click_status: ClickStatus::BatchError,
        error_message: Some(message),
        page_changed: false,
        url_before: url.to_string(),
        url_after: url.to_string(),
        dom_hash_before: None,
        dom_hash_after: None,
        new_elements_appeared: false,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
