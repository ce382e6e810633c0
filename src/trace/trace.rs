use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::report::report_model::ClickStatus;

/// One line of the JSONL audit trail.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub phase: String,

    pub url: Option<String>,
    pub strategy: Option<String>,
    pub element_count: Option<usize>,

    pub batch_id: Option<usize>,
    pub batch_size: Option<usize>,
    pub elapsed_secs: Option<f64>,

    pub element_fingerprint: Option<String>,
    pub click_status: Option<String>,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(phase: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            phase: phase.to_string(),
            url: None,
            strategy: None,
            element_count: None,
            batch_id: None,
            batch_size: None,
            elapsed_secs: None,
            element_fingerprint: None,
            click_status: None,
            detail: None,
        }
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_strategy(mut self, strategy: impl ToString, count: usize) -> Self {
        self.strategy = Some(strategy.to_string());
        self.element_count = Some(count);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.element_count = Some(count);
        self
    }

    pub fn with_batch(mut self, batch_id: usize, batch_size: usize) -> Self {
        self.batch_id = Some(batch_id);
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_elapsed(mut self, secs: f64) -> Self {
        self.elapsed_secs = Some(secs);
        self
    }

    pub fn with_outcome(mut self, fingerprint: impl ToString, status: ClickStatus) -> Self {
        self.element_fingerprint = Some(fingerprint.to_string());
        self.click_status = Some(status.as_str().to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
