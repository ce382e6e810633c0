use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::element_model::ElementDescriptor;

// ============================================================================
// Per-element outcome
// ============================================================================

/// Final classification of one click attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickStatus {
    /// The page URL changed
    ActiveNavigation,
    /// Same URL, document title changed
    ActiveTitleChange,
    /// Same URL and title, DOM content mutated
    ActiveDomChange,
    /// A modal or expanded dropdown appeared
    ActiveUiChange,
    /// No observable effect
    DeadClick,
    /// Re-location exhausted every fallback; no click was attempted
    ElementNotFound,
    /// Located but not displayed or not enabled at click time
    NotClickable,
    /// Pointer click intercepted and the script fallback also failed
    ClickIntercepted,
    /// Unexpected driver failure during the attempt
    Error,
    /// The whole batch failed before this element was reached
    BatchError,
}

impl ClickStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickStatus::ActiveNavigation => "active_navigation",
            ClickStatus::ActiveTitleChange => "active_title_change",
            ClickStatus::ActiveDomChange => "active_dom_change",
            ClickStatus::ActiveUiChange => "active_ui_change",
            ClickStatus::DeadClick => "dead_click",
            ClickStatus::ElementNotFound => "element_not_found",
            ClickStatus::NotClickable => "not_clickable",
            ClickStatus::ClickIntercepted => "click_intercepted",
            ClickStatus::Error => "error",
            ClickStatus::BatchError => "batch_error",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ClickStatus::ActiveNavigation
                | ClickStatus::ActiveTitleChange
                | ClickStatus::ActiveDomChange
                | ClickStatus::ActiveUiChange
        )
    }
}

/// Everything recorded about one tested element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub element_info: ElementDescriptor,
    pub click_status: ClickStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    pub page_changed: bool,
    pub url_before: String,
    pub url_after: String,
    #[serde(default)]
    pub dom_hash_before: Option<String>,
    #[serde(default)]
    pub dom_hash_after: Option<String>,
    pub new_elements_appeared: bool,
    /// RFC 3339 timestamp of the attempt
    pub timestamp: String,
}

// ============================================================================
// Aggregate report
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcurrentInfo {
    pub max_workers: usize,
    pub batches_created: usize,
    pub batch_sizes: Vec<usize>,
    /// Wall-clock seconds for the whole verification phase
    pub total_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_tested: usize,
    pub active_percentage: f64,
    pub dead_percentage: f64,
    pub error_percentage: f64,
    /// Up to ten most frequent element class strings, most frequent first
    pub most_common_classes: Vec<(String, usize)>,
    /// Count per final status
    pub click_status_breakdown: BTreeMap<String, usize>,
}

/// The complete audit result for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub url: String,
    pub total_elements_found: usize,
    pub elements_tested: usize,
    pub active_clicks: usize,
    pub dead_clicks: usize,
    pub errors: usize,
    pub results: Vec<TestOutcome>,
    pub concurrent_info: ConcurrentInfo,
    pub summary: ReportSummary,
    /// RFC 3339 timestamp of report creation
    pub timestamp: String,
    /// Set when the run aborted before producing results
    #[serde(default)]
    pub error: Option<String>,
}

impl TestReport {
    /// Build the aggregate from collected outcomes.
    pub fn from_outcomes(
        url: &str,
        total_found: usize,
        results: Vec<TestOutcome>,
        concurrent_info: ConcurrentInfo,
    ) -> Self {
        let tested = results.len();
        let active = results.iter().filter(|r| r.click_status.is_active()).count();
        let dead = results
            .iter()
            .filter(|r| r.click_status == ClickStatus::DeadClick)
            .count();
        let errors = tested - active - dead;

        let pct = |n: usize| {
            if tested == 0 {
                0.0
            } else {
                (n as f64 / tested as f64 * 1000.0).round() / 10.0
            }
        };

        // Frequencies are per class token, not per whole class attribute.
        let mut class_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for outcome in &results {
            for class in outcome.element_info.class_names.split_whitespace() {
                *class_counts.entry(class).or_default() += 1;
            }
        }
        let mut most_common: Vec<(String, usize)> = class_counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        most_common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        most_common.truncate(10);

        let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();
        for outcome in &results {
            *breakdown
                .entry(outcome.click_status.as_str().to_string())
                .or_default() += 1;
        }

        TestReport {
            url: url.to_string(),
            total_elements_found: total_found,
            elements_tested: tested,
            active_clicks: active,
            dead_clicks: dead,
            errors,
            results,
            concurrent_info,
            summary: ReportSummary {
                total_tested: tested,
                active_percentage: pct(active),
                dead_percentage: pct(dead),
                error_percentage: pct(errors),
                most_common_classes: most_common,
                click_status_breakdown: breakdown,
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            error: None,
        }
    }

    /// Report shell for a run that failed before testing anything.
    pub fn failed(url: &str, error: String) -> Self {
        TestReport {
            url: url.to_string(),
            total_elements_found: 0,
            elements_tested: 0,
            active_clicks: 0,
            dead_clicks: 0,
            errors: 0,
            results: Vec::new(),
            concurrent_info: ConcurrentInfo::default(),
            summary: ReportSummary::default(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            error: Some(error),
        }
    }
}
