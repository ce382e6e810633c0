use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::discovery::carousel::scan_carousels;
use crate::discovery::deep_scan::{run_deep_scan, scroll_to_bottom};
use crate::discovery::extract::{Extractor, Strictness};
use crate::discovery::regions::{
    in_carousel, in_reviews_carousel, is_header_footer, main_content_area,
};
use crate::discovery::selectors::{
    CLICKABLE_SELECTORS, DEEP_SCAN_SELECTORS, GENERIC_CLICKABLE_SELECTORS,
};
use crate::element::dedup::deduplicate;
use crate::element::element_model::{DetectionMethod, ElementDescriptor};
use crate::element::href::LinkProber;
use crate::error::AuditError;

// ============================================================================
// Configuration
// ============================================================================

/// Pauses between discovery interactions. `none()` collapses every pause so
/// tests run instantly.
#[derive(Debug, Clone)]
pub struct DiscoveryTiming {
    pub scroll_pause: Duration,
    pub interaction_pause: Duration,
    pub settle_pause: Duration,
}

impl Default for DiscoveryTiming {
    fn default() -> Self {
        Self {
            scroll_pause: Duration::from_millis(1500),
            interaction_pause: Duration::from_millis(300),
            settle_pause: Duration::from_secs(2),
        }
    }
}

impl DiscoveryTiming {
    pub fn none() -> Self {
        Self {
            scroll_pause: Duration::ZERO,
            interaction_pause: Duration::ZERO,
            settle_pause: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Initial wait after navigation before anything touches the page
    pub wait_time: Duration,
    /// Nested iframe recursion cap
    pub max_frame_depth: usize,
    /// HEAD-probe discovered hrefs for status codes
    pub probe_links: bool,
    /// Timeout for each HEAD probe
    pub probe_timeout: Duration,
    pub strictness: Strictness,
    /// Run the interaction pass (toggles, hover, keyboard, scrolling)
    pub deep_scan: bool,
    pub timing: DiscoveryTiming,
    pub verbose: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            wait_time: Duration::from_secs(5),
            max_frame_depth: 2,
            probe_links: false,
            probe_timeout: Duration::from_secs(10),
            strictness: Strictness::Normal,
            deep_scan: true,
            timing: DiscoveryTiming::default(),
            verbose: false,
        }
    }
}

/// Per-strategy outcome of one discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryDiagnostics {
    /// (strategy name, raw element count before deduplication)
    pub strategy_counts: Vec<(String, usize)>,
    /// Strategies that failed; discovery continues past them
    pub failures: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DiscoveryResult {
    pub elements: Vec<ElementDescriptor>,
    pub diagnostics: DiscoveryDiagnostics,
}

// ============================================================================
// Engine
// ============================================================================

/// Runs every discovery strategy against a page and folds the results into
/// one deduplicated element list.
///
/// Strategy failures are recorded and skipped, never fatal: a page with a
/// broken iframe still yields its regular elements. Only navigation failure
/// aborts the run.
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
}

impl DiscoveryEngine {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn discover(
        &self,
        driver: &mut dyn PageDriver,
        url: &str,
    ) -> Result<DiscoveryResult, AuditError> {
        driver.navigate(url)?;
        thread::sleep(self.config.wait_time);

        let prober = self
            .config
            .probe_links
            .then(|| LinkProber::new(self.config.probe_timeout));
        let mut extractor = Extractor::new(url, self.config.strictness, prober);
        let mut result = DiscoveryResult::default();
        let mut raw: Vec<ElementDescriptor> = Vec::new();

        if self.config.deep_scan {
            if let Err(e) = run_deep_scan(driver, &self.config.timing) {
                result
                    .diagnostics
                    .failures
                    .push(format!("deep scan: {}", e));
            }
        } else if let Err(e) = scroll_to_bottom(driver, &self.config.timing) {
            result.diagnostics.failures.push(format!("scroll: {}", e));
        }

        let main = match main_content_area(driver) {
            Ok(main) => main,
            Err(e) => {
                result
                    .diagnostics
                    .failures
                    .push(format!("main content lookup: {}", e));
                None
            }
        };
        if self.config.verbose && main.is_some() {
            eprintln!("[discovery] scoping structural scan to main content area");
        }

        self.run_strategy(&mut result, &mut raw, "carousel", |raw| {
            let found = scan_carousels(driver, &mut extractor, main.as_ref())?;
            let n = found.len();
            raw.extend(found);
            Ok(n)
        });

        self.run_strategy(&mut result, &mut raw, "deep_scan_widgets", |raw| {
            scan_selectors(
                driver,
                &mut extractor,
                DEEP_SCAN_SELECTORS,
                main.as_ref(),
                DetectionMethod::DeepScan,
                true,
                raw,
            )
        });

        self.run_strategy(&mut result, &mut raw, "selector", |raw| {
            scan_selectors(
                driver,
                &mut extractor,
                CLICKABLE_SELECTORS,
                main.as_ref(),
                DetectionMethod::Selector,
                true,
                raw,
            )
        });

        self.run_strategy(&mut result, &mut raw, "pointer_cursor", |raw| {
            scan_pointer_cursor(driver, &mut extractor, DetectionMethod::PointerCursor, raw)
        });

        self.run_strategy(&mut result, &mut raw, "event_listener", |raw| {
            scan_event_listeners(driver, &mut extractor, DetectionMethod::EventListener, raw)
        });

        self.run_strategy(&mut result, &mut raw, "iframe", |raw| {
            scan_frames(driver, &mut extractor, self.config.max_frame_depth, raw)
        });

        self.run_strategy(&mut result, &mut raw, "shadow_dom", |raw| {
            scan_shadow_roots(driver, &mut extractor, raw)
        });

        let mut elements = deduplicate(raw);

        if elements.is_empty() {
            let mut fallback_raw = Vec::new();
            self.run_strategy(&mut result, &mut fallback_raw, "fallback", |raw| {
                scan_fallback(driver, &mut extractor, raw)
            });
            elements = deduplicate(fallback_raw);
        }

        if self.config.verbose {
            eprintln!("[discovery] {} unique elements after dedup", elements.len());
        }
        result.elements = elements;
        Ok(result)
    }

    fn run_strategy<F>(
        &self,
        result: &mut DiscoveryResult,
        raw: &mut Vec<ElementDescriptor>,
        name: &str,
        strategy: F,
    ) where
        F: FnOnce(&mut Vec<ElementDescriptor>) -> Result<usize, AuditError>,
    {
        match strategy(raw) {
            Ok(count) => {
                if self.config.verbose {
                    eprintln!("[discovery] {}: {} elements", name, count);
                }
                result.diagnostics.strategy_counts.push((name.into(), count));
            }
            Err(e) => {
                if self.config.verbose {
                    eprintln!("[discovery] {} failed: {}", name, e);
                }
                result.diagnostics.failures.push(format!("{}: {}", name, e));
            }
        }
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn scan_selectors(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    selectors: &[&str],
    scope: Option<&ElementHandle>,
    method: DetectionMethod,
    apply_region_exclusions: bool,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let mut count = 0;
    for selector in selectors {
        let matches = match scope {
            Some(root) => driver.query_within(root, selector),
            None => driver.find_by_css(selector),
        };
        for handle in matches.unwrap_or_default() {
            count += extract_with_exclusions(
                driver,
                extractor,
                &handle,
                method,
                apply_region_exclusions,
                raw,
            )?;
        }
    }
    Ok(count)
}

fn scan_pointer_cursor(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    method: DetectionMethod,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let mut count = 0;
    for handle in driver.elements_with_pointer_cursor()? {
        // Images routinely carry pointer cursors for zoom overlays without
        // being independently clickable.
        if driver.tag_name(&handle)?.eq_ignore_ascii_case("img") {
            continue;
        }
        let (width, height) = driver.size(&handle).unwrap_or((0, 0));
        if width == 0 || height == 0 {
            continue;
        }
        count += extract_with_exclusions(driver, extractor, &handle, method, true, raw)?;
    }
    Ok(count)
}

fn scan_event_listeners(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    method: DetectionMethod,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let mut count = 0;
    for handle in driver.elements_with_click_handlers()? {
        count += extract_with_exclusions(driver, extractor, &handle, method, true, raw)?;
    }
    Ok(count)
}

/// Recursive frame walk. Each frame document gets the same treatment as the
/// top-level one: carousel walk, full structural catalogue, pointer-cursor
/// and listener heuristics, region exclusions included. Nesting stops at
/// `depth_left`. The frame context is always restored, scan failure
/// included.
fn scan_frames(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    depth_left: usize,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    if depth_left == 0 {
        return Ok(0);
    }
    let mut count = 0;
    let mut visited: HashSet<ElementHandle> = HashSet::new();

    for frame in driver.iframes()? {
        if !visited.insert(frame) {
            continue;
        }
        if driver.enter_frame(&frame).is_err() {
            continue;
        }
        let scanned = scan_frame_document(driver, extractor, raw)
            .and_then(|n| Ok(n + scan_frames(driver, extractor, depth_left - 1, raw)?));
        driver.exit_frame()?;
        count += scanned?;
    }
    Ok(count)
}

fn scan_frame_document(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let carousel = scan_carousels(driver, extractor, None)?;
    let mut count = carousel.len();
    raw.extend(carousel);
    count += scan_selectors(
        driver,
        extractor,
        CLICKABLE_SELECTORS,
        None,
        DetectionMethod::Iframe,
        true,
        raw,
    )?;
    count += scan_pointer_cursor(driver, extractor, DetectionMethod::Iframe, raw)?;
    count += scan_event_listeners(driver, extractor, DetectionMethod::Iframe, raw)?;
    Ok(count)
}

fn scan_shadow_roots(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let mut count = 0;
    for host in driver.shadow_hosts()? {
        for selector in GENERIC_CLICKABLE_SELECTORS {
            for handle in driver.query_shadow(&host, selector).unwrap_or_default() {
                if let Some(descriptor) =
                    extractor.extract(driver, &handle, DetectionMethod::ShadowDom)?
                {
                    raw.push(descriptor);
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

/// Last-resort DOM-wide scan when every other strategy came back empty:
/// generic selectors plus pointer cursors, region exclusions off.
fn scan_fallback(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let mut count = scan_selectors(
        driver,
        extractor,
        GENERIC_CLICKABLE_SELECTORS,
        None,
        DetectionMethod::Fallback,
        false,
        raw,
    )?;
    for handle in driver.elements_with_pointer_cursor()? {
        count +=
            extract_with_exclusions(driver, extractor, &handle, DetectionMethod::Fallback, false, raw)?;
    }
    Ok(count)
}

/// Extract one candidate, applying region exclusions from its ancestor
/// chain. Carousel-contained elements are excluded here outright: only the
/// carousel walk may capture them, with autoplay paused and slides forced
/// visible.
fn extract_with_exclusions(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    handle: &ElementHandle,
    method: DetectionMethod,
    apply_region_exclusions: bool,
    raw: &mut Vec<ElementDescriptor>,
) -> Result<usize, AuditError> {
    let chain = driver.ancestors(handle).unwrap_or_default();
    if apply_region_exclusions
        && (is_header_footer(&chain) || in_reviews_carousel(&chain) || in_carousel(&chain))
    {
        return Ok(0);
    }
    if let Some(mut descriptor) = extractor.extract(driver, handle, method)? {
        if in_carousel(&chain) {
            descriptor.is_carousel_element = true;
        }
        raw.push(descriptor);
        return Ok(1);
    }
    Ok(0)
}
