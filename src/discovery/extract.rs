use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::element::element_model::{DetectionMethod, ElementDescriptor, ElementSize};
use crate::element::fingerprint::Fingerprint;
use crate::element::href::LinkProber;
use crate::error::AuditError;

/// How aggressively extraction filters candidates the strategies produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Accept every candidate a strategy surfaced
    Relaxed,
    /// Require the attribute-level clickability gate plus displayed and
    /// enabled
    #[default]
    Normal,
    /// Additionally require a non-zero rendered size
    Strict,
}

/// Turns element handles into immutable descriptors, deduplicating by
/// fingerprint as it goes. One extractor instance lives for the duration of
/// a page scan so the seen-set spans all strategies.
pub struct Extractor {
    seen: HashSet<Fingerprint>,
    prober: Option<LinkProber>,
    page_url: String,
    strictness: Strictness,
}

impl Extractor {
    pub fn new(page_url: &str, strictness: Strictness, prober: Option<LinkProber>) -> Self {
        Self {
            seen: HashSet::new(),
            prober,
            page_url: page_url.to_string(),
            strictness,
        }
    }

    /// Capture one candidate. `Ok(None)` means the candidate was filtered
    /// (gate failure or already-seen fingerprint), not that capture failed.
    pub fn extract(
        &mut self,
        driver: &mut dyn PageDriver,
        handle: &ElementHandle,
        method: DetectionMethod,
    ) -> Result<Option<ElementDescriptor>, AuditError> {
        self.capture(driver, handle, method, false)
    }

    /// Capture a hidden element (inactive carousel slide content): force it
    /// visible for the duration of the capture, then restore the original
    /// inline styles. The descriptor records it as displayed because the
    /// verifier applies the same override before clicking.
    pub fn extract_hidden(
        &mut self,
        driver: &mut dyn PageDriver,
        handle: &ElementHandle,
        method: DetectionMethod,
    ) -> Result<Option<ElementDescriptor>, AuditError> {
        driver.force_visible(handle)?;
        let result = self.capture(driver, handle, method, true);
        // Restore regardless of capture outcome.
        let _ = driver.restore_visibility(handle);
        result
    }

    fn capture(
        &mut self,
        driver: &mut dyn PageDriver,
        handle: &ElementHandle,
        method: DetectionMethod,
        forced_visible: bool,
    ) -> Result<Option<ElementDescriptor>, AuditError> {
        let tag_name = driver.tag_name(handle)?.to_lowercase();
        let text: String = driver.text(handle)?.trim().chars().take(100).collect();

        let attr = |driver: &mut dyn PageDriver, name: &str| -> Result<String, AuditError> {
            Ok(driver.attribute(handle, name)?.unwrap_or_default())
        };
        let class_names = attr(driver, "class")?;
        let id = attr(driver, "id")?;
        let href = attr(driver, "href")?;
        let onclick = attr(driver, "onclick")?;
        let role = attr(driver, "role")?;
        let element_type = attr(driver, "type")?;
        let aria_label = attr(driver, "aria-label")?;
        let alt = attr(driver, "alt")?;
        let data_testid = attr(driver, "data-testid")?;
        let tabindex = driver.attribute(handle, "tabindex")?;

        let cursor = driver.computed_style(handle, "cursor").unwrap_or_default();
        let (width, height) = driver.size(handle).unwrap_or((0, 0));
        let is_displayed = forced_visible || driver.is_displayed(handle)?;
        let is_enabled = driver.is_enabled(handle)?;
        let xpath = driver.xpath_of(handle).unwrap_or_default();
        let css_selector = driver.css_path_of(handle).unwrap_or_default();

        let fingerprint = Fingerprint::of(&tag_name, &id, &class_names, &text);
        if self.seen.contains(&fingerprint) {
            return Ok(None);
        }

        let descriptor = ElementDescriptor {
            tag_name,
            text,
            class_names,
            id,
            href,
            onclick,
            role,
            element_type,
            aria_label,
            alt,
            data_testid,
            tabindex,
            cursor,
            xpath,
            css_selector,
            size: ElementSize { width, height },
            is_displayed,
            is_enabled,
            is_carousel_element: forced_visible || method == DetectionMethod::Carousel,
            detection_method: Some(method),
            status_code: None,
            fingerprint: fingerprint.clone(),
        };

        if !self.passes_gate(&descriptor) {
            return Ok(None);
        }

        let mut descriptor = descriptor;
        if let Some(prober) = &self.prober {
            descriptor.status_code = prober.probe(&descriptor.href, &self.page_url);
        }

        self.seen.insert(fingerprint);
        Ok(Some(descriptor))
    }

    fn passes_gate(&self, descriptor: &ElementDescriptor) -> bool {
        // Hidden slide content arrives here with is_displayed already set
        // by the forced-visibility override, so carousel captures survive
        // the displayed requirement.
        match self.strictness {
            Strictness::Relaxed => true,
            Strictness::Normal => {
                descriptor.is_clickable() && descriptor.is_displayed && descriptor.is_enabled
            }
            Strictness::Strict => {
                descriptor.is_clickable()
                    && descriptor.is_displayed
                    && descriptor.is_enabled
                    && descriptor.size.width > 0
                    && descriptor.size.height > 0
            }
        }
    }
}
