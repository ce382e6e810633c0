use std::thread;
use std::time::Duration;

use crate::browser::driver::{ElementHandle, PageDriver};
use crate::element::element_model::ElementDescriptor;
use crate::error::AuditError;

/// Re-locate a discovered element in a fresh session.
///
/// Descriptors never carry live handles, and dynamic pages recreate nodes
/// freely, so the verifier hunts for the element again using progressively
/// looser strategies. Each full pass over the chain counts as one attempt;
/// the pause between attempts gives late-rendering pages time to settle.
/// `None` means every strategy on every attempt missed.
pub fn locate(
    driver: &mut dyn PageDriver,
    descriptor: &ElementDescriptor,
    attempts: usize,
    pause: Duration,
) -> Result<Option<ElementHandle>, AuditError> {
    for attempt in 0..attempts {
        if attempt > 0 {
            thread::sleep(pause);
        }
        if let Some(handle) = try_all_strategies(driver, descriptor)? {
            return Ok(Some(handle));
        }
    }
    Ok(None)
}

fn try_all_strategies(
    driver: &mut dyn PageDriver,
    d: &ElementDescriptor,
) -> Result<Option<ElementHandle>, AuditError> {
    // 1. Exact xpath.
    if !d.xpath.is_empty() {
        let candidates = driver.find_by_xpath(&d.xpath).unwrap_or_default();
        if let Some(h) = first_displayed(driver, candidates)? {
            return Ok(Some(h));
        }
    }

    // 2. Recorded CSS path, accepted only if the tag still matches.
    if !d.css_selector.is_empty() {
        let candidates = driver.find_by_css(&d.css_selector).unwrap_or_default();
        for handle in candidates {
            if driver.tag_name(&handle)?.eq_ignore_ascii_case(&d.tag_name)
                && driver.is_displayed(&handle).unwrap_or(false)
            {
                return Ok(Some(handle));
            }
        }
    }

    // 3. Tag plus classes, filtered by exact text.
    if !d.class_names.is_empty() {
        let selector = class_selector(&d.tag_name, &d.class_names);
        if let Some(selector) = selector {
            let candidates = driver.find_by_css(&selector).unwrap_or_default();
            for handle in candidates {
                let text = driver.text(&handle)?;
                if text.trim() == d.text && driver.is_displayed(&handle).unwrap_or(false) {
                    return Ok(Some(handle));
                }
            }
        }
    }

    // 4. Element id.
    if !d.id.is_empty() {
        if let Ok(Some(handle)) = driver.find_by_id(&d.id) {
            if driver.is_displayed(&handle).unwrap_or(false) {
                return Ok(Some(handle));
            }
        }
    }

    // 5. Partial text match on the tag.
    let needle: String = d.text.chars().take(30).collect();
    if !needle.is_empty() && !needle.contains('\'') {
        let xpath = format!("//{}[contains(text(), '{}')]", d.tag_name, needle);
        let candidates = driver.find_by_xpath(&xpath).unwrap_or_default();
        if let Some(h) = first_displayed(driver, candidates)? {
            return Ok(Some(h));
        }
    }

    // 6. Classes alone.
    if !d.class_names.is_empty() {
        if let Some(selector) = class_selector(&d.tag_name, &d.class_names) {
            let candidates = driver.find_by_css(&selector).unwrap_or_default();
            if let Some(h) = first_displayed(driver, candidates)? {
                return Ok(Some(h));
            }
        }
    }

    // 7. data-testid.
    if !d.data_testid.is_empty() && !d.data_testid.contains('"') {
        let selector = format!("[data-testid=\"{}\"]", d.data_testid);
        let candidates = driver.find_by_css(&selector).unwrap_or_default();
        if let Some(h) = first_displayed(driver, candidates)? {
            return Ok(Some(h));
        }
    }

    // 8. aria-label.
    if !d.aria_label.is_empty() && !d.aria_label.contains('"') {
        let selector = format!("[aria-label=\"{}\"]", d.aria_label);
        let candidates = driver.find_by_css(&selector).unwrap_or_default();
        if let Some(h) = first_displayed(driver, candidates)? {
            return Ok(Some(h));
        }
    }

    Ok(None)
}

fn first_displayed(
    driver: &mut dyn PageDriver,
    candidates: Vec<ElementHandle>,
) -> Result<Option<ElementHandle>, AuditError> {
    for handle in candidates {
        if driver.is_displayed(&handle).unwrap_or(false) {
            return Ok(Some(handle));
        }
    }
    Ok(None)
}

/// `tag.class1.class2` from a space-separated class string. `None` when the
/// class string cannot form a valid selector.
fn class_selector(tag: &str, class_names: &str) -> Option<String> {
    let classes: Vec<&str> = class_names.split_whitespace().collect();
    if classes.is_empty() {
        return None;
    }
    if classes
        .iter()
        .any(|c| c.contains(|ch: char| !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_'))
    {
        return None;
    }
    Some(format!("{}.{}", tag, classes.join(".")))
}
