use std::collections::HashSet;
use std::thread;

use crate::browser::driver::{ElementHandle, Key, PageDriver};
use crate::discovery::engine::DiscoveryTiming;
use crate::discovery::selectors::{DEEP_SCAN_SELECTORS, HOVER_SELECTORS};
use crate::error::AuditError;

/// Pre-discovery interaction pass.
///
/// Clicks expansion triggers, hovers menus, walks the keyboard, and scrolls
/// the full page so lazily-rendered content exists in the DOM before the
/// structural scan runs. Everything here is best effort: a widget that
/// refuses to expand must never abort discovery, so per-element failures
/// are swallowed.
pub fn run_deep_scan(
    driver: &mut dyn PageDriver,
    timing: &DiscoveryTiming,
) -> Result<(), AuditError> {
    scroll_to_bottom(driver, timing)?;
    expand_toggles(driver, timing);
    hover_menus(driver, timing);
    keyboard_walk(driver, timing);
    fractional_scroll(driver, timing)?;
    Ok(())
}

/// Scroll in steps until the document height stops growing, triggering
/// infinite-scroll and lazy-load content. Capped to avoid endless feeds.
pub fn scroll_to_bottom(
    driver: &mut dyn PageDriver,
    timing: &DiscoveryTiming,
) -> Result<(), AuditError> {
    let mut last_height = driver.scroll_height()?;
    for _ in 0..10 {
        driver.scroll_to(last_height)?;
        thread::sleep(timing.scroll_pause);
        let height = driver.scroll_height()?;
        if height == last_height {
            break;
        }
        last_height = height;
    }
    driver.scroll_to(0)?;
    thread::sleep(timing.scroll_pause);
    Ok(())
}

fn expand_toggles(driver: &mut dyn PageDriver, timing: &DiscoveryTiming) {
    // Widgets matched by several selectors get clicked once, keyed on
    // whichever of id, class, or text identifies them.
    let mut clicked: HashSet<String> = HashSet::new();

    for selector in DEEP_SCAN_SELECTORS {
        let matches = driver.find_by_css(selector).unwrap_or_default();
        for handle in matches {
            if !driver.is_displayed(&handle).unwrap_or(false) {
                continue;
            }
            let key = widget_key(driver, &handle);
            if !key.is_empty() && !clicked.insert(key) {
                continue;
            }
            let _ = driver.scroll_into_view(&handle);
            let _ = driver.hover(&handle);
            let _ = driver.pointer_click(&handle);
            thread::sleep(timing.interaction_pause);
        }
    }
}

fn widget_key(driver: &mut dyn PageDriver, handle: &ElementHandle) -> String {
    let id = driver.attribute(handle, "id").ok().flatten().unwrap_or_default();
    if !id.is_empty() {
        return format!("id:{}", id);
    }
    let class = driver
        .attribute(handle, "class")
        .ok()
        .flatten()
        .unwrap_or_default();
    let text: String = driver
        .text(handle)
        .unwrap_or_default()
        .chars()
        .take(30)
        .collect();
    format!("cls:{}|txt:{}", class, text)
}

fn hover_menus(driver: &mut dyn PageDriver, timing: &DiscoveryTiming) {
    for selector in HOVER_SELECTORS {
        let matches = driver.find_by_css(selector).unwrap_or_default();
        for handle in matches.into_iter().take(10) {
            if !driver.is_displayed(&handle).unwrap_or(false) {
                continue;
            }
            let _ = driver.hover(&handle);
            thread::sleep(timing.interaction_pause);
        }
    }
}

/// Tab focus around the page and fire the activation keys, surfacing
/// keyboard-only widgets.
fn keyboard_walk(driver: &mut dyn PageDriver, timing: &DiscoveryTiming) {
    let sequence = [
        Key::Tab,
        Key::Tab,
        Key::Enter,
        Key::Space,
        Key::ArrowDown,
        Key::ArrowRight,
    ];
    for key in sequence {
        let _ = driver.send_key(key);
        thread::sleep(timing.interaction_pause);
    }
}

/// Park the viewport at quarter intervals of the document so position-based
/// lazy loaders fire at every depth.
fn fractional_scroll(
    driver: &mut dyn PageDriver,
    timing: &DiscoveryTiming,
) -> Result<(), AuditError> {
    let height = driver.scroll_height()?;
    for quarter in 0..=4u64 {
        driver.scroll_to(height * quarter / 4)?;
        thread::sleep(timing.scroll_pause);
    }
    driver.scroll_to(0)?;
    Ok(())
}
