use crate::browser::driver::{ElementHandle, PageDriver};
use crate::discovery::extract::Extractor;
use crate::discovery::regions::{in_reviews_carousel, is_header_footer};
use crate::discovery::selectors::{
    ACTION_WORDS, CAROUSEL_SELECTORS, SLIDE_CLASS_KEYWORDS, SLIDE_CLICKABLE_SELECTORS,
    SLIDE_SELECTORS, SLIDE_WRAPPER_SELECTORS,
};
use crate::element::element_model::{DetectionMethod, ElementDescriptor};
use crate::error::AuditError;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Scan every carousel on the page, inactive slides included.
///
/// Carousels rotate content in and out of visibility, so a plain scan only
/// sees the active slide. This walks every slide container, forces its
/// content visible, and captures the clickables inside before restoring the
/// original styles. Animations are paused first so the slide set stays
/// stable during the walk.
pub fn scan_carousels(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    scope: Option<&ElementHandle>,
) -> Result<Vec<ElementDescriptor>, AuditError> {
    let mut found = Vec::new();

    for selector in CAROUSEL_SELECTORS {
        let containers = match scope {
            Some(root) => driver.query_within(root, selector),
            None => driver.find_by_css(selector),
        };
        let containers = match containers {
            Ok(c) => c,
            Err(_) => continue,
        };

        for container in containers {
            if !driver.is_displayed(&container).unwrap_or(false) {
                continue;
            }
            let chain = driver.ancestors(&container).unwrap_or_default();
            if is_header_footer(&chain) || in_reviews_carousel(&chain) {
                continue;
            }
            let _ = driver.pause_animations(&container);
            scan_one_carousel(driver, extractor, &container, &mut found)?;
        }
    }

    Ok(found)
}

fn scan_one_carousel(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    container: &ElementHandle,
    found: &mut Vec<ElementDescriptor>,
) -> Result<(), AuditError> {
    let slides = enumerate_slides(driver, container)?;

    if slides.is_empty() {
        // No recognizable slide structure, capture the container's own
        // clickables directly.
        extract_slide_clickables(driver, extractor, container, found)?;
        return Ok(());
    }

    for slide in slides {
        driver.force_visible(&slide)?;
        let result = extract_slide_clickables(driver, extractor, &slide, found);
        let _ = driver.restore_visibility(&slide);
        result?;
    }
    Ok(())
}

/// Resolve a carousel's slide containers.
///
/// Three tiers: known slide selectors (first selector that matches wins),
/// then the framework wrapper containers, then a structural guess over the
/// container's direct children.
fn enumerate_slides(
    driver: &mut dyn PageDriver,
    container: &ElementHandle,
) -> Result<Vec<ElementHandle>, AuditError> {
    for selector in SLIDE_SELECTORS {
        if let Ok(slides) = driver.query_within(container, selector) {
            if !slides.is_empty() {
                return Ok(slides);
            }
        }
    }

    for wrapper_selector in SLIDE_WRAPPER_SELECTORS {
        if let Ok(wrappers) = driver.query_within(container, wrapper_selector) {
            for wrapper in wrappers {
                let children = driver
                    .query_within(&wrapper, ":scope > *")
                    .unwrap_or_default();
                if !children.is_empty() {
                    return Ok(children);
                }
            }
        }
    }

    let candidates = driver
        .query_within(container, ":scope > div, :scope > section, :scope > article, :scope > li")
        .unwrap_or_default();
    let mut slides = Vec::new();
    for candidate in candidates {
        if looks_like_slide(driver, &candidate) {
            slides.push(candidate);
        }
    }
    Ok(slides)
}

/// Heuristic for unlabelled slide containers: meaningful content inside, or
/// slide-like layout styles, or a slide-ish class keyword.
fn looks_like_slide(driver: &mut dyn PageDriver, el: &ElementHandle) -> bool {
    if let Ok(content) = driver.query_within(el, "img, a, button") {
        if !content.is_empty() {
            return true;
        }
    }
    if driver.text(el).map(|t| t.trim().len() > 20).unwrap_or(false) {
        return true;
    }

    let position = driver.computed_style(el, "position").unwrap_or_default();
    let float = driver.computed_style(el, "float").unwrap_or_default();
    let display = driver.computed_style(el, "display").unwrap_or_default();
    if position == "absolute" || float == "left" || display == "inline-block" {
        return true;
    }

    let classes = driver
        .attribute(el, "class")
        .ok()
        .flatten()
        .unwrap_or_default()
        .to_lowercase();
    SLIDE_CLASS_KEYWORDS.iter().any(|kw| classes.contains(kw))
}

fn extract_slide_clickables(
    driver: &mut dyn PageDriver,
    extractor: &mut Extractor,
    slide: &ElementHandle,
    found: &mut Vec<ElementDescriptor>,
) -> Result<(), AuditError> {
    for selector in SLIDE_CLICKABLE_SELECTORS {
        let matches = driver.query_within(slide, selector).unwrap_or_default();
        for handle in matches {
            if let Some(descriptor) =
                extractor.extract_hidden(driver, &handle, DetectionMethod::Carousel)?
            {
                found.push(descriptor);
            }
        }
    }

    // Call-to-action text that carries no clickable markup at all.
    for word in ACTION_WORDS {
        let xpath = format!(
            ".//*[contains(translate(text(), '{}', '{}'), '{}')]",
            LOWER, UPPER, word
        );
        let matches = driver.query_within_xpath(slide, &xpath).unwrap_or_default();
        for handle in matches {
            if let Some(descriptor) =
                extractor.extract_hidden(driver, &handle, DetectionMethod::Carousel)?
            {
                found.push(descriptor);
            }
        }
    }
    Ok(())
}
