use crate::browser::driver::{AncestorInfo, ElementHandle, PageDriver};
use crate::discovery::selectors::{
    CAROUSEL_ANCESTOR_KEYWORDS, HEADER_FOOTER_KEYWORDS, LANDMARK_ROLES, MAIN_CONTENT_SELECTORS,
    REVIEWS_CAROUSEL_CLASS,
};
use crate::error::AuditError;

/// Page region checks over a captured ancestor chain.
///
/// The chain is fetched once per candidate (element first, root-most last)
/// and every check here is a pure function over it, so region logic costs no
/// extra driver round trips and is trivially testable.

fn entry_matches_header_footer(entry: &AncestorInfo) -> bool {
    if matches!(entry.tag.as_str(), "header" | "nav" | "footer") {
        return true;
    }
    if LANDMARK_ROLES.contains(&entry.role.as_str()) {
        return true;
    }
    let haystack = format!("{} {}", entry.class_names, entry.id).to_lowercase();
    HEADER_FOOTER_KEYWORDS
        .iter()
        .any(|kw| haystack.contains(kw))
}

/// Whether the element (chain head) or any ancestor belongs to a
/// header, navigation, or footer region.
pub fn is_header_footer(chain: &[AncestorInfo]) -> bool {
    chain.iter().any(entry_matches_header_footer)
}

/// Whether any ancestor carries a carousel framework class.
pub fn in_carousel(chain: &[AncestorInfo]) -> bool {
    chain.iter().any(|entry| {
        let classes = entry.class_names.to_lowercase();
        CAROUSEL_ANCESTOR_KEYWORDS
            .iter()
            .any(|kw| classes.contains(kw))
    })
}

/// Whether any ancestor is the excluded reviews carousel container.
pub fn in_reviews_carousel(chain: &[AncestorInfo]) -> bool {
    chain
        .iter()
        .any(|entry| entry.class_names.contains(REVIEWS_CAROUSEL_CLASS))
}

/// Find the page's primary content container: first displayed match of the
/// candidate selectors, in order. `None` means the scan runs document-wide.
pub fn main_content_area(
    driver: &mut dyn PageDriver,
) -> Result<Option<ElementHandle>, AuditError> {
    for selector in MAIN_CONTENT_SELECTORS {
        let matches = match driver.find_by_css(selector) {
            Ok(m) => m,
            Err(_) => continue,
        };
        for handle in matches {
            if driver.is_displayed(&handle).unwrap_or(false) {
                return Ok(Some(handle));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: &str, classes: &str, id: &str, role: &str) -> AncestorInfo {
        AncestorInfo {
            tag: tag.into(),
            class_names: classes.into(),
            id: id.into(),
            role: role.into(),
        }
    }

    #[test]
    fn header_detection_by_tag_role_and_keyword() {
        assert!(is_header_footer(&[entry("header", "", "", "")]));
        assert!(is_header_footer(&[entry("div", "", "", "banner")]));
        assert!(is_header_footer(&[
            entry("a", "", "", ""),
            entry("div", "site-footer", "", ""),
        ]));
        assert!(is_header_footer(&[entry("div", "", "main-NAV", "")]));
        assert!(!is_header_footer(&[entry("div", "hero", "content", "")]));
    }

    #[test]
    fn carousel_detection_walks_ancestors() {
        assert!(in_carousel(&[
            entry("a", "cta", "", ""),
            entry("div", "swiper-slide", "", ""),
            entry("div", "Swiper-Container", "", ""),
        ]));
        assert!(!in_carousel(&[entry("a", "cta", "", "")]));
    }

    #[test]
    fn reviews_carousel_is_matched_exactly() {
        assert!(in_reviews_carousel(&[entry(
            "div",
            "reviews-carousel-banner",
            "",
            ""
        )]));
        assert!(!in_reviews_carousel(&[entry("div", "carousel", "", "")]));
    }
}
