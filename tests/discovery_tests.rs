use std::time::Duration;

use click_audit::browser::driver::SessionFactory;
use click_audit::discovery::engine::{DiscoveryConfig, DiscoveryEngine, DiscoveryTiming};
use click_audit::element::element_model::DetectionMethod;

use crate::common::fake_driver::{ClickEffect, FakeElement, FakeFactory, FakePage};

mod common;

// ============================================================================
// Helpers
// ============================================================================

const URL: &str = "https://example.com/";

fn engine() -> DiscoveryEngine {
    DiscoveryEngine::new(DiscoveryConfig {
        wait_time: Duration::ZERO,
        deep_scan: false,
        timing: DiscoveryTiming::none(),
        ..DiscoveryConfig::default()
    })
}

fn discover(page: FakePage) -> Vec<click_audit::element::element_model::ElementDescriptor> {
    let factory = FakeFactory::new(page);
    let mut session = factory.create().expect("create session");
    let result = engine()
        .discover(session.as_mut(), URL)
        .expect("discovery must not abort");
    result.elements
}

// ============================================================================
// 1. Structural selector scan
// ============================================================================

#[test]
fn selector_scan_finds_links_and_buttons() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("About us")
            .classes("nav-link")
            .href("/about")
            .xpath("/html/body/main/a[1]"),
    );
    page.add(
        FakeElement::new("button")
            .text("Subscribe")
            .classes("btn")
            .xpath("/html/body/main/button[1]"),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 2);
    let tags: Vec<&str> = elements.iter().map(|e| e.tag_name.as_str()).collect();
    assert!(tags.contains(&"a"));
    assert!(tags.contains(&"button"));
    assert!(elements
        .iter()
        .all(|e| e.detection_method == Some(DetectionMethod::Selector)));
}

#[test]
fn header_and_footer_links_are_excluded() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("Products")
            .href("/products")
            .xpath("/html/body/main/a[1]"),
    );
    page.add(
        FakeElement::new("a")
            .text("Home")
            .href("/")
            .xpath("/html/body/header/nav/a[1]")
            .ancestor("nav", "", "", "")
            .ancestor("header", "site-header", "", ""),
    );
    page.add(
        FakeElement::new("a")
            .text("Imprint")
            .href("/imprint")
            .xpath("/html/body/div[9]/a[1]")
            .ancestor("div", "page-footer", "", ""),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 1, "navigation chrome must be excluded");
    assert_eq!(elements[0].text, "Products");
}

#[test]
fn plain_div_without_interactive_markers_is_rejected() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("div")
            .text("Just a box")
            .classes("card")
            .xpath("/html/body/div[1]"),
    );

    let elements = discover(page);
    assert!(
        elements.is_empty(),
        "a .card div with no handler, role, or pointer cursor is not clickable"
    );
}

#[test]
fn hidden_and_disabled_candidates_are_filtered_by_default() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("Invisible promo")
            .href("/promo")
            .hidden()
            .xpath("/html/body/main/a[1]"),
    );
    page.add(
        FakeElement::new("button")
            .text("Sold out")
            .disabled()
            .xpath("/html/body/main/button[1]"),
    );
    page.add(
        FakeElement::new("a")
            .text("Contact")
            .href("/contact")
            .xpath("/html/body/main/a[2]"),
    );

    let elements = discover(page);
    assert_eq!(
        elements.len(),
        1,
        "hidden and disabled candidates must not pass the default gate"
    );
    assert_eq!(elements[0].text, "Contact");
}

// ============================================================================
// 2. Pointer cursor heuristic
// ============================================================================

#[test]
fn pointer_cursor_divs_are_found_but_images_are_not() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("div")
            .text("Open menu")
            .classes("menu-trigger-area")
            .cursor("pointer")
            .xpath("/html/body/div[1]"),
    );
    page.add(
        FakeElement::new("img")
            .classes("zoomable-photo")
            .cursor("pointer")
            .xpath("/html/body/img[1]"),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].tag_name, "div");
    assert_eq!(
        elements[0].detection_method,
        Some(DetectionMethod::PointerCursor)
    );
}

// ============================================================================
// 3. Carousels
// ============================================================================

#[test]
fn hidden_carousel_slide_content_is_captured_and_flagged() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("div")
            .classes("swiper")
            .xpath("/html/body/div[1]"),
    );
    page.add(
        FakeElement::new("div")
            .classes("swiper-slide")
            .xpath("/html/body/div[1]/div[1]"),
    );
    page.add(
        FakeElement::new("a")
            .text("Watch video")
            .classes("cta")
            .href("/video")
            .hidden()
            .xpath("/html/body/div[1]/div[1]/a[1]")
            .ancestor("div", "swiper-slide", "", "")
            .ancestor("div", "swiper", "", ""),
    );

    let elements = discover(page);
    let slide_link = elements
        .iter()
        .find(|e| e.text == "Watch video")
        .expect("hidden slide link must be discovered");
    assert!(slide_link.is_carousel_element);
    assert!(slide_link.is_displayed, "captured as interactable");
    assert_eq!(slide_link.detection_method, Some(DetectionMethod::Carousel));
}

#[test]
fn carousel_contained_elements_are_left_to_the_carousel_walk() {
    // A link under a carousel-framework ancestor must not be captured by
    // the structural scan, even when it is currently visible.
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("Slide CTA")
            .href("/slide")
            .xpath("/html/body/section/div[1]/a[1]")
            .ancestor("div", "swiper-wrapper", "", ""),
    );
    page.add(
        FakeElement::new("a")
            .text("Contact")
            .href("/contact")
            .xpath("/html/body/main/a[1]"),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Contact");
}

#[test]
fn reviews_carousel_content_is_excluded() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("div")
            .classes("carousel reviews-carousel-banner")
            .xpath("/html/body/div[1]")
            .ancestor("div", "carousel reviews-carousel-banner", "", ""),
    );
    page.add(
        FakeElement::new("a")
            .text("Review source")
            .href("/review")
            .xpath("/html/body/div[1]/a[1]")
            .ancestor("div", "carousel reviews-carousel-banner", "", ""),
    );
    page.add(
        FakeElement::new("a")
            .text("Contact")
            .href("/contact")
            .xpath("/html/body/main/a[1]"),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 1, "reviews carousel content is never tested");
    assert_eq!(elements[0].text, "Contact");
}

// ============================================================================
// 4. Iframes and shadow DOM
// ============================================================================

#[test]
fn iframe_content_is_scanned() {
    let mut page = FakePage::new(URL, "Home");
    let frame = page.add(
        FakeElement::new("iframe")
            .iframe()
            .xpath("/html/body/iframe[1]"),
    );
    page.add(
        FakeElement::new("a")
            .text("Embedded link")
            .href("https://embed.example.com/go")
            .xpath("/html/body/a[1]")
            .in_frame(frame),
    );

    let elements = discover(page);
    let embedded = elements
        .iter()
        .find(|e| e.text == "Embedded link")
        .expect("iframe link must be discovered");
    assert_eq!(embedded.detection_method, Some(DetectionMethod::Iframe));
}

#[test]
fn iframe_documents_get_the_full_strategy_treatment() {
    // The frame document holds a pointer-cursor div (no structural marker)
    // and a link inside the frame's own header. The first needs the
    // pointer-cursor heuristic to run inside the frame; the second checks
    // that region exclusions apply there too.
    let mut page = FakePage::new(URL, "Home");
    let frame = page.add(
        FakeElement::new("iframe")
            .iframe()
            .xpath("/html/body/iframe[1]"),
    );
    page.add(
        FakeElement::new("div")
            .text("Open chat")
            .classes("chat-launcher")
            .cursor("pointer")
            .xpath("/html/body/div[1]")
            .in_frame(frame),
    );
    page.add(
        FakeElement::new("a")
            .text("Frame nav")
            .href("/frame-nav")
            .xpath("/html/body/header/a[1]")
            .ancestor("header", "", "", "")
            .in_frame(frame),
    );

    let elements = discover(page);
    let launcher = elements
        .iter()
        .find(|e| e.text == "Open chat")
        .expect("pointer-cursor div inside the frame must be discovered");
    assert_eq!(launcher.detection_method, Some(DetectionMethod::Iframe));
    assert!(
        !elements.iter().any(|e| e.text == "Frame nav"),
        "frame-local navigation chrome must be excluded"
    );
}

#[test]
fn carousel_inside_an_iframe_is_walked() {
    let mut page = FakePage::new(URL, "Home");
    let frame = page.add(
        FakeElement::new("iframe")
            .iframe()
            .xpath("/html/body/iframe[1]"),
    );
    page.add(
        FakeElement::new("div")
            .classes("swiper")
            .xpath("/html/body/div[1]")
            .in_frame(frame),
    );
    page.add(
        FakeElement::new("div")
            .classes("swiper-slide")
            .xpath("/html/body/div[1]/div[1]")
            .in_frame(frame),
    );
    page.add(
        FakeElement::new("a")
            .text("Framed promo")
            .href("/promo")
            .hidden()
            .xpath("/html/body/div[1]/div[1]/a[1]")
            .ancestor("div", "swiper-slide", "", "")
            .ancestor("div", "swiper", "", "")
            .in_frame(frame),
    );

    let elements = discover(page);
    let promo = elements
        .iter()
        .find(|e| e.text == "Framed promo")
        .expect("carousel content inside a frame must be discovered");
    assert!(promo.is_carousel_element);
    assert_eq!(promo.detection_method, Some(DetectionMethod::Carousel));
}

#[test]
fn shadow_root_content_is_scanned() {
    let mut page = FakePage::new(URL, "Home");
    let host = page.add(
        FakeElement::new("div")
            .shadow_host_marker()
            .xpath("/html/body/div[1]"),
    );
    page.add(
        FakeElement::new("button")
            .text("Shadow action")
            .xpath("/html/body/div[1]/button[1]")
            .in_shadow(host),
    );

    let elements = discover(page);
    let shadow_button = elements
        .iter()
        .find(|e| e.text == "Shadow action")
        .expect("shadow button must be discovered");
    assert_eq!(
        shadow_button.detection_method,
        Some(DetectionMethod::ShadowDom)
    );
}

// ============================================================================
// 5. Fallback scan
// ============================================================================

#[test]
fn fallback_scan_ignores_region_exclusions_when_nothing_else_matched() {
    // The only clickable on the page sits in the header: the regular scan
    // excludes it, so the fallback pass must pick it up instead.
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("Only link")
            .href("/only")
            .xpath("/html/body/header/a[1]")
            .ancestor("header", "", "", ""),
    );

    let elements = discover(page);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].detection_method, Some(DetectionMethod::Fallback));
}

// ============================================================================
// 6. Cross-strategy deduplication
// ============================================================================

#[test]
fn element_found_by_multiple_strategies_appears_once() {
    let mut page = FakePage::new(URL, "Home");
    page.add(
        FakeElement::new("a")
            .text("Buy now")
            .classes("btn")
            .href("/buy")
            .cursor("pointer")
            .click_handler()
            .effect(ClickEffect::Navigate("https://example.com/buy".into()))
            .xpath("/html/body/main/a[1]"),
    );

    let elements = discover(page);
    assert_eq!(
        elements.len(),
        1,
        "selector, pointer-cursor, and listener scans all see it; one survives"
    );
}
