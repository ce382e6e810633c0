//! Fixed selector catalogues for the discovery strategies.
//!
//! These lists are deliberately broad: discovery prefers recall, and the
//! deduplication + clickability gate downstream handles the noise.

/// Structural scan catalogue: semantic tags, ARIA roles, framework class
/// conventions, and generic attribute markers.
pub const CLICKABLE_SELECTORS: &[&str] = &[
    "a",
    "button",
    "input[type=\"button\"]",
    "input[type=\"submit\"]",
    "input[type=\"reset\"]",
    "[onclick]",
    "[onmousedown]",
    "[onmouseup]",
    "[ondblclick]",
    ".btn",
    ".button",
    ".link",
    ".clickable",
    ".click",
    "[role=\"button\"]",
    "[role=\"link\"]",
    "[role=\"tab\"]",
    "[role=\"menuitem\"]",
    "[role=\"option\"]",
    "[role=\"treeitem\"]",
    "[role=\"gridcell\"]",
    "[tabindex=\"0\"]",
    "div[tabindex]",
    "span[tabindex]",
    "li[tabindex]",
    ".cta",
    ".call-to-action",
    ".action",
    ".trigger",
    ".menu-item",
    ".nav-item",
    ".tab",
    ".accordion__toggle",
    ".dropdown",
    ".select",
    ".picker",
    ".toggle",
    ".card",
    ".tile",
    ".item",
    ".option",
    ".variant-tabs__variant-list__item",
    ".close",
    ".cancel",
    ".submit",
    ".save",
    ".edit",
    ".delete",
    ".expand",
    ".collapse",
    ".play",
    ".pause",
    ".next",
    ".prev",
    ".previous",
    ".like",
    ".share",
    ".favorite",
    ".bookmark",
    ".download",
    ".upload",
    ".search",
    ".filter",
    ".sort",
    "[data-action]",
    "[data-click]",
    "[data-href]",
    "[data-url]",
    "[data-toggle]",
    "[data-target]",
    "[data-dismiss]",
    "[data-testid*=\"button\"]",
    "[data-testid*=\"link\"]",
    "select",
    "input[type=\"checkbox\"]",
    "input[type=\"radio\"]",
    "input[type=\"file\"]",
    "input[type=\"image\"]",
    "[class*=\"btn\"]",
    "[class*=\"button\"]",
    "[class*=\"cta\"]",
    "video[controls]",
    "audio[controls]",
    "li[onclick]",
    "td[onclick]",
    "tr[onclick]",
    "svg[onclick]",
    "svg[role=\"button\"]",
    "div[role=\"button\"]",
    "span[role=\"button\"]",
    "p[role=\"button\"]",
    "section[role=\"button\"]",
];

/// Reduced generic catalogue used by the shadow-root scan and the
/// DOM-wide fallback scan.
pub const GENERIC_CLICKABLE_SELECTORS: &[&str] = &[
    "a",
    "button",
    "[onclick]",
    "[role=\"button\"]",
    "[tabindex]",
    "input[type=\"button\"]",
    "input[type=\"submit\"]",
    "input[type=\"reset\"]",
    "[data-action]",
    "[data-click]",
    "[data-href]",
    "[data-url]",
];

/// Case-insensitive substrings identifying header/nav/footer regions in
/// class or id attributes, the element's own or any ancestor's.
pub const HEADER_FOOTER_KEYWORDS: &[&str] = &[
    "header",
    "nav",
    "navigation",
    "navbar",
    "nav-bar",
    "footer",
    "site-header",
    "site-footer",
    "page-header",
    "page-footer",
    "main-header",
    "main-footer",
    "top-nav",
    "bottom-nav",
    "primary-nav",
    "secondary-nav",
    "breadcrumb",
];

/// ARIA landmark roles equivalent to header/nav/footer.
pub const LANDMARK_ROLES: &[&str] = &["banner", "navigation", "contentinfo"];

/// Candidate selectors for a page's primary content container, tried in
/// order; the first displayed match scopes the structural scan.
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    "#main",
    "#content",
    "#main-content",
    ".main-content",
    ".content",
    ".page-content",
    ".site-content",
];

/// Carousel container selectors across the common slider frameworks.
pub const CAROUSEL_SELECTORS: &[&str] = &[
    ".carousel",
    ".slider",
    ".banner-slider",
    ".swiper",
    ".slick",
    "[data-ride=\"carousel\"]",
    ".owl-carousel",
    ".hero-banner",
    ".banner-container",
    ".slideshow",
    ".image-slider",
    ".swiper-container",
    ".glide",
    ".splide",
    ".flickity",
    ".keen-slider",
    ".embla",
    ".tiny-slider",
    "[data-carousel]",
    "[data-slider]",
    "[data-swiper]",
    ".carousel-container",
    ".slider-wrapper",
    ".hero-slider",
    ".product-slider",
    ".testimonial-slider",
    ".gallery-slider",
    ".banner-carousel",
];

/// Class-name keywords marking an element as living inside a carousel,
/// matched against the ancestor chain.
pub const CAROUSEL_ANCESTOR_KEYWORDS: &[&str] = &[
    "carousel",
    "slider",
    "banner-slider",
    "swiper",
    "slick",
    "owl-carousel",
    "hero-banner",
    "banner-container",
    "slideshow",
];

/// Carousel container that wraps repeated review snippets; always excluded.
pub const REVIEWS_CAROUSEL_CLASS: &str = "reviews-carousel-banner";

/// Slide container selectors, tried in priority order inside a carousel.
pub const SLIDE_SELECTORS: &[&str] = &[
    ".carousel-item",
    ".slide",
    ".slider-item",
    ".swiper-slide",
    ".slick-slide",
    ".banner-slide",
    ".owl-item",
    "[data-slide]",
    ".glide__slide",
    ".splide__slide",
    ".flickity-cell",
    ".keen-slider__slide",
    ".embla__slide",
    ".tns-item",
    ".carousel-cell",
    ".slide-item",
    "[data-slide-index]",
];

/// Wrapper containers to look inside when no direct slide selector matched.
pub const SLIDE_WRAPPER_SELECTORS: &[&str] = &[
    ".swiper-wrapper",
    ".slider-wrapper",
    ".carousel-inner",
    ".slides",
];

/// Clickable selectors inside a slide.
pub const SLIDE_CLICKABLE_SELECTORS: &[&str] = &[
    "a",
    "button",
    "[onclick]",
    "[role=\"button\"]",
    "input[type=\"button\"]",
    "input[type=\"submit\"]",
    ".btn",
    ".button",
    ".link",
    ".cta",
    ".call-to-action",
    "[data-action]",
    "[data-click]",
    "[data-href]",
    ".carousel-control",
    ".slider-nav",
    ".prev",
    ".next",
    ".slide-btn",
    ".carousel-btn",
];

/// Upper-cased action phrases matched (case-insensitively) against slide
/// text to catch call-to-action elements missed by the selectors.
pub const ACTION_WORDS: &[&str] = &[
    "WATCH VIDEO",
    "PLAY",
    "SUBMIT",
    "APPLY",
    "START",
    "LEARN MORE",
    "READ MORE",
    "VIEW",
    "SEE MORE",
    "CLICK HERE",
    "DOWNLOAD",
    "UPLOAD",
    "NEXT",
    "PREV",
    "PREVIOUS",
];

/// Expansion triggers the deep interaction scan clicks before the
/// structural scan: accordions, tabs, dropdown toggles, "show more".
pub const DEEP_SCAN_SELECTORS: &[&str] = &[
    ".accordion__toggle",
    ".tab",
    ".menu-item",
    ".nav-item",
    ".expand",
    ".collapse",
    "[aria-expanded=\"false\"]",
    "[aria-controls]",
    "[data-toggle]",
    "[data-target]",
    ".dropdown-toggle",
    ".dropdown",
    ".accordion-trigger",
    ".show-more",
    ".see-more",
    ".expander",
    ".tab-link",
    ".sidebar-toggle",
    ".hamburger",
    ".faq",
    ".faq-question",
    ".faq-toggle",
    ".read-more",
    "[role=\"tab\"]",
    "[data-accordion]",
    "[data-faq]",
    "[data-expand]",
];

/// Hover targets that reveal menus or popups.
pub const HOVER_SELECTORS: &[&str] = &[
    ".menu-item",
    ".dropdown",
    "[aria-haspopup=\"true\"]",
    "[data-hover]",
];

/// Modal/overlay artifacts checked after a click.
pub const MODAL_SELECTORS: &str =
    ".modal, .popup, .overlay, .dialog, [role=\"dialog\"], [role=\"alertdialog\"]";

/// Expanded dropdown/menu artifacts checked after a click.
pub const DROPDOWN_SELECTORS: &str = ".dropdown-menu, .menu-open, [aria-expanded=\"true\"]";

/// Class keywords suggesting a div "looks like" a slide.
pub const SLIDE_CLASS_KEYWORDS: &[&str] = &["slide", "item", "cell", "panel", "tab"];
