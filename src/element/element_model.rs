use serde::{Deserialize, Serialize};

use crate::element::fingerprint::Fingerprint;

/// Which discovery strategy produced a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Selector,
    PointerCursor,
    EventListener,
    Carousel,
    ShadowDom,
    Iframe,
    DeepScan,
    Fallback,
}

/// Rendered size of an element at discovery time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSize {
    pub width: u32,
    pub height: u32,
}

/// Captured attributes of one discovered clickable candidate.
///
/// Created once during a page scan and immutable afterwards. Never holds a
/// live driver handle; the node may be gone or recreated by the time the
/// verifier runs, which is why the locator fields (xpath, css_selector, id,
/// text, classes) exist: they feed the re-location fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag_name: String,
    /// Visible text, truncated to 100 chars
    pub text: String,
    pub class_names: String,
    pub id: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub onclick: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub aria_label: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub data_testid: String,
    #[serde(default)]
    pub tabindex: Option<String>,
    #[serde(default)]
    pub cursor: String,
    pub xpath: String,
    pub css_selector: String,
    #[serde(default)]
    pub size: ElementSize,
    pub is_displayed: bool,
    pub is_enabled: bool,
    #[serde(default)]
    pub is_carousel_element: bool,
    #[serde(default)]
    pub detection_method: Option<DetectionMethod>,
    /// Redirect chain status codes from the HEAD probe of `href`, if probed
    #[serde(default)]
    pub status_code: Option<Vec<u16>>,
    pub fingerprint: Fingerprint,
}

impl ElementDescriptor {
    /// Whether the captured attributes mark this element as genuinely
    /// interactive: semantic tag, inline handler, button role, a usable
    /// tabindex, or a pointer cursor.
    pub fn is_clickable(&self) -> bool {
        matches!(self.tag_name.as_str(), "a" | "button" | "input" | "select")
            || !self.onclick.is_empty()
            || self.role == "button"
            || self
                .tabindex
                .as_deref()
                .is_some_and(|t| !t.is_empty() && t != "-1")
            || self.cursor == "pointer"
    }
}
