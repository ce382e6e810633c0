use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

// ============================================================================
// Element handles and supporting value types
// ============================================================================

/// Opaque reference to a DOM node held by the driver.
///
/// Handles are only valid within the session (and frame context) that
/// produced them. Descriptors never store handles; the verifier re-locates
/// elements fresh before every click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// One entry in an element's ancestor chain, from the element itself up to
/// (not including) the document root. Used for region and carousel checks
/// without extra driver round trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AncestorInfo {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub class_names: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: String,
}

/// Keys the deep interaction scan sends to the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Space,
    ArrowDown,
    ArrowRight,
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::Tab => "Tab",
            Key::Enter => "Enter",
            Key::Space => "Space",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowRight => "ArrowRight",
        }
    }
}

/// Failure modes for a pointer click, kept separate from `AuditError` so the
/// verifier can distinguish an intercepted click (recoverable via script
/// click) from any other failure.
#[derive(Debug)]
pub enum ClickError {
    /// Another element intercepted the pointer event (overlay, sticky bar)
    Intercepted(String),
    /// Any other click failure
    Failed(String),
}

impl std::fmt::Display for ClickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClickError::Intercepted(msg) => write!(f, "click intercepted: {}", msg),
            ClickError::Failed(msg) => write!(f, "click failed: {}", msg),
        }
    }
}

// ============================================================================
// Session configuration
// ============================================================================

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Launch configuration for one isolated browser session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Path to the Node.js browser server script
    pub server_script: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_width: 1920,
            window_height: 1080,
            server_script: PathBuf::from("node/browser_server.js"),
        }
    }
}

// ============================================================================
// PageDriver: the consumed browser capability
// ============================================================================

/// The browser automation capability the pipeline consumes.
///
/// The production implementation is `BrowserSession` (a long-lived Node.js
/// subprocess speaking NDJSON). Tests substitute a scriptable fake so
/// discovery, verification, and orchestration stay deterministic.
pub trait PageDriver: Send {
    // --- page-level state ---
    fn navigate(&mut self, url: &str) -> Result<(), AuditError>;
    fn current_url(&mut self) -> Result<String, AuditError>;
    fn title(&mut self) -> Result<String, AuditError>;
    fn body_html(&mut self) -> Result<String, AuditError>;

    // --- queries ---
    fn find_by_css(&mut self, selector: &str) -> Result<Vec<ElementHandle>, AuditError>;
    fn find_by_xpath(&mut self, xpath: &str) -> Result<Vec<ElementHandle>, AuditError>;
    fn find_by_id(&mut self, id: &str) -> Result<Option<ElementHandle>, AuditError>;
    /// Query descendants of `root` by CSS selector.
    fn query_within(
        &mut self,
        root: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError>;
    /// Query descendants of `root` by a relative XPath expression.
    fn query_within_xpath(
        &mut self,
        root: &ElementHandle,
        xpath: &str,
    ) -> Result<Vec<ElementHandle>, AuditError>;

    // --- per-element inspection ---
    fn tag_name(&mut self, el: &ElementHandle) -> Result<String, AuditError>;
    fn text(&mut self, el: &ElementHandle) -> Result<String, AuditError>;
    fn attribute(&mut self, el: &ElementHandle, name: &str)
        -> Result<Option<String>, AuditError>;
    fn computed_style(&mut self, el: &ElementHandle, prop: &str) -> Result<String, AuditError>;
    fn size(&mut self, el: &ElementHandle) -> Result<(u32, u32), AuditError>;
    fn is_displayed(&mut self, el: &ElementHandle) -> Result<bool, AuditError>;
    fn is_enabled(&mut self, el: &ElementHandle) -> Result<bool, AuditError>;
    fn xpath_of(&mut self, el: &ElementHandle) -> Result<String, AuditError>;
    fn css_path_of(&mut self, el: &ElementHandle) -> Result<String, AuditError>;
    fn ancestors(&mut self, el: &ElementHandle) -> Result<Vec<AncestorInfo>, AuditError>;

    // --- bulk heuristic scans (computed page-side in one pass) ---
    fn elements_with_pointer_cursor(&mut self) -> Result<Vec<ElementHandle>, AuditError>;
    fn elements_with_click_handlers(&mut self) -> Result<Vec<ElementHandle>, AuditError>;

    // --- shadow DOM ---
    fn shadow_hosts(&mut self) -> Result<Vec<ElementHandle>, AuditError>;
    fn query_shadow(
        &mut self,
        host: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError>;

    // --- iframes ---
    fn iframes(&mut self) -> Result<Vec<ElementHandle>, AuditError>;
    fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), AuditError>;
    fn exit_frame(&mut self) -> Result<(), AuditError>;

    // --- interaction ---
    fn scroll_to(&mut self, y: u64) -> Result<(), AuditError>;
    fn scroll_height(&mut self) -> Result<u64, AuditError>;
    fn scroll_into_view(&mut self, el: &ElementHandle) -> Result<(), AuditError>;
    fn hover(&mut self, el: &ElementHandle) -> Result<(), AuditError>;
    /// Simulated pointer click: move to element, pause, click.
    fn pointer_click(&mut self, el: &ElementHandle) -> Result<(), ClickError>;
    /// Script-invoked click, the fallback when the pointer click is intercepted.
    fn script_click(&mut self, el: &ElementHandle) -> Result<(), AuditError>;
    fn send_key(&mut self, key: Key) -> Result<(), AuditError>;

    // --- style overrides for hidden/carousel content ---
    /// Override display/visibility/opacity/position/transform up the
    /// ancestor chain so an off-screen element becomes interactable.
    fn force_visible(&mut self, el: &ElementHandle) -> Result<(), AuditError>;
    /// Restore the inline styles recorded by the last `force_visible` on `el`.
    fn restore_visibility(&mut self, el: &ElementHandle) -> Result<(), AuditError>;
    /// Stop autoplay timers and CSS animations inside a carousel container.
    fn pause_animations(&mut self, el: &ElementHandle) -> Result<(), AuditError>;

    fn quit(&mut self) -> Result<(), AuditError>;
}

/// Creates isolated sessions for the worker pool. Each created session must
/// have private profile storage so parallel workers never share cookies or
/// cache state.
pub trait SessionFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn PageDriver>, AuditError>;
}
