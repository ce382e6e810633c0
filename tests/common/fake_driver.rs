//! Scriptable in-memory PageDriver for deterministic pipeline tests.
//!
//! A `FakePage` describes the elements a page holds and what each click
//! does; `FakeFactory` stamps out independent driver instances from it the
//! way the subprocess factory stamps out browser sessions. Click counts are
//! shared through the factory so tests can assert how often an element was
//! actually clicked across all sessions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use click_audit::browser::driver::{
    AncestorInfo, ClickError, ElementHandle, Key, PageDriver, SessionFactory,
};
use click_audit::error::AuditError;

/// Synthetic handle representing an open modal overlay.
const MODAL_HANDLE: u64 = u64::MAX;

// ============================================================================
// Page description
// ============================================================================

/// What happens when an element is clicked.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClickEffect {
    #[default]
    None,
    Navigate(String),
    SetTitle(String),
    MutateDom,
    InsertModal,
    /// Pointer click is intercepted and the script fallback fails too
    InterceptedScriptFails,
    /// Pointer click is intercepted but the script fallback navigates
    InterceptedScriptNavigates(String),
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub tag: String,
    pub text: String,
    pub classes: String,
    pub dom_id: String,
    pub attrs: HashMap<String, String>,
    pub cursor: String,
    pub size: (u32, u32),
    pub displayed: bool,
    pub enabled: bool,
    pub xpath: String,
    pub css_path: String,
    pub ancestors: Vec<AncestorInfo>,
    /// Selector or xpath strings this element answers to beyond the
    /// derived tag/#id/.class matches
    pub extra_selectors: Vec<String>,
    pub effect: ClickEffect,
    pub has_click_handler: bool,
    /// Handle of the iframe element this lives inside; None = top document
    pub frame: Option<u64>,
    /// Handle of the shadow host this lives under
    pub shadow_host: Option<u64>,
    pub is_iframe: bool,
    pub is_shadow_host: bool,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: String::new(),
            classes: String::new(),
            dom_id: String::new(),
            attrs: HashMap::new(),
            cursor: "auto".to_string(),
            size: (100, 40),
            displayed: true,
            enabled: true,
            xpath: String::new(),
            css_path: String::new(),
            ancestors: Vec::new(),
            extra_selectors: Vec::new(),
            effect: ClickEffect::None,
            has_click_handler: false,
            frame: None,
            shadow_host: None,
            is_iframe: false,
            is_shadow_host: false,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn classes(mut self, classes: &str) -> Self {
        self.classes = classes.to_string();
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.dom_id = id.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn href(self, href: &str) -> Self {
        self.attr("href", href)
    }

    pub fn cursor(mut self, cursor: &str) -> Self {
        self.cursor = cursor.to_string();
        self
    }

    pub fn xpath(mut self, xpath: &str) -> Self {
        self.xpath = xpath.to_string();
        self
    }

    pub fn css_path(mut self, path: &str) -> Self {
        self.css_path = path.to_string();
        self
    }

    pub fn ancestor(mut self, tag: &str, classes: &str, id: &str, role: &str) -> Self {
        self.ancestors.push(AncestorInfo {
            tag: tag.to_string(),
            class_names: classes.to_string(),
            id: id.to_string(),
            role: role.to_string(),
        });
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn effect(mut self, effect: ClickEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn matches(mut self, selector: &str) -> Self {
        self.extra_selectors.push(selector.to_string());
        self
    }

    pub fn click_handler(mut self) -> Self {
        self.has_click_handler = true;
        self
    }

    pub fn in_frame(mut self, frame: u64) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn in_shadow(mut self, host: u64) -> Self {
        self.shadow_host = Some(host);
        self
    }

    pub fn iframe(mut self) -> Self {
        self.is_iframe = true;
        self
    }

    pub fn shadow_host_marker(mut self) -> Self {
        self.is_shadow_host = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub url: String,
    pub title: String,
    elements: Vec<(u64, FakeElement)>,
    next_id: u64,
}

impl FakePage {
    pub fn new(url: &str, title: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            elements: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an element and return its handle id for cross references.
    pub fn add(&mut self, element: FakeElement) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.elements.push((id, element));
        id
    }
}

// ============================================================================
// Driver
// ============================================================================

pub struct FakeDriver {
    elements: Vec<(u64, FakeElement)>,
    url: String,
    title: String,
    dom_revision: u64,
    modal_visible: bool,
    current_frame: Option<u64>,
    forced_visible: HashSet<u64>,
    clicks: Arc<Mutex<HashMap<u64, usize>>>,
}

impl FakeDriver {
    pub fn from_page(page: &FakePage, clicks: Arc<Mutex<HashMap<u64, usize>>>) -> Self {
        Self {
            elements: page.elements.clone(),
            url: "about:blank".to_string(),
            title: page.title.clone(),
            dom_revision: 0,
            modal_visible: false,
            current_frame: None,
            forced_visible: HashSet::new(),
            clicks,
        }
    }

    fn get(&self, handle: &ElementHandle) -> Result<&FakeElement, AuditError> {
        self.elements
            .iter()
            .find(|(id, _)| *id == handle.0)
            .map(|(_, el)| el)
            .ok_or_else(|| AuditError::Driver(format!("stale element handle {}", handle.0)))
    }

    fn in_current_frame(&self, el: &FakeElement) -> bool {
        el.frame == self.current_frame && el.shadow_host.is_none()
    }

    fn record_click(&self, handle: &ElementHandle) {
        if let Ok(mut clicks) = self.clicks.lock() {
            *clicks.entry(handle.0).or_default() += 1;
        }
    }

    fn apply_effect(&mut self, effect: &ClickEffect) {
        match effect {
            ClickEffect::None => {}
            ClickEffect::Navigate(url) => {
                self.url = url.clone();
                self.current_frame = None;
                self.modal_visible = false;
            }
            ClickEffect::SetTitle(title) => self.title = title.clone(),
            ClickEffect::MutateDom => self.dom_revision += 1,
            ClickEffect::InsertModal => self.modal_visible = true,
            ClickEffect::InterceptedScriptFails
            | ClickEffect::InterceptedScriptNavigates(_) => {}
        }
    }
}

// ----------------------------------------------------------------------------
// Minimal CSS matching: tag, #id, .class chains, [attr], [attr="v"],
// [attr*="v"], comma lists, and explicit extra_selectors. Anything fancier
// only matches through extra_selectors.
// ----------------------------------------------------------------------------

fn attr_of<'a>(el: &'a FakeElement, name: &str) -> Option<&'a str> {
    match name {
        "class" => (!el.classes.is_empty()).then_some(el.classes.as_str()),
        "id" => (!el.dom_id.is_empty()).then_some(el.dom_id.as_str()),
        _ => el.attrs.get(name).map(|s| s.as_str()),
    }
}

fn matches_selector(el: &FakeElement, selector: &str) -> bool {
    selector
        .split(',')
        .any(|part| matches_part(el, part.trim()))
}

fn matches_part(el: &FakeElement, part: &str) -> bool {
    if part.is_empty() {
        return false;
    }
    if el.extra_selectors.iter().any(|s| s == part) {
        return true;
    }
    match part.chars().next() {
        Some('#') => el.dom_id == part[1..],
        Some('.') => {
            let wanted: Vec<&str> = part[1..].split('.').collect();
            let have: Vec<&str> = el.classes.split_whitespace().collect();
            wanted.iter().all(|w| have.contains(w))
        }
        Some('[') => matches_attr_expr(el, part),
        _ => {
            let rest_at = part.find(['.', '[']);
            let (tag, rest) = match rest_at {
                Some(i) => (&part[..i], &part[i..]),
                None => (part, ""),
            };
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
            rest.is_empty() || matches_part(el, rest)
        }
    }
}

fn matches_attr_expr(el: &FakeElement, expr: &str) -> bool {
    let Some(inner) = expr.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return false;
    };
    if let Some((name, value)) = inner.split_once("*=") {
        let value = value.trim_matches('"');
        return attr_of(el, name).is_some_and(|v| v.contains(value));
    }
    if let Some((name, value)) = inner.split_once('=') {
        let value = value.trim_matches('"');
        return attr_of(el, name) == Some(value);
    }
    attr_of(el, inner).is_some()
}

// ----------------------------------------------------------------------------
// PageDriver impl
// ----------------------------------------------------------------------------

impl PageDriver for FakeDriver {
    fn navigate(&mut self, url: &str) -> Result<(), AuditError> {
        self.url = url.to_string();
        self.current_frame = None;
        self.modal_visible = false;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, AuditError> {
        Ok(self.url.clone())
    }

    fn title(&mut self) -> Result<String, AuditError> {
        Ok(self.title.clone())
    }

    fn body_html(&mut self) -> Result<String, AuditError> {
        Ok(format!("<body data-revision=\"{}\"></body>", self.dom_revision))
    }

    fn find_by_css(&mut self, selector: &str) -> Result<Vec<ElementHandle>, AuditError> {
        let mut found: Vec<ElementHandle> = self
            .elements
            .iter()
            .filter(|(_, el)| self.in_current_frame(el) && matches_selector(el, selector))
            .map(|(id, _)| ElementHandle(*id))
            .collect();
        if self.modal_visible && selector.contains(".modal") {
            found.push(ElementHandle(MODAL_HANDLE));
        }
        Ok(found)
    }

    fn find_by_xpath(&mut self, xpath: &str) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| {
                self.in_current_frame(el)
                    && (el.xpath == xpath || el.extra_selectors.iter().any(|s| s == xpath))
            })
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn find_by_id(&mut self, id: &str) -> Result<Option<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .find(|(_, el)| self.in_current_frame(el) && el.dom_id == id)
            .map(|(handle, _)| ElementHandle(*handle)))
    }

    fn query_within(
        &mut self,
        root: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        let root_xpath = self.get(root)?.xpath.clone();
        Ok(self
            .elements
            .iter()
            .filter(|(id, el)| {
                *id != root.0
                    && self.in_current_frame(el)
                    && !root_xpath.is_empty()
                    && el.xpath.starts_with(&format!("{}/", root_xpath))
                    && matches_selector(el, selector)
            })
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn query_within_xpath(
        &mut self,
        root: &ElementHandle,
        xpath: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        let root_xpath = self.get(root)?.xpath.clone();
        Ok(self
            .elements
            .iter()
            .filter(|(id, el)| {
                *id != root.0
                    && self.in_current_frame(el)
                    && !root_xpath.is_empty()
                    && el.xpath.starts_with(&format!("{}/", root_xpath))
                    && el.extra_selectors.iter().any(|s| s == xpath)
            })
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn tag_name(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        Ok(self.get(el)?.tag.clone())
    }

    fn text(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        Ok(self.get(el)?.text.clone())
    }

    fn attribute(
        &mut self,
        el: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AuditError> {
        Ok(attr_of(self.get(el)?, name).map(|s| s.to_string()))
    }

    fn computed_style(&mut self, el: &ElementHandle, prop: &str) -> Result<String, AuditError> {
        let element = self.get(el)?;
        Ok(match prop {
            "cursor" => element.cursor.clone(),
            _ => String::new(),
        })
    }

    fn size(&mut self, el: &ElementHandle) -> Result<(u32, u32), AuditError> {
        Ok(self.get(el)?.size)
    }

    fn is_displayed(&mut self, el: &ElementHandle) -> Result<bool, AuditError> {
        if el.0 == MODAL_HANDLE {
            return Ok(self.modal_visible);
        }
        Ok(self.get(el)?.displayed || self.forced_visible.contains(&el.0))
    }

    fn is_enabled(&mut self, el: &ElementHandle) -> Result<bool, AuditError> {
        Ok(self.get(el)?.enabled)
    }

    fn xpath_of(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        Ok(self.get(el)?.xpath.clone())
    }

    fn css_path_of(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        Ok(self.get(el)?.css_path.clone())
    }

    fn ancestors(&mut self, el: &ElementHandle) -> Result<Vec<AncestorInfo>, AuditError> {
        Ok(self.get(el)?.ancestors.clone())
    }

    fn elements_with_pointer_cursor(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| self.in_current_frame(el) && el.cursor == "pointer")
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn elements_with_click_handlers(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| self.in_current_frame(el) && el.has_click_handler)
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn shadow_hosts(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| self.in_current_frame(el) && el.is_shadow_host)
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn query_shadow(
        &mut self,
        host: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| el.shadow_host == Some(host.0) && matches_selector(el, selector))
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn iframes(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, el)| self.in_current_frame(el) && el.is_iframe)
            .map(|(id, _)| ElementHandle(*id))
            .collect())
    }

    fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), AuditError> {
        self.get(frame)?;
        self.current_frame = Some(frame.0);
        Ok(())
    }

    fn exit_frame(&mut self) -> Result<(), AuditError> {
        self.current_frame = None;
        Ok(())
    }

    fn scroll_to(&mut self, _y: u64) -> Result<(), AuditError> {
        Ok(())
    }

    fn scroll_height(&mut self) -> Result<u64, AuditError> {
        Ok(2000)
    }

    fn scroll_into_view(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.get(el)?;
        Ok(())
    }

    fn hover(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.get(el)?;
        Ok(())
    }

    fn pointer_click(&mut self, el: &ElementHandle) -> Result<(), ClickError> {
        let effect = match self.get(el) {
            Ok(element) => element.effect.clone(),
            Err(e) => return Err(ClickError::Failed(e.to_string())),
        };
        self.record_click(el);
        match effect {
            ClickEffect::InterceptedScriptFails
            | ClickEffect::InterceptedScriptNavigates(_) => {
                Err(ClickError::Intercepted("overlay covers element".into()))
            }
            other => {
                self.apply_effect(&other);
                Ok(())
            }
        }
    }

    fn script_click(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        let effect = self.get(el)?.effect.clone();
        self.record_click(el);
        match effect {
            ClickEffect::InterceptedScriptFails => {
                Err(AuditError::Driver("script click rejected".into()))
            }
            ClickEffect::InterceptedScriptNavigates(url) => {
                self.apply_effect(&ClickEffect::Navigate(url));
                Ok(())
            }
            other => {
                self.apply_effect(&other);
                Ok(())
            }
        }
    }

    fn send_key(&mut self, _key: Key) -> Result<(), AuditError> {
        Ok(())
    }

    fn force_visible(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.get(el)?;
        self.forced_visible.insert(el.0);
        Ok(())
    }

    fn restore_visibility(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.forced_visible.remove(&el.0);
        Ok(())
    }

    fn pause_animations(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.get(el)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<(), AuditError> {
        Ok(())
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Stamps out fresh drivers over a shared page description.
pub struct FakeFactory {
    page: Mutex<FakePage>,
    pub clicks: Arc<Mutex<HashMap<u64, usize>>>,
    pub sessions_created: Arc<Mutex<usize>>,
}

impl FakeFactory {
    pub fn new(page: FakePage) -> Self {
        Self {
            page: Mutex::new(page),
            clicks: Arc::new(Mutex::new(HashMap::new())),
            sessions_created: Arc::new(Mutex::new(0)),
        }
    }

    pub fn click_count(&self, handle: u64) -> usize {
        self.clicks
            .lock()
            .map(|c| c.get(&handle).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_sessions(&self) -> usize {
        self.sessions_created.lock().map(|n| *n).unwrap_or(0)
    }
}

impl SessionFactory for FakeFactory {
    fn create(&self) -> Result<Box<dyn PageDriver>, AuditError> {
        let page = self
            .page
            .lock()
            .map_err(|e| AuditError::Driver(format!("page template poisoned: {}", e)))?;
        if let Ok(mut n) = self.sessions_created.lock() {
            *n += 1;
        }
        Ok(Box::new(FakeDriver::from_page(&page, self.clicks.clone())))
    }
}
