use std::time::Duration;

// ============================================================================
// Dead-pattern detection
// ============================================================================

/// href values that cannot produce navigation on their own.
const DEAD_HREF_PATTERNS: &[&str] = &[
    "#",
    "javascript:void(0)",
    "javascript:void(0);",
    "javascript:",
    "javascript::void(0)",
    "void(0)",
    "undefined",
    "null",
    "about:blank",
];

/// Whether an element's href/onclick match a known inert pattern.
///
/// Only consulted as a last-resort explanation after the click produced no
/// observable effect; suspicious markup with a real script-driven effect
/// still classifies as active. The empty string counts as a dead value on
/// both sides, so the pattern holds only when neither attribute offers a
/// live mechanism. A live href or handler that happened to do nothing
/// falls through to the plain "no visible effect" reason.
pub fn is_dead_click_pattern(href: &str, onclick: &str) -> bool {
    let href = href.replace(' ', "").to_lowercase();
    let onclick = onclick.replace(' ', "").to_lowercase();
    href_is_dead(&href) && onclick_is_dead(&onclick)
}

fn href_is_dead(href: &str) -> bool {
    href.is_empty()
        || DEAD_HREF_PATTERNS.contains(&href)
        || href.starts_with("javascript:")
        || href.starts_with("void(0)")
}

fn onclick_is_dead(onclick: &str) -> bool {
    onclick.is_empty()
        || matches!(onclick, "void(0)" | "javascript:void(0)")
        || onclick.starts_with("javascript:")
}

// ============================================================================
// HEAD liveness probe
// ============================================================================

/// Issues HEAD requests against discovered hrefs and records the redirect
/// chain of status codes. Purely descriptive metadata: a probe failure
/// never blocks discovery or classification.
pub struct LinkProber {
    client: reqwest::blocking::Client,
    max_redirects: usize,
}

impl LinkProber {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default();
        Self {
            client,
            max_redirects: 10,
        }
    }

    /// Probe `href` (resolved against `base_url` when relative) and return
    /// the ordered status codes of each hop, final status last. `None` for
    /// fragment/javascript hrefs and on any network failure.
    pub fn probe(&self, href: &str, base_url: &str) -> Option<Vec<u16>> {
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }

        let mut url = resolve_href(href, base_url)?;
        let mut chain = Vec::new();

        for _ in 0..=self.max_redirects {
            let response = self.client.head(&url).send().ok()?;
            let status = response.status();
            chain.push(status.as_u16());
            if !status.is_redirection() {
                return Some(chain);
            }
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)?
                .to_str()
                .ok()?;
            url = resolve_href(location, &url)?;
        }
        Some(chain)
    }
}

/// Resolve a possibly-relative href against a base URL's origin.
fn resolve_href(href: &str, base_url: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with('/') {
        return extract_origin(base_url).map(|origin| format!("{}{}", origin, href));
    }
    None
}

/// Extract scheme + host from a URL.
fn extract_origin(url: &str) -> Option<&str> {
    let after_scheme = url.find("://").map(|i| i + 3)?;
    let end = url[after_scheme..]
        .find('/')
        .map(|i| after_scheme + i)
        .unwrap_or(url.len());
    Some(&url[..end])
}
