use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::browser::driver::{
    AncestorInfo, ClickError, ElementHandle, Key, PageDriver, SessionConfig, SessionFactory,
};
use crate::error::AuditError;

// ============================================================================
// Wire protocol
// ============================================================================

/// Request sent to browser_server.js over stdin (one JSON line).
///
/// A single flat shape covers every command; absent fields are omitted.
#[derive(Debug, Default, Serialize)]
struct BrowserRequest<'a> {
    cmd: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selector: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xpath: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    element: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<u64>,
}

impl<'a> BrowserRequest<'a> {
    fn new(cmd: &'a str) -> Self {
        Self { cmd, ..Default::default() }
    }

    fn with_element(cmd: &'a str, el: &ElementHandle) -> Self {
        Self { cmd, element: Some(el.0), ..Default::default() }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
struct BrowserResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ready: Option<bool>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    flag: Option<bool>,
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    elements: Option<Vec<u64>>,
    #[serde(default)]
    element: Option<u64>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    ancestors: Option<Vec<AncestorInfo>>,
    #[serde(default)]
    intercepted: Option<bool>,
}

// ============================================================================
// BrowserSession: PageDriver over a Node.js subprocess
// ============================================================================

/// One isolated browser session backed by browser_server.js.
///
/// Spawns a long-lived Node.js process that keeps a Chromium instance open
/// with a private profile directory, a real user agent, and the automation
/// flag suppressed. Commands go over stdin as NDJSON; responses come back
/// one JSON line each. The profile directory lives as long as the session.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    _profile_dir: TempDir,
}

impl BrowserSession {
    /// Launch a session with a fresh private profile directory.
    pub fn launch(config: &SessionConfig) -> Result<Self, AuditError> {
        let profile_dir = TempDir::new().map_err(|e| {
            AuditError::SessionIo(format!("Failed to create profile directory: {}", e))
        })?;

        let mut cmd = Command::new("node");
        cmd.arg(&config.server_script)
            .arg(format!("--profile-dir={}", profile_dir.path().display()))
            .arg(format!("--user-agent={}", config.user_agent))
            .arg(format!(
                "--window-size={},{}",
                config.window_width, config.window_height
            ));
        if config.headless {
            cmd.arg("--headless");
        }

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AuditError::SubprocessSpawn {
                script: config.server_script.display().to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AuditError::SessionIo("Failed to capture stdin of browser server".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            AuditError::SessionIo("Failed to capture stdout of browser server".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| AuditError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| AuditError::JsonParse {
                context: "browser server ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AuditError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser server".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            _profile_dir: profile_dir,
        })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AuditError> {
        let json = serde_json::to_string(request).map_err(|e| AuditError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            AuditError::SessionIo(format!("Failed to write to browser server stdin: {}", e))
        })?;
        self.stdin.flush().map_err(|e| {
            AuditError::SessionIo(format!("Failed to flush browser server stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AuditError::SessionIo(format!("Failed to read from browser server stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(AuditError::SessionIo(
                "Empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AuditError::JsonParse {
            context: "browser server response".into(),
            source: e,
        })
    }

    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AuditError> {
        let command = request.cmd.to_string();
        let response = self.send(request)?;
        if !response.ok {
            return Err(AuditError::SessionProtocol {
                command,
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    fn text_response(&mut self, request: &BrowserRequest) -> Result<String, AuditError> {
        let command = request.cmd.to_string();
        let response = self.send_ok(request)?;
        response.text.ok_or_else(|| AuditError::SessionProtocol {
            command,
            error: "Missing text field in response".into(),
        })
    }

    fn flag_response(&mut self, request: &BrowserRequest) -> Result<bool, AuditError> {
        let response = self.send_ok(request)?;
        Ok(response.flag.unwrap_or(false))
    }

    fn elements_response(
        &mut self,
        request: &BrowserRequest,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        let response = self.send_ok(request)?;
        Ok(response
            .elements
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect())
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest { url: Some(url), ..BrowserRequest::new("navigate") })?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::new("current_url"))
    }

    fn title(&mut self) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::new("title"))
    }

    fn body_html(&mut self) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::new("body_html"))
    }

    fn find_by_css(&mut self, selector: &str) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest {
            selector: Some(selector),
            ..BrowserRequest::new("find_css")
        })
    }

    fn find_by_xpath(&mut self, xpath: &str) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest {
            xpath: Some(xpath),
            ..BrowserRequest::new("find_xpath")
        })
    }

    fn find_by_id(&mut self, id: &str) -> Result<Option<ElementHandle>, AuditError> {
        let response = self.send_ok(&BrowserRequest {
            name: Some(id),
            ..BrowserRequest::new("find_id")
        })?;
        Ok(response.element.map(ElementHandle))
    }

    fn query_within(
        &mut self,
        root: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest {
            selector: Some(selector),
            ..BrowserRequest::with_element("query_within", root)
        })
    }

    fn query_within_xpath(
        &mut self,
        root: &ElementHandle,
        xpath: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest {
            xpath: Some(xpath),
            ..BrowserRequest::with_element("query_within_xpath", root)
        })
    }

    fn tag_name(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::with_element("tag_name", el))
    }

    fn text(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::with_element("text", el))
    }

    fn attribute(
        &mut self,
        el: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AuditError> {
        let response = self.send_ok(&BrowserRequest {
            name: Some(name),
            ..BrowserRequest::with_element("attribute", el)
        })?;
        Ok(response.text)
    }

    fn computed_style(&mut self, el: &ElementHandle, prop: &str) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest {
            name: Some(prop),
            ..BrowserRequest::with_element("computed_style", el)
        })
    }

    fn size(&mut self, el: &ElementHandle) -> Result<(u32, u32), AuditError> {
        let response = self.send_ok(&BrowserRequest::with_element("size", el))?;
        Ok((response.width.unwrap_or(0), response.height.unwrap_or(0)))
    }

    fn is_displayed(&mut self, el: &ElementHandle) -> Result<bool, AuditError> {
        self.flag_response(&BrowserRequest::with_element("is_displayed", el))
    }

    fn is_enabled(&mut self, el: &ElementHandle) -> Result<bool, AuditError> {
        self.flag_response(&BrowserRequest::with_element("is_enabled", el))
    }

    fn xpath_of(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::with_element("xpath_of", el))
    }

    fn css_path_of(&mut self, el: &ElementHandle) -> Result<String, AuditError> {
        self.text_response(&BrowserRequest::with_element("css_path_of", el))
    }

    fn ancestors(&mut self, el: &ElementHandle) -> Result<Vec<AncestorInfo>, AuditError> {
        let response = self.send_ok(&BrowserRequest::with_element("ancestors", el))?;
        Ok(response.ancestors.unwrap_or_default())
    }

    fn elements_with_pointer_cursor(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest::new("pointer_cursor_elements"))
    }

    fn elements_with_click_handlers(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest::new("click_handler_elements"))
    }

    fn shadow_hosts(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest::new("shadow_hosts"))
    }

    fn query_shadow(
        &mut self,
        host: &ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest {
            selector: Some(selector),
            ..BrowserRequest::with_element("query_shadow", host)
        })
    }

    fn iframes(&mut self) -> Result<Vec<ElementHandle>, AuditError> {
        self.elements_response(&BrowserRequest::new("iframes"))
    }

    fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("enter_frame", frame))?;
        Ok(())
    }

    fn exit_frame(&mut self) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::new("exit_frame"))?;
        Ok(())
    }

    fn scroll_to(&mut self, y: u64) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest { y: Some(y), ..BrowserRequest::new("scroll_to") })?;
        Ok(())
    }

    fn scroll_height(&mut self) -> Result<u64, AuditError> {
        let response = self.send_ok(&BrowserRequest::new("scroll_height"))?;
        Ok(response.number.unwrap_or(0))
    }

    fn scroll_into_view(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("scroll_into_view", el))?;
        Ok(())
    }

    fn hover(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("hover", el))?;
        Ok(())
    }

    fn pointer_click(&mut self, el: &ElementHandle) -> Result<(), ClickError> {
        let request = BrowserRequest::with_element("pointer_click", el);
        let response = self
            .send(&request)
            .map_err(|e| ClickError::Failed(e.to_string()))?;
        if response.ok {
            return Ok(());
        }
        let message = response.error.unwrap_or_else(|| "Unknown error".into());
        if response.intercepted == Some(true) {
            Err(ClickError::Intercepted(message))
        } else {
            Err(ClickError::Failed(message))
        }
    }

    fn script_click(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("script_click", el))?;
        Ok(())
    }

    fn send_key(&mut self, key: Key) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest {
            key: Some(key.name()),
            ..BrowserRequest::new("send_key")
        })?;
        Ok(())
    }

    fn force_visible(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("force_visible", el))?;
        Ok(())
    }

    fn restore_visibility(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("restore_visibility", el))?;
        Ok(())
    }

    fn pause_animations(&mut self, el: &ElementHandle) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::with_element("pause_animations", el))?;
        Ok(())
    }

    fn quit(&mut self) -> Result<(), AuditError> {
        // Best-effort quit; don't fail hard if the process is already gone
        let _ = self.send(&BrowserRequest::new("quit"));
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

// ============================================================================
// SubprocessSessionFactory
// ============================================================================

/// Creates `BrowserSession` instances, one private profile dir each.
pub struct SubprocessSessionFactory {
    config: SessionConfig,
}

impl SubprocessSessionFactory {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for SubprocessSessionFactory {
    fn create(&self) -> Result<Box<dyn PageDriver>, AuditError> {
        Ok(Box::new(BrowserSession::launch(&self.config)?))
    }
}
