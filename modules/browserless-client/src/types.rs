use serde::Serialize;

/// Body for the Browserless `/screenshot` endpoint. The session navigates to
/// `url`, waits, runs any injected scripts, then screenshots either the full
/// page or the first element matching `selector`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRequest {
    pub url: String,
    pub options: ScreenshotOptions,
    /// Element to screenshot. Full page when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Block until this element exists in the DOM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<WaitForSelector>,
    /// Extra settle time in milliseconds after navigation/waits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_timeout: Option<u64>,
    /// Scripts executed in the page before the screenshot is taken.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_script_tag: Vec<ScriptTag>,
}

impl ScreenshotRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            options: ScreenshotOptions::default(),
            selector: None,
            wait_for_selector: None,
            wait_for_timeout: None,
            add_script_tag: Vec::new(),
        }
    }

    pub fn selector(mut self, selector: &str) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn wait_for_selector(mut self, selector: &str, timeout_ms: u64) -> Self {
        self.wait_for_selector = Some(WaitForSelector {
            selector: selector.to_string(),
            timeout: timeout_ms,
        });
        self
    }

    pub fn wait_for_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait_for_timeout = Some(timeout_ms);
        self
    }

    pub fn script(mut self, content: &str) -> Self {
        self.add_script_tag.push(ScriptTag {
            content: content.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotOptions {
    #[serde(rename = "type")]
    pub image_type: String,
    pub full_page: bool,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            image_type: "png".to_string(),
            full_page: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitForSelector {
    pub selector: String,
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptTag {
    pub content: String,
}
