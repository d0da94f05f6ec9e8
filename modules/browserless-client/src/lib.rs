pub mod error;
pub mod types;

pub use error::{BrowserlessError, Result};
pub use types::{ScreenshotOptions, ScreenshotRequest, ScriptTag, WaitForSelector};

use std::time::Duration;

use tracing::debug;

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Render a page in a remote browser session and return screenshot bytes.
    /// Navigation timeouts and missing elements surface as API errors.
    pub async fn screenshot(&self, request: &ScreenshotRequest) -> Result<Vec<u8>> {
        let mut endpoint = format!("{}/screenshot", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(BrowserlessError::EmptyImage(request.url.clone()));
        }

        debug!(url = request.url.as_str(), bytes = bytes.len(), "Screenshot rendered");
        Ok(bytes.to_vec())
    }
}
