//! Renders a dynamic's page in a remote browser session and saves an
//! element-scoped screenshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use browserless_client::{BrowserlessClient, ScreenshotRequest};
use dynwatch_common::{DynWatchError, LocalDynamic};

const DYNAMIC_PAGE_BASE: &str = "https://t.bilibili.com";

/// Element that signals the dynamic page has rendered its content.
const CONTENT_READY_SELECTOR: &str = ".main-content";

/// Bounding element of the dynamic itself; this is what gets shot.
const CAPTURE_SELECTOR: &str = ".detail-card";

/// Removes the forwarded-content region so quoted sub-content is excluded
/// from the capture.
const STRIP_FORWARD_SCRIPT: &str = "\
var forwAreaList = document.getElementsByClassName('forw-area');
if (forwAreaList.length > 0) {
  forwAreaList[0].remove();
}";

const WAIT_FOR_SELECTOR_MS: u64 = 30_000;

/// Settle time after the content marker appears, before scripts run and the
/// screenshot is taken. The page keeps laying out images after the marker.
const SETTLE_MS: u64 = 3_500;

pub struct Capturer {
    client: BrowserlessClient,
    capture_dir: PathBuf,
}

impl Capturer {
    pub fn new(client: BrowserlessClient, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            capture_dir: capture_dir.into(),
        }
    }

    /// Canonical page for a dynamic.
    pub fn page_url(dynamic: &LocalDynamic) -> String {
        format!("{DYNAMIC_PAGE_BASE}/{}", dynamic.dynamic_id)
    }

    /// Capture the rendered dynamic and persist it as a PNG. Navigation
    /// timeouts and missing elements propagate; there is no retry here.
    pub async fn capture(&self, dynamic: &LocalDynamic) -> Result<PathBuf> {
        let request = ScreenshotRequest::new(&Self::page_url(dynamic))
            .selector(CAPTURE_SELECTOR)
            .wait_for_selector(CONTENT_READY_SELECTOR, WAIT_FOR_SELECTOR_MS)
            .wait_for_timeout(SETTLE_MS)
            .script(STRIP_FORWARD_SCRIPT);

        let bytes = self
            .client
            .screenshot(&request)
            .await
            .map_err(|e| DynWatchError::Capture(e.to_string()))?;

        let path = self.save_path(dynamic);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write capture to {}", path.display()))?;

        info!(id = %dynamic.id, path = %path.display(), "Captured dynamic");
        Ok(path)
    }

    fn save_path(&self, dynamic: &LocalDynamic) -> PathBuf {
        self.capture_dir.join(format!("screenshot_{}.png", dynamic.id))
    }

    pub fn capture_dir(&self) -> &Path {
        &self.capture_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynwatch_common::DynamicKind;

    fn dynamic(id: &str) -> LocalDynamic {
        LocalDynamic {
            kind: DynamicKind::Text,
            id: DynamicKind::Text.local_id(id),
            dynamic_id: id.to_string(),
            title: String::new(),
            content: "hello".to_string(),
            images: Vec::new(),
            timestamp: 0,
            has_origin: false,
        }
    }

    #[test]
    fn page_url_uses_source_id_not_local_id() {
        assert_eq!(
            Capturer::page_url(&dynamic("612857987546578969")),
            "https://t.bilibili.com/612857987546578969"
        );
    }

    #[test]
    fn save_path_is_named_by_local_id() {
        let capturer = Capturer::new(BrowserlessClient::new("http://localhost:3000", None), "/tmp");
        assert_eq!(
            capturer.save_path(&dynamic("100")),
            PathBuf::from("/tmp/screenshot_text_100.png")
        );
    }
}
