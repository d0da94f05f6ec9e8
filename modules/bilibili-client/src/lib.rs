pub mod error;
pub mod types;

pub use error::{BilibiliError, Result};
pub use types::{CardDesc, CardItem, CardPayload, FeedCard, FeedData, FeedResponse, Picture};

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

const BASE_URL: &str = "https://api.vc.bilibili.com";

/// Fixed visitor uid the space-history endpoint expects on every request.
const VISITOR_UID: u64 = 927290;

/// Matches the numeric `dynamic_id` values the API emits. They exceed f64
/// precision, so they are quoted into strings before JSON parsing.
static DYNAMIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""dynamic_id":(\d+)"#).unwrap());

pub struct BilibiliClient {
    client: reqwest::Client,
    base_url: String,
}

impl BilibiliClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at an alternate host.
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one page of dynamics for an account, newest first.
    ///
    /// No retries here; transport failures propagate to the caller.
    pub async fn space_history(&self, host_uid: u64) -> Result<FeedResponse> {
        let url = format!(
            "{}/dynamic_svr/v1/dynamic_svr/space_history?visitor_uid={VISITOR_UID}&host_uid={host_uid}",
            self.base_url
        );

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BilibiliError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let page: FeedResponse = serde_json::from_str(&escape_dynamic_ids(&body))?;

        debug!(host_uid, code = page.code, cards = page.cards().len(), "Fetched space history");
        Ok(page)
    }
}

impl Default for BilibiliClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote every numeric `dynamic_id` value so serde sees a string.
pub fn escape_dynamic_ids(body: &str) -> String {
    DYNAMIC_ID_RE
        .replace_all(body, r#""dynamic_id":"$1""#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_numeric_dynamic_ids() {
        let body = r#"{"desc":{"dynamic_id":612857987546578969,"uid":1}}"#;
        let escaped = escape_dynamic_ids(body);
        assert_eq!(
            escaped,
            r#"{"desc":{"dynamic_id":"612857987546578969","uid":1}}"#
        );
    }

    #[test]
    fn escape_preserves_full_precision() {
        // 612857987546578969 is not representable as f64; a numeric
        // round-trip would end in ...68 or ...70.
        let body = r#"{"dynamic_id":612857987546578969}"#;
        let value: serde_json::Value =
            serde_json::from_str(&escape_dynamic_ids(body)).unwrap();
        assert_eq!(value["dynamic_id"], "612857987546578969");
    }

    #[test]
    fn escape_handles_multiple_cards() {
        let body = r#"[{"dynamic_id":100},{"dynamic_id":200}]"#;
        assert_eq!(
            escape_dynamic_ids(body),
            r#"[{"dynamic_id":"100"},{"dynamic_id":"200"}]"#
        );
    }

    #[test]
    fn escape_leaves_already_quoted_ids_alone() {
        let body = r#"{"dynamic_id":"100"}"#;
        assert_eq!(escape_dynamic_ids(body), body);
    }

    #[test]
    fn parses_escaped_response() {
        let body = r#"{
            "code": 0,
            "data": {
                "cards": [
                    {"desc": {"dynamic_id": 612857987546578969}, "card": "{}"}
                ]
            }
        }"#;
        let page: FeedResponse = serde_json::from_str(&escape_dynamic_ids(body)).unwrap();
        assert_eq!(page.code, 0);
        assert_eq!(page.cards().len(), 1);
        assert_eq!(page.cards()[0].desc.dynamic_id, "612857987546578969");
    }

    #[test]
    fn nonzero_code_yields_no_cards() {
        let page: FeedResponse =
            serde_json::from_str(r#"{"code": -352, "data": null}"#).unwrap();
        assert!(page.cards().is_empty());
    }
}
