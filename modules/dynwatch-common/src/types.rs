use serde::{Deserialize, Serialize};

/// Variant of a feed item, decided by structural inspection of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicKind {
    Text,
    Article,
}

impl DynamicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DynamicKind::Text => "text",
            DynamicKind::Article => "article",
        }
    }

    /// Stream-unique id for a dynamic. Prefixing with the kind keeps ids
    /// distinct even if the feed reuses a numeric id across kinds.
    pub fn local_id(&self, dynamic_id: &str) -> String {
        format!("{}_{}", self.as_str(), dynamic_id)
    }
}

impl std::fmt::Display for DynamicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an image attached to a dynamic. URLs are carried through
/// from the feed without validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
}

/// The normalized unit of novelty detection and dispatch. Transient: carries
/// one feed entry from normalization to the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDynamic {
    pub kind: DynamicKind,
    /// `{kind}_{dynamic_id}`; the membership key for dedup.
    pub id: String,
    /// Feed-assigned id, string-typed end to end (exceeds f64 precision).
    pub dynamic_id: String,
    /// Empty for Text dynamics.
    pub title: String,
    pub content: String,
    pub images: Vec<ImageRef>,
    pub timestamp: i64,
    /// True when this dynamic wraps another one (repost/quote).
    pub has_origin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_id_is_pure_function_of_kind_and_source_id() {
        assert_eq!(DynamicKind::Text.local_id("100"), "text_100");
        assert_eq!(DynamicKind::Article.local_id("100"), "article_100");
    }

    #[test]
    fn same_source_id_never_collides_across_kinds() {
        let text = DynamicKind::Text.local_id("612857987546578969");
        let article = DynamicKind::Article.local_id("612857987546578969");
        assert_ne!(text, article);
    }
}
