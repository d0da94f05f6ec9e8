use serde::Deserialize;

/// Top-level response from the space-history endpoint.
/// `code == 0` means success; any other value means no data this cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    pub code: i64,
    #[serde(default)]
    pub data: Option<FeedData>,
}

impl FeedResponse {
    /// Cards in the order the API delivers them (newest first).
    /// Empty when `code != 0` or the payload carried no cards.
    pub fn cards(&self) -> &[FeedCard] {
        if self.code != 0 {
            return &[];
        }
        self.data.as_ref().map(|d| d.cards.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedData {
    #[serde(default)]
    pub cards: Vec<FeedCard>,
}

/// One feed entry. `card` is a nested JSON document serialized as a string;
/// it is parsed lazily during normalization so a malformed entry cannot
/// fail the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedCard {
    pub desc: CardDesc,
    pub card: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardDesc {
    /// Feed-assigned id. Kept as a string: the id space exceeds f64
    /// precision, so it must never round-trip through a number.
    pub dynamic_id: String,
}

/// The inner document behind `FeedCard::card`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardPayload {
    pub item: CardItem,
    /// Present when this dynamic wraps another one (repost/quote).
    #[serde(default)]
    pub origin: Option<serde_json::Value>,
}

impl CardPayload {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub pictures: Option<Vec<Picture>>,
    #[serde(default)]
    pub upload_time: i64,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Picture {
    pub img_src: String,
}
