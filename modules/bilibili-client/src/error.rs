use thiserror::Error;

pub type Result<T> = std::result::Result<T, BilibiliError>;

#[derive(Debug, Error)]
pub enum BilibiliError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BilibiliError {
    fn from(err: reqwest::Error) -> Self {
        BilibiliError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BilibiliError {
    fn from(err: serde_json::Error) -> Self {
        BilibiliError::Parse(err.to_string())
    }
}
