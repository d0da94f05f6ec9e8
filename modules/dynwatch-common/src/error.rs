use thiserror::Error;

#[derive(Error, Debug)]
pub enum DynWatchError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cycle lock held: another poll cycle is in progress")]
    CycleInProgress,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
