pub mod capture;
pub mod normalize;
pub mod store;
pub mod traits;
pub mod watcher;

pub use capture::Capturer;
pub use store::RedisStore;
pub use traits::{DynamicHandler, FeedSource, WatchStore};
pub use watcher::{CycleStats, Watcher};
