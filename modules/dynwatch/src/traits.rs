// Trait abstractions for the poll cycle's dependencies.
//
// FeedSource — one page of raw feed entries per call.
// WatchStore — seen-set membership plus the per-account cycle lock.
// DynamicHandler — the embedding application's callback; the dispatcher
//   awaits its completion before an item is marked seen.
//
// These enable deterministic dispatcher tests with scripted feeds and an
// in-memory store: no network, no redis.

use anyhow::Result;
use async_trait::async_trait;

use bilibili_client::{BilibiliClient, FeedResponse};
use dynwatch_common::LocalDynamic;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one page of raw feed entries for an account, newest first.
    async fn space_history(&self, host_uid: u64) -> Result<FeedResponse>;
}

#[async_trait]
impl FeedSource for BilibiliClient {
    async fn space_history(&self, host_uid: u64) -> Result<FeedResponse> {
        Ok(self.space_history(host_uid).await?)
    }
}

#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Has this id already been dispatched for this account?
    async fn is_seen(&self, host_uid: u64, id: &str) -> Result<bool>;

    /// Record an id as dispatched. Entries are append-only.
    async fn mark_seen(&self, host_uid: u64, id: &str) -> Result<()>;

    /// Atomically acquire the account's cycle lock. Returns false when a
    /// cycle is already in progress (a single store round trip, no
    /// check-then-act window).
    async fn try_begin_cycle(&self, host_uid: u64) -> Result<bool>;

    /// Release the cycle lock. Must run on every cycle exit path, or all
    /// future ticks for the account silently no-op.
    async fn end_cycle(&self, host_uid: u64) -> Result<()>;
}

/// Callback invoked once per newly-discovered dynamic, in chronological
/// order. An error aborts the remainder of the cycle and leaves the item
/// unmarked, so it is retried next cycle.
#[async_trait]
pub trait DynamicHandler: Send + Sync {
    async fn on_new(&self, dynamic: &LocalDynamic) -> Result<()>;
}
