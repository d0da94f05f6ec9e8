use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::normalize::normalize_card;
use crate::traits::{DynamicHandler, FeedSource, WatchStore};

/// Default pause between consecutive dispatches within one cycle, so
/// downstream side effects (rate-limited posting, captures) are not burst.
pub const DEFAULT_DISPATCH_DELAY: Duration = Duration::from_secs(1);

/// Default tick interval for the poll loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Stats from one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    pub cards: u32,
    pub rejected: u32,
    pub already_seen: u32,
    pub dispatched: u32,
}

impl std::fmt::Display for CycleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cards ({} rejected, {} seen, {} dispatched)",
            self.cards, self.rejected, self.already_seen, self.dispatched
        )
    }
}

/// Runs the poll→normalize→detect→dispatch cycle for one account.
pub struct Watcher {
    feed: Box<dyn FeedSource>,
    store: Box<dyn WatchStore>,
    dispatch_delay: Duration,
}

impl Watcher {
    pub fn new(feed: Box<dyn FeedSource>, store: Box<dyn WatchStore>) -> Self {
        Self {
            feed,
            store,
            dispatch_delay: DEFAULT_DISPATCH_DELAY,
        }
    }

    pub fn dispatch_delay(mut self, delay: Duration) -> Self {
        self.dispatch_delay = delay;
        self
    }

    /// Run one lock-guarded cycle. Returns `None` when another cycle holds
    /// the account's lock (this tick is skipped, not queued).
    pub async fn poll_once(
        &self,
        host_uid: u64,
        handler: &dyn DynamicHandler,
    ) -> Result<Option<CycleStats>> {
        if !self
            .store
            .try_begin_cycle(host_uid)
            .await
            .context("Failed to acquire cycle lock")?
        {
            debug!(host_uid, "Cycle lock held, skipping tick");
            return Ok(None);
        }

        let result = self.run_cycle(host_uid, handler).await;

        // Always release, even when fetch or dispatch failed. A leaked lock
        // turns every future tick into a silent no-op.
        if let Err(e) = self.store.end_cycle(host_uid).await {
            error!(host_uid, error = %e, "Failed to release cycle lock");
        }

        result.map(Some)
    }

    async fn run_cycle(&self, host_uid: u64, handler: &dyn DynamicHandler) -> Result<CycleStats> {
        debug!(host_uid, "Checking dynamics");

        let page = self
            .feed
            .space_history(host_uid)
            .await
            .context("Failed to fetch feed page")?;

        let mut stats = CycleStats::default();

        if page.code != 0 {
            debug!(host_uid, code = page.code, "Feed returned no data this cycle");
            return Ok(stats);
        }

        // The API delivers newest first; dispatch wants oldest first.
        for card in page.cards().iter().rev() {
            stats.cards += 1;

            let Some(dynamic) = normalize_card(card) else {
                stats.rejected += 1;
                continue;
            };

            if self
                .store
                .is_seen(host_uid, &dynamic.id)
                .await
                .context("Failed to check seen set")?
            {
                stats.already_seen += 1;
                continue;
            }

            info!(host_uid, id = %dynamic.id, kind = %dynamic.kind, "New dynamic");

            // The handler must complete before the membership write: on
            // handler failure the id stays unmarked and is retried next
            // cycle, so dispatch is exactly-once only on handler success.
            handler
                .on_new(&dynamic)
                .await
                .with_context(|| format!("Handler failed for {}", dynamic.id))?;

            self.store
                .mark_seen(host_uid, &dynamic.id)
                .await
                .context("Failed to record dispatched id")?;
            stats.dispatched += 1;

            tokio::time::sleep(self.dispatch_delay).await;
        }

        info!(host_uid, %stats, "Cycle complete");
        Ok(stats)
    }

    /// Poll forever on a fixed interval. A tick that finds the lock held
    /// does nothing; a failed cycle is logged and the loop keeps going.
    pub async fn run(
        &self,
        host_uid: u64,
        handler: &dyn DynamicHandler,
        poll_interval: Duration,
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(poll_interval);
        // A cycle can outlast the interval; drop the backlog instead of
        // firing a burst of immediate ticks afterwards.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(host_uid, interval_ms = poll_interval.as_millis() as u64, "Watching dynamics");

        loop {
            ticker.tick().await;
            match self.poll_once(host_uid, handler).await {
                Ok(Some(stats)) if stats.dispatched > 0 => {
                    info!(host_uid, dispatched = stats.dispatched, "Dispatched new dynamics");
                }
                Ok(_) => {}
                Err(e) => {
                    error!(host_uid, error = ?e, "Poll cycle failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_cycle_timing_defaults() {
        assert_eq!(DEFAULT_DISPATCH_DELAY, Duration::from_millis(1_000));
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_millis(10_000));
    }
}
