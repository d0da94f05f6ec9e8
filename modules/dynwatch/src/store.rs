use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, info};

use dynwatch_common::DynWatchError;

use crate::traits::WatchStore;

/// Seen-set and cycle-lock storage over one long-lived redis connection.
/// The ConnectionManager is created once at startup and cloned per call;
/// it reconnects internally on failure.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!("Connecting to redis at {redis_url}");

        let client = redis::Client::open(redis_url)
            .map_err(|e| DynWatchError::Store(format!("Failed to create redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| DynWatchError::Store(format!("Failed to connect to redis: {e}")))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl WatchStore for RedisStore {
    async fn is_seen(&self, host_uid: u64, id: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let seen: bool = conn
            .sismember(Keys::seen(host_uid), id)
            .await
            .map_err(|e| DynWatchError::Store(format!("Redis SISMEMBER failed: {e}")))?;
        Ok(seen)
    }

    async fn mark_seen(&self, host_uid: u64, id: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(Keys::seen(host_uid), id)
            .await
            .map_err(|e| DynWatchError::Store(format!("Redis SADD failed: {e}")))?;
        Ok(())
    }

    async fn try_begin_cycle(&self, host_uid: u64) -> Result<bool> {
        let mut conn = self.conn.clone();
        let acquired: bool = conn
            .set_nx(Keys::cycle_lock(host_uid), "1")
            .await
            .map_err(|e| DynWatchError::Store(format!("Redis SET NX failed: {e}")))?;
        debug!(host_uid, acquired, "Cycle lock attempt");
        Ok(acquired)
    }

    async fn end_cycle(&self, host_uid: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Keys::cycle_lock(host_uid))
            .await
            .map_err(|e| DynWatchError::Store(format!("Redis DEL failed: {e}")))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Keys;

impl Keys {
    /// Set of already-dispatched ids for an account.
    pub fn seen(host_uid: u64) -> String {
        format!("seen:{host_uid}")
    }

    /// Per-account cycle lock. One key per account, so two watched
    /// accounts never contend.
    pub fn cycle_lock(host_uid: u64) -> String {
        format!("cycle_lock:{host_uid}")
    }
}
