use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bilibili_client::BilibiliClient;
use browserless_client::BrowserlessClient;
use dynwatch::{Capturer, DynamicHandler, RedisStore, Watcher};
use dynwatch_common::{Config, LocalDynamic};

/// Built-in handler: log the new dynamic and capture its rendered page.
/// Embedders wanting different side effects supply their own DynamicHandler
/// and drive the Watcher from their own binary.
struct CaptureHandler {
    capturer: Capturer,
}

#[async_trait]
impl DynamicHandler for CaptureHandler {
    async fn on_new(&self, dynamic: &LocalDynamic) -> Result<()> {
        info!(
            id = %dynamic.id,
            kind = %dynamic.kind,
            has_origin = dynamic.has_origin,
            content = %dynamic.content,
            "New dynamic"
        );
        let path = self.capturer.capture(dynamic).await?;
        info!(id = %dynamic.id, path = %path.display(), "Capture saved");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dynwatch=info".parse()?))
        .init();

    info!("dynwatch starting...");

    let config = Config::from_env();

    let store = RedisStore::connect(&config.redis_url).await?;

    let capturer = Capturer::new(
        BrowserlessClient::new(&config.browserless_url, config.browserless_token.as_deref()),
        config.capture_dir.clone(),
    );
    let handler = CaptureHandler { capturer };

    let watcher = Watcher::new(Box::new(BilibiliClient::new()), Box::new(store))
        .dispatch_delay(Duration::from_millis(config.dispatch_delay_ms));

    watcher
        .run(
            config.host_uid,
            &handler,
            Duration::from_millis(config.poll_interval_ms),
        )
        .await
}
