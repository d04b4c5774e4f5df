//! Startup wiring: build each layer bottom-up, then hand control to the
//! Telegram dispatcher until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::channels::TelegramChannel;
use crate::coach::CoachingGateway;
use crate::config::AppConfig;
use crate::engine::Engine;
use crate::providers::OpenAiCompatibleProvider;
use crate::store::SqliteStore;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 1. Store: SQLite pool plus migrations. Fatal if the database cannot
    //    be opened.
    let store = Arc::new(SqliteStore::new(&config.store.db_path).await?);
    info!(db_path = %config.store.db_path, "Store ready");

    // 2. Provider and gateway.
    let provider = OpenAiCompatibleProvider::new(
        &config.provider.base_url,
        &config.provider.api_key,
        &config.provider.model,
        config.coaching.temperature,
        config.coaching.max_tokens,
        Duration::from_secs(config.provider.request_timeout_secs),
    )?;
    let gateway = CoachingGateway::new(Arc::new(provider));
    info!(model = %config.provider.model, "Coaching gateway ready");

    // 3. Engine.
    let engine = Arc::new(Engine::new(
        store,
        gateway,
        config.coaching.rate_limit_minutes,
    ));

    // 4. Telegram channel; runs until ctrl-c.
    let channel = Arc::new(TelegramChannel::new(&config.telegram.bot_token, engine));
    info!("Starting Telegram channel");
    channel.start_with_retry().await;

    Ok(())
}
