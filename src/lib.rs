pub mod analytics;
pub mod config;
pub mod items;
pub mod rest;
pub mod settings;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;

use analytics::AnalyticsStorage;
use config::ServerConfig;
use items::ItemStorage;
use settings::SettingsStorage;
use storage::Storage;

/// Shared application state passed to every REST handler.
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    pub items: ItemStorage,
    pub analytics: AnalyticsStorage,
    pub settings: SettingsStorage,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Open the database under the configured data dir and wire the storage
    /// layers up on the shared pool.
    pub async fn init(config: Arc<ServerConfig>) -> Result<Self> {
        let storage = Arc::new(
            Storage::new_with_slow_query(
                &config.data_dir,
                config.observability.slow_query_threshold_ms,
            )
            .await?,
        );
        let pool = storage.pool();
        Ok(Self {
            config,
            storage,
            items: ItemStorage::new(pool.clone()),
            analytics: AnalyticsStorage::new(pool.clone()),
            settings: SettingsStorage::new(pool),
            started_at: std::time::Instant::now(),
        })
    }
}
