//! Key/value settings storage. Currently holds a single known key: the
//! global daily encounter limit.

use anyhow::{Context as _, Result};
use sqlx::SqlitePool;

const GLOBAL_DAILY_LIMIT_KEY: &str = "global_daily_limit";

/// Settings query + write layer. Shares the pool owned by [`crate::storage::Storage`].
#[derive(Clone)]
pub struct SettingsStorage {
    pool: SqlitePool,
}

impl SettingsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The global daily encounter limit, or `None` when unset.
    pub async fn global_daily_limit(&self) -> Result<Option<i64>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
                .bind(GLOBAL_DAILY_LIMIT_KEY)
                .fetch_optional(&self.pool)
                .await
                .context("load global daily limit")?;

        match value {
            Some(v) => {
                let limit = v
                    .parse::<i64>()
                    .with_context(|| format!("corrupt global daily limit '{v}'"))?;
                Ok(Some(limit))
            }
            None => Ok(None),
        }
    }

    /// Set or clear the global daily encounter limit. `None` deletes the row.
    pub async fn set_global_daily_limit(&self, limit: Option<i64>) -> Result<()> {
        match limit {
            Some(limit) => {
                sqlx::query(
                    "INSERT INTO settings (key, value) VALUES (?, ?)
                     ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                )
                .bind(GLOBAL_DAILY_LIMIT_KEY)
                .bind(limit.to_string())
                .execute(&self.pool)
                .await
                .context("store global daily limit")?;
            }
            None => {
                sqlx::query("DELETE FROM settings WHERE key = ?")
                    .bind(GLOBAL_DAILY_LIMIT_KEY)
                    .execute(&self.pool)
                    .await
                    .context("clear global daily limit")?;
            }
        }
        Ok(())
    }
}
