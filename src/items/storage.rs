//! CRUD layer for the `friction_items` table.

use anyhow::{Context as _, Result};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::model::{Category, FrictionItemPatch, FrictionItemRow, NewFrictionItem, Status};
use crate::storage::with_timeout;

/// Friction item query + write layer. Shares the pool owned by [`crate::storage::Storage`].
#[derive(Clone)]
pub struct ItemStorage {
    pool: SqlitePool,
}

impl ItemStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new item with status `not_fixed` and stamped timestamps.
    pub async fn create(&self, item: &NewFrictionItem) -> Result<FrictionItemRow> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO friction_items
                (title, description, annoyance_level, category, status,
                 created_at, updated_at, encounter_limit)
             VALUES (?, ?, ?, ?, 'not_fixed', ?, ?, ?)",
        )
        .bind(item.title.trim())
        .bind(&item.description)
        .bind(item.annoyance_level)
        .bind(item.category.as_str())
        .bind(&now)
        .bind(&now)
        .bind(item.encounter_limit)
        .execute(&self.pool)
        .await
        .context("insert friction item")?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("friction item not found after insert"))
    }

    /// List items, newest first, optionally filtered by status and category.
    pub async fn list(
        &self,
        status: Option<Status>,
        category: Option<Category>,
    ) -> Result<Vec<FrictionItemRow>> {
        with_timeout(async {
            let mut sql = String::from("SELECT * FROM friction_items");
            let mut clauses: Vec<&str> = Vec::new();
            if status.is_some() {
                clauses.push("status = ?");
            }
            if category.is_some() {
                clauses.push("category = ?");
            }
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");

            let mut query = sqlx::query_as::<_, FrictionItemRow>(&sql);
            if let Some(s) = status {
                query = query.bind(s.as_str());
            }
            if let Some(c) = category {
                query = query.bind(c.as_str());
            }
            query
                .fetch_all(&self.pool)
                .await
                .context("list friction items")
        })
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<FrictionItemRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM friction_items WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Apply a partial update. Returns `None` when the item does not exist.
    ///
    /// The `fixed_at` timestamp follows the status: transitioning to `fixed`
    /// stamps it, transitioning away clears it, staying put leaves it alone.
    pub async fn update(
        &self,
        id: i64,
        patch: &FrictionItemPatch,
    ) -> Result<Option<FrictionItemRow>> {
        let Some(row) = self.get(id).await? else {
            return Ok(None);
        };

        let old_status = row.status.clone();
        let title = match &patch.title {
            Some(t) => t.trim().to_string(),
            None => row.title,
        };
        let description = patch.description.clone().or(row.description);
        let annoyance_level = patch.annoyance_level.unwrap_or(row.annoyance_level);
        let category = match patch.category {
            Some(c) => c.as_str().to_string(),
            None => row.category,
        };
        let status = match patch.status {
            Some(s) => s.as_str().to_string(),
            None => row.status,
        };
        let encounter_limit = patch.encounter_limit.or(row.encounter_limit);

        let now = Utc::now().to_rfc3339();
        let fixed_at = if old_status != "fixed" && status == "fixed" {
            Some(now.clone())
        } else if old_status == "fixed" && status != "fixed" {
            None
        } else {
            row.fixed_at
        };

        sqlx::query(
            "UPDATE friction_items
                SET title = ?, description = ?, annoyance_level = ?, category = ?,
                    status = ?, fixed_at = ?, encounter_limit = ?, updated_at = ?
              WHERE id = ?",
        )
        .bind(&title)
        .bind(&description)
        .bind(annoyance_level)
        .bind(&category)
        .bind(&status)
        .bind(&fixed_at)
        .bind(encounter_limit)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update friction item")?;

        self.get(id).await
    }

    /// Delete an item. Returns `true` when a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM friction_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete friction item")?;
        Ok(result.rows_affected() > 0)
    }

    /// Record one encounter with the item for `today`.
    ///
    /// The counter continues within the same calendar day and resets to 1 on
    /// the first encounter of a new day. Returns the refreshed row and
    /// whether the item's own daily limit is now met or exceeded; `None` when
    /// the item does not exist.
    pub async fn record_encounter(
        &self,
        id: i64,
        today: NaiveDate,
    ) -> Result<Option<(FrictionItemRow, bool)>> {
        let Some(row) = self.get(id).await? else {
            return Ok(None);
        };

        let today_str = today.to_string();
        let new_count = if row.last_encounter_date.as_deref() == Some(today_str.as_str()) {
            row.encounter_count + 1
        } else {
            1
        };

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE friction_items
                SET encounter_count = ?, last_encounter_date = ?, updated_at = ?
              WHERE id = ?",
        )
        .bind(new_count)
        .bind(&today_str)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("record encounter")?;

        let updated = self
            .get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("friction item vanished during encounter update"))?;
        let exceeded = updated
            .encounter_limit
            .is_some_and(|limit| updated.encounter_count >= limit);
        Ok(Some((updated, exceeded)))
    }
}
