//! Analytics storage — read-side aggregation over the `friction_items` table.
//!
//! Active means `status != 'fixed'`. All three views take the calendar day as
//! an argument where it matters so the arithmetic stays deterministic under
//! test.

use anyhow::{Context as _, Result};
use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use super::model::{CategoryBreakdown, CurrentScore, TrendPoint};

/// Analytics query layer. Shares the pool owned by [`crate::storage::Storage`].
#[derive(Clone)]
pub struct AnalyticsStorage {
    pool: SqlitePool,
}

impl AnalyticsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ─── Current score ────────────────────────────────────────────────────────

    /// Sum of `annoyance_level` over active items, plus encounter stats for
    /// `today`.
    pub async fn current_score(&self, today: NaiveDate) -> Result<CurrentScore> {
        let rows: Vec<(i64, i64, Option<i64>, Option<String>)> = sqlx::query_as(
            "SELECT annoyance_level, encounter_count, encounter_limit, last_encounter_date
               FROM friction_items
              WHERE status != 'fixed'",
        )
        .fetch_all(&self.pool)
        .await
        .context("active friction items")?;

        let today_str = today.to_string();
        let mut current_score = 0i64;
        let mut items_over_limit = 0u64;
        let mut total_encounters_today = 0i64;

        for (level, count, limit, last_date) in &rows {
            current_score += level;
            if last_date.as_deref() == Some(today_str.as_str()) {
                total_encounters_today += count;
                if limit.is_some_and(|l| *count >= l) {
                    items_over_limit += 1;
                }
            }
        }

        Ok(CurrentScore {
            current_score,
            active_count: rows.len() as u64,
            items_over_limit,
            total_encounters_today,
        })
    }

    // ─── Trend ────────────────────────────────────────────────────────────────

    /// Daily friction scores for the `days`-day window ending at `today`,
    /// ascending by date.
    ///
    /// For each day the score counts items that already existed
    /// (`date(created_at) <= day`) and were not yet fixed (`fixed_at` NULL or
    /// `date(fixed_at) > day`).
    pub async fn trend(&self, days: i64, today: NaiveDate) -> Result<Vec<TrendPoint>> {
        let rows: Vec<(i64, String, Option<String>)> = sqlx::query_as(
            "SELECT annoyance_level, created_at, fixed_at FROM friction_items",
        )
        .fetch_all(&self.pool)
        .await
        .context("friction items for trend")?;

        // Parse timestamps once, not once per day.
        let mut items: Vec<(i64, NaiveDate, Option<NaiveDate>)> = Vec::with_capacity(rows.len());
        for (level, created_at, fixed_at) in rows {
            let created = date_of(&created_at)?;
            let fixed = fixed_at.as_deref().map(date_of).transpose()?;
            items.push((level, created, fixed));
        }

        let start = today - Duration::days(days - 1);
        let mut points = Vec::with_capacity(days as usize);
        for n in 0..days {
            let day = start + Duration::days(n);
            let score = items
                .iter()
                .filter(|(_, created, fixed)| {
                    *created <= day && fixed.is_none_or(|f| f > day)
                })
                .map(|(level, _, _)| level)
                .sum();
            points.push(TrendPoint {
                date: day.to_string(),
                score,
            });
        }
        Ok(points)
    }

    // ─── Category breakdown ───────────────────────────────────────────────────

    /// Per-category score sums over active items. Categories with no active
    /// items report zero.
    pub async fn category_breakdown(&self) -> Result<CategoryBreakdown> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, SUM(annoyance_level)
               FROM friction_items
              WHERE status != 'fixed'
           GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await
        .context("category breakdown")?;

        let mut breakdown = CategoryBreakdown::default();
        for (category, score) in rows {
            match category.as_str() {
                "home" => breakdown.home = score,
                "work" => breakdown.work = score,
                "digital" => breakdown.digital = score,
                "health" => breakdown.health = score,
                "other" => breakdown.other = score,
                _ => {}
            }
        }
        Ok(breakdown)
    }
}

/// Calendar date of an RFC 3339 timestamp string.
fn date_of(ts: &str) -> Result<NaiveDate> {
    Ok(chrono::DateTime::parse_from_rfc3339(ts)
        .with_context(|| format!("invalid timestamp '{ts}'"))?
        .date_naive())
}
